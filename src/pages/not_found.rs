use leptos::prelude::*;
use leptos_router::hooks::use_location;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let location = use_location();
    view! {
        <div class="page not-found-page">
            <h2>"Page Not Found"</h2>
            <p class="page-description">
                {move || format!("There is no page at {}.", location.pathname.get())}
            </p>
            <a href="/" class="btn btn-primary">"Back to Dashboard"</a>
        </div>
    }
}
