use leptos::prelude::*;

use sensor_dashboard_core::format::format_number;
use sensor_dashboard_core::PageItem;

#[component]
pub fn Paginator(
    #[prop(into)] window: Signal<Vec<PageItem>>,
    #[prop(into)] current_page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    /// `(first, last, total)` of the visible rows
    #[prop(into)]
    summary: Signal<Option<(u64, u64, u64)>>,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] on_page: Callback<u32>,
) -> impl IntoView {
    let count = |n: u64| format_number(n as f64, 0);

    view! {
        <div class="table-pagination">
            <div class="pagination-info">
                {move || match summary.get() {
                    Some((first, last, total)) => format!(
                        "Showing {} to {} of {} records",
                        count(first),
                        count(last),
                        count(total),
                    ),
                    None => "No records".to_string(),
                }}
            </div>
            <div class="pagination-controls">
                <button
                    class="pagination-btn"
                    disabled=move || disabled.get() || current_page.get() <= 1
                    on:click=move |_| on_page.run(current_page.get_untracked().saturating_sub(1))
                >
                    <i class="fas fa-chevron-left"></i>
                </button>
                {move || {
                    let current = current_page.get();
                    window
                        .get()
                        .into_iter()
                        .map(|item| match item {
                            PageItem::Page(n) => view! {
                                <button
                                    class=if n == current { "pagination-btn active" } else { "pagination-btn" }
                                    disabled=move || disabled.get()
                                    on:click=move |_| on_page.run(n)
                                >
                                    {n}
                                </button>
                            }
                            .into_any(),
                            PageItem::Ellipsis => {
                                view! { <span class="pagination-ellipsis">"..."</span> }.into_any()
                            }
                        })
                        .collect_view()
                }}
                <button
                    class="pagination-btn"
                    disabled=move || { disabled.get() || current_page.get() >= total_pages.get() }
                    on:click=move |_| on_page.run(current_page.get_untracked() + 1)
                >
                    <i class="fas fa-chevron-right"></i>
                </button>
            </div>
        </div>
    }
}
