use leptos::prelude::*;
use leptos_router::hooks::use_location;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use sensor_dashboard_core::Route;

use crate::app::AppContext;
use crate::components::status_badge::CheckStatus;
use crate::poll::poll_every;
use crate::storage;

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let location = use_location();
    let (collapsed, set_collapsed) = signal(storage::sidebar_collapsed());
    let (healthy, set_healthy) = signal::<Option<bool>>(None);

    let probe = move || {
        let client = ctx.client();
        spawn_local(async move {
            match client.fetch_health().await {
                Ok(health) => set_healthy.set(Some(health.is_healthy())),
                Err(e) => {
                    warn!("Health probe failed: {}", e);
                    set_healthy.set(Some(false));
                }
            }
        });
    };

    // Probe on mount, then keep the indicator current
    Effect::new(move |_| probe());
    poll_every(ctx.config().health_poll_interval(), probe);

    let toggle = move |_| {
        set_collapsed.update(|c| *c = !*c);
        storage::set_sidebar_collapsed(collapsed.get_untracked());
    };

    let links = Route::ALL
        .into_iter()
        .map(|route| {
            let is_active = move || Route::from_path(&location.pathname.get()).ok() == Some(route);
            view! {
                <li class="nav-item">
                    <a
                        href=route.path()
                        class=move || if is_active() { "nav-link active" } else { "nav-link" }
                        title=route.label()
                    >
                        <i class=format!("fas {}", route.icon())></i>
                        <span class="nav-text">{route.label()}</span>
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <nav class=move || if collapsed.get() { "sidebar collapsed" } else { "sidebar" }>
            <div class="sidebar-header">
                <h1 class="sidebar-title">"Solar Monitor"</h1>
                <p class="sidebar-subtitle">"PZEM & DHT22 Telemetry"</p>
                <button class="sidebar-toggle" on:click=toggle>
                    <i class=move || {
                        if collapsed.get() { "fas fa-chevron-right" } else { "fas fa-chevron-left" }
                    }></i>
                </button>
            </div>
            <ul class="nav-list">{links}</ul>
            <div class="sidebar-footer">
                {move || {
                    let status = CheckStatus::from_result(healthy.get());
                    let text = match status {
                        CheckStatus::Pass => "API online",
                        CheckStatus::Fail => "API offline",
                        CheckStatus::Unknown => "Checking API...",
                    };
                    view! {
                        <span class=status.class()>{status.icon()}</span>
                        <span class="nav-text">{text}</span>
                    }
                }}
            </div>
        </nav>
    }
}
