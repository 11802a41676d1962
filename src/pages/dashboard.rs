use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use sensor_dashboard_core::api::LatestReadings;
use sensor_dashboard_core::metrics::key_metrics;
use sensor_dashboard_core::retry::with_retry;
use sensor_dashboard_core::{DashboardError, Route, SensorType};

use crate::api;
use crate::app::AppContext;
use crate::components::metric_card::MetricCard;
use crate::components::roi_card::RoiCard;
use crate::components::status_badge::{CheckStatus, StatusBadge};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (latest, set_latest) = signal::<Option<LatestReadings>>(None);
    let (error, set_error) = signal::<Option<DashboardError>>(None);
    let (api_healthy, set_api_healthy) = signal::<Option<bool>>(None);

    Effect::new(move |_| {
        let client = ctx.client();
        let policy = ctx.config().retry_policy();
        let toasts = ctx.toasts;
        spawn_local(async move {
            let result = with_retry(policy, api::sleep, || {
                let client = client.clone();
                async move { client.fetch_latest(1).await }
            })
            .await;
            match result {
                Ok(readings) => set_latest.set(Some(readings)),
                Err(e) => {
                    toasts.error(e.user_message_in("Failed to load latest readings"));
                    set_error.set(Some(e));
                }
            }

            let healthy = client.fetch_health().await.map(|h| h.is_healthy()).unwrap_or(false);
            set_api_healthy.set(Some(healthy));
        });
    });

    view! {
        <div class="page dashboard-page">
            <h2>"Solar Monitoring Dashboard"</h2>
            <p class="page-description">
                "Live power, climate and system readings with investment recovery tracking."
            </p>

            <RoiCard />

            <section class="latest-section">
                <h3>"Latest Readings"</h3>
                {move || {
                    if let Some(e) = error.get() {
                        return view! {
                            <div class="metrics-error">{e.user_message()}</div>
                        }
                        .into_any();
                    }
                    match latest.get() {
                        Some(readings) => view! {
                            <div class="card-grid">
                                {SensorType::ALL
                                    .into_iter()
                                    .map(|sensor| view! { <SensorSummary sensor readings=readings.clone() /> })
                                    .collect_view()}
                            </div>
                        }
                        .into_any(),
                        None => view! {
                            <div class="metrics-loading">
                                <i class="fas fa-spinner fa-spin"></i>
                                " Loading latest readings..."
                            </div>
                        }
                        .into_any(),
                    }
                }}
            </section>

            <section class="health-section">
                <h3>"System Health"</h3>
                {move || {
                    let status = CheckStatus::from_result(api_healthy.get());
                    let detail = match status {
                        CheckStatus::Pass => "Healthy",
                        CheckStatus::Fail => "Unreachable or degraded",
                        CheckStatus::Unknown => "Checking...",
                    };
                    view! { <StatusBadge label="API Server" status detail /> }
                }}
            </section>
        </div>
    }
}

/// One card per sensor with its headline metrics and a link to its page.
#[component]
fn SensorSummary(sensor: SensorType, readings: LatestReadings) -> impl IntoView {
    let href = Route::Sensor(sensor).path();
    let body = match key_metrics(&readings, sensor) {
        Some((cards, online)) => view! {
            <div class="metrics-grid compact">
                {cards
                    .into_iter()
                    .take(2)
                    .map(|metric| view! { <MetricCard metric online /> })
                    .collect_view()}
            </div>
        }
        .into_any(),
        None => view! { <p class="metrics-empty">"No recent valid reading"</p> }.into_any(),
    };

    view! {
        <div class="card sensor-summary">
            <div class="card-header">
                <h4 class="card-title">
                    <i class=format!("fas {}", sensor.icon())></i>
                    " "
                    {sensor.title()}
                </h4>
            </div>
            {body}
            <a href=href class="btn btn-secondary">"View Data"</a>
        </div>
    }
}
