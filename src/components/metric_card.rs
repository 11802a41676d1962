use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use sensor_dashboard_core::api::LatestReadings;
use sensor_dashboard_core::metrics::{alarm_message, key_metrics, KeyMetric};
use sensor_dashboard_core::SensorType;

use crate::app::AppContext;

#[component]
pub fn MetricCard(metric: KeyMetric, online: bool) -> impl IntoView {
    view! {
        <div class=if online { "metric-card online" } else { "metric-card offline" }>
            <div class="metric-header">
                <i class=format!("fas {}", metric.icon)></i>
                <span>{metric.label}</span>
            </div>
            <div class="metric-value">{metric.value}</div>
            <div class="metric-subtitle">{metric.subtitle}</div>
        </div>
    }
}

/// Cards for the newest reading of one sensor, plus the alarm banner for the
/// PZEM meters.
#[component]
pub fn KeyMetrics(sensor: SensorType) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (latest, set_latest) = signal::<Option<LatestReadings>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        let client = ctx.client();
        spawn_local(async move {
            match client.fetch_latest(1).await {
                Ok(readings) => set_latest.set(Some(readings)),
                Err(e) => set_error.set(Some(e.user_message_in("Failed to load key metrics"))),
            }
        });
    });

    view! {
        <div class="key-metrics">
            {move || {
                if let Some(message) = error.get() {
                    return view! {
                        <div class="metrics-error">
                            <i class="fas fa-exclamation-triangle"></i>
                            " "
                            {message}
                        </div>
                    }
                    .into_any();
                }
                let Some(readings) = latest.get() else {
                    return view! {
                        <div class="metrics-loading">
                            <i class="fas fa-spinner fa-spin"></i>
                            " Loading key metrics..."
                        </div>
                    }
                    .into_any();
                };
                let alarm = alarm_message(&readings, sensor);
                match key_metrics(&readings, sensor) {
                    Some((cards, online)) => view! {
                        {alarm.map(|text| view! {
                            <div class="alarm-banner">
                                <i class="fas fa-exclamation-triangle"></i>
                                <span>{text}</span>
                            </div>
                        })}
                        <div class="metrics-grid">
                            {cards
                                .into_iter()
                                .map(|metric| view! { <MetricCard metric online /> })
                                .collect_view()}
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <div class="metrics-empty">
                            <i class="fas fa-info-circle"></i>
                            " No recent valid reading"
                        </div>
                    }
                    .into_any(),
                }
            }}
        </div>
    }
}
