use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use sensor_dashboard_core::api::{HealthStatus, LatestReadings};
use sensor_dashboard_core::format::format_timestamp;
use sensor_dashboard_core::record::SensorRecord;
use sensor_dashboard_core::SensorType;

use crate::app::AppContext;
use crate::components::status_badge::{CheckStatus, StatusBadge};

#[derive(Debug, Clone)]
struct HealthReport {
    api: Result<HealthStatus, String>,
    latest: Option<LatestReadings>,
}

/// `(online, last reading)` of a sensor's newest record.
fn feed_state(latest: &LatestReadings, sensor: SensorType) -> Option<(bool, String)> {
    match sensor {
        SensorType::Pzem016 | SensorType::Pzem017 => latest.power(sensor).map(describe),
        SensorType::Dht22 => latest.climate().map(describe),
        SensorType::System => latest.system().map(describe),
    }
}

fn describe<R: SensorRecord>(record: &R) -> (bool, String) {
    let when = record
        .parsed_timestamp()
        .map(|ts| format_timestamp(&ts))
        .unwrap_or_else(|| record.timestamp().to_string());
    (record.is_online(), when)
}

#[component]
pub fn HealthPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (checking, set_checking) = signal(false);
    let (report, set_report) = signal::<Option<HealthReport>>(None);

    let do_health_check = move || {
        if checking.get_untracked() {
            return;
        }
        set_checking.set(true);
        let client = ctx.client();
        spawn_local(async move {
            let api = client.fetch_health().await.map_err(|e| e.user_message());
            // Feed checks only make sense once the API answers
            let latest = match &api {
                Ok(_) => client.fetch_latest(1).await.ok(),
                Err(_) => None,
            };
            set_report.set(Some(HealthReport { api, latest }));
            set_checking.set(false);
        });
    };

    // Auto-run health check on mount
    Effect::new(move |_| do_health_check());

    view! {
        <div class="page health-page">
            <h2>"Health Check"</h2>
            <p class="page-description">
                "Verify that the API server, database and every sensor feed are reporting."
            </p>

            <button
                class="btn btn-primary"
                on:click=move |_| do_health_check()
                disabled=move || checking.get()
            >
                {move || if checking.get() { "Checking..." } else { "Run Health Check" }}
            </button>

            {move || {
                report.get().map(|r| {
                    let mut results = Vec::new();
                    match &r.api {
                        Ok(health) => {
                            results.push((
                                "API Server".to_string(),
                                CheckStatus::from_result(Some(health.is_healthy())),
                                health.status.clone(),
                            ));
                            if let Some(db) = &health.database {
                                results.push((
                                    "Database".to_string(),
                                    CheckStatus::from_result(Some(db == "connected")),
                                    db.clone(),
                                ));
                            }
                        }
                        Err(e) => {
                            results.push(("API Server".to_string(), CheckStatus::Fail, e.clone()))
                        }
                    }
                    for sensor in SensorType::ALL {
                        let (status, detail) = match r.latest.as_ref().map(|l| feed_state(l, sensor)) {
                            Some(Some((online, when))) => (
                                CheckStatus::from_result(Some(online)),
                                format!("Last reading {}", when),
                            ),
                            Some(None) => (CheckStatus::Fail, "No recent data".to_string()),
                            None => (CheckStatus::Unknown, "Not checked".to_string()),
                        };
                        results.push((sensor.title().to_string(), status, detail));
                    }

                    let total = results.len();
                    let passed = results.iter().filter(|(_, s, _)| *s == CheckStatus::Pass).count();
                    let summary_class = if passed == total {
                        "summary-all-pass"
                    } else if passed == 0 {
                        "summary-all-fail"
                    } else {
                        "summary-partial"
                    };

                    view! {
                        <div class="health-results">
                            {results
                                .into_iter()
                                .map(|(label, status, detail)| view! { <StatusBadge label status detail /> })
                                .collect_view()}
                            <div class=format!("health-summary {}", summary_class)>
                                {format!("{} of {} checks passed", passed, total)}
                            </div>
                        </div>
                    }
                })
            }}
        </div>
    }
}
