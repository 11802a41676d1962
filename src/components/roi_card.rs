use leptos::prelude::*;
use tracing::info;
use wasm_bindgen_futures::spawn_local;

use sensor_dashboard_core::api::EXCEL_MIME;
use sensor_dashboard_core::export::roi_export_filename;
use sensor_dashboard_core::format::{format_currency, format_date, format_number};
use sensor_dashboard_core::retry::with_retry;
use sensor_dashboard_core::roi::RoiSummary;
use sensor_dashboard_core::{DashboardError, Route};

use crate::api;
use crate::app::{today, AppContext};
use crate::download::save_bytes;
use crate::poll::poll_every;

#[component]
pub fn RoiCard() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (summary, set_summary) = signal::<Option<RoiSummary>>(None);
    let (error, set_error) = signal::<Option<DashboardError>>(None);
    let (loading, set_loading) = signal(false);
    let (exporting, set_exporting) = signal(false);

    let load = move || {
        if loading.get_untracked() {
            return;
        }
        set_loading.set(true);
        set_error.set(None);
        let client = ctx.client();
        let policy = ctx.config().retry_policy();
        spawn_local(async move {
            let result = with_retry(policy, api::sleep, || {
                let client = client.clone();
                async move { client.fetch_roi_summary().await }
            })
            .await;
            match result {
                Ok(roi) => set_summary.set(Some(roi)),
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load());
    poll_every(ctx.config().roi_refresh_interval(), load);

    let export_report = move |_| {
        if exporting.get_untracked() {
            return;
        }
        set_exporting.set(true);
        let client = ctx.client();
        let toasts = ctx.toasts;
        spawn_local(async move {
            let filename = roi_export_filename(None, None, today());
            let result = match client.fetch_roi_export(None).await {
                Ok(bytes) => save_bytes(&bytes, EXCEL_MIME, &filename),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    info!("ROI report exported as {}", filename);
                    toasts.success("ROI report downloaded");
                }
                Err(e) => toasts.error(e.user_message_in("Failed to export ROI report")),
            }
            set_exporting.set(false);
        });
    };

    view! {
        <div class="card roi-card">
            <div class="card-header">
                <h3 class="card-title">
                    <div class="card-icon icon-roi">
                        <i class="fas fa-chart-pie"></i>
                    </div>
                    "Return on Investment"
                </h3>
                {move || match summary.get() {
                    Some(roi) => {
                        let (label, class) = roi.tier().badge();
                        view! { <span class=class>{label}</span> }.into_any()
                    }
                    None => view! { <span class="status-badge">"Loading..."</span> }.into_any(),
                }}
            </div>
            <div class="card-content">
                {move || {
                    if let Some(e) = error.get() {
                        return view! {
                            <div class="roi-error">
                                <i class="fas fa-exclamation-triangle"></i>
                                <p>{e.user_message_in("Failed to load ROI data")}</p>
                                <button class="roi-action-btn" on:click=move |_| load()>
                                    <i class="fas fa-redo"></i>
                                    " Retry"
                                </button>
                            </div>
                        }
                        .into_any();
                    }
                    match summary.get() {
                        Some(roi) => view! { <RoiDetails roi /> }.into_any(),
                        None => view! { <div class="loading">"Loading ROI data..."</div> }.into_any(),
                    }
                }}
                <div class="roi-actions">
                    <button
                        class="roi-action-btn primary"
                        on:click=export_report
                        disabled=move || exporting.get()
                    >
                        <i class="fas fa-download"></i>
                        {move || if exporting.get() { " Exporting..." } else { " Export Report" }}
                    </button>
                    <a href=Route::RoiSettings.path() class="roi-action-btn">
                        <i class="fas fa-cog"></i>
                        " Settings"
                    </a>
                </div>
            </div>
        </div>
    }
}

#[component]
fn RoiDetails(roi: RoiSummary) -> impl IntoView {
    let progress = roi.progress_percentage();
    let start = roi
        .system_start()
        .map(|d| format_date(&d))
        .unwrap_or_else(|| "-".to_string());

    view! {
        <div class="roi-card-grid">
            <div class="roi-metric">
                <div class="roi-metric-value">{format_currency(roi.today_savings)}</div>
                <div class="roi-metric-label">"Today's Savings"</div>
            </div>
            <div class="roi-metric">
                <div class="roi-metric-value">{format_currency(roi.monthly_savings)}</div>
                <div class="roi-metric-label">"This Month"</div>
            </div>
            <div class="roi-metric">
                <div class="roi-metric-value">{format_currency(roi.total_savings)}</div>
                <div class="roi-metric-label">"Total Saved"</div>
            </div>
        </div>

        <div class="roi-progress-container">
            <div class="roi-progress-label">
                <span>"Investment Recovery"</span>
                <span>{format!("{}%", format_number(progress, 1))}</span>
            </div>
            <div class="roi-progress-bar">
                <div class="roi-progress-fill" style=format!("width: {:.1}%", progress)></div>
                <div class="roi-progress-text">
                    {format!(
                        "{} / {}",
                        format_currency(roi.investment_recovered),
                        format_currency(roi.investment()),
                    )}
                </div>
            </div>
        </div>

        <div class="roi-payback">
            <i class="fas fa-clock"></i>
            <div class="roi-payback-value">{format!("{} remaining", roi.payback_text())}</div>
        </div>

        <div class="roi-investment-info">
            <span><strong>"System Start: "</strong>{start}</span>
            <span><strong>"Investment: "</strong>{format_currency(roi.investment())}</span>
        </div>

        <div class="roi-summary-text">{roi.summary_text()}</div>
    }
}
