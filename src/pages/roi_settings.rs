use leptos::prelude::*;
use tracing::info;
use wasm_bindgen_futures::spawn_local;

use sensor_dashboard_core::format::{format_currency, format_date, format_number};
use sensor_dashboard_core::roi::{RoiSettings, TariffEntry, TariffUpdate};
use sensor_dashboard_core::DashboardError;

use crate::app::{today, AppContext};

#[component]
pub fn RoiSettingsPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let toasts = ctx.toasts;
    let settings = RwSignal::new(None::<RoiSettings>);
    let load_error = RwSignal::new(None::<DashboardError>);
    let tariff = RwSignal::new(String::new());
    let effective = RwSignal::new(String::new());
    let validation = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let load = move || {
        load_error.set(None);
        let client = ctx.client();
        spawn_local(async move {
            match client.fetch_roi_settings().await {
                Ok(loaded) => {
                    tariff.set(format_number(loaded.current_tariff_per_kwh, 2));
                    settings.set(Some(loaded));
                }
                Err(e) => load_error.set(Some(e)),
            }
        });
    };

    Effect::new(move |_| load());

    let save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let update = match TariffUpdate::parse(
            &tariff.get_untracked(),
            &effective.get_untracked(),
            today(),
        ) {
            Ok(update) => update,
            Err(e) => {
                validation.set(Some(e.user_message()));
                return;
            }
        };
        validation.set(None);
        let unchanged = settings.with_untracked(|s| s.as_ref().is_some_and(|s| !update.changes(s)));
        if unchanged {
            toasts.info("Tariff unchanged");
            return;
        }

        saving.set(true);
        let client = ctx.client();
        spawn_local(async move {
            match client.update_roi_settings(&update).await {
                Ok(message) => {
                    info!(
                        "Tariff set to {} from {}",
                        update.current_tariff_per_kwh, update.effective_date
                    );
                    toasts.success(message);
                    effective.set(String::new());
                    load();
                }
                Err(e) => toasts.error(e.user_message_in("Failed to save ROI settings")),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="page roi-settings-page">
            <h2>"ROI Settings"</h2>
            <p class="page-description">
                "Electricity tariff used to value the energy your panels produce."
            </p>

            {move || load_error.get().map(|e| view! {
                <div class="roi-error">
                    <i class="fas fa-exclamation-triangle"></i>
                    <p>{e.user_message_in("Failed to load ROI settings")}</p>
                    <button class="roi-action-btn" on:click=move |_| load()>
                        <i class="fas fa-redo"></i>
                        " Retry"
                    </button>
                </div>
            })}

            {move || settings.get().map(|s| {
                let start = s
                    .system_start_date
                    .clone()
                    .unwrap_or_else(|| "-".to_string());
                view! {
                    <div class="card">
                        <div class="roi-investment-info">
                            <span>
                                <strong>"Investment: "</strong>
                                {format_currency(s.pv_investment_cost)}
                            </span>
                            <span><strong>"System Start: "</strong>{start}</span>
                            <span>
                                <strong>"Current Tariff: "</strong>
                                {format!("{}/kWh", format_currency(s.current_tariff_per_kwh))}
                            </span>
                        </div>
                    </div>
                }
            })}

            <form class="card settings-form" on:submit=save>
                <h3 class="card-title">"Update Tariff"</h3>
                <label class="form-label">
                    "Tariff per kWh (Rp)"
                    <input
                        type="text"
                        class="input"
                        inputmode="decimal"
                        prop:value=move || tariff.get()
                        on:input=move |ev| tariff.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-label">
                    "Effective date"
                    <input
                        type="date"
                        class="input"
                        prop:value=move || effective.get()
                        on:input=move |ev| effective.set(event_target_value(&ev))
                    />
                </label>
                {move || validation.get().map(|msg| view! { <div class="validation-error">{msg}</div> })}
                <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                    <i class="fas fa-save"></i>
                    {move || if saving.get() { " Saving..." } else { " Save" }}
                </button>
            </form>

            <div class="card">
                <h3 class="card-title">"Tariff History"</h3>
                {move || {
                    let history = settings.with(|s| {
                        s.as_ref().map(|s| s.tariff_history.clone()).unwrap_or_default()
                    });
                    if history.is_empty() {
                        return view! { <p class="empty-row">"No tariff changes recorded"</p> }
                            .into_any();
                    }
                    view! {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"Effective"</th>
                                    <th>"Tariff per kWh"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {history.into_iter().map(tariff_row).collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}

fn tariff_row(entry: TariffEntry) -> impl IntoView {
    let when = entry
        .effective()
        .map(|d| format_date(&d))
        .unwrap_or(entry.effective_date);
    view! {
        <tr>
            <td>{when}</td>
            <td>{format_currency(entry.tariff_per_kwh)}</td>
        </tr>
    }
}
