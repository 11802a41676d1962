//! Server-paged sensor table: date presets, custom range, sortable headers,
//! Excel export with CSV fallback, and the paginator.

use leptos::prelude::*;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use sensor_dashboard_core::api::{DataQuery, EXCEL_MIME};
use sensor_dashboard_core::column::Column;
use sensor_dashboard_core::export::{csv_filename, records_to_csv, sensor_export_filename};
use sensor_dashboard_core::record::SensorRecord;
use sensor_dashboard_core::table::{parse_date_input, FetchOutcome, PresetOutcome};
use sensor_dashboard_core::{DashboardError, DatePreset, Result, SensorType, SortDirection, TableState};

use crate::app::{today, AppContext};
use crate::components::paginator::Paginator;
use crate::download::save_bytes;

const CSV_MIME: &str = "text/csv;charset=utf-8";

#[component]
pub fn DataTable<R>(sensor: SensorType, columns: Vec<Column<R>>) -> impl IntoView
where
    R: SensorRecord + Send + Sync,
{
    let ctx = expect_context::<AppContext>();
    let config = ctx.config();
    let max_visible = config.max_visible_pages;

    let state = RwSignal::new(TableState::new(config.page_size, today()));
    let records = RwSignal::new(Vec::<R>::new());
    let error = RwSignal::new(None::<DashboardError>);
    let validation = RwSignal::new(None::<String>);
    let active_preset = RwSignal::new(DatePreset::Today);
    let show_custom = RwSignal::new(false);
    let custom_start = RwSignal::new(String::new());
    let custom_end = RwSignal::new(String::new());
    let exporting = RwSignal::new(false);
    let columns = StoredValue::new(columns);
    let toasts = ctx.toasts;

    let load = move || load_page(sensor, ctx, state, records, error);

    Effect::new(move |_| load());

    let select_preset = move |preset: DatePreset| {
        active_preset.set(preset);
        match state.try_update(|s| s.apply_preset(preset, today())) {
            Some(PresetOutcome::Fetch) => {
                show_custom.set(false);
                validation.set(None);
                load();
            }
            Some(PresetOutcome::RevealCustomInputs) => {
                let filters = state.with_untracked(|s| *s.filters());
                custom_start.set(filters.start_date().format("%Y-%m-%d").to_string());
                custom_end.set(filters.end_date().format("%Y-%m-%d").to_string());
                show_custom.set(true);
            }
            None => {}
        }
    };

    let apply_custom = move |_| {
        let applied = parse_date_input(&custom_start.get_untracked()).and_then(|start| {
            let end = parse_date_input(&custom_end.get_untracked())?;
            state
                .try_update(|s| s.apply_date_filter(start, end))
                .unwrap_or(Ok(()))
        });
        match applied {
            Ok(()) => {
                validation.set(None);
                load();
            }
            Err(e) => validation.set(Some(e.user_message())),
        }
    };

    let sort_by = move |key: &'static str| {
        state.update(|s| s.apply_sort(key));
        load();
    };

    let go_to_page = Callback::new(move |page: u32| {
        if state.try_update(|s| s.go_to_page(page)).unwrap_or(false) {
            load();
        }
    });

    let retry = move |_| {
        state.update(|s| s.reload());
        load();
    };

    let export = move |_| {
        if exporting.get_untracked() {
            return;
        }
        exporting.set(true);
        let filters = state.with_untracked(|s| *s.filters());
        let client = ctx.client();
        spawn_local(async move {
            let filename = sensor_export_filename(
                sensor,
                Some(filters.start_date()),
                Some(filters.end_date()),
                today(),
            );
            match client.fetch_export_blob(sensor, Some(&filters)).await {
                Ok(bytes) => match save_bytes(&bytes, EXCEL_MIME, &filename) {
                    Ok(()) => toasts.success(format!("Exported {}", filename)),
                    Err(e) => toasts.error(e.user_message_in("Failed to save export")),
                },
                Err(e) => {
                    warn!("Excel export failed, falling back to CSV: {}", e);
                    match export_visible_as_csv(columns, records, &filename) {
                        Ok(csv_name) => toasts.info(format!(
                            "Excel export unavailable; saved visible rows as {}",
                            csv_name
                        )),
                        Err(csv_err) => toasts.error(csv_err.user_message_in("Export failed")),
                    }
                }
            }
            exporting.set(false);
        });
    };

    let header = move || {
        columns.with_value(|cols| {
            cols.iter()
                .map(|col| {
                    let key = col.key;
                    let icon = move || {
                        state.with(|s| match (s.sort_column() == Some(key), s.sort_direction()) {
                            (false, _) => "fas fa-sort",
                            (true, SortDirection::Ascending) => "fas fa-sort-up",
                            (true, SortDirection::Descending) => "fas fa-sort-down",
                        })
                    };
                    view! {
                        <th class="sortable" on:click=move |_| sort_by(key)>
                            {col.label}
                            " "
                            <i class=icon></i>
                        </th>
                    }
                })
                .collect_view()
        })
    };

    let body = move || {
        let span = columns.with_value(|c| c.len()).to_string();
        if state.with(|s| s.is_loading()) {
            return view! {
                <tr class="loading-row">
                    <td colspan=span>
                        <i class="fas fa-spinner fa-spin"></i>
                        " Loading data..."
                    </td>
                </tr>
            }
            .into_any();
        }
        if let Some(e) = error.get() {
            let retryable = e.is_retryable();
            return view! {
                <tr class="error-row">
                    <td colspan=span>
                        <i class="fas fa-exclamation-triangle"></i>
                        " "
                        {e.user_message()}
                        <Show when=move || retryable>
                            <button class="btn btn-retry" on:click=retry>
                                <i class="fas fa-redo"></i>
                                " Retry"
                            </button>
                        </Show>
                    </td>
                </tr>
            }
            .into_any();
        }
        if records.with(|r| r.is_empty()) {
            return view! {
                <tr class="empty-row">
                    <td colspan=span>"No data available for the selected period"</td>
                </tr>
            }
            .into_any();
        }
        records.with(|rows| {
            columns.with_value(|cols| {
                rows.iter()
                    .map(|record| {
                        let cells = cols
                            .iter()
                            .map(|col| {
                                let cell = col.render(record);
                                view! { <td class=cell.class.unwrap_or("")>{cell.text}</td> }
                            })
                            .collect_view();
                        view! { <tr>{cells}</tr> }
                    })
                    .collect_view()
                    .into_any()
            })
        })
    };

    let presets = DatePreset::ALL
        .into_iter()
        .map(|preset| {
            view! {
                <button
                    class=move || {
                        if active_preset.get() == preset { "preset-btn active" } else { "preset-btn" }
                    }
                    on:click=move |_| select_preset(preset)
                >
                    {preset.label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="data-table-container">
            <div class="table-controls">
                <div class="date-presets">{presets}</div>
                <Show when=move || show_custom.get()>
                    <div class="custom-date-range">
                        <input
                            type="date"
                            class="input"
                            prop:value=move || custom_start.get()
                            on:input=move |ev| custom_start.set(event_target_value(&ev))
                        />
                        <span>" to "</span>
                        <input
                            type="date"
                            class="input"
                            prop:value=move || custom_end.get()
                            on:input=move |ev| custom_end.set(event_target_value(&ev))
                        />
                        <button class="btn btn-primary" on:click=apply_custom>"Apply"</button>
                    </div>
                </Show>
                {move || validation.get().map(|msg| view! { <div class="validation-error">{msg}</div> })}
                <button
                    class="btn btn-primary export-btn"
                    on:click=export
                    disabled=move || exporting.get()
                >
                    <i class="fas fa-file-excel"></i>
                    {move || if exporting.get() { " Exporting..." } else { " Export Excel" }}
                </button>
            </div>

            <div class="table-wrapper">
                <table class="data-table">
                    <thead>
                        <tr>{header}</tr>
                    </thead>
                    <tbody>{body}</tbody>
                </table>
            </div>

            <Paginator
                window=Signal::derive(move || state.with(|s| s.page_window(max_visible)))
                current_page=Signal::derive(move || state.with(|s| s.current_page()))
                total_pages=Signal::derive(move || state.with(|s| s.total_pages()))
                summary=Signal::derive(move || state.with(|s| s.page_summary()))
                disabled=Signal::derive(move || state.with(|s| s.is_loading()))
                on_page=go_to_page
            />
        </div>
    }
}

/// Issue a fetch for the current generation. Duplicate triggers while the
/// same generation is loading are dropped, and responses that arrive after a
/// newer action are discarded.
fn load_page<R: SensorRecord + Send + Sync>(
    sensor: SensorType,
    ctx: AppContext,
    state: RwSignal<TableState>,
    records: RwSignal<Vec<R>>,
    error: RwSignal<Option<DashboardError>>,
) {
    let Some(ticket) = state.try_update(|s| s.begin_fetch()).flatten() else {
        return;
    };
    let query = state.with_untracked(DataQuery::from_state);
    let client = ctx.client();
    let toasts = ctx.toasts;
    error.set(None);

    spawn_local(async move {
        match client.fetch_sensor_page::<R>(sensor, &query).await {
            Ok(page) => {
                let outcome = state.try_update(|s| {
                    s.complete_fetch(
                        ticket,
                        page.pagination.total_records,
                        page.pagination.total_pages,
                    )
                });
                match outcome {
                    Some(FetchOutcome::Applied) => records.set(page.records),
                    // the server has fewer pages now; fetch the clamped one
                    Some(FetchOutcome::PageClamped) => {
                        load_page(sensor, ctx, state, records, error)
                    }
                    _ => {}
                }
            }
            Err(e) => {
                if state.try_update(|s| s.fail_fetch(ticket)) == Some(FetchOutcome::Applied) {
                    toasts.error(e.user_message_in("Failed to load data"));
                    error.set(Some(e));
                }
            }
        }
    });
}

/// Save the rows currently on screen as CSV. Returns the file name used.
fn export_visible_as_csv<R: SensorRecord + Send + Sync>(
    columns: StoredValue<Vec<Column<R>>>,
    records: RwSignal<Vec<R>>,
    xlsx_name: &str,
) -> Result<String> {
    let csv = records.with_untracked(|rows| columns.with_value(|cols| records_to_csv(cols, rows)))?;
    let name = csv_filename(xlsx_name);
    save_bytes(csv.as_bytes(), CSV_MIME, &name)?;
    info!("Saved {} as CSV fallback", name);
    Ok(name)
}
