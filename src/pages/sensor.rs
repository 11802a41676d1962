use leptos::prelude::*;

use sensor_dashboard_core::column::{climate_columns, power_columns, system_columns};
use sensor_dashboard_core::SensorType;

use crate::components::data_table::DataTable;
use crate::components::metric_card::KeyMetrics;

#[component]
fn SensorHeader(sensor: SensorType) -> impl IntoView {
    let icon = format!("fas {}", sensor.icon());
    view! {
        <div class="page-header">
            <div class="page-title">
                <i class=icon.clone()></i>
                <h2>{sensor.title()}</h2>
                <span class="page-subtitle">{sensor.subtitle()}</span>
            </div>
        </div>
        <div class="page-description">
            <div class="description-card">
                <div class="description-content">
                    <p>{sensor.description()}</p>
                </div>
                <div class="description-icon">
                    <i class=icon></i>
                </div>
            </div>
        </div>
    }
}

/// PZEM-016 (AC) or PZEM-017 (DC) meter.
#[component]
pub fn PowerPage(sensor: SensorType) -> impl IntoView {
    view! {
        <div class=format!("page sensor-page {}-page", sensor.slug())>
            <SensorHeader sensor />
            <KeyMetrics sensor />
            <DataTable sensor columns=power_columns(sensor) />
        </div>
    }
}

#[component]
pub fn ClimatePage() -> impl IntoView {
    let sensor = SensorType::Dht22;
    view! {
        <div class="page sensor-page dht22-page">
            <SensorHeader sensor />
            <KeyMetrics sensor />
            <DataTable sensor columns=climate_columns() />
        </div>
    }
}

#[component]
pub fn SystemPage() -> impl IntoView {
    let sensor = SensorType::System;
    view! {
        <div class="page sensor-page system-page">
            <SensorHeader sensor />
            <KeyMetrics sensor />
            <DataTable sensor columns=system_columns() />
        </div>
    }
}
