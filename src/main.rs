mod api;
mod app;
mod components;
mod download;
mod logging;
mod pages;
mod poll;
mod storage;

use leptos::prelude::*;
use sensor_dashboard_core::DashboardConfig;
use tracing::{info, warn};

use app::App;

const CONFIG_TOML: &str = include_str!("../dashboard.toml");

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match DashboardConfig::from_toml(CONFIG_TOML) {
        Ok(config) => (config, None),
        Err(e) => (DashboardConfig::default(), Some(e)),
    };
    logging::init(&config.log_level);
    if let Some(e) = config_error {
        warn!("Invalid embedded config, using defaults: {}", e);
    }
    info!("Starting dashboard against {}", config.api_base_url);

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
