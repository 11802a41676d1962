use chrono::{Local, NaiveDate};
use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::hooks::use_params_map;
use leptos_router::path;
use tracing::debug;

use sensor_dashboard_core::{DashboardConfig, Route as Page, SensorType};

use crate::api::ApiClient;
use crate::components::sidebar::Sidebar;
use crate::components::toast::{ToastContainer, Toasts};
use crate::pages::dashboard::DashboardPage;
use crate::pages::health::HealthPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::roi_settings::RoiSettingsPage;
use crate::pages::sensor::{ClimatePage, PowerPage, SystemPage};

/// Shared services, provided once at the root and read with
/// `expect_context::<AppContext>()`.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub config: StoredValue<DashboardConfig>,
    pub client: StoredValue<ApiClient>,
    pub toasts: Toasts,
}

impl AppContext {
    pub fn config(&self) -> DashboardConfig {
        self.config.get_value()
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }
}

/// Local calendar date, used for date presets and export filenames.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
    let toasts = Toasts::new();
    provide_context(AppContext {
        client: StoredValue::new(ApiClient::new(&config)),
        config: StoredValue::new(config),
        toasts,
    });

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <NotFoundPage /> }>
                        <Route path=path!("/") view=DashboardPage />
                        <Route path=path!("/:page") view=RoutedPage />
                    </Routes>
                </main>
            </div>
            <ToastContainer toasts />
        </Router>
    }
}

/// Resolve the single path segment into a page. Unknown segments render the
/// not-found view.
#[component]
fn RoutedPage() -> impl IntoView {
    let params = use_params_map();

    move || {
        let segment = params.read().get("page").unwrap_or_default();
        let path = format!("/{}", segment);
        match Page::from_path(&path) {
            Ok(Page::Dashboard) => view! { <DashboardPage /> }.into_any(),
            Ok(Page::Health) => view! { <HealthPage /> }.into_any(),
            Ok(Page::RoiSettings) => view! { <RoiSettingsPage /> }.into_any(),
            Ok(Page::Sensor(sensor @ (SensorType::Pzem016 | SensorType::Pzem017))) => {
                view! { <PowerPage sensor /> }.into_any()
            }
            Ok(Page::Sensor(SensorType::Dht22)) => view! { <ClimatePage /> }.into_any(),
            Ok(Page::Sensor(SensorType::System)) => view! { <SystemPage /> }.into_any(),
            Err(e) => {
                debug!("{}", e);
                view! { <NotFoundPage /> }.into_any()
            }
        }
    }
}
