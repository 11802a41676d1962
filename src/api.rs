//! HTTP client for the sensor REST API.
//!
//! Every request runs under the configured timeout. The timer aborts the
//! underlying `fetch` through an `AbortController`, and the resulting error is
//! reported as `DashboardError::Timeout` rather than a network failure.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use gloo_net::http::{Request, Response};
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use web_sys::AbortController;

use sensor_dashboard_core::api::{
    self, decode_ack, decode_envelope, ApiEnvelope, DataQuery, HealthStatus, LatestReadings,
    SensorPage,
};
use sensor_dashboard_core::record::SensorRecord;
use sensor_dashboard_core::roi::{RoiSettings, RoiSummary, TariffUpdate};
use sensor_dashboard_core::{DashboardConfig, DashboardError, Result, SensorType, TableFilters};

use crate::download::browser_error;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.request_timeout(),
        }
    }

    pub async fn fetch_sensor_page<R: SensorRecord>(
        &self,
        sensor: SensorType,
        query: &DataQuery,
    ) -> Result<SensorPage<R>> {
        self.get_json(&query.path(sensor)).await
    }

    pub async fn fetch_latest(&self, limit: u32) -> Result<LatestReadings> {
        self.get_json(&api::latest_path(limit)).await
    }

    pub async fn fetch_roi_summary(&self) -> Result<RoiSummary> {
        self.get_json(api::ROI_SUMMARY_PATH).await
    }

    pub async fn fetch_roi_settings(&self) -> Result<RoiSettings> {
        self.get_json(api::ROI_SETTINGS_PATH).await
    }

    /// Save a new current tariff. Returns the server's confirmation text.
    pub async fn update_roi_settings(&self, update: &TariffUpdate) -> Result<String> {
        let body = serde_json::to_string(update)?;
        let (status, text) = self
            .send(api::ROI_SETTINGS_PATH, Some(body), read_text)
            .await?;
        if !(200..300).contains(&status) {
            return Err(http_error(status, &text));
        }
        decode_ack(&text, status)
    }

    /// `/health` answers with a bare object, not the usual envelope.
    pub async fn fetch_health(&self) -> Result<HealthStatus> {
        let (status, body) = self.get_text(api::HEALTH_PATH).await?;
        if !(200..300).contains(&status) {
            return Err(http_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_export_blob(
        &self,
        sensor: SensorType,
        filters: Option<&TableFilters>,
    ) -> Result<Vec<u8>> {
        self.get_bytes(&api::export_path(sensor, filters)).await
    }

    pub async fn fetch_roi_export(&self, filters: Option<&TableFilters>) -> Result<Vec<u8>> {
        self.get_bytes(&api::roi_export_path(filters)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (status, body) = self.get_text(path).await?;
        if !(200..300).contains(&status) {
            return Err(http_error(status, &body));
        }
        decode_envelope(&body, status)
    }

    async fn get_text(&self, path: &str) -> Result<(u16, String)> {
        self.send(path, None, read_text).await
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.send(path, None, |response| async move {
            let status = response.status();
            if !response.ok() {
                let body = response.text().await.unwrap_or_default();
                return Err(http_error(status, &body));
            }
            response
                .binary()
                .await
                .map_err(|e| DashboardError::Network(e.to_string()))
        })
        .await
    }

    /// Issue a GET, or a JSON POST when `body` is set, and hand the response
    /// to `read`. The timeout covers both the request and reading the body.
    async fn send<T, F, Fut>(&self, path: &str, body: Option<String>, read: F) -> Result<T>
    where
        F: FnOnce(Response) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let url = format!("{}{}", self.base_url, path);
        let method = if body.is_some() { "POST" } else { "GET" };
        debug!("{} {}", method, url);

        let controller = AbortController::new().map_err(browser_error)?;
        let timed_out = Rc::new(Cell::new(false));
        let timer = {
            let controller = controller.clone();
            let timed_out = Rc::clone(&timed_out);
            let millis = u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let signal = controller.signal();
        let outcome = async {
            let request = match body {
                Some(json) => Request::post(&url)
                    .abort_signal(Some(&signal))
                    .header("Content-Type", "application/json")
                    .body(json),
                None => Request::get(&url).abort_signal(Some(&signal)).build(),
            }
            .map_err(|e| DashboardError::Network(e.to_string()))?;
            let response = request
                .send()
                .await
                .map_err(|e| DashboardError::Network(e.to_string()))?;
            read(response).await
        }
        .await;
        drop(timer);

        match outcome {
            Err(_) if timed_out.get() => {
                warn!("{} {} timed out after {:?}", method, url, self.timeout);
                Err(DashboardError::Timeout(self.timeout))
            }
            Err(e) => {
                warn!("{} {} failed: {}", method, url, e);
                Err(e)
            }
            ok => ok,
        }
    }
}

async fn read_text(response: Response) -> Result<(u16, String)> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| DashboardError::Network(e.to_string()))?;
    Ok((status, body))
}

/// Build an HTTP error from a non-2xx body, preferring the server's `error`
/// field when the body is an envelope.
fn http_error(status: u16, body: &str) -> DashboardError {
    let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| default_status_text(status).to_string());
    DashboardError::Http { status, message }
}

fn default_status_text(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Request failed",
    }
}

/// Browser timer for `with_retry` backoff.
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}
