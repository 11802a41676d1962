//! REST API wire types and endpoint paths.
//!
//! Paths are relative to `DashboardConfig::api_base_url`. Transport lives in
//! the frontend crate; everything here is plain data so it can be tested on
//! any target.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::record::{ClimateRecord, PowerRecord, SystemRecord};
use crate::sensor::SensorType;
use crate::table::{SortDirection, TableFilters, TableState};

pub const ROI_SUMMARY_PATH: &str = "/roi/summary";
pub const ROI_SETTINGS_PATH: &str = "/roi/settings";
pub const HEALTH_PATH: &str = "/health";
pub const EXCEL_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `{ "success": bool, "data": ..., "error": "..." }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap `data`, turning `success: false` into an HTTP error carrying the
    /// server's message.
    pub fn into_result(self, status: u16) -> Result<T> {
        if !self.success {
            return Err(DashboardError::Http {
                status,
                message: self
                    .error
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            });
        }
        self.data
            .ok_or_else(|| DashboardError::Decode("response has no data".to_string()))
    }
}

/// Decode an enveloped JSON body.
pub fn decode_envelope<T: DeserializeOwned>(body: &str, status: u16) -> Result<T> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    envelope.into_result(status)
}

/// Decode the reply to a write, which carries a `message` instead of `data`.
pub fn decode_ack(body: &str, status: u16) -> Result<String> {
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(body)?;
    if !envelope.success {
        return envelope.into_result(status).map(|_| String::new());
    }
    Ok(envelope.message.unwrap_or_else(|| "Saved".to_string()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u64,
    pub per_page: u32,
}

/// One page of `/data/{sensor}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound = "R: DeserializeOwned")]
pub struct SensorPage<R> {
    #[serde(default = "Vec::new")]
    pub records: Vec<R>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// `/latest` payload: most recent readings per feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LatestReadings {
    pub pzem_ac: Vec<PowerRecord>,
    pub pzem_dc: Vec<PowerRecord>,
    pub dht22: Vec<ClimateRecord>,
    pub system: Vec<SystemRecord>,
}

impl LatestReadings {
    /// Latest PZEM record for the AC or DC meter.
    pub fn power(&self, sensor: SensorType) -> Option<&PowerRecord> {
        match sensor {
            SensorType::Pzem016 => self.pzem_ac.first(),
            SensorType::Pzem017 => self.pzem_dc.first(),
            _ => None,
        }
    }

    pub fn climate(&self) -> Option<&ClimateRecord> {
        self.dht22.first()
    }

    pub fn system(&self) -> Option<&SystemRecord> {
        self.system.first()
    }
}

/// `/health` payload. Not enveloped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Parameters of a `/data/{sensor}` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQuery {
    pub filters: TableFilters,
    pub page: u32,
    pub limit: u32,
    pub sort: Option<(String, SortDirection)>,
}

impl DataQuery {
    pub fn from_state(state: &TableState) -> Self {
        Self {
            filters: *state.filters(),
            page: state.current_page(),
            limit: state.page_size(),
            sort: state
                .sort_column()
                .map(|c| (c.to_string(), state.sort_direction())),
        }
    }

    pub fn path(&self, sensor: SensorType) -> String {
        let mut params = date_params(Some(&self.filters));
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        if let Some((column, direction)) = &self.sort {
            params.push(("sort_by", column.clone()));
            params.push(("sort_dir", direction.as_str().to_string()));
        }
        with_query(&format!("/data/{}", sensor.slug()), &params)
    }
}

pub fn latest_path(limit: u32) -> String {
    with_query("/latest", &[("limit", limit.to_string())])
}

pub fn export_path(sensor: SensorType, filters: Option<&TableFilters>) -> String {
    let mut params = date_params(filters);
    params.push(("format", "excel".to_string()));
    with_query(&format!("/export/{}", sensor.slug()), &params)
}

pub fn roi_export_path(filters: Option<&TableFilters>) -> String {
    let mut params = date_params(filters);
    params.push(("format", "excel".to_string()));
    with_query("/roi/export", &params)
}

fn date_params(filters: Option<&TableFilters>) -> Vec<(&'static str, String)> {
    filters
        .map(|f| {
            vec![
                ("start_date", f.start_date().format("%Y-%m-%d").to_string()),
                ("end_date", f.end_date().format("%Y-%m-%d").to_string()),
            ]
        })
        .unwrap_or_default()
}

fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_data_path_from_state() {
        let mut state = TableState::new(50, date("2024-03-10"));
        state.apply_sort("parsed_data.power_w");
        let path = DataQuery::from_state(&state).path(SensorType::Pzem016);
        assert_eq!(
            path,
            "/data/pzem016?start_date=2024-03-10&end_date=2024-03-10&page=1&limit=50\
             &sort_by=parsed_data.power_w&sort_dir=desc"
        );
    }

    #[test]
    fn test_export_paths() {
        let filters = TableFilters::new(date("2024-03-01"), date("2024-03-10")).unwrap();
        assert_eq!(
            export_path(SensorType::Dht22, Some(&filters)),
            "/export/dht22?start_date=2024-03-01&end_date=2024-03-10&format=excel"
        );
        assert_eq!(roi_export_path(None), "/roi/export?format=excel");
        assert_eq!(latest_path(1), "/latest?limit=1");
    }

    #[test]
    fn test_decode_sensor_page() {
        let body = r#"{
            "success": true,
            "data": {
                "records": [{"timestamp": "2024-03-10 08:00:00", "temperature": 28.1, "humidity": 70.2}],
                "pagination": {"current_page": 1, "total_pages": 4, "total_records": 181, "per_page": 50},
                "filters": {"start_date": "2024-03-10", "end_date": "2024-03-10", "sensor_type": "dht22"}
            }
        }"#;
        let page: SensorPage<ClimateRecord> = decode_envelope(body, 200).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.pagination.total_pages, 4);
        assert_eq!(page.pagination.total_records, 181);
    }

    #[test]
    fn test_unsuccessful_envelope_is_http_error() {
        let body = r#"{"success": false, "error": "Invalid sensor type: foo"}"#;
        let err = decode_envelope::<SensorPage<ClimateRecord>>(body, 400).unwrap_err();
        assert_eq!(
            err,
            DashboardError::Http {
                status: 400,
                message: "Invalid sensor type: foo".to_string()
            }
        );
    }

    #[test]
    fn test_write_acknowledgement() {
        let ok = r#"{"success": true, "message": "ROI settings updated successfully"}"#;
        assert_eq!(decode_ack(ok, 200).unwrap(), "ROI settings updated successfully");

        let failed = r#"{"success": false, "error": "unsupported operand"}"#;
        assert_eq!(
            decode_ack(failed, 500).unwrap_err(),
            DashboardError::Http {
                status: 500,
                message: "unsupported operand".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode_envelope::<LatestReadings>("<html>", 200).unwrap_err();
        assert!(matches!(err, DashboardError::Decode(_)));
    }

    #[test]
    fn test_latest_readings_partial() {
        let body = r#"{"success": true, "data": {"pzem_ac": [{"timestamp": "2024-03-10 08:00:00", "status": "success"}]}}"#;
        let latest: LatestReadings = decode_envelope(body, 200).unwrap();
        assert!(latest.power(SensorType::Pzem016).is_some());
        assert!(latest.power(SensorType::Pzem017).is_none());
        assert!(latest.system().is_none());
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(r#"{"status": "healthy"}"#).unwrap();
        assert!(health.is_healthy());
        let degraded: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!degraded.is_healthy());
    }
}
