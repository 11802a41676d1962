//! Typed rows returned by `/data/{sensor}` and `/latest`.
//!
//! The backend omits or nulls fields freely (a failed Modbus read has no
//! `parsed_data`), so every measurement is optional and structs default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::format::parse_timestamp;

const STATUS_SUCCESS: &str = "success";

/// Common accessors shared by every sensor row type.
pub trait SensorRecord: DeserializeOwned + Clone + PartialEq + 'static {
    fn timestamp(&self) -> &str;
    fn status(&self) -> Option<&str>;

    fn is_online(&self) -> bool {
        self.status() == Some(STATUS_SUCCESS)
    }

    fn parsed_timestamp(&self) -> Option<chrono::NaiveDateTime> {
        parse_timestamp(self.timestamp())
    }
}

/// Decoded PZEM-016 (AC) or PZEM-017 (DC) registers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerReading {
    pub voltage_v: Option<f64>,
    pub current_a: Option<f64>,
    pub power_w: Option<f64>,
    pub energy_kwh: Option<f64>,
    /// AC only
    pub frequency_hz: Option<f64>,
    /// AC only
    pub power_factor: Option<f64>,
    /// AC only, "ON" / "OFF"
    pub alarm_status: Option<String>,
    /// DC only
    pub over_voltage_alarm: Option<String>,
    /// DC only
    pub under_voltage_alarm: Option<String>,
    pub status: Option<String>,
}

impl PowerReading {
    pub fn is_valid(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// Any alarm register reading "ON".
    pub fn alarm_active(&self) -> bool {
        [
            &self.alarm_status,
            &self.over_voltage_alarm,
            &self.under_voltage_alarm,
        ]
        .iter()
        .any(|a| a.as_deref() == Some("ON"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerRecord {
    pub timestamp: String,
    pub device_type: Option<String>,
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub parsed_data: Option<PowerReading>,
    pub received_at: Option<String>,
}

impl PowerRecord {
    /// The decoded registers, only when the parse succeeded.
    pub fn reading(&self) -> Option<&PowerReading> {
        self.parsed_data.as_ref().filter(|p| p.is_valid())
    }
}

impl SensorRecord for PowerRecord {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateRecord {
    pub timestamp: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub gpio_pin: Option<i64>,
    pub library: Option<String>,
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub received_at: Option<String>,
}

impl SensorRecord for ClimateRecord {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemRecord {
    pub timestamp: String,
    pub ram_usage_percent: Option<f64>,
    pub storage_usage_percent: Option<f64>,
    pub cpu_usage_percent: Option<f64>,
    pub cpu_temperature: Option<f64>,
    pub storage_total_gb: Option<f64>,
    pub storage_used_gb: Option<f64>,
    pub storage_free_gb: Option<f64>,
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub received_at: Option<String>,
}

impl SensorRecord for SystemRecord {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_record_with_parsed_data() {
        let json = r#"{
            "timestamp": "2024-03-10 08:00:00",
            "device_type": "PZEM-016_AC",
            "raw_registers": [2301, 120, 0],
            "status": "success",
            "error_message": null,
            "parsed_data": {
                "voltage_v": 230.1,
                "current_a": 1.2,
                "power_w": 276.1,
                "energy_kwh": 12.345,
                "frequency_hz": 50.0,
                "power_factor": 0.98,
                "alarm_status": "OFF",
                "status": "success"
            }
        }"#;
        let record: PowerRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_online());
        let reading = record.reading().unwrap();
        assert_eq!(reading.voltage_v, Some(230.1));
        assert!(!reading.alarm_active());
        assert!(record.parsed_timestamp().is_some());
    }

    #[test]
    fn test_failed_parse_has_no_reading() {
        let json = r#"{
            "timestamp": "2024-03-10 08:00:00",
            "status": "error",
            "error_message": "Modbus timeout",
            "parsed_data": {"status": "error"}
        }"#;
        let record: PowerRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_online());
        assert!(record.reading().is_none());
    }

    #[test]
    fn test_dc_under_voltage_alarm() {
        let reading = PowerReading {
            under_voltage_alarm: Some("ON".into()),
            status: Some("success".into()),
            ..Default::default()
        };
        assert!(reading.alarm_active());
    }

    #[test]
    fn test_climate_record_tolerates_nulls() {
        let json = r#"{"timestamp": "2024-03-10 08:00:00", "temperature": null, "humidity": 61.5}"#;
        let record: ClimateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.temperature, None);
        assert_eq!(record.humidity, Some(61.5));
        assert_eq!(record.status(), None);
    }
}
