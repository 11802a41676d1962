//! Key-metric cards shown above each sensor table, built from the latest
//! reading.

use crate::api::LatestReadings;
use crate::format::format_number;
use crate::record::SensorRecord;
use crate::sensor::SensorType;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMetric {
    pub label: &'static str,
    pub icon: &'static str,
    pub value: String,
    pub subtitle: &'static str,
}

impl KeyMetric {
    fn new(label: &'static str, icon: &'static str, value: String, subtitle: &'static str) -> Self {
        Self {
            label,
            icon,
            value,
            subtitle,
        }
    }
}

/// Cards for the newest reading of `sensor`, with whether the device reported
/// success. `None` when there is no usable reading.
pub fn key_metrics(latest: &LatestReadings, sensor: SensorType) -> Option<(Vec<KeyMetric>, bool)> {
    match sensor {
        SensorType::Pzem016 | SensorType::Pzem017 => {
            let record = latest.power(sensor)?;
            let reading = record.reading()?;
            let ac = sensor == SensorType::Pzem016;
            let value = |v: Option<f64>, decimals: usize, suffix: &str| {
                format!("{} {}", format_number(v.unwrap_or(0.0), decimals), suffix)
            };
            let (power_sub, voltage_sub, current_sub) = if ac {
                ("AC Power Draw", "AC Voltage", "AC Current")
            } else {
                ("Solar Panel Output", "DC Voltage", "DC Current")
            };
            let mut cards = vec![
                KeyMetric::new("Current Power", "fa-bolt", value(reading.power_w, 1, "W"), power_sub),
                KeyMetric::new("Voltage", "fa-plug", value(reading.voltage_v, 1, "V"), voltage_sub),
                KeyMetric::new("Current", "fa-wave-square", value(reading.current_a, 3, "A"), current_sub),
                KeyMetric::new("Energy", "fa-chart-bar", value(reading.energy_kwh, 3, "kWh"), "Total Energy"),
            ];
            if ac {
                cards.push(KeyMetric::new(
                    "Frequency",
                    "fa-wave-square",
                    value(reading.frequency_hz, 1, "Hz"),
                    "Grid Frequency",
                ));
            }
            Some((cards, record.is_online()))
        }
        SensorType::Dht22 => {
            let record = latest.climate()?;
            let cards = vec![
                KeyMetric::new(
                    "Temperature",
                    "fa-thermometer-half",
                    format!("{}°C", format_number(record.temperature?, 1)),
                    "Ambient Temperature",
                ),
                KeyMetric::new(
                    "Humidity",
                    "fa-tint",
                    format!("{}%", format_number(record.humidity?, 1)),
                    "Relative Humidity",
                ),
            ];
            Some((cards, record.is_online()))
        }
        SensorType::System => {
            let record = latest.system()?;
            let pct = |v: Option<f64>| match v {
                Some(v) => format!("{}%", format_number(v, 1)),
                None => "-".to_string(),
            };
            let cards = vec![
                KeyMetric::new("CPU", "fa-microchip", pct(record.cpu_usage_percent), "CPU Usage"),
                KeyMetric::new("RAM", "fa-memory", pct(record.ram_usage_percent), "Memory Usage"),
                KeyMetric::new("Storage", "fa-hdd", pct(record.storage_usage_percent), "Disk Usage"),
                KeyMetric::new(
                    "CPU Temp",
                    "fa-thermometer-half",
                    match record.cpu_temperature {
                        Some(t) => format!("{}°C", format_number(t, 1)),
                        None => "-".to_string(),
                    },
                    "Processor Temperature",
                ),
            ];
            Some((cards, record.is_online()))
        }
    }
}

/// Message for the alarm banner, when any PZEM alarm register reads "ON".
pub fn alarm_message(latest: &LatestReadings, sensor: SensorType) -> Option<String> {
    let reading = latest.power(sensor)?.reading()?;
    if !reading.alarm_active() {
        return None;
    }
    let mut parts = Vec::new();
    if reading.alarm_status.as_deref() == Some("ON") {
        parts.push("power alarm");
    }
    if reading.over_voltage_alarm.as_deref() == Some("ON") {
        parts.push("over-voltage");
    }
    if reading.under_voltage_alarm.as_deref() == Some("ON") {
        parts.push("under-voltage");
    }
    Some(format!("{} alarm active: {}", sensor.title(), parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ClimateRecord, PowerReading, PowerRecord};

    fn ac_latest(reading: PowerReading) -> LatestReadings {
        LatestReadings {
            pzem_ac: vec![PowerRecord {
                timestamp: "2024-03-10 08:00:00".into(),
                status: Some("success".into()),
                parsed_data: Some(reading),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn ok_reading() -> PowerReading {
        PowerReading {
            voltage_v: Some(221.4),
            current_a: Some(1.234),
            power_w: Some(1520.0),
            energy_kwh: Some(12.5),
            frequency_hz: Some(50.0),
            status: Some("success".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ac_metrics() {
        let (cards, online) = key_metrics(&ac_latest(ok_reading()), SensorType::Pzem016).unwrap();
        assert!(online);
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].value, "1.520,0 W");
        assert_eq!(cards[2].value, "1,234 A");
        assert_eq!(cards[4].value, "50,0 Hz");
    }

    #[test]
    fn test_failed_parse_has_no_metrics() {
        let reading = PowerReading {
            status: Some("error".into()),
            ..ok_reading()
        };
        assert!(key_metrics(&ac_latest(reading), SensorType::Pzem016).is_none());
        assert!(key_metrics(&LatestReadings::default(), SensorType::Dht22).is_none());
    }

    #[test]
    fn test_climate_requires_both_values() {
        let mut latest = LatestReadings {
            dht22: vec![ClimateRecord {
                temperature: Some(28.4),
                humidity: Some(71.0),
                status: Some("success".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let (cards, _) = key_metrics(&latest, SensorType::Dht22).unwrap();
        assert_eq!(cards[0].value, "28,4°C");

        latest.dht22[0].humidity = None;
        assert!(key_metrics(&latest, SensorType::Dht22).is_none());
    }

    #[test]
    fn test_alarm_message() {
        assert!(alarm_message(&ac_latest(ok_reading()), SensorType::Pzem016).is_none());
        let reading = PowerReading {
            alarm_status: Some("ON".into()),
            ..ok_reading()
        };
        let msg = alarm_message(&ac_latest(reading), SensorType::Pzem016).unwrap();
        assert!(msg.ends_with("alarm active: power alarm"));
    }
}
