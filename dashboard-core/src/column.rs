//! Table columns: a sort key, a label, a display type, and a typed accessor
//! that pulls the cell value out of a record.

use crate::format::{format_currency, format_number, format_percentage, format_timestamp, parse_timestamp};
use crate::record::{ClimateRecord, PowerReading, PowerRecord, SensorRecord, SystemRecord};
use crate::sensor::SensorType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Timestamp,
    Number,
    Currency,
    Percentage,
    Status,
    Energy,
    Voltage,
    Current,
    Power,
    Temperature,
    Humidity,
    Text,
}

/// A raw value extracted from a record, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
}

impl From<Option<f64>> for CellValue {
    fn from(v: Option<f64>) -> Self {
        v.map(CellValue::Number).unwrap_or(CellValue::Null)
    }
}

impl From<Option<i64>> for CellValue {
    fn from(v: Option<i64>) -> Self {
        v.map(|n| CellValue::Number(n as f64)).unwrap_or(CellValue::Null)
    }
}

impl From<Option<&String>> for CellValue {
    fn from(v: Option<&String>) -> Self {
        v.map(|s| CellValue::Text(s.clone())).unwrap_or(CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        if v.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(v.to_string())
        }
    }
}

/// Formatted cell ready for the view, with an optional CSS class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub class: Option<&'static str>,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self { text, class: None }
    }
}

pub struct Column<R> {
    /// Server-side sort identifier, e.g. `parsed_data.voltage_v`
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub decimals: Option<usize>,
    extract: fn(&R) -> CellValue,
}

// Manual impls: a fn pointer is Copy whatever R is.
impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Column<R> {}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("decimals", &self.decimals)
            .finish()
    }
}

impl<R> Column<R> {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: ColumnKind,
        extract: fn(&R) -> CellValue,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            decimals: None,
            extract,
        }
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn value(&self, record: &R) -> CellValue {
        (self.extract)(record)
    }

    pub fn render(&self, record: &R) -> Cell {
        format_cell(self.kind, self.decimals, &self.value(record))
    }
}

pub fn format_cell(kind: ColumnKind, decimals: Option<usize>, value: &CellValue) -> Cell {
    let number = match value {
        CellValue::Null => {
            return Cell {
                text: "-".to_string(),
                class: Some("null-value"),
            }
        }
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
    };

    match (kind, value) {
        (ColumnKind::Status, _) => {
            let text = text_of(value);
            // an alarm register reading OFF is the healthy state
            let class = if text == "success" || text == "OFF" {
                "status-indicator status-success"
            } else {
                "status-indicator status-error"
            };
            Cell {
                text,
                class: Some(class),
            }
        }
        (ColumnKind::Timestamp, CellValue::Text(raw)) => Cell::plain(
            parse_timestamp(raw)
                .map(|ts| format_timestamp(&ts))
                .unwrap_or_else(|| raw.clone()),
        ),
        (ColumnKind::Text, _) | (ColumnKind::Timestamp, _) => Cell::plain(text_of(value)),
        (_, _) => match number {
            Some(n) => Cell::plain(format_measure(kind, decimals, n)),
            None => Cell::plain(text_of(value)),
        },
    }
}

fn format_measure(kind: ColumnKind, decimals: Option<usize>, n: f64) -> String {
    match kind {
        ColumnKind::Currency => format_currency(n),
        ColumnKind::Percentage => format_percentage(n),
        ColumnKind::Energy => format!("{} kWh", format_number(n, 3)),
        ColumnKind::Voltage => format!("{} V", format_number(n, 1)),
        ColumnKind::Current => format!("{} A", format_number(n, 3)),
        ColumnKind::Power => format!("{} W", format_number(n, 1)),
        ColumnKind::Temperature => format!("{}°C", format_number(n, 1)),
        ColumnKind::Humidity => format!("{}%", format_number(n, 1)),
        _ => format_number(n, decimals.unwrap_or(2)),
    }
}

fn text_of(value: &CellValue) -> String {
    match value {
        CellValue::Null => "-".to_string(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

fn timestamp_of<R: SensorRecord>(r: &R) -> CellValue {
    r.timestamp().into()
}

fn status_of<R: SensorRecord>(r: &R) -> CellValue {
    r.status().unwrap_or_default().into()
}

fn reading_of(r: &PowerRecord) -> Option<&PowerReading> {
    r.parsed_data.as_ref()
}

/// Columns common to both PZEM variants.
fn power_base_columns() -> Vec<Column<PowerRecord>> {
    vec![
        Column::new("timestamp", "Timestamp", ColumnKind::Timestamp, timestamp_of::<PowerRecord>),
        Column::new("parsed_data.voltage_v", "Voltage (V)", ColumnKind::Voltage, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.voltage_v).into()
        }),
        Column::new("parsed_data.current_a", "Current (A)", ColumnKind::Current, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.current_a).into()
        }),
        Column::new("parsed_data.power_w", "Power (W)", ColumnKind::Power, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.power_w).into()
        }),
        Column::new("parsed_data.energy_kwh", "Energy (kWh)", ColumnKind::Energy, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.energy_kwh).into()
        }),
    ]
}

pub fn ac_power_columns() -> Vec<Column<PowerRecord>> {
    let mut columns = power_base_columns();
    columns.extend([
        Column::new("parsed_data.frequency_hz", "Frequency (Hz)", ColumnKind::Number, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.frequency_hz).into()
        })
        .with_decimals(1),
        Column::new("parsed_data.power_factor", "Power Factor", ColumnKind::Number, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.power_factor).into()
        })
        .with_decimals(2),
        Column::new("parsed_data.alarm_status", "Alarm", ColumnKind::Status, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.alarm_status.as_ref()).into()
        }),
        Column::new("status", "Status", ColumnKind::Status, status_of::<PowerRecord>),
    ]);
    columns
}

pub fn dc_power_columns() -> Vec<Column<PowerRecord>> {
    let mut columns = power_base_columns();
    columns.extend([
        Column::new("parsed_data.over_voltage_alarm", "Over-Voltage", ColumnKind::Text, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.over_voltage_alarm.as_ref()).into()
        }),
        Column::new("parsed_data.under_voltage_alarm", "Under-Voltage", ColumnKind::Text, |r: &PowerRecord| {
            reading_of(r).and_then(|p| p.under_voltage_alarm.as_ref()).into()
        }),
        Column::new("status", "Status", ColumnKind::Status, status_of::<PowerRecord>),
    ]);
    columns
}

pub fn climate_columns() -> Vec<Column<ClimateRecord>> {
    vec![
        Column::new("timestamp", "Timestamp", ColumnKind::Timestamp, timestamp_of::<ClimateRecord>),
        Column::new("temperature", "Temperature (°C)", ColumnKind::Temperature, |r: &ClimateRecord| {
            r.temperature.into()
        }),
        Column::new("humidity", "Humidity (%)", ColumnKind::Humidity, |r: &ClimateRecord| {
            r.humidity.into()
        }),
        Column::new("gpio_pin", "GPIO Pin", ColumnKind::Number, |r: &ClimateRecord| r.gpio_pin.into())
            .with_decimals(0),
        Column::new("library", "Library", ColumnKind::Text, |r: &ClimateRecord| {
            r.library.as_ref().into()
        }),
        Column::new("status", "Status", ColumnKind::Status, status_of::<ClimateRecord>),
    ]
}

pub fn system_columns() -> Vec<Column<SystemRecord>> {
    vec![
        Column::new("timestamp", "Timestamp", ColumnKind::Timestamp, timestamp_of::<SystemRecord>),
        Column::new("cpu_usage_percent", "CPU (%)", ColumnKind::Percentage, |r: &SystemRecord| {
            r.cpu_usage_percent.into()
        }),
        Column::new("ram_usage_percent", "RAM (%)", ColumnKind::Percentage, |r: &SystemRecord| {
            r.ram_usage_percent.into()
        }),
        Column::new("storage_usage_percent", "Storage (%)", ColumnKind::Percentage, |r: &SystemRecord| {
            r.storage_usage_percent.into()
        }),
        Column::new("cpu_temperature", "CPU Temp (°C)", ColumnKind::Temperature, |r: &SystemRecord| {
            r.cpu_temperature.into()
        }),
        Column::new("storage_used_gb", "Used (GB)", ColumnKind::Number, |r: &SystemRecord| {
            r.storage_used_gb.into()
        })
        .with_decimals(1),
        Column::new("storage_free_gb", "Free (GB)", ColumnKind::Number, |r: &SystemRecord| {
            r.storage_free_gb.into()
        })
        .with_decimals(1),
        Column::new("status", "Status", ColumnKind::Status, status_of::<SystemRecord>),
    ]
}

/// Power columns for whichever PZEM variant the sensor is.
pub fn power_columns(sensor: SensorType) -> Vec<Column<PowerRecord>> {
    match sensor {
        SensorType::Pzem017 => dc_power_columns(),
        _ => ac_power_columns(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ac() -> PowerRecord {
        PowerRecord {
            timestamp: "2024-03-10 08:00:00".into(),
            status: Some("success".into()),
            parsed_data: Some(PowerReading {
                voltage_v: Some(230.14),
                current_a: Some(1.2),
                power_w: Some(1276.06),
                energy_kwh: Some(12.3456),
                frequency_hz: Some(50.0),
                power_factor: Some(0.98),
                alarm_status: Some("OFF".into()),
                status: Some("success".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn render_by_key<R>(columns: &[Column<R>], key: &str, record: &R) -> Cell {
        columns
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.render(record))
            .unwrap_or_else(|| panic!("no column {}", key))
    }

    #[test]
    fn test_ac_columns_format_units() {
        let cols = ac_power_columns();
        let rec = sample_ac();
        assert_eq!(render_by_key(&cols, "timestamp", &rec).text, "10/03/2024, 08.00.00");
        assert_eq!(render_by_key(&cols, "parsed_data.voltage_v", &rec).text, "230,1 V");
        assert_eq!(render_by_key(&cols, "parsed_data.current_a", &rec).text, "1,200 A");
        assert_eq!(render_by_key(&cols, "parsed_data.power_w", &rec).text, "1.276,1 W");
        assert_eq!(render_by_key(&cols, "parsed_data.energy_kwh", &rec).text, "12,346 kWh");
        assert_eq!(render_by_key(&cols, "parsed_data.frequency_hz", &rec).text, "50,0");
        assert_eq!(render_by_key(&cols, "parsed_data.power_factor", &rec).text, "0,98");
    }

    #[test]
    fn test_missing_parsed_data_renders_dash() {
        let rec = PowerRecord {
            timestamp: "2024-03-10 08:00:00".into(),
            status: Some("error".into()),
            ..Default::default()
        };
        let cell = render_by_key(&ac_power_columns(), "parsed_data.voltage_v", &rec);
        assert_eq!(cell.text, "-");
        assert_eq!(cell.class, Some("null-value"));
    }

    #[test]
    fn test_status_classes() {
        let ok = format_cell(ColumnKind::Status, None, &CellValue::Text("success".into()));
        assert_eq!(ok.class, Some("status-indicator status-success"));
        let bad = format_cell(ColumnKind::Status, None, &CellValue::Text("error".into()));
        assert_eq!(bad.class, Some("status-indicator status-error"));

        let alarm = render_by_key(&ac_power_columns(), "parsed_data.alarm_status", &sample_ac());
        assert_eq!(alarm.text, "OFF");
        assert_eq!(alarm.class, Some("status-indicator status-success"));
    }

    #[test]
    fn test_climate_columns() {
        let rec = ClimateRecord {
            timestamp: "2024-03-10 08:00:00".into(),
            temperature: Some(29.46),
            humidity: Some(71.0),
            gpio_pin: Some(4),
            library: Some("adafruit_dht".into()),
            status: Some("success".into()),
            ..Default::default()
        };
        let cols = climate_columns();
        assert_eq!(render_by_key(&cols, "temperature", &rec).text, "29,5°C");
        assert_eq!(render_by_key(&cols, "humidity", &rec).text, "71,0%");
        assert_eq!(render_by_key(&cols, "gpio_pin", &rec).text, "4");
        assert_eq!(render_by_key(&cols, "library", &rec).text, "adafruit_dht");
    }

    #[test]
    fn test_numeric_text_is_formatted_as_number() {
        let cell = format_cell(ColumnKind::Voltage, None, &CellValue::Text("12.54".into()));
        assert_eq!(cell.text, "12,5 V");
    }

    #[test]
    fn test_unparseable_timestamp_passes_through() {
        let cell = format_cell(ColumnKind::Timestamp, None, &CellValue::Text("n/a".into()));
        assert_eq!(cell.text, "n/a");
    }

    #[test]
    fn test_power_columns_pick_variant() {
        assert!(power_columns(SensorType::Pzem016)
            .iter()
            .any(|c| c.key == "parsed_data.frequency_hz"));
        assert!(power_columns(SensorType::Pzem017)
            .iter()
            .any(|c| c.key == "parsed_data.under_voltage_alarm"));
    }
}
