//! Export filenames and the client-side CSV fallback.

use chrono::NaiveDate;

use crate::column::Column;
use crate::error::{DashboardError, Result};
use crate::sensor::SensorType;

/// `PZEM016_2024-03-01_to_2024-03-10.xlsx`, or `..._from_`/`..._until_` for a
/// single bound, or `..._<today>.xlsx` without any.
pub fn sensor_export_filename(
    sensor: SensorType,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> String {
    let range = match (start, end) {
        (Some(s), Some(e)) => format!("{}_to_{}", iso(s), iso(e)),
        (Some(s), None) => format!("from_{}", iso(s)),
        (None, Some(e)) => format!("until_{}", iso(e)),
        (None, None) => iso(today),
    };
    format!("{}_{}.xlsx", sensor.slug().to_uppercase(), range)
}

pub fn roi_export_filename(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> String {
    let range = match (start, end) {
        (Some(s), Some(e)) => format!("{}_to_{}", iso(s), iso(e)),
        _ => iso(today),
    };
    format!("ROI-Report_{}.xlsx", range)
}

/// Swap the spreadsheet extension for `.csv`.
pub fn csv_filename(xlsx_name: &str) -> String {
    match xlsx_name.strip_suffix(".xlsx") {
        Some(stem) => format!("{}.csv", stem),
        None => format!("{}.csv", xlsx_name),
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render the visible rows as CSV using the table's own labels and formatting.
pub fn records_to_csv<R>(columns: &[Column<R>], records: &[R]) -> Result<String> {
    if records.is_empty() {
        return Err(DashboardError::validation("No data to export"));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(|c| c.label))
        .map_err(csv_error)?;
    for record in records {
        writer
            .write_record(columns.iter().map(|c| c.render(record).text))
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Decode(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| DashboardError::Decode(e.to_string()))
}

fn csv_error(err: csv::Error) -> DashboardError {
    DashboardError::Decode(format!("CSV write failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{climate_columns, CellValue, ColumnKind};
    use crate::record::ClimateRecord;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_sensor_filenames() {
        let today = date("2024-03-10");
        assert_eq!(
            sensor_export_filename(
                SensorType::Pzem016,
                Some(date("2024-03-01")),
                Some(date("2024-03-10")),
                today
            ),
            "PZEM016_2024-03-01_to_2024-03-10.xlsx"
        );
        assert_eq!(
            sensor_export_filename(SensorType::Dht22, Some(date("2024-03-01")), None, today),
            "DHT22_from_2024-03-01.xlsx"
        );
        assert_eq!(
            sensor_export_filename(SensorType::System, None, Some(date("2024-03-05")), today),
            "SYSTEM_until_2024-03-05.xlsx"
        );
        assert_eq!(
            sensor_export_filename(SensorType::Pzem017, None, None, today),
            "PZEM017_2024-03-10.xlsx"
        );
    }

    #[test]
    fn test_roi_filename() {
        let today = date("2024-03-10");
        assert_eq!(roi_export_filename(None, None, today), "ROI-Report_2024-03-10.xlsx");
        assert_eq!(
            roi_export_filename(Some(date("2024-01-01")), Some(date("2024-01-31")), today),
            "ROI-Report_2024-01-01_to_2024-01-31.xlsx"
        );
        assert_eq!(csv_filename("ROI-Report_2024-03-10.xlsx"), "ROI-Report_2024-03-10.csv");
    }

    #[test]
    fn test_csv_quotes_commas_in_formatted_values() {
        let records = vec![ClimateRecord {
            timestamp: "2024-03-10 08:00:00".into(),
            temperature: Some(28.26),
            humidity: Some(70.0),
            gpio_pin: Some(4),
            library: Some("lib \"dht\"".into()),
            status: Some("success".into()),
            ..Default::default()
        }];
        let csv = records_to_csv(&climate_columns(), &records).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Timestamp,Temperature (°C),Humidity (%),GPIO Pin,Library,Status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"10/03/2024, 08.00.00\",\"28,3°C\",\"70,0%\",4,\"lib \"\"dht\"\"\",success"
        );
    }

    #[test]
    fn test_csv_rejects_empty() {
        let columns = vec![Column::<ClimateRecord>::new(
            "timestamp",
            "Timestamp",
            ColumnKind::Text,
            |_: &ClimateRecord| CellValue::Null,
        )];
        assert!(records_to_csv(&columns, &[]).is_err());
    }
}
