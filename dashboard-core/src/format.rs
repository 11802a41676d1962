//! Display formatting in the Indonesian (id-ID) convention the dashboard
//! uses: `.` groups thousands and `,` separates decimals.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format with a fixed number of decimals, e.g. `1234.5` at 2 -> `1.234,50`.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // "-0,00" reads wrong; only sign values that survive rounding
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Rupiah without decimals: `Rp 20.500.000`.
pub fn format_currency(value: f64) -> String {
    format!("Rp {}", format_number(value, 0))
}

pub fn format_percentage(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%d/%m/%Y, %H.%M.%S").to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse the timestamp shapes the backend emits (SQLite text, ISO-8601 with or
/// without fraction, RFC 3339 with offset).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_grouping_and_decimal_comma() {
        assert_eq!(format_number(1234.5, 2), "1.234,50");
        assert_eq!(format_number(1234567.891, 1), "1.234.567,9");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(0.1234, 3), "0,123");
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(format_number(-1500.25, 2), "-1.500,25");
        assert_eq!(format_number(-0.001, 2), "0,00");
    }

    #[test]
    fn test_non_finite_renders_dash() {
        assert_eq!(format_number(f64::NAN, 2), "-");
        assert_eq!(format_number(f64::INFINITY, 2), "-");
    }

    #[test]
    fn test_currency_has_no_decimals() {
        assert_eq!(format_currency(20_500_000.0), "Rp 20.500.000");
        assert_eq!(format_currency(1499.6), "Rp 1.500");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(42.26), "42,3%");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-10 14:05:09"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-10T14:05:09"), Some(expected));
        assert!(parse_timestamp("2024-03-10T14:05:09.123456").is_some());
        assert_eq!(parse_timestamp("2024-03-10T14:05:09+07:00"), Some(expected));
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_timestamp_display() {
        let ts = parse_timestamp("2024-03-10 04:05:09").unwrap();
        assert_eq!(format_timestamp(&ts), "10/03/2024, 04.05.09");
        assert_eq!(format_date(&ts.date()), "10/03/2024");
    }
}
