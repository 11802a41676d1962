//! Return-on-investment summary from `/roi/summary` and the tariff settings
//! behind it (`/roi/settings`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::table::parse_date_input;

/// Installed PV system cost used when the backend omits it.
pub const DEFAULT_INVESTMENT: f64 = 20_500_000.0;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoiSummary {
    pub total_investment: Option<f64>,
    pub total_savings: f64,
    pub investment_recovered: f64,
    pub roi_percentage: f64,
    pub today_savings: f64,
    pub monthly_savings: f64,
    pub payback_months_remaining: i64,
    pub system_start_date: Option<String>,
    pub last_updated: Option<String>,
}

impl RoiSummary {
    pub fn investment(&self) -> f64 {
        self.total_investment.unwrap_or(DEFAULT_INVESTMENT)
    }

    /// Progress bar fill, 0..=100.
    pub fn progress_percentage(&self) -> f64 {
        self.roi_percentage.clamp(0.0, 100.0)
    }

    pub fn months_remaining(&self) -> u32 {
        u32::try_from(self.payback_months_remaining.max(0)).unwrap_or(u32::MAX)
    }

    /// `(years, months)` split of the remaining payback time.
    pub fn payback_breakdown(&self) -> (u32, u32) {
        let months = self.months_remaining();
        (months / 12, months % 12)
    }

    pub fn payback_text(&self) -> String {
        let (years, months) = self.payback_breakdown();
        if years == 0 {
            return format!("{} months", self.months_remaining());
        }
        let mut text = if years == 1 {
            "1 year".to_string()
        } else {
            format!("{} years", years)
        };
        if months > 0 {
            text.push_str(&format!(" and {} months", months));
        }
        text
    }

    pub fn system_start(&self) -> Option<NaiveDate> {
        self.system_start_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok())
    }

    pub fn tier(&self) -> RoiTier {
        match self.roi_percentage {
            p if p >= 100.0 => RoiTier::PaidOff,
            p if p >= 75.0 => RoiTier::FinalStretch,
            p if p >= 50.0 => RoiTier::PastHalfway,
            p if p >= 25.0 => RoiTier::SteadyProgress,
            _ => RoiTier::GettingStarted,
        }
    }

    pub fn summary_text(&self) -> String {
        match self.tier() {
            RoiTier::PaidOff => "Congratulations! Your solar investment has fully paid for itself \
                                 and is now generating pure profit."
                .to_string(),
            RoiTier::FinalStretch => format!(
                "Excellent progress! You're in the final stretch with only {} months to go.",
                self.months_remaining()
            ),
            RoiTier::PastHalfway => {
                "Great progress! You've recovered more than half of your investment.".to_string()
            }
            RoiTier::SteadyProgress => {
                "Good start! Your solar system is steadily paying for itself.".to_string()
            }
            RoiTier::GettingStarted => format!(
                "Your solar investment is just getting started. Estimated payback in {}.",
                self.payback_text()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiTier {
    PaidOff,
    FinalStretch,
    PastHalfway,
    SteadyProgress,
    GettingStarted,
}

impl RoiTier {
    pub fn badge(self) -> (&'static str, &'static str) {
        match self {
            RoiTier::PaidOff => ("Paid Off", "status-badge status-pass"),
            RoiTier::FinalStretch | RoiTier::PastHalfway => ("On Track", "status-badge status-pass"),
            RoiTier::SteadyProgress | RoiTier::GettingStarted => {
                ("Recovering", "status-badge status-unknown")
            }
        }
    }
}

/// Smallest tariff change the backend records as a new history entry.
pub const TARIFF_CHANGE_THRESHOLD: f64 = 0.01;

/// `GET /roi/settings` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoiSettings {
    pub pv_investment_cost: f64,
    pub current_tariff_per_kwh: f64,
    pub system_start_date: Option<String>,
    /// Newest first
    pub tariff_history: Vec<TariffEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TariffEntry {
    pub tariff_per_kwh: f64,
    pub effective_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TariffEntry {
    pub fn effective(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.effective_date.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// `POST /roi/settings` body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TariffUpdate {
    pub current_tariff_per_kwh: f64,
    pub effective_date: NaiveDate,
}

impl TariffUpdate {
    /// Validate the settings form. The tariff accepts `1444.70` as well as
    /// the id-ID `1.444,70`; an empty effective date means `today`.
    pub fn parse(tariff: &str, effective_date: &str, today: NaiveDate) -> Result<Self> {
        let tariff = parse_tariff(tariff)?;
        let effective_date = parse_date_input(effective_date)?.unwrap_or(today);
        Ok(Self {
            current_tariff_per_kwh: tariff,
            effective_date,
        })
    }

    /// Whether saving this adds a tariff history entry.
    pub fn changes(&self, settings: &RoiSettings) -> bool {
        (self.current_tariff_per_kwh - settings.current_tariff_per_kwh).abs()
            > TARIFF_CHANGE_THRESHOLD
    }
}

fn parse_tariff(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DashboardError::validation("Tariff is required"));
    }
    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        Ok(_) => Err(DashboardError::validation("Tariff must be greater than 0")),
        Err(_) => Err(DashboardError::validation(format!("Invalid tariff: {}", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(pct: f64, months: i64) -> RoiSummary {
        RoiSummary {
            roi_percentage: pct,
            payback_months_remaining: months,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_summary_and_default_investment() {
        let json = r#"{
            "total_savings": 3075000.0,
            "investment_recovered": 3075000.0,
            "roi_percentage": 15.0,
            "today_savings": 12500.0,
            "monthly_savings": 310000.0,
            "payback_months_remaining": 56,
            "system_start_date": "2023-06-01"
        }"#;
        let roi: RoiSummary = serde_json::from_str(json).unwrap();
        assert_eq!(roi.investment(), DEFAULT_INVESTMENT);
        assert_eq!(roi.system_start(), NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(roi.payback_breakdown(), (4, 8));
    }

    #[test]
    fn test_progress_is_capped() {
        assert_eq!(summary(130.0, 0).progress_percentage(), 100.0);
        assert_eq!(summary(-5.0, 0).progress_percentage(), 0.0);
    }

    #[test]
    fn test_negative_months_floor_at_zero() {
        assert_eq!(summary(10.0, -3).months_remaining(), 0);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(summary(100.0, 0).tier(), RoiTier::PaidOff);
        assert_eq!(summary(80.0, 5).tier(), RoiTier::FinalStretch);
        assert_eq!(summary(50.0, 20).tier(), RoiTier::PastHalfway);
        assert_eq!(summary(25.0, 40).tier(), RoiTier::SteadyProgress);
        assert_eq!(summary(24.9, 40).tier(), RoiTier::GettingStarted);
    }

    #[test]
    fn test_summary_text_payback_wording() {
        assert!(summary(10.0, 13)
            .summary_text()
            .ends_with("Estimated payback in 1 year and 1 months."));
        assert!(summary(10.0, 24)
            .summary_text()
            .ends_with("Estimated payback in 2 years."));
        assert!(summary(10.0, 7)
            .summary_text()
            .ends_with("Estimated payback in 7 months."));
        assert!(summary(80.0, 4).summary_text().contains("only 4 months to go"));
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_decode_settings_with_history() {
        let body = r#"{
            "success": true,
            "data": {
                "pv_investment_cost": 20500000.0,
                "current_tariff_per_kwh": 1444.7,
                "system_start_date": "2023-06-01",
                "tariff_history": [
                    {"tariff_per_kwh": 1444.7, "effective_date": "2024-01-01", "created_at": "2024-01-02 09:00:00"},
                    {"tariff_per_kwh": 1352.0, "effective_date": "2023-06-01", "created_at": null}
                ]
            }
        }"#;
        let settings: RoiSettings = crate::api::decode_envelope(body, 200).unwrap();
        assert_eq!(settings.pv_investment_cost, DEFAULT_INVESTMENT);
        assert_eq!(settings.tariff_history.len(), 2);
        assert_eq!(settings.tariff_history[0].effective(), Some(day("2024-01-01")));
        assert_eq!(settings.tariff_history[1].created_at, None);
    }

    #[test]
    fn test_missing_settings_is_http_error() {
        let body = r#"{"success": false, "error": "ROI settings not found"}"#;
        let err = crate::api::decode_envelope::<RoiSettings>(body, 404).unwrap_err();
        assert_eq!(
            err,
            DashboardError::Http {
                status: 404,
                message: "ROI settings not found".to_string()
            }
        );
    }

    #[test]
    fn test_tariff_update_parsing() {
        let today = day("2024-03-10");
        let update = TariffUpdate::parse("1444.70", "", today).unwrap();
        assert_eq!(update.current_tariff_per_kwh, 1444.7);
        assert_eq!(update.effective_date, today);

        let update = TariffUpdate::parse(" 1.444,70 ", "2024-04-01", today).unwrap();
        assert_eq!(update.current_tariff_per_kwh, 1444.7);
        assert_eq!(update.effective_date, day("2024-04-01"));
    }

    #[test]
    fn test_tariff_update_rejects_bad_input() {
        let today = day("2024-03-10");
        for bad in ["", "abc", "0", "-5", "NaN"] {
            let err = TariffUpdate::parse(bad, "", today).unwrap_err();
            assert!(matches!(err, DashboardError::Validation(_)), "{:?}", bad);
        }
        assert!(TariffUpdate::parse("1444", "2024-13-01", today).is_err());
    }

    #[test]
    fn test_tariff_update_body_and_change_threshold() {
        let update = TariffUpdate::parse("1500", "2024-04-01", day("2024-03-10")).unwrap();
        let json = serde_json::to_value(update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"current_tariff_per_kwh": 1500.0, "effective_date": "2024-04-01"})
        );

        let settings = RoiSettings {
            current_tariff_per_kwh: 1500.005,
            ..Default::default()
        };
        assert!(!update.changes(&settings));
        let settings = RoiSettings {
            current_tariff_per_kwh: 1444.7,
            ..Default::default()
        };
        assert!(update.changes(&settings));
    }
}
