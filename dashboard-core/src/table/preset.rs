use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Named date-range shortcuts shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePreset {
    Today,
    Last7Days,
    Last30Days,
    Custom,
}

impl DatePreset {
    pub const ALL: [DatePreset; 4] = [
        DatePreset::Today,
        DatePreset::Last7Days,
        DatePreset::Last30Days,
        DatePreset::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::Today => "Today",
            DatePreset::Last7Days => "7 Days",
            DatePreset::Last30Days => "30 Days",
            DatePreset::Custom => "Custom",
        }
    }

    /// Inclusive `(start, end)` range ending on `today`. `Custom` has none.
    pub fn range(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let days_back = match self {
            DatePreset::Today => 0,
            DatePreset::Last7Days => 6,
            DatePreset::Last30Days => 29,
            DatePreset::Custom => return None,
        };
        Some((today - Duration::days(days_back), today))
    }
}

/// What the view should do after a preset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOutcome {
    /// Range changed; reload the table.
    Fetch,
    /// Show the manual date inputs and wait for "Apply".
    RevealCustomInputs,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_preset_ranges() {
        let today = date(2024, 3, 10);
        assert_eq!(DatePreset::Today.range(today), Some((today, today)));
        assert_eq!(DatePreset::Last7Days.range(today), Some((date(2024, 3, 4), today)));
        assert_eq!(DatePreset::Last30Days.range(today), Some((date(2024, 2, 10), today)));
        assert_eq!(DatePreset::Custom.range(today), None);
    }

    #[test]
    fn test_range_crosses_year_boundary() {
        let today = date(2024, 1, 3);
        assert_eq!(DatePreset::Last7Days.range(today), Some((date(2023, 12, 28), today)));
    }
}
