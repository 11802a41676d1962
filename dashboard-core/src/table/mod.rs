//! Paging, sorting and date filtering for a server-backed data table.
//!
//! `TableState` is a plain value mutated by user actions. Each action that
//! invalidates the visible page also bumps a request generation, so a slow
//! response issued before the action can be recognised and dropped when it
//! finally lands:
//!
//! ```ignore
//! let ticket = state.begin_fetch().expect("idle");
//! state.go_to_page(2);                       // generation moves on
//! let ticket2 = state.begin_fetch().unwrap();
//! state.complete_fetch(ticket2, 120, 3);     // applied
//! state.complete_fetch(ticket, 120, 3);      // FetchOutcome::Stale
//! ```

mod pagination;
mod preset;

pub use pagination::{compute_page_window, PageItem, DEFAULT_MAX_VISIBLE};
pub use preset::{DatePreset, PresetOutcome};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashboardError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_SORT_COLUMN: &str = "timestamp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Query-string form, also used in the `sorted-*` header class.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Inclusive date range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilters {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TableFilters {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if start_date > end_date {
            return Err(DashboardError::validation("Start date must be before end date"));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start_date: day,
            end_date: day,
        }
    }

    /// Build from optional dates, as read from two date inputs.
    pub fn from_parts(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        match (start, end) {
            (Some(s), Some(e)) => Self::new(s, e),
            _ => Err(DashboardError::validation(
                "Please select both start and end dates",
            )),
        }
    }

    /// Parse `YYYY-MM-DD` input values. Empty strings count as missing.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::from_parts(parse_date_input(start)?, parse_date_input(end)?)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }
}

/// Parse one `YYYY-MM-DD` date input. Empty means unset.
pub fn parse_date_input(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DashboardError::validation(format!("Invalid date: {}", raw)))
}

/// Proof that a fetch was started for a particular generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A later action superseded this request; its result was dropped.
    Stale,
    /// Totals were applied but the result set shrank below the requested
    /// page. The current page was pulled back into range and the generation
    /// moved on, so the rows belong to no visible page and must be refetched.
    PageClamped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    current_page: u32,
    page_size: u32,
    total_records: u64,
    total_pages: u32,
    sort_column: Option<String>,
    sort_direction: SortDirection,
    filters: TableFilters,
    generation: u64,
    in_flight: Option<u64>,
}

impl TableState {
    /// Fresh state on page 1, newest first, filtered to `today`.
    pub fn new(page_size: u32, today: NaiveDate) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_records: 0,
            total_pages: 1,
            sort_column: Some(DEFAULT_SORT_COLUMN.to_string()),
            sort_direction: SortDirection::Descending,
            filters: TableFilters::single_day(today),
            generation: 0,
            in_flight: None,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filters(&self) -> &TableFilters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Page count implied by `total_records` and the page size, at least 1.
    pub fn derived_total_pages(&self) -> u32 {
        let pages = self.total_records.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn page_window(&self, max_visible: u32) -> Vec<PageItem> {
        compute_page_window(self.current_page, self.total_pages, max_visible)
    }

    /// `(first, last, total)` row numbers for the "Showing X to Y of Z" line.
    pub fn page_summary(&self) -> Option<(u64, u64, u64)> {
        if self.total_records == 0 {
            return None;
        }
        let size = u64::from(self.page_size);
        let page = u64::from(self.current_page);
        let first = (page - 1) * size + 1;
        let last = (page * size).min(self.total_records);
        Some((first.min(self.total_records), last, self.total_records))
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Click on a column header.
    pub fn apply_sort(&mut self, column_key: &str) {
        if self.sort_column.as_deref() == Some(column_key) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_column = Some(column_key.to_string());
            self.sort_direction = SortDirection::Descending;
        }
        self.current_page = 1;
        self.invalidate();
        debug!(
            "Sort by {} {}",
            column_key,
            self.sort_direction.as_str()
        );
    }

    /// Replace the date range. Leaves the state untouched on error.
    pub fn apply_date_filter(
        &mut self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<()> {
        let filters = TableFilters::from_parts(start_date, end_date)?;
        self.set_filters(filters);
        Ok(())
    }

    pub fn set_filters(&mut self, filters: TableFilters) {
        self.filters = filters;
        self.current_page = 1;
        self.invalidate();
    }

    pub fn apply_preset(&mut self, preset: DatePreset, today: NaiveDate) -> PresetOutcome {
        match preset.range(today) {
            Some((start, end)) => {
                self.set_filters(TableFilters {
                    start_date: start,
                    end_date: end,
                });
                PresetOutcome::Fetch
            }
            None => PresetOutcome::RevealCustomInputs,
        }
    }

    /// Returns false (and changes nothing) for out-of-range or current pages.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        self.invalidate();
        true
    }

    /// Force a reload of the current page, e.g. from a "Retry" button.
    pub fn reload(&mut self) {
        self.invalidate();
    }

    /// Take the server's totals as authoritative and pull the current page
    /// back into range if the result set shrank.
    pub fn apply_fetch_result(&mut self, total_records: u64, total_pages: u32) {
        self.total_records = total_records;
        self.total_pages = total_pages.max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    /// Mark a fetch as started. `None` when one is already running for the
    /// same generation, so duplicate triggers are dropped.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.in_flight == Some(self.generation) {
            debug!("Fetch for generation {} already in flight", self.generation);
            return None;
        }
        self.in_flight = Some(self.generation);
        Some(FetchTicket {
            generation: self.generation,
        })
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        total_records: u64,
        total_pages: u32,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(
                "Dropping stale result for generation {} (current {})",
                ticket.generation, self.generation
            );
            self.release_stale(ticket);
            return FetchOutcome::Stale;
        }
        self.in_flight = None;
        let requested = self.current_page;
        self.apply_fetch_result(total_records, total_pages);
        if self.current_page != requested {
            debug!("Page {} out of range, clamped to {}", requested, self.current_page);
            self.invalidate();
            return FetchOutcome::PageClamped;
        }
        FetchOutcome::Applied
    }

    /// A fetch failed. Totals are kept so the previous page stays valid.
    pub fn fail_fetch(&mut self, ticket: FetchTicket) -> FetchOutcome {
        if !self.is_current(ticket) {
            self.release_stale(ticket);
            return FetchOutcome::Stale;
        }
        self.in_flight = None;
        FetchOutcome::Applied
    }

    /// A stale ticket that is still the one in flight means nothing newer was
    /// started, so the table is no longer loading.
    fn release_stale(&mut self, ticket: FetchTicket) {
        if self.in_flight == Some(ticket.generation) {
            self.in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state_with(current_page: u32, total_pages: u32) -> TableState {
        let mut state = TableState::new(DEFAULT_PAGE_SIZE, date("2024-03-10"));
        state.apply_fetch_result(u64::from(total_pages) * 50, total_pages);
        state.current_page = current_page;
        state
    }

    #[test]
    fn test_new_state_defaults() {
        let state = TableState::new(50, date("2024-03-10"));
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.sort_column(), Some("timestamp"));
        assert_eq!(state.sort_direction(), SortDirection::Descending);
        assert!(state.filters().is_single_day());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_sort_new_column_resets_to_descending_and_page_one() {
        let mut state = state_with(3, 5);
        state.apply_sort("parsed_data.power_w");
        assert_eq!(state.sort_column(), Some("parsed_data.power_w"));
        assert_eq!(state.sort_direction(), SortDirection::Descending);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_date_filter_missing_end() {
        let mut state = state_with(2, 5);
        let before = state.clone();
        let err = state
            .apply_date_filter(Some(date("2024-01-01")), None)
            .unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TableFilters::parse("2024-13-01", "2024-01-02").is_err());
        assert!(TableFilters::parse("", "2024-01-02").is_err());
        assert!(TableFilters::parse(" 2024-01-01 ", "2024-01-02").is_ok());
    }

    #[test]
    fn test_custom_preset_leaves_dates() {
        let mut state = state_with(3, 5);
        let before = state.clone();
        let outcome = state.apply_preset(DatePreset::Custom, date("2024-03-10"));
        assert_eq!(outcome, PresetOutcome::RevealCustomInputs);
        assert_eq!(state, before);
    }

    #[test]
    fn test_page_summary() {
        let mut state = TableState::new(50, date("2024-03-10"));
        assert_eq!(state.page_summary(), None);
        state.apply_fetch_result(120, 3);
        assert_eq!(state.page_summary(), Some((1, 50, 120)));
        assert!(state.go_to_page(3));
        assert_eq!(state.page_summary(), Some((101, 120, 120)));
    }

    #[test]
    fn test_derived_total_pages() {
        let mut state = TableState::new(50, date("2024-03-10"));
        assert_eq!(state.derived_total_pages(), 1);
        state.apply_fetch_result(101, 3);
        assert_eq!(state.derived_total_pages(), 3);
    }

    #[test]
    fn test_zero_page_size_is_raised_to_one() {
        let state = TableState::new(0, date("2024-03-10"));
        assert_eq!(state.page_size(), 1);
    }
}
