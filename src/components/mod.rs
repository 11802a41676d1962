pub mod data_table;
pub mod metric_card;
pub mod paginator;
pub mod roi_card;
pub mod sidebar;
pub mod status_badge;
pub mod toast;
