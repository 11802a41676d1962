pub mod api;
pub mod column;
pub mod config;
mod error;
pub mod export;
pub mod format;
pub mod metrics;
pub mod record;
pub mod retry;
pub mod roi;
pub mod route;
pub mod sensor;
pub mod table;

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use route::Route;
pub use sensor::SensorType;
pub use table::{DatePreset, PageItem, SortDirection, TableFilters, TableState};
