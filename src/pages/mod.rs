pub mod dashboard;
pub mod health;
pub mod not_found;
pub mod roi_settings;
pub mod sensor;
