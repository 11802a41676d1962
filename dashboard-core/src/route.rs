use crate::error::{DashboardError, Result};
use crate::sensor::SensorType;

/// Every page the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Sensor(SensorType),
    Health,
    RoiSettings,
}

impl Route {
    /// Sidebar order.
    pub const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::Sensor(SensorType::Pzem016),
        Route::Sensor(SensorType::Pzem017),
        Route::Sensor(SensorType::Dht22),
        Route::Sensor(SensorType::System),
        Route::Health,
        Route::RoiSettings,
    ];

    /// Resolve a location pathname. Unknown paths are `NotFound`.
    pub fn from_path(path: &str) -> Result<Self> {
        let segment = path.trim().trim_matches('/');
        match segment {
            "" | "dashboard" => Ok(Route::Dashboard),
            "health" => Ok(Route::Health),
            "roi-settings" => Ok(Route::RoiSettings),
            other => SensorType::from_slug(other)
                .map(Route::Sensor)
                .ok_or_else(|| DashboardError::NotFound(path.to_string())),
        }
    }

    pub fn path(self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Sensor(sensor) => format!("/{}", sensor.slug()),
            Route::Health => "/health".to_string(),
            Route::RoiSettings => "/roi-settings".to_string(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Sensor(SensorType::Pzem016) => "PZEM-016 AC",
            Route::Sensor(SensorType::Pzem017) => "PZEM-017 DC",
            Route::Sensor(SensorType::Dht22) => "DHT22",
            Route::Sensor(SensorType::System) => "System",
            Route::Health => "Health",
            Route::RoiSettings => "ROI Settings",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Route::Dashboard => "fa-tachometer-alt",
            Route::Sensor(sensor) => sensor.icon(),
            Route::Health => "fa-heartbeat",
            Route::RoiSettings => "fa-cog",
        }
    }
}
