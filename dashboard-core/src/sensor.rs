use std::fmt;

use serde::{Deserialize, Serialize};

/// The sensor feeds the backend exposes under `/data/{slug}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Pzem016,
    Pzem017,
    Dht22,
    System,
}

impl SensorType {
    pub const ALL: [SensorType; 4] = [
        SensorType::Pzem016,
        SensorType::Pzem017,
        SensorType::Dht22,
        SensorType::System,
    ];

    /// URL segment used by both the API and the dashboard routes.
    pub fn slug(self) -> &'static str {
        match self {
            SensorType::Pzem016 => "pzem016",
            SensorType::Pzem017 => "pzem017",
            SensorType::Dht22 => "dht22",
            SensorType::System => "system",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            SensorType::Pzem016 => "PZEM-016 (AC Power)",
            SensorType::Pzem017 => "PZEM-017 (DC Power)",
            SensorType::Dht22 => "DHT22 (Temperature & Humidity)",
            SensorType::System => "System Resources",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            SensorType::Pzem016 => "Inverter to Load AC Power Monitoring",
            SensorType::Pzem017 => "Solar Panel to Battery DC Power Monitoring",
            SensorType::Dht22 => "Environment Monitoring",
            SensorType::System => "Gateway Host Health",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SensorType::Pzem016 => {
                "The PZEM-016 measures AC power flowing from the inverter to your electrical loads. \
                 This shows how much solar energy you actually consume and drives the savings calculation."
            }
            SensorType::Pzem017 => {
                "The PZEM-017 measures DC power produced by the solar panels before it reaches the battery \
                 and inverter."
            }
            SensorType::Dht22 => {
                "The DHT22 reports ambient temperature and relative humidity around the installation."
            }
            SensorType::System => {
                "Resource usage of the gateway that collects sensor readings: CPU, memory, storage and \
                 CPU temperature."
            }
        }
    }

    /// Font Awesome icon class.
    pub fn icon(self) -> &'static str {
        match self {
            SensorType::Pzem016 => "fa-plug",
            SensorType::Pzem017 => "fa-sun",
            SensorType::Dht22 => "fa-thermometer-half",
            SensorType::System => "fa-server",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for sensor in SensorType::ALL {
            assert_eq!(SensorType::from_slug(sensor.slug()), Some(sensor));
        }
        assert_eq!(SensorType::from_slug("pzem018"), None);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&SensorType::Dht22).unwrap();
        assert_eq!(json, "\"dht22\"");
    }
}
