use serde::{Deserialize, Serialize};

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Current conditions for a city, as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub name: String,
    pub main: Temperature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    /// Kelvin, as reported upstream.
    #[serde(rename = "temp")]
    pub kelvin: f64,
    #[serde(rename = "temp_celsius")]
    pub celsius: f64,
}

impl WeatherRecord {
    pub fn from_kelvin(name: impl Into<String>, kelvin: f64) -> Self {
        Self {
            name: name.into(),
            main: Temperature { kelvin, celsius: kelvin_to_celsius(kelvin) },
        }
    }
}
