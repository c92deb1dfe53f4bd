use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::DecodeError;

/// What to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    ByCityName { name: String },
    ByCoordinates { latitude: f64, longitude: f64 },
}

impl WeatherQuery {
    pub fn city(name: impl Into<String>) -> Self {
        Self::ByCityName { name: name.into() }
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::ByCoordinates { latitude, longitude }
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByCityName { name } => write!(f, "city '{name}'"),
            Self::ByCoordinates { latitude, longitude } => {
                write!(f, "coordinates ({latitude}, {longitude})")
            }
        }
    }
}

/// Subset of the provider's current-weather response that we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWeatherPayload {
    pub name: String,
    pub main: RawMain,
    pub weather: Vec<RawCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    pub id: i64,
}

/// Normalized current weather for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherResult {
    pub condition_id: i64,
    pub city_name: String,
    pub temperature_celsius: f64,
}

impl WeatherResult {
    /// Temperature rounded to whole degrees, e.g. `"16°"`.
    pub fn temperature_string(&self) -> String {
        let rounded = self.temperature_celsius.round();
        // -0.4 rounds to -0.0, which would print as "-0"
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        format!("{rounded:.0}°")
    }

    pub fn condition(&self) -> Condition {
        Condition::from_condition_id(self.condition_id)
    }

    pub fn icon_key(&self) -> &'static str {
        self.condition().icon_key()
    }
}

impl TryFrom<RawWeatherPayload> for WeatherResult {
    type Error = DecodeError;

    fn try_from(payload: RawWeatherPayload) -> Result<Self, Self::Error> {
        let condition = payload.weather.first().ok_or(DecodeError::MissingCondition)?;

        Ok(Self {
            condition_id: condition.id,
            city_name: payload.name,
            temperature_celsius: payload.main.temp,
        })
    }
}

/// Decode a response body into a [`WeatherResult`].
pub fn decode_weather(body: &str) -> Result<WeatherResult, DecodeError> {
    let payload: RawWeatherPayload = serde_json::from_str(body)?;
    WeatherResult::try_from(payload)
}
