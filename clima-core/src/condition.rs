/// Weather condition groups as defined by OpenWeather condition codes.
/// See: https://openweathermap.org/weather-conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    #[default]
    Clear,
    Clouds,
}

impl Condition {
    /// Classify a provider condition id by its numeric range.
    pub fn from_condition_id(id: i64) -> Self {
        match id {
            200..=232 => Self::Thunderstorm,
            300..=321 => Self::Drizzle,
            500..=531 => Self::Rain,
            600..=622 => Self::Snow,
            701..=781 => Self::Atmosphere,
            800 => Self::Clear,
            801..=804 => Self::Clouds,
            _ => Self::default(), // unknown codes render as clear sky
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Atmosphere => "Mist",
            Self::Clear => "Clear",
            Self::Clouds => "Cloudy",
        }
    }

    /// Icon key understood by the shell (SF Symbols naming).
    pub fn icon_key(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "cloud.bolt.rain",
            Self::Drizzle => "cloud.drizzle",
            Self::Rain => "cloud.rain",
            Self::Snow => "cloud.snow",
            Self::Atmosphere => "cloud.fog",
            Self::Clear => "sun.max",
            Self::Clouds => "cloud",
        }
    }
}
