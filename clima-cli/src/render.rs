use chrono::{DateTime, TimeZone};
use clima_core::WeatherResult;

/// One-line summary, e.g. `Moscow: 16° (Clear, icon sun.max) at 14:05`.
pub fn weather_line<Tz>(result: &WeatherResult, fetched_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let condition = result.condition();
    format!(
        "{}: {} ({}, icon {}) at {}",
        result.city_name,
        result.temperature_string(),
        condition.description(),
        condition.icon_key(),
        fetched_at.format("%H:%M"),
    )
}

pub fn weather_json(result: &WeatherResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> WeatherResult {
        WeatherResult {
            condition_id: 502,
            city_name: "Moscow".to_string(),
            temperature_celsius: 15.5,
        }
    }

    #[test]
    fn line_shows_temperature_condition_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 2, 24, 14, 5, 0).unwrap();

        assert_eq!(weather_line(&sample(), &at), "Moscow: 16° (Rain, icon cloud.rain) at 14:05");
    }

    #[test]
    fn json_uses_result_field_names() {
        let json = weather_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["condition_id"], 502);
        assert_eq!(value["city_name"], "Moscow");
        assert_eq!(value["temperature_celsius"], 15.5);
    }
}
