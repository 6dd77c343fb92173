use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Format of the upstream forecast label, e.g. `2024-05-01 12:00:00`.
pub const FORECAST_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A validated, non-blank place name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Validate a raw `city` parameter. Absent or blank input is a client error.
    pub fn parse(raw: Option<&str>) -> Result<Self, LookupError> {
        match raw.map(str::trim) {
            Some(city) if !city.is_empty() => Ok(Self(city.to_owned())),
            _ => Err(LookupError::InvalidInput),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    /// Unix seconds.
    pub sunrise: i64,
    /// Unix seconds.
    pub sunset: i64,
}

/// One element of an upstream forecast series, already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub label: NaiveDateTime,
    pub temp: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    #[serde(with = "forecast_label")]
    pub date: NaiveDateTime,
    pub temp: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
}

impl From<&ForecastSample> for DailyForecastEntry {
    fn from(sample: &ForecastSample) -> Self {
        Self {
            date: sample.label,
            temp: sample.temp,
            feels_like: sample.feels_like,
            description: sample.description.clone(),
            icon: sample.icon.clone(),
        }
    }
}

/// Serde adapter keeping the upstream `dt_txt` shape on the wire.
pub(crate) mod forecast_label {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::FORECAST_LABEL_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(FORECAST_LABEL_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORECAST_LABEL_FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid forecast label '{raw}': {e}")))
    }
}
