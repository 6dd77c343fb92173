use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    config::{OpenWeatherConfig, Units},
    model::{CurrentConditions, ForecastSample, LocationQuery, forecast_label},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: Units,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &OpenWeatherConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build OpenWeather HTTP client")?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units,
            http,
        })
    }

    /// GET `{base_url}/{endpoint}` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &LocationQuery,
    ) -> Result<T> {
        // reqwest errors embed the request URL, query string and `appid` included; strip it.
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(endpoint, city = %location, units = %self.units, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    #[serde(with = "forecast_label")]
    dt_txt: NaiveDateTime,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn first_condition(weather: Vec<OwWeather>) -> Result<OwWeather> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("OpenWeather response contained an empty `weather` array"))
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = anyhow::Error;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self> {
        let condition = first_condition(parsed.weather)?;

        Ok(CurrentConditions {
            city: parsed.name,
            country: parsed.sys.country,
            temp: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            description: condition.description,
            icon: condition.icon,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastSample {
    type Error = anyhow::Error;

    fn try_from(entry: OwForecastEntry) -> Result<Self> {
        let label = entry.dt_txt;
        let condition = first_condition(entry.weather)
            .with_context(|| format!("Forecast entry {label} has no condition"))?;

        Ok(ForecastSample {
            label,
            temp: entry.main.temp,
            feels_like: entry.main.feels_like,
            description: condition.description,
            icon: condition.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(&self, location: &LocationQuery) -> Result<CurrentConditions> {
        let parsed: OwCurrentResponse = self.get_json("weather", location).await?;
        parsed.try_into()
    }

    async fn forecast_series(&self, location: &LocationQuery) -> Result<Vec<ForecastSample>> {
        let parsed: OwForecastResponse = self.get_json("forecast", location).await?;
        parsed.list.into_iter().map(ForecastSample::try_from).collect()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
