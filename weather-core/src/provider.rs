use crate::{
    Config,
    model::{CurrentConditions, ForecastSample, LocationQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Upstream source of weather data.
///
/// Implementations return rich `anyhow` errors; callers decide what to expose.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, location: &LocationQuery)
    -> anyhow::Result<CurrentConditions>;

    /// The raw 3-hour series, in upstream (chronological) order.
    async fn forecast_series(&self, location: &LocationQuery)
    -> anyhow::Result<Vec<ForecastSample>>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather-server configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), &config.openweather)?;
    Ok(Box::new(provider))
}
