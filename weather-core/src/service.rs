use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    error::LookupError,
    forecast::midday_reduction,
    model::{CurrentConditions, DailyForecastEntry, LocationQuery},
    provider::WeatherProvider,
};

/// Entry point for both lookups. Holds no per-request state; clone freely.
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Current conditions for `city`. Blank input never reaches the provider.
    pub async fn get_current_conditions(
        &self,
        city: Option<&str>,
    ) -> Result<CurrentConditions, LookupError> {
        let location = validate(city)?;

        self.provider
            .current_conditions(&location)
            .await
            .map_err(|e| upstream_failure("current weather", &location, e))
    }

    /// One midday reading per forecast day for `city`.
    pub async fn get_daily_forecast(
        &self,
        city: Option<&str>,
    ) -> Result<Vec<DailyForecastEntry>, LookupError> {
        let location = validate(city)?;

        let series = self
            .provider
            .forecast_series(&location)
            .await
            .map_err(|e| upstream_failure("forecast", &location, e))?;

        Ok(midday_reduction(&series))
    }
}

fn validate(city: Option<&str>) -> Result<LocationQuery, LookupError> {
    LocationQuery::parse(city).inspect_err(|_| debug!("rejected lookup without a city"))
}

/// Record the full cause for operators and hand the caller a generic error.
fn upstream_failure(what: &str, location: &LocationQuery, err: anyhow::Error) -> LookupError {
    error!(city = %location, error = ?err, "{what} lookup failed");
    LookupError::Upstream(err)
}
