//! Core library for the weather backend.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream provider seam and its OpenWeather implementation
//! - Shared domain models and the caller-facing error taxonomy
//! - The midday forecast reduction
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, OpenWeatherConfig, ServerConfig, Units};
pub use error::LookupError;
pub use forecast::midday_reduction;
pub use model::{CurrentConditions, DailyForecastEntry, ForecastSample, LocationQuery};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use service::WeatherService;
