use crate::{
    config::Config,
    error::FetchError,
    icon::WeatherIcon,
    model::{WeatherDetail, WeatherSummary},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Seam between the screen and the weather service.
///
/// One implementation talks to OpenWeather; tests substitute their own.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a free-text city name.
    async fn fetch_summary(&self, city: &str) -> Result<WeatherSummary, FetchError>;

    /// Extended conditions for the same city.
    async fn fetch_detail(&self, city: &str) -> Result<WeatherDetail, FetchError>;

    /// The icon bitmap named by a summary's icon code. Callers treat failure
    /// as non-fatal.
    async fn fetch_icon(&self, icon_code: &str) -> Result<WeatherIcon, FetchError>;
}

/// Construct the OpenWeather-backed provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `skycast configure` and enter your OpenWeather API key."
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key.to_owned())?;
    Ok(Box::new(provider))
}
