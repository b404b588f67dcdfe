//! Core library for the `skycast` terminal weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider seam and its OpenWeather implementation
//! - Shared domain models and the screen state container
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod icon;
pub mod model;
pub mod provider;
pub mod screen;

pub use config::Config;
pub use error::FetchError;
pub use icon::WeatherIcon;
pub use model::{WeatherDetail, WeatherSummary};
pub use provider::{WeatherProvider, provider_from_config};
pub use screen::{DetailsToggle, LoadedWeather, ScreenState, Submit, UiState};
