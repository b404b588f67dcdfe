//! Screen-owned state container.
//!
//! The interactive screen mutates state only through the transition methods
//! here; the view layer reads the current [`UiState`] snapshot and renders it.
//! Exactly one state is active at a time, replaced wholesale as the fetch
//! cycle advances.

use crate::icon::WeatherIcon;
use crate::model::{WeatherDetail, WeatherSummary};

/// The four mutually exclusive states of the weather screen.
#[derive(Debug, Clone, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading {
        city: String,
    },
    Loaded(LoadedWeather),
    Error(String),
}

/// Data backing the loaded card.
#[derive(Debug, Clone)]
pub struct LoadedWeather {
    pub summary: WeatherSummary,
    pub icon: Option<WeatherIcon>,
    pub detail: Option<WeatherDetail>,
    pub details_shown: bool,
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Submit {
    /// A fetch cycle started; the caller should fetch a summary for this city.
    Started(String),
    /// A fetch is already in flight; the submission was dropped.
    IgnoredWhileLoading,
}

/// Outcome of a details toggle.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum DetailsToggle {
    /// Panel opened; the caller should fetch the detail record for this city.
    FetchNeeded(String),
    /// Panel closed; the detail record was discarded.
    Hidden,
    /// No loaded card to toggle on.
    NotLoaded,
}

#[derive(Debug, Default)]
pub struct ScreenState {
    state: UiState,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot for the view layer.
    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, UiState::Loading { .. })
    }

    /// Start a fetch cycle for a city. Submissions while one is already in
    /// flight are dropped, so the screen never renders two states at once.
    pub fn submit(&mut self, city: &str) -> Submit {
        if self.is_loading() {
            return Submit::IgnoredWhileLoading;
        }

        let city = city.trim().to_string();
        self.state = UiState::Loading { city: city.clone() };
        Submit::Started(city)
    }

    /// Apply a summary result. A result arriving outside `Loading` belongs to
    /// an abandoned cycle and is dropped.
    pub fn summary_loaded(&mut self, summary: WeatherSummary) {
        if self.is_loading() {
            self.state = UiState::Loaded(LoadedWeather {
                summary,
                icon: None,
                detail: None,
                details_shown: false,
            });
        }
    }

    pub fn summary_failed(&mut self, message: String) {
        if self.is_loading() {
            self.state = UiState::Error(message);
        }
    }

    /// Attach the independently fetched icon to the loaded card. A failed
    /// icon fetch performs no transition at all: the card stays as it is.
    pub fn icon_loaded(&mut self, icon: WeatherIcon) {
        if let UiState::Loaded(loaded) = &mut self.state {
            loaded.icon = Some(icon);
        }
    }

    /// Show or hide the details panel. Hiding discards the detail record, so
    /// showing again always re-fetches.
    pub fn toggle_details(&mut self) -> DetailsToggle {
        let UiState::Loaded(loaded) = &mut self.state else {
            return DetailsToggle::NotLoaded;
        };

        if loaded.details_shown {
            loaded.details_shown = false;
            loaded.detail = None;
            DetailsToggle::Hidden
        } else {
            loaded.details_shown = true;
            DetailsToggle::FetchNeeded(loaded.summary.city_name.clone())
        }
    }

    /// Apply a detail result. Dropped when the panel was hidden in the
    /// meantime or the card was replaced.
    pub fn detail_loaded(&mut self, detail: WeatherDetail) {
        if let UiState::Loaded(loaded) = &mut self.state {
            if loaded.details_shown {
                loaded.detail = Some(detail);
            }
        }
    }

    /// A failed detail fetch closes the panel; no error state is surfaced.
    pub fn detail_failed(&mut self) {
        if let UiState::Loaded(loaded) = &mut self.state {
            loaded.details_shown = false;
            loaded.detail = None;
        }
    }
}
