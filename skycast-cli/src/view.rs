//! Pure rendering of the screen snapshot.
//!
//! Everything here is a function of [`UiState`] to text; no state is read or
//! written. The interactive loop and the one-shot `show` command both print
//! through this module.

use chrono::{DateTime, Local, Utc};
use crossterm::style::{Color, Stylize};
use skycast_core::{LoadedWeather, UiState, WeatherDetail, WeatherIcon};

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Widest the icon art may render, in terminal cells.
const ICON_COLUMNS: u32 = 20;

/// Render the current snapshot to a block of terminal text.
pub fn render(state: &UiState) -> String {
    match state {
        UiState::Idle => "Type a city name to fetch current weather.".to_string(),
        UiState::Loading { city } => format!("Fetching weather for {city}…"),
        UiState::Error(message) => format!("{}", message.clone().with(Color::Red)),
        UiState::Loaded(loaded) => card(loaded),
    }
}

fn card(loaded: &LoadedWeather) -> String {
    let summary = &loaded.summary;
    let mut lines = Vec::new();

    lines.push(format!("{}", summary.city_name.clone().bold()));
    if let Some(icon) = &loaded.icon {
        lines.push(icon_art(icon, ICON_COLUMNS));
    }
    lines.push(summary.temperature_label());
    lines.push(format!("{}", summary.description_label().dim()));

    if loaded.details_shown {
        lines.push(String::new());
        match &loaded.detail {
            Some(detail) => lines.push(detail_panel(detail)),
            None => lines.push("Fetching details…".to_string()),
        }
    }

    lines.join("\n")
}

fn detail_panel(detail: &WeatherDetail) -> String {
    [
        format!("Humidity:   {}%", detail.humidity_pct),
        format!("Wind speed: {} m/s", detail.wind_speed_mps),
        format!("Pressure:   {} hPa", detail.pressure_hpa),
        format!("Visibility: {} km", detail.visibility_km()),
        format!("Sunrise:    {}", local_time_label(detail.sunrise)),
        format!("Sunset:     {}", local_time_label(detail.sunset)),
    ]
    .join("\n")
}

fn local_time_label(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M").to_string()
}

/// Half-block art for the icon bitmap: each text row carries two pixel rows,
/// upper pixel as `▀` foreground, lower pixel as background. Transparent
/// pixels stay blank so the icon keeps its silhouette.
pub fn icon_art(icon: &WeatherIcon, max_columns: u32) -> String {
    let scaled = icon.thumbnail(max_columns, max_columns);
    let mut rows = Vec::new();

    let mut y = 0;
    while y < scaled.height() {
        let mut row = String::new();
        for x in 0..scaled.width() {
            let top = opaque_color(scaled.pixel(x, y));
            let bottom = if y + 1 < scaled.height() {
                opaque_color(scaled.pixel(x, y + 1))
            } else {
                None
            };

            match (top, bottom) {
                (Some(t), Some(b)) => row.push_str(&"▀".with(t).on(b).to_string()),
                (Some(t), None) => row.push_str(&"▀".with(t).to_string()),
                (None, Some(b)) => row.push_str(&"▄".with(b).to_string()),
                (None, None) => row.push(' '),
            }
        }
        rows.push(row);
        y += 2;
    }

    rows.join("\n")
}

fn opaque_color(rgba: [u8; 4]) -> Option<Color> {
    let [r, g, b, a] = rgba;
    (a >= 128).then_some(Color::Rgb { r, g, b })
}
