use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions shown on first load. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub city_name: String,
    pub temperature_c: f64,
    pub description: String,
    pub icon_code: String,
}

impl WeatherSummary {
    /// Integer Celsius label, truncated toward zero: 18.7 renders as `18°C`.
    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature_c.trunc() as i64)
    }

    /// Condition description with every word capitalized.
    pub fn description_label(&self) -> String {
        capitalize_words(&self.description)
    }
}

/// Extended conditions fetched on demand and discarded when hidden again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDetail {
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
    pub visibility_m: u32,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl WeatherDetail {
    /// Visibility in whole kilometers, as shown in the details panel.
    pub fn visibility_km(&self) -> u32 {
        self.visibility_m / 1000
    }
}

/// `"clear sky"` -> `"Clear Sky"`; the rest of each word is lowered.
pub fn capitalize_words(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
