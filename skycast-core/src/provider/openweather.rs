use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::FetchError,
    icon::WeatherIcon,
    model::{WeatherDetail, WeatherSummary},
};

use super::WeatherProvider;

/// Default endpoints; tests substitute a local mock server.
pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org";
pub const DEFAULT_ICON_BASE: &str = "https://openweathermap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    api_base: String,
    icon_base: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, FetchError> {
        Self::with_base_urls(
            api_key,
            DEFAULT_API_BASE.to_string(),
            DEFAULT_ICON_BASE.to_string(),
        )
    }

    /// Same provider pointed at explicit endpoints (mock servers in tests).
    pub fn with_base_urls(
        api_key: String,
        api_base: String,
        icon_base: String,
    ) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            api_key,
            http,
            api_base,
            icon_base,
        })
    }

    /// GET the current-weather endpoint and hand back the raw body. Shared by
    /// the summary and detail fetches, which decode different shapes from it.
    async fn get_current(&self, city: &str) -> Result<String, FetchError> {
        let url = endpoint(&self.api_base, "/data/2.5/weather")?;
        tracing::debug!("requesting current weather for {city}");

        let res = self
            .http
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "weather service returned {status}: {}",
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_summary(&self, city: &str) -> Result<WeatherSummary, FetchError> {
        let city = validated(city)?;
        let body = self.get_current(city).await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("current weather JSON: {e}")))?;

        // weather[0] is required: a response without it has no description or
        // icon code to render, so it is not a usable summary.
        let condition = parsed
            .weather
            .first()
            .ok_or_else(|| FetchError::Decode("response carried no weather entry".to_string()))?;

        Ok(WeatherSummary {
            city_name: parsed.name,
            temperature_c: parsed.main.temp,
            description: condition.description.clone(),
            icon_code: condition.icon.clone(),
        })
    }

    async fn fetch_detail(&self, city: &str) -> Result<WeatherDetail, FetchError> {
        let city = validated(city)?;
        let body = self.get_current(city).await?;

        let parsed: OwDetailResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("detailed weather JSON: {e}")))?;

        Ok(WeatherDetail {
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            visibility_m: parsed.visibility,
            sunrise: unix_to_utc(parsed.sys.sunrise)?,
            sunset: unix_to_utc(parsed.sys.sunset)?,
        })
    }

    async fn fetch_icon(&self, icon_code: &str) -> Result<WeatherIcon, FetchError> {
        let url = endpoint(&self.icon_base, &format!("/img/wn/{icon_code}@2x.png"))?;
        tracing::debug!("requesting icon {icon_code}");

        let res = self.http.get(url).send().await?;
        let status = res.status();

        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "icon fetch returned {status}"
            )));
        }

        let bytes = res.bytes().await?;
        WeatherIcon::from_bytes(&bytes)
    }
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwDetailMain {
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwDetailResponse {
    main: OwDetailMain,
    wind: OwWind,
    visibility: u32,
    sys: OwSys,
}

fn validated(city: &str) -> Result<&str, FetchError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidInput("city name is empty".to_string()));
    }
    Ok(trimmed)
}

fn endpoint(base: &str, path: &str) -> Result<Url, FetchError> {
    Url::parse(base)
        .and_then(|base| base.join(path))
        .map_err(|e| FetchError::InvalidInput(format!("bad request URL for {path}: {e}")))
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, FetchError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| FetchError::Decode(format!("timestamp {ts} out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::with_base_urls("KEY".to_string(), server.uri(), server.uri())
            .expect("client builds")
    }

    fn paris_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Paris",
            "main": {"temp": 18.7},
            "weather": [{"description": "clear sky", "icon": "01d"}]
        })
    }

    #[tokio::test]
    async fn summary_decodes_the_expected_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
            .mount(&server)
            .await;

        let summary = provider_for(&server)
            .fetch_summary("Paris")
            .await
            .expect("summary fetch succeeds");

        assert_eq!(summary.city_name, "Paris");
        assert_eq!(summary.icon_code, "01d");
        assert_eq!(summary.temperature_label(), "18°C");
        assert_eq!(summary.description_label(), "Clear Sky");
    }

    #[tokio::test]
    async fn missing_weather_entry_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Paris",
                "main": {"temp": 18.7},
                "weather": []
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_summary("Paris").await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"cod":"404","message":"city not found"}"#),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_summary("Atlantis").await.unwrap_err();

        match err {
            FetchError::Network(msg) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("city not found"));
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_summary("Paris").await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn blank_city_is_invalid_input_without_a_request() {
        let provider = OpenWeatherProvider::new("KEY".to_string()).expect("client builds");

        let err = provider.fetch_summary("   ").await.unwrap_err();

        assert!(matches!(err, FetchError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn detail_decodes_the_superset_of_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Paris",
                "main": {"temp": 18.7, "humidity": 64, "pressure": 1012},
                "weather": [{"description": "clear sky", "icon": "01d"}],
                "wind": {"speed": 4.1},
                "visibility": 10000,
                "sys": {"sunrise": 1718000000_i64, "sunset": 1718050000_i64}
            })))
            .mount(&server)
            .await;

        let detail = provider_for(&server)
            .fetch_detail("Paris")
            .await
            .expect("detail fetch succeeds");

        assert_eq!(detail.humidity_pct, 64);
        assert_eq!(detail.pressure_hpa, 1012);
        assert_eq!(detail.visibility_km(), 10);
        assert_eq!(detail.sunrise, unix_to_utc(1_718_000_000).unwrap());
        assert_eq!(detail.sunset, unix_to_utc(1_718_050_000).unwrap());
    }

    #[tokio::test]
    async fn detail_missing_fields_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_detail("Paris").await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn icon_bytes_decode_into_a_bitmap() {
        let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .expect("in-memory PNG encode");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img/wn/01d@2x.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png.into_inner()))
            .mount(&server)
            .await;

        let icon = provider_for(&server)
            .fetch_icon("01d")
            .await
            .expect("icon fetch succeeds");

        assert_eq!((icon.width(), icon.height()), (4, 4));
    }

    #[tokio::test]
    async fn icon_fetch_failure_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img/wn/01d@2x.png"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_icon("01d").await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }
}
