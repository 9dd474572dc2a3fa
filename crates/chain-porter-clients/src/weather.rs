// chain-porter-clients/src/weather.rs
// ============================================================================
// Module: Weather API Client
// Description: Active alert and point forecast queries with text rendering.
// Purpose: Provide the weather lookups tools delegate to.
// Dependencies: reqwest, serde
// ============================================================================

//! ## Overview
//! The weather client wraps the National Weather Service style API: active
//! alerts by two-letter state code, and forecasts resolved in two hops, first
//! the point metadata for a coordinate pair, then the gridded forecast URL it
//! names. Responses are rendered to human-readable text blocks; empty result
//! sets render as explicit "no data" lines rather than errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use chain_porter_config::WeatherConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::http::build_client;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Weather API client errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Client construction failure.
    #[error("weather client failed: {0}")]
    Client(String),
    /// API request failure.
    #[error("weather request failed: {0}")]
    Request(String),
    /// Unexpected API response payload.
    #[error("weather response invalid: {0}")]
    Response(String),
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Active alerts response.
#[derive(Debug, Deserialize)]
struct AlertsResponse {
    /// Alert features for the queried area.
    #[serde(default)]
    features: Vec<AlertFeature>,
}

/// One alert feature.
#[derive(Debug, Deserialize)]
struct AlertFeature {
    /// Alert properties.
    properties: AlertProperties,
}

/// Alert detail fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AlertProperties {
    /// Event name, such as "Flood Warning".
    event: Option<String>,
    /// Affected area description.
    area_desc: Option<String>,
    /// Severity classification.
    severity: Option<String>,
    /// Alert status.
    status: Option<String>,
    /// One-line headline.
    headline: Option<String>,
}

/// Point metadata response.
#[derive(Debug, Deserialize)]
struct PointsResponse {
    /// Point properties.
    properties: PointsProperties,
}

/// Point metadata fields.
#[derive(Debug, Deserialize)]
struct PointsProperties {
    /// URL of the gridded forecast for this point.
    forecast: String,
}

/// Gridded forecast response.
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    /// Forecast properties.
    properties: ForecastProperties,
}

/// Forecast detail fields.
#[derive(Debug, Deserialize)]
struct ForecastProperties {
    /// Forecast periods, soonest first.
    #[serde(default)]
    periods: Vec<ForecastPeriod>,
}

/// One forecast period.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ForecastPeriod {
    /// Period name, such as "Tonight".
    name: Option<String>,
    /// Temperature value.
    temperature: Option<i64>,
    /// Temperature unit, such as "F".
    temperature_unit: Option<String>,
    /// Wind speed description.
    wind_speed: Option<String>,
    /// Wind direction.
    wind_direction: Option<String>,
    /// Short forecast text.
    short_forecast: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client for the weather API.
pub struct WeatherClient {
    /// API base URL.
    endpoint: String,
    /// Bounded HTTP client for API requests.
    client: Client,
}

impl WeatherClient {
    /// Builds a weather client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Client`] when the HTTP client cannot be built.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client =
            build_client(config.timeout_ms, &config.user_agent).map_err(WeatherError::Client)?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    /// Fetches active alerts for a two-letter state code, rendered as text.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] when the query fails.
    pub fn alerts(&self, state: &str) -> Result<String, WeatherError> {
        let state = state.to_ascii_uppercase();
        let url = format!("{}/alerts?area={state}", self.endpoint);
        let response: AlertsResponse = self.get_json(&url)?;
        if response.features.is_empty() {
            return Ok(format!("No active alerts for {state}"));
        }
        let blocks: Vec<String> =
            response.features.iter().map(|feature| format_alert(&feature.properties)).collect();
        Ok(format!("Active alerts for {state}:\n\n{}", blocks.join("\n")))
    }

    /// Fetches the forecast for a coordinate pair, rendered as text.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] when either hop fails.
    pub fn forecast(&self, latitude: f64, longitude: f64) -> Result<String, WeatherError> {
        let points_url = format!("{}/points/{latitude:.4},{longitude:.4}", self.endpoint);
        let points: PointsResponse = self.get_json(&points_url)?;
        let forecast: ForecastResponse = self.get_json(&points.properties.forecast)?;
        if forecast.properties.periods.is_empty() {
            return Ok(format!("No forecast periods available for {latitude},{longitude}"));
        }
        let blocks: Vec<String> =
            forecast.properties.periods.iter().map(format_forecast_period).collect();
        Ok(format!("Forecast for {latitude},{longitude}:\n\n{}", blocks.join("\n")))
    }

    /// Issues a GET request and decodes the JSON response.
    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, WeatherError> {
        let response =
            self.client.get(url).send().map_err(|err| WeatherError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(WeatherError::Request(format!("{url} returned {}", response.status())));
        }
        response.json::<T>().map_err(|err| WeatherError::Response(err.to_string()))
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders one alert as a labeled text block.
fn format_alert(alert: &AlertProperties) -> String {
    let unknown = || "Unknown".to_string();
    format!(
        "Event: {}\nArea: {}\nSeverity: {}\nStatus: {}\nHeadline: {}\n---",
        alert.event.clone().unwrap_or_else(unknown),
        alert.area_desc.clone().unwrap_or_else(unknown),
        alert.severity.clone().unwrap_or_else(unknown),
        alert.status.clone().unwrap_or_else(unknown),
        alert.headline.clone().unwrap_or_else(|| "No headline".to_string()),
    )
}

/// Renders one forecast period as a labeled text block.
fn format_forecast_period(period: &ForecastPeriod) -> String {
    let unknown = || "Unknown".to_string();
    format!(
        "{}:\nTemperature: {}°{}\nWind: {} {}\n{}\n---",
        period.name.clone().unwrap_or_else(unknown),
        period.temperature.map_or_else(unknown, |value| value.to_string()),
        period.temperature_unit.clone().unwrap_or_else(|| "F".to_string()),
        period.wind_speed.clone().unwrap_or_else(unknown),
        period.wind_direction.clone().unwrap_or_default(),
        period.short_forecast.clone().unwrap_or_else(|| "No forecast available".to_string()),
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::AlertProperties;
    use super::ForecastPeriod;
    use super::format_alert;
    use super::format_forecast_period;

    #[test]
    fn alert_rendering_labels_every_field() {
        let rendered = format_alert(&AlertProperties {
            event: Some("Flood Warning".to_string()),
            area_desc: Some("Sacramento County".to_string()),
            severity: Some("Severe".to_string()),
            status: Some("Actual".to_string()),
            headline: Some("Flooding expected".to_string()),
        });
        assert!(rendered.contains("Event: Flood Warning"));
        assert!(rendered.contains("Area: Sacramento County"));
        assert!(rendered.contains("Severity: Severe"));
        assert!(rendered.contains("Headline: Flooding expected"));
        assert!(rendered.ends_with("---"));
    }

    #[test]
    fn alert_rendering_defaults_missing_fields() {
        let rendered = format_alert(&AlertProperties::default());
        assert!(rendered.contains("Event: Unknown"));
        assert!(rendered.contains("Headline: No headline"));
    }

    #[test]
    fn forecast_rendering_includes_temperature_and_wind() {
        let rendered = format_forecast_period(&ForecastPeriod {
            name: Some("Tonight".to_string()),
            temperature: Some(54),
            temperature_unit: Some("F".to_string()),
            wind_speed: Some("5 mph".to_string()),
            wind_direction: Some("NW".to_string()),
            short_forecast: Some("Partly cloudy".to_string()),
        });
        assert!(rendered.starts_with("Tonight:"));
        assert!(rendered.contains("Temperature: 54°F"));
        assert!(rendered.contains("Wind: 5 mph NW"));
        assert!(rendered.contains("Partly cloudy"));
    }
}
