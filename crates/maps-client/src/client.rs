//! HTTP client for the directions and geocoding web services

use crate::{
    provider::{DirectionsProvider, Geocoder},
    types::{Address, Coordinate, Route, RouteRequest},
    Error, Result,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::debug;

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const GEOCODE_PATH: &str = "/maps/api/geocode/json";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for [`MapsClient`]
#[derive(Debug, Clone)]
pub struct MapsClientConfig {
    /// Base service URL (e.g., "https://maps.googleapis.com")
    pub base_url: String,
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Preferred result language, sent as `language` when set
    pub language: Option<String>,
}

impl Default for MapsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Wayfinder/{}", env!("CARGO_PKG_VERSION")),
            language: None,
        }
    }
}

impl MapsClientConfig {
    /// Create a config with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the result language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
    overview_polyline: PolylineDto,
    #[serde(default)]
    legs: Vec<LegDto>,
}

#[derive(Debug, Deserialize)]
struct PolylineDto {
    points: String,
}

#[derive(Debug, Deserialize)]
struct LegDto {
    distance: ValueDto,
    duration: ValueDto,
}

#[derive(Debug, Deserialize)]
struct ValueDto {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GeocodeResult {
    /// Street, then locality, then administrative area
    fn secondary_text(&self) -> String {
        ["route", "locality", "administrative_area_level_1"]
            .iter()
            .find_map(|kind| {
                self.address_components
                    .iter()
                    .find(|c| c.types.iter().any(|t| t == kind))
            })
            .map(|c| c.long_name.clone())
            .unwrap_or_default()
    }
}

/// Map a non-OK provider status onto an error
fn status_error(status: String, message: Option<String>) -> Error {
    match status.as_str() {
        "ZERO_RESULTS" | "NOT_FOUND" => Error::NoRouteFound,
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
            Error::QuotaExceeded(message.unwrap_or(status))
        }
        _ => Error::Api {
            message: message.unwrap_or_default(),
            status,
        },
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the directions and geocoding web services
#[derive(Debug, Clone)]
pub struct MapsClient {
    config: MapsClientConfig,
    http_client: ReqwestClient,
}

impl MapsClient {
    /// Create a new client
    pub fn new(config: MapsClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &MapsClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let mut req = self.http_client.get(&url).query(params);
        req = req.query(&[("key", self.config.api_key.as_str())]);
        if let Some(language) = &self.config.language {
            req = req.query(&[("language", language.as_str())]);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16().to_string(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DirectionsProvider for MapsClient {
    async fn directions(&self, request: &RouteRequest) -> Result<Route> {
        let response: DirectionsResponse = self
            .get_json(
                DIRECTIONS_PATH,
                &[
                    ("origin", request.origin.to_string()),
                    ("destination", request.destination.to_string()),
                    ("mode", request.mode.as_query_value().to_string()),
                ],
            )
            .await?;

        if response.status != "OK" {
            return Err(status_error(response.status, response.error_message));
        }

        let route = response.routes.into_iter().next().ok_or(Error::NoRouteFound)?;
        let leg = route.legs.first().ok_or(Error::NoRouteFound)?;

        Ok(Route {
            distance_meters: leg.distance.value.max(0.0) as u64,
            duration_seconds: leg.duration.value.max(0.0) as u64,
            encoded_polyline: route.overview_polyline.points,
        })
    }
}

#[async_trait]
impl Geocoder for MapsClient {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Address>> {
        let response: GeocodeResponse = self
            .get_json(GEOCODE_PATH, &[("latlng", coordinate.to_string())])
            .await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(None),
            _ => return Err(status_error(response.status, response.error_message)),
        }

        Ok(response.results.first().map(|result| {
            Address::new(
                result.formatted_address.clone(),
                result.secondary_text(),
                coordinate,
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = MapsClientConfig::default();
        assert_eq!(config.base_url, "https://maps.googleapis.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("Wayfinder/"));
        assert!(config.language.is_none());
    }

    #[test]
    fn test_client_config_builder() {
        let config = MapsClientConfig::new("secret")
            .with_base_url("http://localhost:9000")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("Test/1.0")
            .with_language("zh-TW");

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "Test/1.0");
        assert_eq!(config.language.as_deref(), Some("zh-TW"));
    }

    #[test]
    fn test_secondary_text_precedence() {
        let result: GeocodeResult = serde_json::from_str(
            r#"{
                "formatted_address": "No. 7, Section 5, Xinyi Road, Taipei",
                "address_components": [
                    {"long_name": "Taipei", "types": ["locality", "political"]},
                    {"long_name": "Xinyi Road", "types": ["route"]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(result.secondary_text(), "Xinyi Road");

        let result: GeocodeResult = serde_json::from_str(
            r#"{
                "formatted_address": "Somewhere",
                "address_components": [
                    {"long_name": "Taiwan", "types": ["country"]},
                    {"long_name": "Taipei City", "types": ["administrative_area_level_1"]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(result.secondary_text(), "Taipei City");

        let result: GeocodeResult =
            serde_json::from_str(r#"{"formatted_address": "Ocean"}"#).unwrap();
        assert_eq!(result.secondary_text(), "");
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error("ZERO_RESULTS".into(), None),
            Error::NoRouteFound
        ));
        assert!(matches!(
            status_error("OVER_QUERY_LIMIT".into(), None),
            Error::QuotaExceeded(_)
        ));
        match status_error("REQUEST_DENIED".into(), Some("bad key".into())) {
            Error::Api { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
