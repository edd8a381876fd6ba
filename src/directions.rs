//! Google Directions HTTP adapter for pairwise travel quotes.

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, ProviderFailure};
use crate::polyline::Polyline;
use crate::stop::Position;
use crate::traits::{RouteQuote, TravelCostProvider};

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const BASE_URL_VAR: &str = "DIRECTIONS_BASE_URL";

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub departure_time: String,
    pub traffic_model: String,
    pub mode: String,
    pub timeout_secs: u64,
    /// Honour HTTP(S)_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            api_key: String::new(),
            departure_time: "now".to_string(),
            traffic_model: "best_guess".to_string(),
            mode: "driving".to_string(),
            timeout_secs: 10,
            use_system_proxy: true,
        }
    }
}

impl DirectionsConfig {
    /// Read the API key (required) and an optional endpoint override from
    /// the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::var(API_KEY_VAR).ok(), std::env::var(BASE_URL_VAR).ok())
    }

    /// Empty values count as unset.
    fn from_vars(api_key: Option<String>, base_url: Option<String>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Some(base_url) = base_url.filter(|url| !url.is_empty()) {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &DirectionsConfig {
        &self.config
    }
}

impl TravelCostProvider for DirectionsClient {
    fn fetch(&self, origin: Position, destination: Position) -> Result<RouteQuote, ProviderFailure> {
        let origin_param = format!("{},{}", origin.lat, origin.lng);
        let destination_param = format!("{},{}", destination.lat, destination.lng);

        debug!(origin = %origin_param, destination = %destination_param, "requesting directions");

        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("origin", origin_param.as_str()),
                ("destination", destination_param.as_str()),
                ("departure_time", self.config.departure_time.as_str()),
                ("traffic_model", self.config.traffic_model.as_str()),
                ("mode", self.config.mode.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())?
            .text()?;

        let response: DirectionsResponse = serde_json::from_str(&body)
            .map_err(|err| ProviderFailure::MalformedResponse(err.to_string()))?;

        interpret(response)
    }
}

/// Turn a parsed Directions body into a quote, or the failure it reports.
fn interpret(response: DirectionsResponse) -> Result<RouteQuote, ProviderFailure> {
    if response.status != "OK" {
        return Err(ProviderFailure::Status {
            status: response.status,
            message: response.error_message,
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderFailure::MalformedResponse("no routes".to_string()))?;
    let leg = route
        .legs
        .first()
        .ok_or_else(|| ProviderFailure::MalformedResponse("route has no legs".to_string()))?;
    // Traffic-aware duration is absent when the service has no live data.
    let duration = leg
        .duration_in_traffic
        .as_ref()
        .or(leg.duration.as_ref())
        .ok_or_else(|| ProviderFailure::MalformedResponse("leg has no duration".to_string()))?;

    Ok(RouteQuote {
        path: Polyline::decode(&route.overview_polyline.points)?,
        duration_secs: duration.value,
    })
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: OverviewPolyline,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    duration: Option<TextValue>,
    duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: u64,
}
