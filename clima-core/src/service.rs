use std::sync::Arc;

use reqwest::Url;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{ServiceConfig, parse_endpoint},
    error::{FetchError, TransportError},
    model::{WeatherQuery, WeatherResult, decode_weather},
    transport::{HttpTransport, Transport},
};

/// Fetches current weather for a [`WeatherQuery`].
///
/// Holds only immutable configuration and a shared transport, so clones are
/// cheap and concurrent calls never observe each other.
#[derive(Debug, Clone)]
pub struct WeatherService {
    config: Arc<ServiceConfig>,
    transport: Arc<dyn Transport>,
}

impl WeatherService {
    /// Service talking to the real endpoint over HTTP.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config: Arc::new(config), transport }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Fetch current weather, resolving to exactly one result or error.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError> {
        let url = build_url(&self.config, query)?;
        debug!(url = %redacted(&url), "requesting current weather");

        let body = self.transport.get(url).await.map_err(|err| {
            warn!(error = %err, "weather request failed");
            FetchError::NoData(err)
        })?;

        if body.is_empty() {
            warn!("weather response body was empty");
            return Err(FetchError::NoData(TransportError::EmptyBody));
        }

        let result = decode_weather(&body).map_err(|err| {
            warn!(error = %err, "weather response could not be decoded");
            FetchError::DecodingError(err)
        })?;

        info!(
            city = %result.city_name,
            temperature_c = result.temperature_celsius,
            condition_id = result.condition_id,
            "current weather fetched"
        );

        Ok(result)
    }

    pub async fn fetch_by_city(&self, name: &str) -> Result<WeatherResult, FetchError> {
        self.fetch_weather(&WeatherQuery::city(name)).await
    }

    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherResult, FetchError> {
        self.fetch_weather(&WeatherQuery::coordinates(latitude, longitude)).await
    }

    /// Run the fetch on the Tokio runtime and hand the outcome to `on_complete`.
    ///
    /// `on_complete` is invoked exactly once, on whichever runtime worker
    /// finishes the request. Callers that own thread-bound state must forward
    /// the result themselves.
    pub fn spawn_fetch<F>(&self, query: WeatherQuery, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<WeatherResult, FetchError>) + Send + 'static,
    {
        let service = self.clone();
        tokio::spawn(async move {
            let result = service.fetch_weather(&query).await;
            on_complete(result);
        })
    }
}

/// Build the request URL for `query`. No network access.
pub fn build_url(config: &ServiceConfig, query: &WeatherQuery) -> Result<Url, FetchError> {
    let mut url = parse_endpoint(&config.endpoint).map_err(FetchError::InvalidRequest)?;

    if let WeatherQuery::ByCoordinates { latitude, longitude } = query {
        if !(latitude.is_finite() && longitude.is_finite()) {
            return Err(FetchError::InvalidRequest(format!(
                "coordinates must be finite, got ({latitude}, {longitude})"
            )));
        }
    }

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("appid", &config.api_key).append_pair("units", "metric");

        match query {
            WeatherQuery::ByCityName { name } => {
                pairs.append_pair("q", name);
            }
            WeatherQuery::ByCoordinates { latitude, longitude } => {
                pairs
                    .append_pair("lat", &latitude.to_string())
                    .append_pair("lon", &longitude.to_string());
            }
        }
    }

    Ok(url)
}

/// Copy of `url` safe to log: the API key is masked.
fn redacted(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked
}
