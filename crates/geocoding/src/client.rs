//! OpenCage-compatible HTTP geocoder

use crate::config::GeocoderConfig;
use crate::error::{GeocodingError, GeocodingResult};
use crate::provider::GeocodingProvider;
use crate::types::{GeocodeResponse, Suggestion};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use savemate_core::rate_limit::RateLimiter;
use savemate_geo::Coordinate;
use savemate_telemetry::{metrics, Timer};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// HTTP client for an OpenCage-style `/geocode` endpoint
///
/// Wraps `reqwest` and adds a local token bucket so bursts of typing never
/// exceed the provider's request budget.
#[derive(Clone)]
pub struct OpenCageClient {
    inner: Client,
    config: Arc<GeocoderConfig>,
    rate_limiter: Arc<RateLimiter>,
}

impl OpenCageClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> GeocodingResult<Self> {
        Self::with_config(GeocoderConfig::from_env())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: GeocoderConfig) -> GeocodingResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("savemate-geocoding/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(GeocodingError::Request)?;

        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self {
            inner,
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Refill the local request budget
    pub fn reset_rate_limit(&self) {
        self.rate_limiter.reset();
    }

    async fn geocode(&self, mut params: Vec<(&'static str, String)>) -> GeocodingResult<GeocodeResponse> {
        if !self.rate_limiter.try_acquire() {
            metrics().increment("geocoding.rate_limited");
            warn!(
                retry_in_ms = self.rate_limiter.time_until_available().as_millis(),
                "Geocoding request budget exhausted"
            );
            return Err(GeocodingError::RateLimited);
        }

        params.push(("no_annotations", "1".to_string()));
        if let Some(ref key) = self.config.api_key {
            params.push(("key", key.clone()));
        }

        metrics().increment("geocoding.requests");
        let timer = Timer::start("geocoding.request_ms");
        let result: GeocodingResult<GeocodeResponse> = async {
            let response = self
                .inner
                .get(&self.config.endpoint)
                .query(&params)
                .send()
                .await?;
            handle_response(response).await
        }
        .await;
        let elapsed = timer.stop();

        match &result {
            Ok(body) => debug!(
                results = body.results.len(),
                elapsed_ms = elapsed.as_millis(),
                "Geocoding request succeeded"
            ),
            Err(e) => {
                metrics().increment("geocoding.failures");
                debug!(error = %e, elapsed_ms = elapsed.as_millis(), "Geocoding request failed");
            }
        }
        result
    }
}

/// Map the HTTP response to a body or a provider error
async fn handle_response(response: Response) -> GeocodingResult<GeocodeResponse> {
    let status = response.status();

    if status.is_success() {
        return response.json().await.map_err(GeocodingError::Request);
    }

    let text = response.text().await.unwrap_or_default();
    // OpenCage explains failures in a `status.message` field
    let message = serde_json::from_str::<GeocodeResponse>(&text)
        .ok()
        .and_then(|body| body.status)
        .map(|s| s.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text
            }
        });

    Err(GeocodingError::provider(status.as_u16(), message))
}

#[async_trait]
impl GeocodingProvider for OpenCageClient {
    #[instrument(skip(self))]
    async fn forward(&self, query: &str) -> GeocodingResult<Vec<Suggestion>> {
        let mut params = vec![
            ("q", query.to_string()),
            ("limit", self.config.max_results.to_string()),
        ];
        if let Some(ref country) = self.config.country_filter {
            params.push(("countrycode", country.clone()));
        }

        let response = self.geocode(params).await?;
        Ok(response.into_suggestions())
    }

    #[instrument(skip(self, coordinate), fields(coordinate = %coordinate))]
    async fn reverse(&self, coordinate: &Coordinate) -> GeocodingResult<Option<String>> {
        let params = vec![
            ("q", format!("{} {}", coordinate.latitude(), coordinate.longitude())),
            ("limit", "1".to_string()),
        ];

        let response = self.geocode(params).await?;
        Ok(response.first_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenCageClient::with_config(GeocoderConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = GeocoderConfig::default().with_endpoint("not-a-url");
        assert!(matches!(
            OpenCageClient::with_config(config),
            Err(GeocodingError::Config(_))
        ));
    }
}
