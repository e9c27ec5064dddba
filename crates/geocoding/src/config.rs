//! Configuration for the geocoder and the location resolver
//!
//! Built from the `[geocoding]` section of `.savemate.toml`, with
//! environment overrides for secrets and deployment-specific values.

use crate::error::{GeocodingError, GeocodingResult};
use savemate_core::config::GeocodingSettings;
use savemate_core::rate_limit::RateLimitConfig;
use std::env;
use std::time::Duration;

/// Environment variable holding the provider API key
pub const ENV_API_KEY: &str = "OPENCAGE_API_KEY";
/// Environment variable overriding the provider endpoint
pub const ENV_ENDPOINT: &str = "SAVEMATE_GEOCODER_URL";
/// Environment variable overriding the country filter
pub const ENV_COUNTRY: &str = "SAVEMATE_COUNTRY";

/// HTTP geocoder configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    /// Forward/reverse geocoding endpoint
    pub endpoint: String,
    /// Provider API key
    pub api_key: Option<String>,
    /// Restrict results to a country (ISO 3166-1 alpha-2)
    pub country_filter: Option<String>,
    /// Maximum suggestions per forward lookup
    pub max_results: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Outbound request budget
    pub rate_limit: RateLimitConfig,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self::from_settings(&GeocodingSettings::default())
    }
}

impl GeocoderConfig {
    /// Create configuration from the TOML settings section
    #[must_use]
    pub fn from_settings(settings: &GeocodingSettings) -> Self {
        Self {
            endpoint: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            country_filter: settings.country_filter.clone(),
            max_results: settings.max_results,
            timeout: Duration::from_secs(settings.timeout_secs),
            rate_limit: RateLimitConfig::per_second(settings.requests_per_second),
        }
    }

    /// Create configuration from defaults and environment variables
    ///
    /// Reads:
    /// - `OPENCAGE_API_KEY`: provider API key
    /// - `SAVEMATE_GEOCODER_URL`: endpoint override
    /// - `SAVEMATE_COUNTRY`: country filter
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of this configuration
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = non_empty(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(country) = non_empty(ENV_COUNTRY) {
            self.country_filter = Some(country.to_lowercase());
        }
        self
    }

    /// Builder-style method to set the endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set the country filter
    #[must_use]
    pub fn with_country_filter(mut self, country: impl Into<String>) -> Self {
        self.country_filter = Some(country.into());
        self
    }

    /// Builder-style method to set the result limit
    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Builder-style method to set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the rate limit
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> GeocodingResult<()> {
        if self.endpoint.is_empty() {
            return Err(GeocodingError::config("endpoint cannot be empty"));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(GeocodingError::config("endpoint must start with http:// or https://"));
        }

        if self.max_results == 0 {
            return Err(GeocodingError::config("max_results must be at least 1"));
        }

        if self.timeout.is_zero() {
            return Err(GeocodingError::config("timeout cannot be zero"));
        }

        if let Some(country) = &self.country_filter {
            if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(GeocodingError::config(format!(
                    "country_filter must be a two-letter country code, got '{}'",
                    country
                )));
            }
        }

        Ok(())
    }
}

/// Debounce behaviour of the location resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Quiet period before a query is sent
    pub debounce: Duration,
    /// Shorter queries never reach the provider
    pub min_query_chars: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_chars: 3,
        }
    }
}

impl ResolverConfig {
    /// Create configuration from the TOML settings section
    #[must_use]
    pub fn from_settings(settings: &GeocodingSettings) -> Self {
        Self {
            debounce: Duration::from_millis(settings.debounce_ms),
            min_query_chars: settings.min_query_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeocoderConfig::default();
        assert!(config.endpoint.contains("opencagedata.com"));
        assert_eq!(config.max_results, 5);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_settings() {
        let settings = GeocodingSettings {
            country_filter: Some("pl".to_string()),
            max_results: 7,
            debounce_ms: 300,
            ..GeocodingSettings::default()
        };

        let config = GeocoderConfig::from_settings(&settings);
        assert_eq!(config.country_filter.as_deref(), Some("pl"));
        assert_eq!(config.max_results, 7);

        let resolver = ResolverConfig::from_settings(&settings);
        assert_eq!(resolver.debounce, Duration::from_millis(300));
        assert_eq!(resolver.min_query_chars, 3);
    }

    #[test]
    fn test_overrides() {
        let config = GeocoderConfig::default().with_overrides(|name| match name {
            ENV_API_KEY => Some("secret".to_string()),
            ENV_COUNTRY => Some("DE".to_string()),
            ENV_ENDPOINT => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.country_filter.as_deref(), Some("de"));
        assert!(config.endpoint.contains("opencagedata.com"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = GeocoderConfig::default()
            .with_endpoint("http://localhost:9000/geocode")
            .with_max_results(3)
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.endpoint, "http://localhost:9000/geocode");
        assert_eq!(config.max_results, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(GeocoderConfig::default().with_endpoint("").validate().is_err());
        assert!(GeocoderConfig::default().with_endpoint("localhost").validate().is_err());
        assert!(GeocoderConfig::default().with_max_results(0).validate().is_err());
        assert!(GeocoderConfig::default().with_timeout(Duration::ZERO).validate().is_err());
        assert!(GeocoderConfig::default().with_country_filter("pl").validate().is_ok());
        assert!(GeocoderConfig::default().with_country_filter("poland").validate().is_err());
        assert!(GeocoderConfig::default().with_country_filter("p1").validate().is_err());
    }

    #[test]
    fn test_country_override_is_validated() {
        let config = GeocoderConfig::default().with_overrides(|name| match name {
            ENV_COUNTRY => Some("Poland".to_string()),
            _ => None,
        });
        assert!(config.validate().is_err());
    }
}
