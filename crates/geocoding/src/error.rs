//! Error types for geocoding and location resolution

use thiserror::Error;

/// Result type alias for provider operations
pub type GeocodingResult<T> = Result<T, GeocodingError>;

/// Failures talking to the geocoding provider
///
/// None of these are fatal to the caller: search degrades to an empty
/// suggestion list and reverse lookups fall back to a coordinate label.
#[derive(Error, Debug)]
pub enum GeocodingError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider returned an error response
    #[error("Geocoding provider error ({status}): {message}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Message from the provider
        message: String,
    },

    /// Local request budget exhausted
    #[error("Rate limited - too many geocoding requests")]
    RateLimited,
}

impl GeocodingError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider error
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Whether the provider or the local limiter throttled the request
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Provider { status: 429, .. })
    }

    /// Whether the provider rejected the API key
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Provider { status: 401 | 403, .. })
    }
}

/// Failures resolving the user's location
#[derive(Error, Debug)]
pub enum LocationError {
    /// The platform has no geolocation capability
    #[error("Geolocation is not available on this device")]
    GeolocationUnavailable,

    /// The user declined the permission prompt
    #[error("Geolocation permission was denied")]
    GeolocationDenied,

    /// Provider failure on an explicit lookup
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_classification() {
        assert!(GeocodingError::RateLimited.is_rate_limited());
        assert!(GeocodingError::provider(429, "quota").is_rate_limited());
        assert!(!GeocodingError::provider(500, "boom").is_rate_limited());
    }

    #[test]
    fn test_auth_classification() {
        assert!(GeocodingError::provider(401, "invalid key").is_auth_error());
        assert!(GeocodingError::provider(403, "suspended").is_auth_error());
        assert!(!GeocodingError::RateLimited.is_auth_error());
    }

    #[test]
    fn test_location_error_display() {
        assert_eq!(
            LocationError::GeolocationDenied.to_string(),
            "Geolocation permission was denied"
        );
        let wrapped: LocationError = GeocodingError::provider(402, "quota exceeded").into();
        assert_eq!(wrapped.to_string(), "Geocoding provider error (402): quota exceeded");
    }
}
