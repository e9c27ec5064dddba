//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for `geocoding.requests_per_second`
pub const MAX_REQUESTS_PER_SECOND: u32 = 1000;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// `[geocoding]` section
    #[serde(default)]
    pub geocoding: GeocodingSettings,

    /// `[search]` section
    #[serde(default)]
    pub search: SearchSettings,

    /// `[storage]` section
    #[serde(default)]
    pub storage: StorageSettings,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let geocoding = &self.geocoding;
        if geocoding.base_url.is_empty() {
            return Err(Error::config_invalid("geocoding.base_url cannot be empty"));
        }
        if !geocoding.base_url.starts_with("http://") && !geocoding.base_url.starts_with("https://") {
            return Err(Error::config_invalid(
                "geocoding.base_url must start with http:// or https://",
            ));
        }
        if !(1..=100).contains(&geocoding.max_results) {
            return Err(Error::config_invalid("geocoding.max_results must be between 1 and 100"));
        }
        if geocoding.timeout_secs == 0 {
            return Err(Error::config_invalid("geocoding.timeout_secs cannot be zero"));
        }
        if geocoding.min_query_chars == 0 {
            return Err(Error::config_invalid("geocoding.min_query_chars cannot be zero"));
        }
        if !(1..=MAX_REQUESTS_PER_SECOND).contains(&geocoding.requests_per_second) {
            return Err(Error::config_invalid(format!(
                "geocoding.requests_per_second must be between 1 and {}",
                MAX_REQUESTS_PER_SECOND
            )));
        }
        if let Some(country) = &geocoding.country_filter {
            if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::config_invalid(format!(
                    "geocoding.country_filter must be a two-letter country code, got '{}'",
                    country
                ))
                .with_suggestion("Use ISO 3166-1 alpha-2 codes such as \"pl\" or \"de\""));
            }
        }

        let radius = self.search.default_radius_km;
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::config_invalid(
                "search.default_radius_km must be a non-negative number",
            ));
        }

        Ok(())
    }
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodingSettings {
    /// Provider geocoding endpoint; query parameters are appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Restrict results to a country (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub country_filter: Option<String>,

    /// Maximum suggestions per lookup
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Quiet period before a typed query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shorter queries never reach the provider
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Provider request budget
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            country_filter: None,
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.opencagedata.com/geocode/v1/json".to_string()
}

fn default_max_results() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_chars() -> usize {
    3
}

fn default_requests_per_second() -> u32 {
    1
}

/// Deal search settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    /// Radius used when none is given
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Order results nearest-first
    #[serde(default = "default_true")]
    pub sort_by_distance: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            sort_by_distance: true,
        }
    }
}

fn default_radius_km() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

/// Client-state storage settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageSettings {
    /// Directory for the persistent store (platform data dir when unset)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageSettings {
    /// Resolved store directory
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from(".savemate"))
                .join("savemate")
        })
    }
}
