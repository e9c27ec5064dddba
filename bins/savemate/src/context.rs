//! Shared command context

use crate::output::OutputFormat;
use anyhow::Result;
use savemate_core::config::Config;
use savemate_core::store::FileStore;
use savemate_geocoding::{GeocoderConfig, LocationResolver, OpenCageClient, ResolverConfig};
use std::sync::Arc;
use tracing::debug;

/// Configuration and output settings shared by every command
pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn load(config_path: Option<&str>, format: OutputFormat) -> Result<Self> {
        let config = Config::load(config_path)?;
        debug!(path = ?config.path, "Configuration loaded");
        Ok(Self { config, format })
    }

    /// Resolver backed by the configured HTTP geocoder
    pub fn resolver(&self) -> Result<LocationResolver> {
        let settings = &self.config.schema.geocoding;
        let geocoder = GeocoderConfig::from_settings(settings).with_env_overrides();
        let client = OpenCageClient::with_config(geocoder)?;
        Ok(LocationResolver::new(
            Arc::new(client),
            ResolverConfig::from_settings(settings),
        ))
    }

    /// Client-state store in the configured data directory
    pub fn store(&self) -> Result<FileStore> {
        let dir = self.config.schema.storage.resolved_data_dir();
        let store = FileStore::open_in(&dir)?;
        debug!(path = %store.path().display(), "Opened client store");
        Ok(store)
    }
}
