//! Location search for SaveMate
//!
//! Turns typed text or the device position into coordinates and labels.
//!
//! # Features
//!
//! - **Debounced search**: one provider call per pause in typing
//! - **Last-write-wins**: superseded responses never reach subscribers
//! - **Graceful degradation**: provider failures yield empty suggestions or
//!   a coordinate label, never an error on the search path
//! - **Rate limiting**: local request budget in front of the provider
//!
//! # Example
//!
//! ```rust,no_run
//! use savemate_geocoding::{GeocoderConfig, LocationResolver, OpenCageClient, ResolverConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenCageClient::with_config(GeocoderConfig::from_env())?;
//!     let resolver = LocationResolver::new(Arc::new(client), ResolverConfig::default());
//!
//!     let id = resolver.search("Warszawa");
//!     for suggestion in resolver.settled(id).await.suggestions {
//!         println!("{} ({})", suggestion.label, suggestion.coordinate);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod position;
pub mod provider;
pub mod resolver;
pub mod types;

pub use client::OpenCageClient;
pub use config::{GeocoderConfig, ResolverConfig};
pub use error::{GeocodingError, GeocodingResult, LocationError};
pub use position::{DeniedPosition, PositionSource, StaticPosition};
pub use provider::GeocodingProvider;
pub use resolver::{LocationResolver, RequestId, ResolvedLocation, SearchStatus, SuggestionState};
pub use types::Suggestion;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::OpenCageClient;
    pub use crate::config::{GeocoderConfig, ResolverConfig};
    pub use crate::error::{GeocodingError, GeocodingResult, LocationError};
    pub use crate::position::PositionSource;
    pub use crate::provider::GeocodingProvider;
    pub use crate::resolver::{LocationResolver, SearchStatus};
}
