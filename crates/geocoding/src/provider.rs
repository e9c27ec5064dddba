//! Geocoding provider port

use crate::error::GeocodingResult;
use crate::types::Suggestion;
use async_trait::async_trait;
use savemate_geo::Coordinate;

/// Forward and reverse geocoding
///
/// Implemented by [`crate::OpenCageClient`] for production and by fakes in
/// tests.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Matches for free text, in provider relevance order
    async fn forward(&self, query: &str) -> GeocodingResult<Vec<Suggestion>>;

    /// Label for a position, `None` when the provider knows nothing there
    async fn reverse(&self, coordinate: &Coordinate) -> GeocodingResult<Option<String>>;
}
