//! Device position sources

use crate::error::LocationError;
use async_trait::async_trait;
use savemate_geo::Coordinate;

/// Source of the device's current position
///
/// A browser or mobile shell implements this over its geolocation API and
/// maps "no capability" and "permission refused" onto the matching
/// [`LocationError`] variants.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Current position of the device
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Position fixed up front, e.g. from `--lat`/`--lng` flags
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPosition(pub Option<Coordinate>);

impl StaticPosition {
    /// A source that always reports `coordinate`
    #[must_use]
    pub fn at(coordinate: Coordinate) -> Self {
        Self(Some(coordinate))
    }

    /// A source without geolocation capability
    #[must_use]
    pub fn unavailable() -> Self {
        Self(None)
    }
}

#[async_trait]
impl PositionSource for StaticPosition {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        self.0.ok_or(LocationError::GeolocationUnavailable)
    }
}

/// Source whose permission prompt was refused
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedPosition;

#[async_trait]
impl PositionSource for DeniedPosition {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::GeolocationDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_position() {
        let here = Coordinate::new(52.2297, 21.0122).unwrap();
        assert_eq!(StaticPosition::at(here).current_position().await.unwrap(), here);
        assert!(matches!(
            StaticPosition::unavailable().current_position().await,
            Err(LocationError::GeolocationUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_denied_position() {
        assert!(matches!(
            DeniedPosition.current_position().await,
            Err(LocationError::GeolocationDenied)
        ));
    }
}
