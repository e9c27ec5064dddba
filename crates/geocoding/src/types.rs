//! Suggestion type and provider wire format

use savemate_geo::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One geocoding match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// Human-readable place name
    pub label: String,
    /// Position of the match
    pub coordinate: Coordinate,
    /// Address parts (city, country, postcode, ...)
    pub components: BTreeMap<String, String>,
}

/// Provider response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    /// Matches, best first
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    /// Present on both success and error bodies
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

/// Provider-reported status
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    /// HTTP-style status code
    pub code: u16,
    /// Human-readable explanation
    pub message: String,
}

/// Single provider match
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    /// Formatted place name
    #[serde(default)]
    pub formatted: String,
    /// Position; missing for some partial matches
    pub geometry: Option<Geometry>,
    /// Raw address parts
    #[serde(default)]
    pub components: Map<String, Value>,
}

/// Match position as sent by the provider
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Geometry {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl GeocodeResult {
    /// Convert into a suggestion; `None` when the geometry is missing or invalid
    pub fn into_suggestion(self) -> Option<Suggestion> {
        let geometry = self.geometry?;
        let coordinate = Coordinate::new(geometry.lat, geometry.lng).ok()?;
        Some(Suggestion {
            label: self.formatted,
            coordinate,
            components: flatten_components(self.components),
        })
    }
}

impl GeocodeResponse {
    /// Suggestions in provider order, skipping unusable matches
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.results
            .into_iter()
            .filter_map(GeocodeResult::into_suggestion)
            .collect()
    }

    /// Label of the first match, for reverse lookups
    pub fn first_label(&self) -> Option<String> {
        self.results
            .first()
            .map(|r| r.formatted.trim().to_string())
            .filter(|label| !label.is_empty())
    }
}

fn flatten_components(components: Map<String, Value>) -> BTreeMap<String, String> {
    components
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeocodeResponse {
        serde_json::from_str(
            r#"{
                "results": [
                    {
                        "formatted": "Warsaw, Poland",
                        "geometry": {"lat": 52.2297, "lng": 21.0122},
                        "components": {
                            "city": "Warsaw",
                            "country_code": "pl",
                            "_category": "place",
                            "population": 1790658,
                            "is_capital": true,
                            "ISO_3166-2": ["PL-14"]
                        }
                    },
                    {
                        "formatted": "Broken",
                        "geometry": {"lat": 123.0, "lng": 0.0}
                    },
                    {
                        "formatted": "Warszawa, Indiana"
                    },
                    {
                        "formatted": "Warsaw, Indiana, United States",
                        "geometry": {"lat": 41.2381, "lng": -85.8530}
                    }
                ],
                "status": {"code": 200, "message": "OK"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_into_suggestions_keeps_order_and_skips_invalid() {
        let suggestions = sample().into_suggestions();
        let labels: Vec<&str> = suggestions.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Warsaw, Poland", "Warsaw, Indiana, United States"]);
    }

    #[test]
    fn test_components_flattened() {
        let suggestions = sample().into_suggestions();
        let components = &suggestions[0].components;
        assert_eq!(components.get("city").map(String::as_str), Some("Warsaw"));
        assert_eq!(components.get("population").map(String::as_str), Some("1790658"));
        assert_eq!(components.get("is_capital").map(String::as_str), Some("true"));
        assert!(!components.contains_key("ISO_3166-2"));
    }

    #[test]
    fn test_first_label() {
        assert_eq!(sample().first_label().as_deref(), Some("Warsaw, Poland"));

        let empty: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(empty.first_label(), None);
    }
}
