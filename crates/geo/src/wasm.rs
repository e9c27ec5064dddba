//! WASM bindings for the geo crate.
//!
//! Used by the browser map view and the deals list to filter deals around
//! the user's location without a round trip to the backend.

use crate::records::filter_json_records;
use crate::{haversine_distance, Coordinate};
use wasm_bindgen::prelude::*;

fn coordinate(lat: f64, lng: f64) -> Result<Coordinate, JsValue> {
    Coordinate::new(lat, lng).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Calculate distance between two coordinates in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, JsValue> {
    Ok(haversine_distance(&coordinate(lat1, lng1)?, &coordinate(lat2, lng2)?))
}

/// Filter deals around an optional user location.
///
/// # Arguments
/// * `deals_json` - JSON array of deal objects with `latitude`/`longitude`
/// * `user_lat` / `user_lng` - User location, both or neither
/// * `radius_km` - Radius in kilometers (unbounded when absent)
/// * `sort` - Order nearest-first
///
/// # Returns
/// JSON array of the surviving deals with a `distanceKm` field added
#[wasm_bindgen]
pub fn filter_deals(
    deals_json: &str,
    user_lat: Option<f64>,
    user_lng: Option<f64>,
    radius_km: Option<f64>,
    sort: bool,
) -> Result<String, JsValue> {
    let records: Vec<serde_json::Value> = serde_json::from_str(deals_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let origin = match (user_lat, user_lng) {
        (Some(lat), Some(lng)) => Some(coordinate(lat, lng)?),
        _ => None,
    };

    let results = filter_json_records(records, origin.as_ref(), radius_km, sort);

    serde_json::to_string(&results)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Human-readable distance label.
#[wasm_bindgen]
pub fn distance_label(km: f64) -> String {
    crate::format_distance(km)
}
