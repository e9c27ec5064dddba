//! Radius filtering over untyped JSON records.
//!
//! The browser hands deals over as plain JSON objects. A record is located
//! when it has `latitude` and `longitude` (or `lat` / `lng`) fields holding
//! numbers or numeric strings.

use crate::{filter_by_radius, sort_by_distance, Coordinate, Located};
use serde_json::{Map, Value};

/// A JSON object viewed as a possibly located record.
#[derive(Debug, Clone)]
pub struct JsonRecord(pub Value);

impl Located for JsonRecord {
    fn coordinate(&self) -> Option<Coordinate> {
        let lat = number_field(&self.0, &["latitude", "lat"]);
        let lng = number_field(&self.0, &["longitude", "lng", "lon"]);
        Coordinate::from_parts(lat, lng)
    }
}

fn number_field(value: &Value, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|name| match value.get(*name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Filter JSON records and attach a `distanceKm` field to each survivor.
///
/// `distanceKm` is `null` when no origin is given. Non-object records that
/// are located are wrapped as `{"record": ..., "distanceKm": ...}`.
pub fn filter_json_records(
    records: Vec<Value>,
    origin: Option<&Coordinate>,
    radius_km: Option<f64>,
    sort: bool,
) -> Vec<Value> {
    let records: Vec<JsonRecord> = records.into_iter().map(JsonRecord).collect();
    let mut results = filter_by_radius(&records, origin, radius_km);
    if sort {
        sort_by_distance(&mut results);
    }

    results
        .into_iter()
        .map(|result| {
            let distance = result.distance_km.map_or(Value::Null, Value::from);
            match &result.entity.0 {
                Value::Object(fields) => {
                    let mut fields = fields.clone();
                    fields.insert("distanceKm".to_string(), distance);
                    Value::Object(fields)
                }
                other => {
                    let mut wrapper = Map::new();
                    wrapper.insert("record".to_string(), other.clone());
                    wrapper.insert("distanceKm".to_string(), distance);
                    Value::Object(wrapper)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_field_shapes() {
        assert!(JsonRecord(json!({"latitude": 52.2, "longitude": 21.0})).coordinate().is_some());
        assert!(JsonRecord(json!({"lat": "52.2", "lng": " 21.0 "})).coordinate().is_some());
        assert!(JsonRecord(json!({"latitude": null, "longitude": 21.0})).coordinate().is_none());
        assert!(JsonRecord(json!({"latitude": "abc", "longitude": 21.0})).coordinate().is_none());
        assert!(JsonRecord(json!({"title": "no location"})).coordinate().is_none());
    }

    #[test]
    fn test_filter_attaches_distance() {
        let warsaw = Coordinate::new(52.2297, 21.0122).unwrap();
        let records = vec![
            json!({"id": 1, "latitude": 50.0647, "longitude": 19.9450}),
            json!({"id": 2, "latitude": 52.2297, "longitude": 21.0122}),
            json!({"id": 3}),
        ];

        let out = filter_json_records(records, Some(&warsaw), Some(300.0), true);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], 2);
        assert_eq!(out[0]["distanceKm"], 0.0);
        assert_eq!(out[1]["id"], 1);
    }

    #[test]
    fn test_no_origin_null_distance() {
        let records = vec![json!({"id": 7, "lat": 1.0, "lng": 2.0})];
        let out = filter_json_records(records, None, None, false);
        assert_eq!(out[0]["distanceKm"], Value::Null);
    }
}
