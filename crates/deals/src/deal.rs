//! Deal records
//!
//! Deals arrive from several producers that disagree on field names and
//! types. [`RawDeal`] accepts every known shape; [`RawDeal::normalize`]
//! turns it into the canonical [`Deal`].

use crate::error::{DealError, DealResult};
use chrono::{DateTime, NaiveDate, Utc};
use savemate_core::config::SearchSettings;
use savemate_geo::{filter_by_radius, filter_by_radius_sorted, Coordinate, FilterResult, Located};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// A deal as received, before normalization
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDeal {
    /// Numeric or string id
    pub id: Option<Value>,
    /// Headline
    pub title: Option<String>,
    /// Longer text
    pub description: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Seller name
    #[serde(alias = "businessName")]
    pub business_name: Option<String>,
    /// Price before discount, number or numeric string
    #[serde(alias = "originalPrice")]
    pub original_price: Option<Value>,
    /// Price after discount, number or numeric string
    #[serde(alias = "discountedPrice")]
    pub discounted_price: Option<Value>,
    /// Picture URL
    #[serde(alias = "image", alias = "imageUrl")]
    pub image_url: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Latitude, number or numeric string
    #[serde(alias = "lat")]
    pub latitude: Option<Value>,
    /// Longitude, number or numeric string
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<Value>,
    /// RFC 3339 timestamp or plain date
    #[serde(alias = "expiresAt")]
    pub expires_at: Option<String>,
}

/// A normalized deal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    /// Stable id, numeric ids rendered as strings
    pub id: String,
    /// Headline
    pub title: String,
    /// Longer text
    pub description: Option<String>,
    /// Lowercased category slug
    pub category: Option<String>,
    /// Seller name
    pub business_name: Option<String>,
    /// Price before discount
    pub original_price: Option<f64>,
    /// Price after discount
    pub discounted_price: Option<f64>,
    /// Picture URL
    pub image_url: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Latitude in degrees, unvalidated
    pub latitude: Option<f64>,
    /// Longitude in degrees, unvalidated
    pub longitude: Option<f64>,
    /// End of validity
    pub expires_at: Option<DateTime<Utc>>,
}

impl RawDeal {
    /// Produce the canonical record
    ///
    /// # Errors
    /// [`DealError::MissingField`] when the id or title is absent or blank.
    pub fn normalize(self) -> DealResult<Deal> {
        let id = self.id.as_ref().and_then(id_string).ok_or(DealError::MissingField("id"))?;
        let title = non_blank(self.title).ok_or(DealError::MissingField("title"))?;

        Ok(Deal {
            id,
            title,
            description: non_blank(self.description),
            category: non_blank(self.category).map(|c| c.to_lowercase()),
            business_name: non_blank(self.business_name),
            original_price: self.original_price.as_ref().and_then(number),
            discounted_price: self.discounted_price.as_ref().and_then(number),
            image_url: non_blank(self.image_url),
            address: non_blank(self.address),
            latitude: self.latitude.as_ref().and_then(number),
            longitude: self.longitude.as_ref().and_then(number),
            expires_at: self.expires_at.as_deref().and_then(parse_expiry),
        })
    }
}

impl Deal {
    /// Whole-percent saving for the discount badge
    ///
    /// `None` unless both prices are known and the discounted price is lower.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        let discounted = self.discounted_price?;
        if original <= 0.0 || discounted < 0.0 || discounted >= original {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(((1.0 - discounted / original) * 100.0).round() as u32)
    }

    /// Whether the deal expired before `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}

impl Located for Deal {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    // Date-only values expire at the end of that day
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc());
    if parsed.is_none() {
        debug!(value = raw, "Ignoring unparseable expiry");
    }
    parsed
}

/// Parse a deals document
///
/// Accepts a top-level array or an object with a `deals` array. Records that
/// cannot be normalized are skipped with a warning.
///
/// # Errors
/// Fails only when the document itself is malformed.
pub fn parse_deals(json: &str) -> DealResult<Vec<Deal>> {
    let document: Value = serde_json::from_str(json)?;
    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("deals") {
            Some(Value::Array(records)) => records,
            _ => return Err(DealError::NotAnArray),
        },
        _ => return Err(DealError::NotAnArray),
    };
    Ok(normalize_records(records))
}

/// Read and parse a deals file
///
/// # Errors
/// See [`parse_deals`]; also fails when the file cannot be read.
pub fn load_deals(path: impl AsRef<Path>) -> DealResult<Vec<Deal>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DealError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let deals = parse_deals(&content)?;
    debug!(path = %path.display(), count = deals.len(), "Loaded deals");
    Ok(deals)
}

fn normalize_records(records: Vec<Value>) -> Vec<Deal> {
    let total = records.len();
    let deals: Vec<Deal> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let normalized = serde_json::from_value::<RawDeal>(record)
                .map_err(DealError::from)
                .and_then(RawDeal::normalize);
            match normalized {
                Ok(deal) => Some(deal),
                Err(e) => {
                    warn!(index, error = %e, "Skipping deal record");
                    None
                }
            }
        })
        .collect();

    if deals.len() < total {
        warn!(kept = deals.len(), skipped = total - deals.len(), "Some deal records were skipped");
    }
    deals
}

/// Parameters of a nearby-deals search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    /// Reference point; `None` disables filtering
    pub origin: Option<Coordinate>,
    /// Maximum distance in kilometers; `None` means unbounded
    pub radius_km: Option<f64>,
    /// Order nearest first
    pub sort_by_distance: bool,
}

impl NearbyQuery {
    /// Query with the configured defaults around `origin`
    #[must_use]
    pub fn from_settings(settings: &SearchSettings, origin: Option<Coordinate>) -> Self {
        Self {
            origin,
            radius_km: Some(settings.default_radius_km),
            sort_by_distance: settings.sort_by_distance,
        }
    }

    /// Deals matching this query, each with its distance
    #[must_use]
    pub fn run<'a>(&self, deals: &'a [Deal]) -> Vec<FilterResult<'a, Deal>> {
        if self.sort_by_distance {
            filter_by_radius_sorted(deals, self.origin.as_ref(), self.radius_km)
        } else {
            filter_by_radius(deals, self.origin.as_ref(), self.radius_km)
        }
    }
}
