//! Deal records and client-side state for SaveMate
//!
//! - [`Deal`] normalization from the mixed shapes producers emit
//! - Nearby search over deals via [`NearbyQuery`]
//! - [`Favorites`] and [`SentEmailLog`] persisted through a
//!   [`savemate_core::store::KeyValueStore`]
//!
//! # Example
//!
//! ```rust
//! use savemate_deals::{parse_deals, NearbyQuery};
//! use savemate_geo::Coordinate;
//!
//! let deals = parse_deals(r#"[{"id": 1, "title": "Pierogi", "lat": 52.23, "lng": 21.01}]"#).unwrap();
//! let query = NearbyQuery {
//!     origin: Some(Coordinate::new(52.2297, 21.0122).unwrap()),
//!     radius_km: Some(5.0),
//!     sort_by_distance: true,
//! };
//! assert_eq!(query.run(&deals).len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod deal;
pub mod email_log;
pub mod error;
pub mod favorites;

pub use deal::{load_deals, parse_deals, Deal, NearbyQuery, RawDeal};
pub use email_log::{SentEmail, SentEmailLog};
pub use error::{DealError, DealResult};
pub use favorites::Favorites;
