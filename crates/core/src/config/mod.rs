//! Configuration loading and schema definitions
//!
//! Settings shared by the geocoder, the deals search and the client store.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
