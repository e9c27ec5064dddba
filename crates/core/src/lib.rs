//! Core utilities for SaveMate
//!
//! This crate provides shared functionality used by the geocoder, the deals
//! crate and the CLI:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Rate limiting**: Token bucket for outbound provider calls
//! - **Client state**: Key-value store port with memory and file backends
//!
//! # Example
//!
//! ```rust,no_run
//! use savemate_core::config::Config;
//! use savemate_core::store::FileStore;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let store = FileStore::open_in(config.schema.storage.resolved_data_dir())
//!     .expect("store unavailable");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod store;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::store::{FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore};
}
