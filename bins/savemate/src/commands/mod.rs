//! CLI command implementations

pub mod distance;
pub mod favorites;
pub mod nearby;
pub mod suggest;
pub mod whereami;
