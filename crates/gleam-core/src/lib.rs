//! Pipelines behind `gleam-pkg`: the manifest builder and the README
//! renderer.

pub mod config;
/// Release listing, hashing and manifest assembly.
pub mod indexer;
pub mod readme;

pub use config::{FetchConfig, ReadmeConfig};

/// User Agent string sent with every request
pub const USER_AGENT: &str = concat!("gleam-pkg/", env!("CARGO_PKG_VERSION"));
