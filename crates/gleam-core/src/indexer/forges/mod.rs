//! Forge adapters for release listings.

/// GitHub REST adapter.
pub mod github;
/// Shared traits and types for forge adapters.
pub mod traits;
