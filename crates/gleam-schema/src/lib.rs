//! Shared types for the Gleam release-hash manifest.
//!
//! Everything here is pure: platform classification, asset filtering,
//! version ordering and the manifest wire format. Network and process
//! access live in `gleam-core`.

pub mod asset_pattern;
/// Content hash newtype.
pub mod hash;
pub mod manifest;
/// Platform identifiers and the filename classifier.
pub mod platform;
pub mod version;

// Re-exports
pub use asset_pattern::{ArchiveFormat, is_hashable_archive};
pub use hash::SriHash;
pub use manifest::{Manifest, ManifestEntry, PlatformAsset};
pub use platform::*;
pub use version::{LATEST, NIGHTLY, VersionError, VersionKey};
