use anyhow::Result;
use async_trait::async_trait;

/// A release found in a remote source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Git tag, usually `v`-prefixed
    pub tag_name: String,
    /// Downloadable files, in listing order
    pub assets: Vec<AssetInfo>,
}

/// An asset attached to a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    /// Filename as published
    pub name: String,
    /// Direct download URL
    pub download_url: String,
}

/// A remote source that can list releases, newest first in its own order
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Unique identifier for this source instance (e.g. "github:gleam-lang/gleam")
    fn key(&self) -> String;

    /// Fetch releases in the source's native order
    async fn fetch_releases(&self) -> Result<Vec<ReleaseInfo>>;
}
