//! The `nightly` pseudo-version.
//!
//! Nightly archives are not taken from the releases listing. Each supported
//! platform has a fixed download URL under the nightly base; a platform is
//! included only if that URL answers a HEAD request with 200 and then
//! hashes successfully.

use async_trait::async_trait;
use gleam_schema::{ManifestEntry, NIGHTLY, Platform, PlatformAsset};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::hashing::{HashOutcome, HashResolver};
use super::report::BuildReport;

/// Why a nightly URL was considered absent.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The request itself failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The final response was not `200 OK`.
    #[error("{url} returned {status}")]
    Status {
        /// Probed URL.
        url: String,
        /// Final status after redirects.
        status: StatusCode,
    },
}

/// Existence check for a download URL.
#[async_trait]
pub trait UrlProbe: Send + Sync {
    /// `Ok` if `url` exists.
    async fn probe(&self, url: &str) -> Result<(), ProbeError>;
}

/// HEAD request; redirects are followed by the client, and only a final
/// `200 OK` counts as present.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Probe through `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let resp = self.client.head(url).send().await?;
        if resp.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(ProbeError::Status {
                url: url.to_string(),
                status: resp.status(),
            })
        }
    }
}

/// Download URL of the nightly archive for `platform`.
///
/// # Example
///
/// ```
/// use gleam_core::indexer::nightly::nightly_url;
/// use gleam_schema::Platform;
///
/// assert_eq!(
///     nightly_url("https://example.com/nightly/", Platform::X86_64Linux),
///     "https://example.com/nightly/gleam-nightly-x86_64-unknown-linux-musl.tar.gz"
/// );
/// ```
pub fn nightly_url(base: &str, platform: Platform) -> String {
    format!(
        "{}/gleam-nightly-{}.tar.gz",
        base.trim_end_matches('/'),
        platform.target_triple()
    )
}

/// Assemble the nightly entry, one probe and one hash per platform.
///
/// Every failure is recorded in `report` and skips only that platform.
/// Returns `None` when no platform survives.
pub async fn build_nightly(
    base: &str,
    probe: &dyn UrlProbe,
    resolver: &dyn HashResolver,
    report: &mut BuildReport,
) -> Option<ManifestEntry> {
    let mut entry = ManifestEntry::new();

    for platform in Platform::ALL {
        let url = nightly_url(base, platform);

        if let Err(e) = probe.probe(&url).await {
            report.record(NIGHTLY, platform.as_str(), HashOutcome::Omitted(e.to_string()));
            continue;
        }

        let result = resolver.resolve(&url).await;
        report.record(NIGHTLY, platform.as_str(), HashOutcome::from(&result));
        if let Ok(sha256) = result {
            entry.insert(platform, PlatformAsset { url, sha256 });
        }
    }

    if entry.is_empty() { None } else { Some(entry) }
}
