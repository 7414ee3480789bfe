/// Forge adapters for release listings.
pub mod forges;
/// Content hash resolution.
pub mod hashing;
/// The nightly pseudo-version.
pub mod nightly;
/// Per-item build outcomes.
pub mod report;

pub use hashing::{HashError, HashOutcome, HashResolver, NixPrefetcher};
pub use nightly::{HttpProbe, ProbeError, UrlProbe};
pub use report::{BuildReport, ItemReport};

use anyhow::{Context, Result};
use gleam_schema::version::strip_tag_prefix;
use gleam_schema::{
    LATEST, Manifest, ManifestEntry, NIGHTLY, Platform, PlatformAsset, is_hashable_archive,
};

use crate::FetchConfig;
use forges::github::{GitHubReleases, build_client};
use forges::traits::{ReleaseInfo, ReleaseSource};

/// Knobs for [`build_manifest`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Nightly download base; `None` skips the nightly entry.
    pub nightly_base_url: Option<String>,
}

/// Build a fresh manifest from the release listing.
///
/// For each release (in listing order) every asset goes through the filter,
/// the platform classifier and the hash resolver. A version whose assets all
/// drop out gets no key. `latest` then aliases the first listed concrete
/// release, if that release survived, and the nightly entry is attached last.
///
/// A `nightly` release in the listing is skipped: that entry only ever comes
/// from the fixed nightly URLs.
///
/// # Errors
///
/// Only a failure to fetch the listing is an error. Per-asset failures are
/// recorded in the returned [`BuildReport`].
pub async fn build_manifest(
    source: &dyn ReleaseSource,
    resolver: &dyn HashResolver,
    probe: &dyn UrlProbe,
    options: &BuildOptions,
) -> Result<(Manifest, BuildReport)> {
    let releases = source
        .fetch_releases()
        .await
        .with_context(|| format!("Failed to list releases from {}", source.key()))?;

    tracing::info!("{} releases from {}", releases.len(), source.key());

    let mut manifest = Manifest::new();
    let mut report = BuildReport::default();

    let releases: Vec<&ReleaseInfo> = releases
        .iter()
        .filter(|r| {
            let rolling = strip_tag_prefix(&r.tag_name) == NIGHTLY;
            if rolling {
                tracing::debug!("Skipping listed {} release", r.tag_name);
            }
            !rolling
        })
        .collect();

    for release in &releases {
        let version = strip_tag_prefix(&release.tag_name);
        tracing::info!("Processing {version}");

        let entry = hash_release(version, release, resolver, &mut report).await;
        if entry.is_empty() {
            report.dropped_versions.push(version.to_string());
        } else {
            manifest.insert(version, entry);
        }
    }

    if let Some(first) = releases.first() {
        let version = strip_tag_prefix(&first.tag_name);
        if let Some(entry) = manifest.get(version).cloned() {
            manifest.insert(LATEST, entry);
            report.latest = Some(version.to_string());
        }
    }

    if let Some(base) = &options.nightly_base_url {
        tracing::info!("Processing {NIGHTLY}");
        match nightly::build_nightly(base, probe, resolver, &mut report).await {
            Some(entry) => {
                manifest.insert(NIGHTLY, entry);
                report.nightly_attached = true;
            }
            None => tracing::warn!("Failed to build nightly entry: no platform available"),
        }
    }

    Ok((manifest, report))
}

async fn hash_release(
    version: &str,
    release: &ReleaseInfo,
    resolver: &dyn HashResolver,
    report: &mut BuildReport,
) -> ManifestEntry {
    let mut entry = ManifestEntry::new();

    for asset in &release.assets {
        if !is_hashable_archive(&asset.name) {
            continue;
        }
        let Some(platform) = Platform::from_filename(&asset.name) else {
            tracing::debug!("{version}: no platform for {}", asset.name);
            continue;
        };

        let result = resolver.resolve(&asset.download_url).await;
        report.record(version, &asset.name, HashOutcome::from(&result));
        if let Ok(sha256) = result {
            entry.insert(
                platform,
                PlatformAsset {
                    url: asset.download_url.clone(),
                    sha256,
                },
            );
        }
    }

    entry
}

/// The `fetch` pipeline: list releases, hash, write the manifest.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched or the manifest cannot
/// be written.
pub async fn generate_manifest(config: &FetchConfig) -> Result<(Manifest, BuildReport)> {
    let client = build_client()?;
    let source = GitHubReleases::new(client.clone(), config.releases_url.clone());
    let resolver = NixPrefetcher::new(config.nix_program.clone());
    let probe = HttpProbe::new(client);
    let options = BuildOptions {
        nightly_base_url: config.nightly_base_url.clone(),
    };

    let (manifest, report) = build_manifest(&source, &resolver, &probe, &options).await?;
    report.log_summary();

    manifest.save(&config.manifest_path)?;
    tracing::info!(
        "Generated {} with {} entries",
        config.manifest_path.display(),
        manifest.len()
    );

    Ok((manifest, report))
}
