//! Per-item outcomes of a manifest build.
//!
//! Partial failures never abort a build. Instead every hash attempt ends up
//! here, so the caller decides what to log and tests can assert on exactly
//! what was omitted and why.

use super::hashing::HashOutcome;

/// Outcome for one asset (or one nightly platform) of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Version label the item belongs to.
    pub version: String,
    /// Asset filename, or the platform key for nightly items.
    pub subject: String,
    /// Hash, or the reason the item was left out.
    pub outcome: HashOutcome,
}

/// Everything a manifest build attempted, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// One record per hash attempt or nightly probe.
    pub items: Vec<ItemReport>,
    /// Versions left out because no asset survived.
    pub dropped_versions: Vec<String>,
    /// Version aliased as `latest`, if any.
    pub latest: Option<String>,
    /// Whether a `nightly` entry made it into the manifest.
    pub nightly_attached: bool,
}

impl BuildReport {
    /// Append the outcome for one item.
    pub fn record(&mut self, version: &str, subject: &str, outcome: HashOutcome) {
        self.items.push(ItemReport {
            version: version.to_string(),
            subject: subject.to_string(),
            outcome,
        });
    }

    /// Items that did not make it into the manifest.
    pub fn omitted(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| !i.outcome.is_resolved())
    }

    /// Number of items that got a hash.
    pub fn resolved_count(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_resolved()).count()
    }

    /// Log omissions as warnings and a one-line summary.
    pub fn log_summary(&self) {
        for item in self.omitted() {
            if let HashOutcome::Omitted(reason) = &item.outcome {
                tracing::warn!("{} {}: omitted: {reason}", item.version, item.subject);
            }
        }

        for version in &self.dropped_versions {
            tracing::info!("{version}: no usable assets, skipped");
        }

        match &self.latest {
            Some(version) => tracing::info!("latest -> {version}"),
            None => tracing::warn!("no latest alias (newest release has no usable assets)"),
        }

        tracing::info!(
            "{} hashes resolved, {} omitted",
            self.resolved_count(),
            self.omitted().count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleam_schema::SriHash;

    #[test]
    fn test_counts() {
        let mut report = BuildReport::default();
        report.record("1.0.0", "a.tar.gz", HashOutcome::Resolved(SriHash::new("sha256-a")));
        report.record("1.0.0", "b.zip", HashOutcome::Omitted("timeout".into()));
        report.record("nightly", "x86_64-linux", HashOutcome::Omitted("HTTP 404".into()));

        assert_eq!(report.resolved_count(), 1);
        let omitted: Vec<&str> = report.omitted().map(|i| i.subject.as_str()).collect();
        assert_eq!(omitted, ["b.zip", "x86_64-linux"]);
    }
}
