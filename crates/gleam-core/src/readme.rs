//! README generation from the manifest.
//!
//! Three markdown fragments are built from the manifest (a versions table,
//! a platform list and a version × platform support matrix) and substituted
//! into a Handlebars template under the names `versions_table`,
//! `platforms_list` and `platform_version_matrix`.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result};
use gleam_schema::version::sort_descending;
use gleam_schema::{LATEST, Manifest, Platform};
use handlebars::Handlebars;
use serde::Serialize;

use crate::ReadmeConfig;

const SUPPORTED: &str = "✅";
const UNSUPPORTED: &str = "❌";

/// Concrete version labels (everything but `latest`), newest first.
///
/// # Errors
///
/// Fails if a label has a shape the version sorter does not understand.
pub fn display_versions(manifest: &Manifest) -> Result<Vec<String>> {
    let labels = manifest.labels().filter(|l| *l != LATEST);
    Ok(sort_descending(labels)?)
}

/// Every platform that appears anywhere in the manifest, sorted.
pub fn supported_platforms(manifest: &Manifest) -> Vec<Platform> {
    let platforms: BTreeSet<Platform> = manifest
        .iter()
        .flat_map(|(_, entry)| entry.platforms())
        .collect();
    platforms.into_iter().collect()
}

/// Package attribute name for a version label.
///
/// ```
/// use gleam_core::readme::package_name;
///
/// assert_eq!(package_name("gleam", "1.5.0-rc2"), "gleam-1_5_0_rc2");
/// ```
pub fn package_name(prefix: &str, label: &str) -> String {
    format!("{prefix}-{}", label.replace(['.', '-'], "_"))
}

/// Versions table with a trailing `latest` alias row.
///
/// `versions` must be sorted newest first and non-empty; the alias row names
/// `versions[0]`.
pub fn versions_table(versions: &[String], prefix: &str) -> String {
    let mut table = String::from("| Version | Package Name |\n|---------|-------------|\n");

    for version in versions {
        let _ = writeln!(table, "| `{version}` | `{}` |", package_name(prefix, version));
    }

    if let Some(newest) = versions.first() {
        let _ = writeln!(
            table,
            "| `{LATEST}` | `{prefix}-{LATEST}` (alias for `{newest}`) |"
        );
    }

    table
}

/// Bullet list of platforms, without a trailing newline.
pub fn platforms_list(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| format!("- `{p}`"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Support matrix: one row per version, one column per platform.
pub fn platform_version_matrix(
    manifest: &Manifest,
    versions: &[String],
    platforms: &[Platform],
) -> String {
    let mut table = String::from("| Version |");
    for platform in platforms {
        let _ = write!(table, " {platform} |");
    }
    table.push('\n');

    table.push_str("|---------|");
    for _ in platforms {
        table.push_str("---------|");
    }
    table.push('\n');

    for version in versions {
        let entry = manifest.get(version);
        let _ = write!(table, "| `{version}` |");
        for platform in platforms {
            let mark = if entry.is_some_and(|e| e.contains(*platform)) {
                SUPPORTED
            } else {
                UNSUPPORTED
            };
            let _ = write!(table, " {mark} |");
        }
        table.push('\n');
    }

    table
}

#[derive(Debug, Serialize)]
struct ReadmeContext {
    versions_table: String,
    platforms_list: String,
    platform_version_matrix: String,
}

/// Render the README text from a manifest and a template.
///
/// # Errors
///
/// Fails if the manifest has no concrete version, a label cannot be sorted,
/// or the template does not parse or references an unknown placeholder.
pub fn render_readme(manifest: &Manifest, template: &str, prefix: &str) -> Result<String> {
    let versions = display_versions(manifest)?;
    if versions.is_empty() {
        anyhow::bail!("Manifest has no versions to document");
    }
    let platforms = supported_platforms(manifest);

    let context = ReadmeContext {
        versions_table: versions_table(&versions, prefix),
        platforms_list: platforms_list(&platforms),
        platform_version_matrix: platform_version_matrix(manifest, &versions, &platforms),
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .render_template(template, &context)
        .map_err(|e| anyhow::anyhow!("Failed to render README template: {e}"))
}

/// What [`generate_readme`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeSummary {
    /// Concrete versions documented.
    pub versions: usize,
    /// Distinct platforms across the manifest.
    pub platforms: usize,
}

/// The `readme` pipeline: load manifest and template, render, overwrite the
/// output file.
///
/// # Errors
///
/// Returns an error if any file cannot be read or written, or rendering
/// fails.
pub fn generate_readme(config: &ReadmeConfig) -> Result<ReadmeSummary> {
    let manifest = Manifest::load(&config.manifest_path)?;
    let template = fs::read_to_string(&config.template_path).with_context(|| {
        format!("Failed to read template {}", config.template_path.display())
    })?;

    let content = render_readme(&manifest, &template, &config.package_prefix)?;
    fs::write(&config.output_path, content)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    let summary = ReadmeSummary {
        versions: display_versions(&manifest)?.len(),
        platforms: supported_platforms(&manifest).len(),
    };
    tracing::info!(
        "Generated {} with {} versions and {} platforms",
        config.output_path.display(),
        summary.versions,
        summary.platforms
    );

    Ok(summary)
}
