//! Pipeline configuration.
//!
//! Every path and endpoint the pipelines touch is passed in explicitly, so
//! both can run against temporary directories and mock servers. The
//! defaults are the repository-relative locations used by the scheduled job.

use std::path::PathBuf;

/// GitHub releases listing for the Gleam compiler.
pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/gleam-lang/gleam/releases";

/// Download base of the rolling `nightly` release.
pub const DEFAULT_NIGHTLY_BASE_URL: &str =
    "https://github.com/gleam-lang/gleam/releases/download/nightly";

/// Manifest written by `fetch` and read by `readme`.
pub const DEFAULT_MANIFEST_PATH: &str = "gleam_hashes.json";

/// README template.
pub const DEFAULT_TEMPLATE_PATH: &str = "doc_templates/README.md.hbs";

/// Rendered README.
pub const DEFAULT_README_PATH: &str = "README.md";

/// Prefix of generated package names (`gleam-1_4_1`).
pub const DEFAULT_PACKAGE_PREFIX: &str = "gleam";

/// Settings for the manifest-building pipeline.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Releases listing endpoint.
    pub releases_url: String,
    /// Nightly download base; `None` skips the nightly entry.
    pub nightly_base_url: Option<String>,
    /// Where the manifest is written.
    pub manifest_path: PathBuf,
    /// Hashing program (normally `nix`).
    pub nix_program: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            nightly_base_url: Some(DEFAULT_NIGHTLY_BASE_URL.to_string()),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            nix_program: PathBuf::from("nix"),
        }
    }
}

/// Settings for the README rendering pipeline.
#[derive(Debug, Clone)]
pub struct ReadmeConfig {
    /// Manifest to document.
    pub manifest_path: PathBuf,
    /// Handlebars template.
    pub template_path: PathBuf,
    /// Rendered README, overwritten on success.
    pub output_path: PathBuf,
    /// Prefix of generated package names.
    pub package_prefix: String,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output_path: PathBuf::from(DEFAULT_README_PATH),
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
        }
    }
}
