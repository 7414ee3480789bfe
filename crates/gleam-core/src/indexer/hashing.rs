use std::path::PathBuf;

use async_trait::async_trait;
use gleam_schema::SriHash;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;

/// Why a hash could not be resolved.
#[derive(Error, Debug)]
pub enum HashError {
    /// The prefetch program is not on `PATH`.
    #[error("'{0}' not found. Install Nix or pass --nix-program")]
    ProgramNotFound(String),

    /// The prefetch program exists but could not be started.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The prefetch program exited non-zero (download failed, 404, ...).
    #[error("Failed to fetch {url}: {stderr}")]
    Failed {
        /// URL being hashed.
        url: String,
        /// Trimmed stderr of the program.
        stderr: String,
    },

    /// Output was not the expected JSON document.
    #[error("Could not parse JSON output: {0}")]
    Parse(#[from] serde_json::Error),

    /// The reported hash is not a valid `sha256-` SRI string.
    #[error("{0}")]
    InvalidHash(String),
}

/// Computes the content hash of a remote file.
#[async_trait]
pub trait HashResolver: Send + Sync {
    /// Hash the file at `url`.
    async fn resolve(&self, url: &str) -> Result<SriHash, HashError>;
}

/// Result of resolving one item, kept in the build report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOutcome {
    /// Hash obtained; the item is in the manifest.
    Resolved(SriHash),
    /// Item left out, with the reason.
    Omitted(String),
}

impl HashOutcome {
    /// Whether the item made it into the manifest.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl From<&Result<SriHash, HashError>> for HashOutcome {
    fn from(result: &Result<SriHash, HashError>) -> Self {
        match result {
            Ok(hash) => Self::Resolved(hash.clone()),
            Err(e) => Self::Omitted(e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrefetchOutput {
    hash: String,
}

/// Parse the `--json` output of `nix store prefetch-file`.
///
/// Only the `hash` field is used; the hash string is kept verbatim.
///
/// # Errors
///
/// Returns [`HashError::Parse`] for malformed JSON or a missing `hash`
/// field, and [`HashError::InvalidHash`] if the value is not an SRI hash.
pub fn parse_prefetch_output(stdout: &str) -> Result<SriHash, HashError> {
    let output: PrefetchOutput = serde_json::from_str(stdout.trim())?;
    SriHash::validated(&output.hash).map_err(HashError::InvalidHash)
}

/// Algorithm requested from the prefetcher. The manifest field is named
/// after it, so it is not configurable.
const HASH_TYPE: &str = "sha256";

/// Resolves hashes with `nix store prefetch-file`, which downloads the file
/// into the Nix store and reports its SRI hash.
#[derive(Debug, Clone)]
pub struct NixPrefetcher {
    program: PathBuf,
}

impl NixPrefetcher {
    /// Use `program` in place of `nix`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NixPrefetcher {
    fn default() -> Self {
        Self::new("nix")
    }
}

#[async_trait]
impl HashResolver for NixPrefetcher {
    async fn resolve(&self, url: &str) -> Result<SriHash, HashError> {
        let program = self.program.display().to_string();

        let output = match Command::new(&self.program)
            .args(["store", "prefetch-file", "--json", "--hash-type", HASH_TYPE])
            .arg(url)
            .output()
            .await
        {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HashError::ProgramNotFound(program));
            }
            Err(source) => return Err(HashError::Spawn { program, source }),
        };

        if !output.status.success() {
            return Err(HashError::Failed {
                url: url.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_prefetch_output(&String::from_utf8_lossy(&output.stdout))
    }
}
