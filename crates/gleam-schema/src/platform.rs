/// Normalized OS/architecture identifier for a prebuilt Gleam archive.
///
/// The manifest only knows these four combinations. Release assets built
/// for anything else (Windows, glibc Linux, ...) classify as unknown and
/// never reach the manifest.
///
/// # Example
///
/// ```
/// use gleam_schema::Platform;
///
/// let p = Platform::from_filename("gleam-v1.4.1-x86_64-unknown-linux-musl.tar.gz");
/// assert_eq!(p, Some(Platform::X86_64Linux));
/// assert_eq!(p.unwrap().as_str(), "x86_64-linux");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Platform {
    /// Apple Silicon macOS.
    #[serde(rename = "aarch64-darwin")]
    Aarch64Darwin,
    /// ARM64 Linux (static musl build).
    #[serde(rename = "aarch64-linux")]
    Aarch64Linux,
    /// Intel macOS.
    #[serde(rename = "x86_64-darwin")]
    X86_64Darwin,
    /// `x86_64` Linux (static musl build).
    #[serde(rename = "x86_64-linux")]
    X86_64Linux,
}

impl Platform {
    /// Every platform, in classifier scan order.
    pub const ALL: [Platform; 4] = [
        Self::Aarch64Darwin,
        Self::Aarch64Linux,
        Self::X86_64Darwin,
        Self::X86_64Linux,
    ];

    /// Manifest key for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aarch64Darwin => "aarch64-darwin",
            Self::Aarch64Linux => "aarch64-linux",
            Self::X86_64Darwin => "x86_64-darwin",
            Self::X86_64Linux => "x86_64-linux",
        }
    }

    /// Rust target triple used in release asset filenames.
    pub fn target_triple(&self) -> &'static str {
        match self {
            Self::Aarch64Darwin => "aarch64-apple-darwin",
            Self::Aarch64Linux => "aarch64-unknown-linux-musl",
            Self::X86_64Darwin => "x86_64-apple-darwin",
            Self::X86_64Linux => "x86_64-unknown-linux-musl",
        }
    }

    /// Classify a release asset by its filename.
    ///
    /// Scans [`Platform::ALL`] in order and returns the first platform whose
    /// target triple occurs in `filename`. Matching is case-sensitive and
    /// exact; `None` means the asset belongs to no supported platform.
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| filename.contains(p.target_triple()))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
