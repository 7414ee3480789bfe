//! Release asset filtering.
//!
//! Releases ship signatures, checksums and SBOM documents next to the real
//! archives. Only the archives carry binaries worth hashing.

/// Marker found in the names of software-bill-of-materials side files.
const SBOM_MARKER: &str = "sbom";

/// Archive format identified from an asset filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive (`.tar.gz`).
    TarGz,
    /// Zip archive (`.zip`).
    Zip,
}

impl ArchiveFormat {
    /// Detect the archive format from the filename suffix.
    ///
    /// The suffix must match exactly; `.TAR.GZ` or `.tgz` are not archives
    /// as far as the manifest is concerned.
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".tar.gz") {
            Some(Self::TarGz)
        } else if filename.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Whether an asset should be classified and hashed.
///
/// True iff the name carries a recognized archive suffix and does not
/// contain the SBOM marker anywhere.
pub fn is_hashable_archive(filename: &str) -> bool {
    ArchiveFormat::from_filename(filename).is_some() && !filename.contains(SBOM_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_formats() {
        assert_eq!(
            ArchiveFormat::from_filename("gleam-v1.0.0-x86_64-apple-darwin.tar.gz"),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(
            ArchiveFormat::from_filename("gleam-v1.0.0-x86_64-pc-windows-msvc.zip"),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(ArchiveFormat::from_filename("gleam.tar.gz.sha256"), None);
        assert_eq!(ArchiveFormat::from_filename("gleam.tar.gz.sig"), None);
        assert_eq!(ArchiveFormat::from_filename("gleam.TAR.GZ"), None);
    }

    #[test]
    fn test_sbom_rejected() {
        assert!(!is_hashable_archive(
            "gleam-v1.0.0-x86_64-unknown-linux-musl.tar.gz.sbom.spdx.json"
        ));
        assert!(!is_hashable_archive("gleam-v1.0.0-sbom-x86_64-apple-darwin.tar.gz"));
        assert!(!is_hashable_archive("sbom.zip"));
    }

    #[test]
    fn test_archives_accepted() {
        assert!(is_hashable_archive("gleam-v1.0.0-aarch64-apple-darwin.tar.gz"));
        assert!(is_hashable_archive("gleam-v1.0.0-x86_64-pc-windows-msvc.zip"));
        assert!(!is_hashable_archive("gleam-v1.0.0-aarch64-apple-darwin.tar.gz.sha512"));
    }
}
