//! Version label parsing and display ordering.
//!
//! Manifest labels are not uniformly numeric: release candidates carry an
//! `-rcN` suffix and the rolling build is the literal `nightly`. Plain string
//! or numeric sorting gets these wrong, so every label is parsed into a
//! [`VersionKey`] and ordered through that.

use std::cmp::Ordering;

use thiserror::Error;

/// Manifest label aliasing the newest release in upstream order.
pub const LATEST: &str = "latest";

/// Manifest label of the rolling development build.
pub const NIGHTLY: &str = "nightly";

/// Suffix marking a release candidate (`1.2.0-rc3`).
const RC_MARKER: &str = "-rc";

/// Errors for labels whose shape the sorter does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Not `MAJOR.MINOR.PATCH`, `MAJOR.MINOR.PATCH-rcN` or `nightly`.
    #[error("Unrecognized version label '{0}': expected MAJOR.MINOR.PATCH[-rcN] or 'nightly'")]
    Unrecognized(String),

    /// The `-rc` suffix is not followed by a candidate number.
    #[error("Invalid release candidate number in '{0}'")]
    InvalidCandidate(String),
}

/// Strip the leading `v` (or `vv...`) from a release tag.
///
/// # Example
///
/// ```
/// use gleam_schema::version::strip_tag_prefix;
///
/// assert_eq!(strip_tag_prefix("v1.4.1"), "1.4.1");
/// assert_eq!(strip_tag_prefix("nightly"), "nightly");
/// ```
pub fn strip_tag_prefix(tag: &str) -> &str {
    tag.trim_start_matches('v')
}

/// Sort key of a manifest version label.
///
/// Ordering, lowest first: `Nightly`, then everything else by numeric
/// triple; within one triple every candidate sorts below the final release,
/// and candidate `n` below candidate `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionKey {
    /// A final release, `MAJOR.MINOR.PATCH`.
    Release([u64; 3]),
    /// A release candidate, `MAJOR.MINOR.PATCH-rcN`.
    ReleaseCandidate([u64; 3], u64),
    /// The rolling build.
    Nightly,
}

impl VersionKey {
    /// Parse a manifest label.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError`] for any label that is not exactly three
    /// dot-separated unsigned integers (optionally suffixed with `-rcN`) or
    /// the nightly label. `latest` is an alias, not a version, and is
    /// rejected as well.
    pub fn parse(label: &str) -> Result<Self, VersionError> {
        if label == NIGHTLY {
            return Ok(Self::Nightly);
        }

        match label.split_once(RC_MARKER) {
            Some((base, candidate)) => {
                let numeric = parse_triple(label, base)?;
                if !is_digits(candidate) {
                    return Err(VersionError::InvalidCandidate(label.to_string()));
                }
                let n = candidate
                    .parse()
                    .map_err(|_| VersionError::InvalidCandidate(label.to_string()))?;
                Ok(Self::ReleaseCandidate(numeric, n))
            }
            None => Ok(Self::Release(parse_triple(label, label)?)),
        }
    }

    fn numeric(&self) -> Option<&[u64; 3]> {
        match self {
            Self::Release(v) | Self::ReleaseCandidate(v, _) => Some(v),
            Self::Nightly => None,
        }
    }

    /// Rank within a numeric triple: candidates `(0, n)`, final `(1, 0)`.
    fn stage(&self) -> (u8, u64) {
        match self {
            Self::ReleaseCandidate(_, n) => (0, *n),
            Self::Release(_) | Self::Nightly => (1, 0),
        }
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b).then_with(|| self.stage().cmp(&other.stage())),
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::str::FromStr for VersionKey {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_triple(label: &str, base: &str) -> Result<[u64; 3], VersionError> {
    let unrecognized = || VersionError::Unrecognized(label.to_string());

    let mut parts = base.split('.');
    let mut triple = [0u64; 3];
    for slot in &mut triple {
        let part = parts.next().filter(|p| is_digits(p)).ok_or_else(unrecognized)?;
        *slot = part.parse().map_err(|_| unrecognized())?;
    }
    if parts.next().is_some() {
        return Err(unrecognized());
    }
    Ok(triple)
}

/// Sort labels newest first.
///
/// # Errors
///
/// Fails on the first label [`VersionKey::parse`] rejects; a partially
/// sorted list is never returned.
pub fn sort_descending<I, S>(labels: I) -> Result<Vec<String>, VersionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keyed = labels
        .into_iter()
        .map(|label| {
            let label = label.as_ref();
            VersionKey::parse(label).map(|key| (key, label.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(keyed.into_iter().map(|(_, label)| label).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mixed_labels() {
        let sorted =
            sort_descending(["1.2.0", "1.1.0-rc1", "1.1.0", "nightly", "1.1.0-rc2"]).unwrap();
        assert_eq!(sorted, ["1.2.0", "1.1.0", "1.1.0-rc2", "1.1.0-rc1", "nightly"]);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let sorted = sort_descending(["0.9.0", "0.10.0", "0.10.0-rc10", "0.10.0-rc9"]).unwrap();
        assert_eq!(sorted, ["0.10.0", "0.10.0-rc10", "0.10.0-rc9", "0.9.0"]);
    }

    #[test]
    fn test_candidate_of_newer_base_beats_older_release() {
        let rc = VersionKey::parse("2.0.0-rc1").unwrap();
        let old = VersionKey::parse("1.99.99").unwrap();
        assert!(rc > old);
    }

    #[test]
    fn test_nightly_sorts_last() {
        let nightly = VersionKey::parse("nightly").unwrap();
        assert!(nightly < VersionKey::parse("0.0.0-rc0").unwrap());
        assert!(nightly < VersionKey::parse("0.0.1").unwrap());
    }

    #[test]
    fn test_parse_shapes() {
        assert_eq!(VersionKey::parse("1.4.1").unwrap(), VersionKey::Release([1, 4, 1]));
        assert_eq!(
            VersionKey::parse("1.5.0-rc2").unwrap(),
            VersionKey::ReleaseCandidate([1, 5, 0], 2)
        );
    }

    #[test]
    fn test_unrecognized_labels_fail() {
        for label in ["latest", "1.2", "1.2.3.4", "1.2.x", "v1.2.3", "1.2.3-beta1", ""] {
            assert_eq!(
                VersionKey::parse(label),
                Err(VersionError::Unrecognized(label.to_string())),
                "{label}"
            );
        }
        assert_eq!(
            VersionKey::parse("1.2.3-rc"),
            Err(VersionError::InvalidCandidate("1.2.3-rc".to_string()))
        );
        assert_eq!(
            VersionKey::parse("1.2.3-rc1a"),
            Err(VersionError::InvalidCandidate("1.2.3-rc1a".to_string()))
        );
        assert!(sort_descending(["1.0.0", "1.0"]).is_err());
    }

    #[test]
    fn test_strip_tag_prefix() {
        assert_eq!(strip_tag_prefix("v1.0.0-rc1"), "1.0.0-rc1");
        assert_eq!(strip_tag_prefix("vv0.1.0"), "0.1.0");
        assert_eq!(strip_tag_prefix("1.0.0"), "1.0.0");
    }
}
