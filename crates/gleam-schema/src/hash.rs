use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

const SHA256_PREFIX: &str = "sha256";
const SHA256_LEN: usize = 32;

/// Newtype for an SRI-style content hash (`sha256-<base64>`).
///
/// This is the format `nix store prefetch-file --json` reports. The string
/// is stored exactly as received: the manifest must carry the resolver's
/// output without any re-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SriHash(String);

impl SriHash {
    /// Create a new `SriHash` without validation (for manifest/deserialized data).
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Create a validated `SriHash`.
    ///
    /// The algorithm prefix must be `sha256` and the base64 payload must
    /// decode to a 32-byte digest.
    ///
    /// # Errors
    ///
    /// Returns an error string describing the first problem found.
    pub fn validated(s: &str) -> Result<Self, String> {
        let Some((algo, payload)) = s.split_once('-') else {
            return Err(format!("Invalid SRI hash: missing algorithm prefix in '{s}'"));
        };

        if algo != SHA256_PREFIX {
            return Err(format!("Invalid SRI hash: unsupported algorithm '{algo}'"));
        }

        let digest = STANDARD
            .decode(payload)
            .map_err(|e| format!("Invalid SRI hash: bad base64 in '{s}': {e}"))?;

        if digest.len() != SHA256_LEN {
            return Err(format!(
                "Invalid SRI hash: expected {SHA256_LEN} digest bytes, got {}",
                digest.len()
            ));
        }

        Ok(Self(s.to_string()))
    }

    /// Return the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SriHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SriHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SriHash {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SriHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

    #[test]
    fn test_validated_accepts_sha256() {
        let h = SriHash::validated(GOOD).unwrap();
        assert_eq!(h.as_str(), GOOD);
    }

    #[test]
    fn test_validated_rejects_garbage() {
        assert!(SriHash::validated("47DEQpj8HBSa").is_err());
        assert!(SriHash::validated("md5-1B2M2Y8AsgTpgAmY7PhCfg==").is_err());
        assert!(SriHash::validated("sha1-2jmj7l5rSw0yVb/vlWAYkK/YBwk=").is_err());
        assert!(SriHash::validated("sha256-not*base64").is_err());
        // sha256 prefix with a sha1-sized payload
        assert!(SriHash::validated("sha256-2jmj7l5rSw0yVb/vlWAYkK/YBwk=").is_err());
    }

    #[test]
    fn test_serializes_transparently() {
        let h = SriHash::new(GOOD);
        assert_eq!(serde_json::to_string(&h).unwrap(), format!("\"{GOOD}\""));
    }
}
