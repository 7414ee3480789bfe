//! The release-hash manifest (`gleam_hashes.json`).
//!
//! A flat JSON object mapping a version label to the platforms it ships
//! for, each with its download URL and content hash:
//!
//! ```json
//! {
//!   "1.4.1": {
//!     "aarch64-darwin": {
//!       "url": "https://github.com/gleam-lang/gleam/releases/download/v1.4.1/...",
//!       "sha256": "sha256-..."
//!     }
//!   }
//! }
//! ```
//!
//! Both levels keep insertion order so that rebuilding from an unchanged
//! release listing produces byte-identical output.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::SriHash;
use crate::platform::Platform;

/// Download location and content hash of one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformAsset {
    /// Direct download URL of the archive.
    pub url: String,
    /// Content hash as reported by the hash resolver.
    pub sha256: SriHash,
}

/// All platforms of one version, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestEntry {
    assets: Vec<(Platform, PlatformAsset)>,
}

impl ManifestEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the asset for `platform`, replacing an existing one in place.
    pub fn insert(&mut self, platform: Platform, asset: PlatformAsset) {
        upsert(&mut self.assets, platform, asset);
    }

    /// Asset for `platform`, if present.
    pub fn get(&self, platform: Platform) -> Option<&PlatformAsset> {
        self.assets.iter().find(|(p, _)| *p == platform).map(|(_, a)| a)
    }

    /// Whether `platform` is present.
    pub fn contains(&self, platform: Platform) -> bool {
        self.get(platform).is_some()
    }

    /// Platforms in insertion order.
    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.assets.iter().map(|(p, _)| *p)
    }

    /// Iterate `(platform, asset)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &PlatformAsset)> {
        self.assets.iter().map(|(p, a)| (*p, a))
    }

    /// Number of platforms.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True when no platform survived.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Version label to [`ManifestEntry`], in insertion order.
///
/// Labels are kept as plain strings: besides release versions the manifest
/// carries the `latest` alias and the `nightly` build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    entries: Vec<(String, ManifestEntry)>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry for `label`, replacing an existing one in place.
    pub fn insert(&mut self, label: impl Into<String>, entry: ManifestEntry) {
        upsert(&mut self.entries, label.into(), entry);
    }

    /// Entry for `label`, if present.
    pub fn get(&self, label: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, e)| e)
    }

    /// Whether `label` is present.
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Iterate `(label, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(l, e)| (l.as_str(), e))
    }

    /// Number of labels, aliases included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the manifest has no labels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize with 2-space indentation and no trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize manifest")
    }

    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid manifest (including
    /// unknown platform keys).
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse manifest")
    }

    /// Load a manifest from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Write the manifest to `path`, overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write manifest {}", path.display()))
    }
}

fn upsert<K: PartialEq, V>(items: &mut Vec<(K, V)>, key: K, value: V) {
    if let Some(slot) = items.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        items.push((key, value));
    }
}

fn serialize_pairs<S, K, V>(pairs: &[(K, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Serialize,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

/// Collects a JSON object into ordered pairs; a repeated key keeps its
/// first position and takes the last value.
struct PairsVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for PairsVisitor<K, V>
where
    K: Deserialize<'de> + PartialEq,
    V: Deserialize<'de>,
{
    type Value = Vec<(K, V)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<K, V>()? {
            upsert(&mut pairs, k, v);
        }
        Ok(pairs)
    }
}

impl Serialize for ManifestEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_pairs(&self.assets, serializer)
    }
}

impl<'de> Deserialize<'de> for ManifestEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let assets = deserializer.deserialize_map(PairsVisitor(PhantomData))?;
        Ok(Self { assets })
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_pairs(&self.entries, serializer)
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserializer.deserialize_map(PairsVisitor(PhantomData))?;
        Ok(Self { entries })
    }
}
