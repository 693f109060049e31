//! Two-tier catalog cache: an in-memory map in front of a durable key/value
//! store holding JSON records with a timestamp and schema version.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dat::ReferenceEntry;
use crate::error::DatError;
use crate::util::now_millis;

/// Cache record format version. Bump this when the serialized shape of
/// `CatalogCacheRecord` or `ReferenceEntry` changes; older records are then
/// purged on first read.
pub const SCHEMA_VERSION: u32 = 1;

/// Default record lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Prefix of every durable key owned by the cache.
const KEY_PREFIX: &str = "dat-cache-";

/// Where a cached catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Bundled,
    Remote,
    Custom,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Bundled => "bundled",
            SourceKind::Remote => "remote",
            SourceKind::Custom => "custom",
        }
    }

    pub fn all() -> &'static [SourceKind] {
        &[SourceKind::Bundled, SourceKind::Remote, SourceKind::Custom]
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = DatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DatError::cache(format!("unknown source kind '{s}'")))
    }
}

/// Identifies one cached catalog: a platform short name or a custom label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub kind: SourceKind,
    pub id: String,
}

impl CacheKey {
    pub fn new(kind: SourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    /// Key in the durable store: `dat-cache-{kind}-{id}`.
    pub fn durable_key(&self) -> String {
        format!("{KEY_PREFIX}{}-{}", self.kind.as_str(), self.id)
    }

    /// Inverse of [`durable_key`](Self::durable_key).
    pub fn from_durable_key(key: &str) -> Option<Self> {
        let rest = key.strip_prefix(KEY_PREFIX)?;
        let (kind, id) = rest.split_once('-')?;
        let kind = kind.parse().ok()?;
        (!id.is_empty()).then(|| Self::new(kind, id))
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Serialized form of one cached catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCacheRecord {
    pub entries: Vec<Arc<ReferenceEntry>>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub schema_version: u32,
}

/// Summary of a cached catalog for listing.
#[derive(Debug, Clone)]
pub struct CachedCatalog {
    pub key: CacheKey,
    pub entry_count: usize,
    /// `None` for records only held in memory
    pub stored_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Durable stores
// ---------------------------------------------------------------------------

/// String key/value store that outlives the process.
pub trait DurableStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), DatError>;

    fn remove(&mut self, key: &str) -> Result<(), DatError>;

    fn keys(&self) -> Result<Vec<String>, DatError>;
}

/// Volatile store, for tests and `--no-cache` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DatError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DatError> {
        self.values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, DatError> {
        Ok(self.values.keys().cloned().collect())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_file_key(key)))
    }
}

impl DurableStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DatError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DatError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, DatError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)?.flatten() {
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Some(key) = decode_file_key(stem) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Get the default cache directory for romcheck catalogs.
pub fn default_cache_dir() -> Result<PathBuf, DatError> {
    let base =
        dirs::cache_dir().ok_or_else(|| DatError::cache("Could not determine cache directory"))?;
    Ok(base.join("romcheck").join("dats"))
}

/// Escape characters that are not safe in file names as `%XX`.
fn encode_file_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b' ' | b'-' | b'_' | b'.' | b'(' | b')') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn decode_file_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

// ---------------------------------------------------------------------------
// Cache store
// ---------------------------------------------------------------------------

/// The catalog cache used by the loader.
pub struct CacheStore {
    memory: HashMap<CacheKey, Vec<Arc<ReferenceEntry>>>,
    durable: Box<dyn DurableStore>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(durable: Box<dyn DurableStore>, ttl: Duration) -> Self {
        Self {
            memory: HashMap::new(),
            durable,
            ttl,
        }
    }

    /// A cache that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), DEFAULT_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a catalog, promoting a valid durable record into memory.
    /// Stale, foreign-schema, or unreadable records are purged.
    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<Arc<ReferenceEntry>>> {
        if let Some(entries) = self.memory.get(key) {
            log::debug!("Cache hit (memory) for {key}");
            return Some(entries.clone());
        }

        let record = self.read_durable(key)?;
        log::debug!("Cache hit (durable) for {key}: {} entries", record.entries.len());
        self.memory.insert(key.clone(), record.entries.clone());
        Some(record.entries)
    }

    /// Store a catalog in both tiers. The memory tier is always updated,
    /// even when the durable write fails.
    pub fn put(&mut self, key: &CacheKey, entries: Vec<Arc<ReferenceEntry>>) -> Result<(), DatError> {
        let record = CatalogCacheRecord {
            entries,
            timestamp: now_millis(),
            schema_version: SCHEMA_VERSION,
        };
        let json = serde_json::to_string(&record);
        self.memory.insert(key.clone(), record.entries);
        self.durable.set(&key.durable_key(), &json?)
    }

    /// Drop one catalog from both tiers.
    pub fn remove(&mut self, key: &CacheKey) -> Result<(), DatError> {
        self.memory.remove(key);
        self.durable.remove(&key.durable_key())
    }

    /// Valid cached catalogs, optionally filtered by source kind.
    pub fn list(&mut self, kind: Option<SourceKind>) -> Result<Vec<CachedCatalog>, DatError> {
        let mut listed: BTreeMap<CacheKey, CachedCatalog> = BTreeMap::new();

        for raw in self.durable.keys()? {
            let Some(key) = CacheKey::from_durable_key(&raw) else {
                continue;
            };
            if kind.is_some_and(|k| k != key.kind) {
                continue;
            }
            if let Some(record) = self.read_durable(&key) {
                listed.insert(
                    key.clone(),
                    CachedCatalog {
                        key,
                        entry_count: record.entries.len(),
                        stored_at: DateTime::from_timestamp_millis(record.timestamp),
                    },
                );
            }
        }

        for (key, entries) in &self.memory {
            if kind.is_some_and(|k| k != key.kind) || listed.contains_key(key) {
                continue;
            }
            listed.insert(
                key.clone(),
                CachedCatalog {
                    key: key.clone(),
                    entry_count: entries.len(),
                    stored_at: None,
                },
            );
        }

        Ok(listed.into_values().collect())
    }

    /// Remove every cached catalog. Returns how many durable records were
    /// deleted.
    pub fn clear(&mut self) -> Result<usize, DatError> {
        self.memory.clear();
        let mut removed = 0;
        for key in self.durable.keys()? {
            if key.starts_with(KEY_PREFIX) {
                self.durable.remove(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn read_durable(&mut self, key: &CacheKey) -> Option<CatalogCacheRecord> {
        let durable_key = key.durable_key();
        let text = match self.durable.get(&durable_key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read cached catalog {key}: {e}");
                return None;
            }
        };

        let reason = match serde_json::from_str::<CatalogCacheRecord>(&text) {
            Ok(record) if record.schema_version != SCHEMA_VERSION => {
                format!("schema version {} (expected {SCHEMA_VERSION})", record.schema_version)
            }
            Ok(record) if self.is_expired(record.timestamp) => "expired".to_string(),
            Ok(record) => return Some(record),
            Err(e) => format!("unreadable record: {e}"),
        };

        log::warn!("Purging cached catalog {key}: {reason}");
        if let Err(e) = self.durable.remove(&durable_key) {
            log::warn!("Failed to purge cached catalog {key}: {e}");
        }
        None
    }

    fn is_expired(&self, timestamp: i64) -> bool {
        let age = now_millis().saturating_sub(timestamp);
        age < 0 || age as u128 > self.ttl.as_millis()
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
