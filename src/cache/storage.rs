//! Cache storage implementation

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LintGuardError, Result};

/// Current cache format version
///
/// On load, a store whose version differs is discarded wholesale; there is
/// no partial migration.
pub const CACHE_VERSION: &str = "1";

/// Which side of the change a cached linter run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheSide {
    Old,
    New,
}

/// Lookup key for one cached linter invocation
///
/// `identity` is a revision id (version-control systems with monotonic
/// revisions) or a content hash (working-tree diffs). The ruleset component
/// is always part of the key so two rulesets can never collide on identity
/// alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub file: String,
    pub side: CacheSide,
    pub identity: String,
    pub ruleset: String,
}

/// Persisted form of the store
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFile {
    cache_version: String,
    entries: Vec<CacheFileEntry>,
}

#[derive(Serialize, Deserialize)]
struct CacheFileEntry {
    file: String,
    side: CacheSide,
    identity: String,
    ruleset: String,
    output: String,
}

/// In-memory cache of linter output, persisted as a single JSON file
#[derive(Debug)]
pub struct ResultCache {
    path: PathBuf,
    entries: HashMap<CacheKey, String>,
}

impl ResultCache {
    /// Create an empty cache that will persist to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
        }
    }

    /// Load the cache from disk
    ///
    /// A missing file is an empty store. A version mismatch discards the
    /// entire store (not individual entries) and returns an empty one.
    ///
    /// # Errors
    /// Returns [`LintGuardError::CacheCorrupt`] when the file exists but is
    /// unreadable or not valid cache JSON.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::new(path));
        }

        let file = File::open(&path).map_err(|e| {
            LintGuardError::CacheCorrupt(format!("cannot open '{}': {}", path.display(), e))
        })?;
        let reader = BufReader::new(file);
        let parsed: CacheFile = serde_json::from_reader(reader).map_err(|e| {
            LintGuardError::CacheCorrupt(format!("cannot parse '{}': {}", path.display(), e))
        })?;

        if parsed.cache_version != CACHE_VERSION {
            return Ok(Self::new(path));
        }

        let entries = parsed
            .entries
            .into_iter()
            .map(|entry| {
                (
                    CacheKey {
                        file: entry.file,
                        side: entry.side,
                        identity: entry.identity,
                        ruleset: entry.ruleset,
                    },
                    entry.output,
                )
            })
            .collect();
        Ok(Self { path, entries })
    }

    /// Persist the cache to disk
    ///
    /// # Errors
    /// Returns [`LintGuardError::CacheWrite`] when the file cannot be
    /// created or written.
    pub fn save(&self) -> Result<()> {
        let mut entries: Vec<CacheFileEntry> = self
            .entries
            .iter()
            .map(|(key, output)| CacheFileEntry {
                file: key.file.clone(),
                side: key.side,
                identity: key.identity.clone(),
                ruleset: key.ruleset.clone(),
                output: output.clone(),
            })
            .collect();
        // Deterministic on-disk ordering
        entries.sort_by(|a, b| {
            (&a.file, &a.identity, &a.ruleset, a.side == CacheSide::New).cmp(&(
                &b.file,
                &b.identity,
                &b.ruleset,
                b.side == CacheSide::New,
            ))
        });

        let cache_file = CacheFile {
            cache_version: CACHE_VERSION.to_string(),
            entries,
        };

        let file = File::create(&self.path).map_err(|e| {
            LintGuardError::CacheWrite(format!("cannot create '{}': {}", self.path.display(), e))
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, &cache_file)
            .map_err(|e| LintGuardError::CacheWrite(e.to_string()))
    }

    /// Look up cached linter output by exact key
    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store linter output for a key
    ///
    /// A changed identity is a new entry, not an update; stale entries
    /// accumulate until [`ResultCache::clear`].
    pub fn put(&mut self, key: CacheKey, output: String) {
        self.entries.insert(key, output);
    }

    /// Drop all entries in memory (persists on the next `save`)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the persisted cache file if present (used when recovering
    /// from a corrupt store)
    pub fn remove_file(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| LintGuardError::CacheWrite(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn key(file: &str, side: CacheSide, identity: &str, ruleset: &str) -> CacheKey {
        CacheKey {
            file: file.to_string(),
            side,
            identity: identity.to_string(),
            ruleset: ruleset.to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp = TempDir::new().unwrap();
        let cache = ResultCache::load(temp.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");

        let mut cache = ResultCache::new(&path);
        cache.put(
            key("a.php", CacheSide::Old, "r100", "standard"),
            "{\"files\":{}}".to_string(),
        );
        cache.put(
            key("a.php", CacheSide::New, "deadbeef", "standard"),
            "{\"files\":{}}".to_string(),
        );
        cache.save().unwrap();

        let loaded = ResultCache::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded.get(&key("a.php", CacheSide::Old, "r100", "standard")),
            Some("{\"files\":{}}")
        );
    }

    #[test]
    fn test_changed_identity_is_a_miss() {
        let mut cache = ResultCache::new("unused.json");
        cache.put(key("a.php", CacheSide::New, "hash1", "std"), "out".into());
        assert_eq!(
            cache.get(&key("a.php", CacheSide::New, "hash2", "std")),
            None
        );
        // Stale entry is still there
        assert_eq!(
            cache.get(&key("a.php", CacheSide::New, "hash1", "std")),
            Some("out")
        );
    }

    #[test]
    fn test_ruleset_is_part_of_key() {
        let mut cache = ResultCache::new("unused.json");
        cache.put(key("a.php", CacheSide::New, "hash1", "std-a"), "out".into());
        assert_eq!(
            cache.get(&key("a.php", CacheSide::New, "hash1", "std-b")),
            None
        );
    }

    #[test]
    fn test_sides_do_not_collide() {
        let mut cache = ResultCache::new("unused.json");
        cache.put(key("a.php", CacheSide::Old, "id", "std"), "old".into());
        cache.put(key("a.php", CacheSide::New, "id", "std"), "new".into());
        assert_eq!(cache.get(&key("a.php", CacheSide::Old, "id", "std")), Some("old"));
        assert_eq!(cache.get(&key("a.php", CacheSide::New, "id", "std")), Some("new"));
    }

    #[test]
    fn test_version_mismatch_discards_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");
        fs::write(
            &path,
            r#"{"cacheVersion": "0", "entries": [
                {"file": "a.php", "side": "new", "identity": "x", "ruleset": "", "output": "o"}
            ]}"#,
        )
        .unwrap();

        let cache = ResultCache::load(&path).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");
        fs::write(&path, "{{{ not json").unwrap();

        let err = ResultCache::load(&path).unwrap_err();
        assert!(matches!(err, LintGuardError::CacheCorrupt(_)));
    }

    #[test]
    fn test_clear_then_save_persists_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.json");

        let mut cache = ResultCache::new(&path);
        cache.put(key("a.php", CacheSide::New, "id", "std"), "out".into());
        cache.save().unwrap();

        let mut loaded = ResultCache::load(&path).unwrap();
        loaded.clear();
        assert!(loaded.is_empty());
        loaded.save().unwrap();

        let reloaded = ResultCache::load(&path).unwrap();
        assert!(reloaded.is_empty());
    }
}
