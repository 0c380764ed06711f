//! Versioned restaurant store persisted to disk
//!
//! Provides a `RestaurantStore` holding one collection keyed by restaurant id,
//! read back ordered by `createdAt`. The whole collection lives in a single
//! JSON file tagged with a schema version.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::Restaurant;

/// Name of the restaurant collection, also the file stem on disk
pub const STORE_NAME: &str = "restaurants";

/// Schema version written by this build
pub const STORE_VERSION: u32 = 1;

/// Errors raised by the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed
    #[error("Store I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The store file is not valid JSON for this schema
    #[error("Store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The store file was written by a newer schema
    #[error("Store version {found} is newer than supported version {supported}")]
    VersionTooNew { found: u32, supported: u32 },
}

/// Only the version, so older layouts can be recognized without parsing them
#[derive(Deserialize)]
struct StoreHeader {
    version: u32,
}

/// On-disk layout of the store
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile<T> {
    /// Schema version
    version: u32,
    /// When the file was last written
    updated_at: DateTime<Utc>,
    /// Records ordered by id
    restaurants: T,
}

/// Handle to an open restaurant store
///
/// Opened explicitly with [`RestaurantStore::open`] and released with
/// [`RestaurantStore::close`]. Every write replaces the file atomically.
#[derive(Debug)]
pub struct RestaurantStore {
    /// Path of the store file
    path: PathBuf,
    /// Schema version the store was opened with
    version: u32,
    /// Records keyed by id
    records: BTreeMap<i64, Restaurant>,
}

impl RestaurantStore {
    /// Returns the XDG-compliant store directory
    ///
    /// Uses `~/.cache/restocache/` on Linux. Returns `None` when no such
    /// directory can be determined, meaning there is no persistent storage
    /// available and callers should run network-only.
    pub fn default_dir() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "restocache")?;
        Some(project_dirs.cache_dir().to_path_buf())
    }

    /// Opens (or creates) the store in `dir` at schema `version`
    ///
    /// A missing file or one written by an older version is replaced by an
    /// empty collection at `version`. A file from a newer version is
    /// rejected.
    pub fn open(dir: impl Into<PathBuf>, version: u32) -> Result<Self, StoreError> {
        let mut store = Self::empty(dir.into(), version)?;

        let content = match fs::read_to_string(&store.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %store.path.display(), "Creating restaurant store");
                store.write_file(&store.records)?;
                return Ok(store);
            }
            Err(e) => return Err(e.into()),
        };

        let header: StoreHeader = serde_json::from_str(&content)?;
        if header.version > version {
            return Err(StoreError::VersionTooNew {
                found: header.version,
                supported: version,
            });
        }

        if header.version < version {
            info!(from = header.version, to = version, "Upgrading restaurant store");
            store.write_file(&store.records)?;
        } else {
            let file: StoreFile<Vec<Restaurant>> = serde_json::from_str(&content)?;
            store.records = file.restaurants.into_iter().map(|r| (r.id, r)).collect();
            debug!(count = store.records.len(), "Opened restaurant store");
        }

        Ok(store)
    }

    /// Replaces whatever is in `dir` with an empty store at schema `version`
    ///
    /// The existing file is not read, so this recovers stores that
    /// [`RestaurantStore::open`] rejects as corrupt or too new.
    pub fn reset(dir: impl Into<PathBuf>, version: u32) -> Result<Self, StoreError> {
        let store = Self::empty(dir.into(), version)?;
        store.write_file(&store.records)?;
        info!(path = %store.path.display(), version, "Reset restaurant store");
        Ok(store)
    }

    /// Handle with no records, creating `dir` if needed
    fn empty(dir: PathBuf, version: u32) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.join(format!("{}.json", STORE_NAME)),
            version,
            records: BTreeMap::new(),
        })
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema version the store was opened with
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of stored restaurants
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no restaurants
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns every stored restaurant ordered by `createdAt`, then id
    pub fn all_by_created_at(&self) -> Vec<Restaurant> {
        let mut restaurants: Vec<Restaurant> = self.records.values().cloned().collect();
        // Stable sort keeps id order for equal timestamps
        restaurants.sort_by_key(|r| r.created_at);
        restaurants
    }

    /// Inserts or replaces each restaurant by id in a single write
    ///
    /// Nothing changes, in memory or on disk, if the write fails.
    pub fn put_all(&mut self, restaurants: &[Restaurant]) -> Result<(), StoreError> {
        let mut records = self.records.clone();
        for restaurant in restaurants {
            records.insert(restaurant.id, restaurant.clone());
        }

        self.write_file(&records)?;
        self.records = records;
        Ok(())
    }

    /// Removes every restaurant
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let records = BTreeMap::new();
        self.write_file(&records)?;
        self.records = records;
        Ok(())
    }

    /// Releases the store handle
    pub fn close(self) {
        debug!(path = %self.path.display(), "Closed restaurant store");
    }

    /// Writes `records` to a temporary file and renames it over the store file
    fn write_file(&self, records: &BTreeMap<i64, Restaurant>) -> Result<(), StoreError> {
        let file = StoreFile {
            version: self.version,
            updated_at: Utc::now(),
            restaurants: records.values().collect::<Vec<_>>(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LatLng;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn restaurant(id: i64, name: &str, created_ms: i64) -> Restaurant {
        Restaurant {
            id,
            name: name.to_string(),
            cuisine_type: "Pizza".to_string(),
            neighborhood: "Brooklyn".to_string(),
            photograph: Some(id.to_string()),
            latlng: LatLng { lat: 40.68, lng: -73.96 },
            created_at: Utc.timestamp_millis_opt(created_ms).unwrap(),
            extra: Default::default(),
        }
    }

    fn create_test_store() -> (RestaurantStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RestaurantStore::open(temp_dir.path(), STORE_VERSION).expect("Open should succeed");
        (store, temp_dir)
    }

    #[test]
    fn test_open_creates_empty_store_file() {
        let (store, temp_dir) = create_test_store();

        assert!(store.is_empty());
        assert_eq!(store.version(), STORE_VERSION);
        assert_eq!(store.path(), temp_dir.path().join("restaurants.json"));
        assert!(store.path().exists(), "Store file should exist after open");
    }

    #[test]
    fn test_open_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("store");

        let store = RestaurantStore::open(&nested_path, STORE_VERSION).expect("Open should succeed");

        assert!(nested_path.exists(), "Nested directory should be created");
        assert!(store.path().exists());
    }

    #[test]
    fn test_put_all_then_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut store = RestaurantStore::open(temp_dir.path(), STORE_VERSION).unwrap();
        let records = vec![restaurant(1, "Emily", 2000), restaurant(2, "Roberta's", 1000)];

        store.put_all(&records).expect("Write should succeed");
        store.close();

        let reopened = RestaurantStore::open(temp_dir.path(), STORE_VERSION).unwrap();
        assert_eq!(reopened.len(), 2);
        let names: Vec<String> = reopened.all_by_created_at().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Roberta's", "Emily"]);
    }

    #[test]
    fn test_all_by_created_at_orders_by_timestamp_then_id() {
        let (mut store, _temp_dir) = create_test_store();
        let records = vec![
            restaurant(3, "c", 5000),
            restaurant(1, "a", 9000),
            restaurant(2, "b", 5000),
        ];

        store.put_all(&records).unwrap();

        let ids: Vec<i64> = store.all_by_created_at().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_put_all_replaces_by_id() {
        let (mut store, _temp_dir) = create_test_store();

        store.put_all(&[restaurant(1, "first", 1000)]).unwrap();
        store.put_all(&[restaurant(1, "second", 1000), restaurant(2, "other", 2000)]).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.all_by_created_at()[0].name, "second");
    }

    #[test]
    fn test_clear_empties_store_on_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut store = RestaurantStore::open(temp_dir.path(), STORE_VERSION).unwrap();
        store.put_all(&[restaurant(1, "gone", 1000)]).unwrap();

        store.clear().expect("Clear should succeed");
        store.close();

        let reopened = RestaurantStore::open(temp_dir.path(), STORE_VERSION).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_older_version_is_upgraded_to_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut store = RestaurantStore::open(temp_dir.path(), 1).unwrap();
        store.put_all(&[restaurant(1, "old", 1000)]).unwrap();
        store.close();

        let upgraded = RestaurantStore::open(temp_dir.path(), 2).expect("Upgrade should succeed");

        assert!(upgraded.is_empty());
        assert_eq!(upgraded.version(), 2);
        let content = fs::read_to_string(upgraded.path()).unwrap();
        assert!(content.contains("\"version\": 2"));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        RestaurantStore::open(temp_dir.path(), 3).unwrap().close();

        let result = RestaurantStore::open(temp_dir.path(), 1);

        assert!(matches!(
            result,
            Err(StoreError::VersionTooNew { found: 3, supported: 1 })
        ));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("restaurants.json"), "not json").unwrap();

        let result = RestaurantStore::open(temp_dir.path(), STORE_VERSION);

        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_reset_replaces_corrupt_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("restaurants.json"), "garbage").unwrap();

        let store = RestaurantStore::reset(temp_dir.path(), STORE_VERSION).expect("Reset should succeed");
        assert!(store.is_empty());
        store.close();

        let reopened = RestaurantStore::open(temp_dir.path(), STORE_VERSION).expect("Open should succeed");
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_reset_replaces_newer_version() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut newer = RestaurantStore::open(temp_dir.path(), 5).unwrap();
        newer.put_all(&[restaurant(1, "future", 1000)]).unwrap();
        newer.close();

        RestaurantStore::reset(temp_dir.path(), STORE_VERSION).unwrap().close();

        let reopened = RestaurantStore::open(temp_dir.path(), STORE_VERSION).expect("Open should succeed");
        assert!(reopened.is_empty());
        assert_eq!(reopened.version(), STORE_VERSION);
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let (mut store, temp_dir) = create_test_store();

        store.put_all(&[restaurant(1, "a", 1000)]).unwrap();

        assert!(!temp_dir.path().join("restaurants.json.tmp").exists());
    }

    #[test]
    fn test_default_dir_is_xdg_compliant() {
        if let Some(dir) = RestaurantStore::default_dir() {
            assert!(
                dir.to_string_lossy().contains("restocache"),
                "Store path should contain project name"
            );
        }
        // Test passes if default_dir() returns None (e.g., no home directory in CI)
    }
}
