//! Core extent store implementation providing sandboxed, atomic extent I/O
//! plus an in-memory bounding-box index.
//!
//! This module contains the primary [`ExtentStore`] handle, which serves as
//! the entry point for all extent operations. It owns the physical filesystem
//! root, keeps the persisted rows and the index consistent, and answers
//! bounding-box intersection queries without touching the disk.

use crate::builder::StoreBuilder;
use crate::error::{StoreError, StoreErrorExt};
use crate::layout;
use crate::maintenance;
use geocat_domain::{BoundingBox, Extent, RecordId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Number of striped per-key write locks. Collisions only over-serialize
/// unrelated ids, never under-serialize the same id.
pub(crate) const WRITE_STRIPES: usize = 16;

/// The internal shared state of an [`ExtentStore`] instance.
#[derive(Debug)]
pub struct StoreInner {
    /// The canonicalized physical path on the disk where all rows are stored.
    pub(crate) root: PathBuf,
    /// Bounding boxes of every persisted row, keyed by record id. Rebuilt
    /// from disk at connect time and kept in lockstep with every write.
    pub(crate) index: RwLock<BTreeMap<RecordId, BoundingBox>>,
    /// Striped write locks, keyed by record-id hash. A write holds its
    /// stripe across the file mutation and the index update, so the index
    /// entry always belongs to the same write as the persisted row.
    pub(crate) write_locks: Box<[Mutex<()>]>,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

impl StoreInner {
    fn write_lock(&self, id: &RecordId) -> &Mutex<()> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        id.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let stripe = hasher.finish() as usize % self.write_locks.len();
        &self.write_locks[stripe]
    }
}

/// A thread-safe handle to the extent store.
///
/// `ExtentStore` owns the persisted representation of record extents: one
/// JSON row per record, exactly one active row per record id. It supports:
/// - **Atomic Upserts**: a row is replaced wholesale via temporary files and
///   renames; readers never observe a half-written row.
/// - **Idempotent Deletes**: deleting a record with no extent is a no-op.
/// - **Bounding-Box Queries**: `intersecting` answers from an in-memory
///   index, synchronously.
/// - **Self-Healing**: stale temporary files are cleaned up and the index is
///   rebuilt from the persisted rows on initialization.
///
/// This handle is internally reference-counted (`Arc`) and can be cheaply
/// cloned across threads or tasks.
///
/// # Example
///
/// ```rust
/// use geocat_domain::{Extent, Geometry, RecordId};
/// use geocat_storage::{ExtentStore, StoreError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StoreError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("extents");
///     let store = ExtentStore::builder()
///         .root(&root)
///         .create(true)
///         .connect()
///         .await?;
///
///     let geometry = Geometry::Point([5.0, 10.0]);
///     let bbox = geometry.bounding_box().unwrap();
///     store.put(&Extent::new("dataset-001", geometry, bbox)).await?;
///
///     let hits = store.intersecting(&bbox);
///     assert_eq!(hits, vec![RecordId::new("dataset-001")]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ExtentStore {
    pub(crate) inner: Arc<StoreInner>,
}

impl Deref for ExtentStore {
    type Target = StoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl ExtentStore {
    #[must_use = "The store is not initialized until you call .connect()"]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Upserts the extent row for `extent.record_id`.
    ///
    /// The previous row, if any, is replaced wholesale using an "atomic swap"
    /// pattern:
    /// 1. The row is serialized and written to a unique temporary file
    ///    (`.gctmp.<id>`).
    /// 2. The file is synced to hardware (`fsync`).
    /// 3. The temporary file is renamed over the final destination.
    /// 4. Shard directories are created automatically.
    ///
    /// The bounding-box index is updated only after the rename, so a
    /// concurrent reader observes either the pre-write or the post-write row,
    /// never a mix of the two. Concurrent upserts for the same id serialize
    /// on a per-key write lock held across the rename and the index update;
    /// last write wins by arrival at the lock, and the index entry always
    /// matches the persisted row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecordId`] if the id cannot be used as an
    /// on-disk key.
    /// Returns [`StoreError::Serialize`] if the row cannot be encoded.
    /// Returns [`StoreError::Io`] if disk space is full or hardware failure
    /// occurs; no partially written row is left visible.
    pub async fn put(&self, extent: &Extent) -> Result<(), StoreError> {
        let resolved = layout::extent_path(&self.root, &extent.record_id)?;

        let row = serde_json::to_vec(extent)
            .map_err(|source| StoreError::Serialize { source, context: None })?;

        let _guard = self.write_lock(&extent.record_id).lock().await;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", resolved.display()))?;
        }

        let temp = unique_tmp_path(&resolved, &self.tmp_counter);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&row).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&resolved)
                    .await
                    .context(format!("Failed to replace existing row: {}", resolved.display()))?;
                fs::rename(&temp, &resolved).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    resolved.display()
                ))?;
            } else {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), resolved.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = resolved.parent() {
            Self::sync_dir(parent).await;
        }

        self.index.write().insert(extent.record_id.clone(), extent.bounding_box);

        debug!(record_id = %extent.record_id, "Extent saved atomically");
        Ok(())
    }

    /// Reads the extent row for `id`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecordId`] if the id cannot be used as an
    /// on-disk key.
    /// Returns [`StoreError::Corrupt`] if the persisted row cannot be decoded.
    /// Returns [`StoreError::Io`] on hardware failure. An absent row is
    /// `Ok(None)`, not an error.
    pub async fn get(&self, id: &RecordId) -> Result<Option<Extent>, StoreError> {
        let resolved = layout::extent_path(&self.root, id)?;

        let row = match fs::read(&resolved).await {
            Ok(row) => row,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", resolved.display()).into()),
                });
            },
        };

        let extent = serde_json::from_slice(&row).map_err(|source| StoreError::Corrupt {
            source,
            context: Some(format!("Row: {}", resolved.display()).into()),
        })?;

        Ok(Some(extent))
    }

    /// Removes the extent row for `id` if present.
    ///
    /// Deletion is idempotent: removing a record with no extent is a no-op,
    /// not an error. The extent's life is entirely driven by the owning
    /// record's lifecycle, so callers delete unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecordId`] if the id cannot be used as an
    /// on-disk key.
    /// Returns [`StoreError::Io`] if the row exists but cannot be removed.
    pub async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let resolved = layout::extent_path(&self.root, id)?;

        let _guard = self.write_lock(id).lock().await;

        match fs::remove_file(&resolved).await {
            Ok(()) => {
                debug!(record_id = %id, "Extent deleted");
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
            Err(err) => {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(format!("Failed to delete: {}", resolved.display()).into()),
                });
            },
        }

        self.index.write().remove(id);
        Ok(())
    }

    /// Returns every record id whose stored bounding box intersects `query`,
    /// in ascending record-id order.
    ///
    /// This is a box-vs-box test over the in-memory index — the stored
    /// geometry itself is never consulted. An empty result is valid and
    /// meaningful: no record can match the region.
    #[must_use]
    pub fn intersecting(&self, query: &BoundingBox) -> Vec<RecordId> {
        self.index
            .read()
            .iter()
            .filter(|(_, bbox)| bbox.intersects(query))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Number of extent rows currently indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("extent");
    let tmp_name = format!("{file_name}.gctmp.{counter}");
    target.with_file_name(tmp_name)
}
