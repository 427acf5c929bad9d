use crate::layout::EXTENT_FILE_EXT;
use geocat_domain::{BoundingBox, Extent, RecordId};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();
    let threshold = Duration::from_secs(300);

    match tokio::task::spawn_blocking(move || remove_stale(&root, now, threshold)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary files");
        },
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
        },
        _ => {},
    }
}

/// Rebuilds the bounding-box index from the persisted rows under `root`.
///
/// Undecodable rows are skipped with a warning rather than failing the boot:
/// a single corrupt row must not take the whole catalog's spatial search
/// offline. `get` still reports such rows as [`StoreError::Corrupt`] when
/// addressed directly.
///
/// [`StoreError::Corrupt`]: crate::StoreError::Corrupt
pub(crate) async fn rebuild_index(root: &Path) -> BTreeMap<RecordId, BoundingBox> {
    let root = root.to_path_buf();

    match tokio::task::spawn_blocking(move || scan_rows(&root)).await {
        Ok((index, skipped)) => {
            if !index.is_empty() || skipped > 0 {
                info!(rows = index.len(), skipped, "Rebuilt extent index");
            }
            index
        },
        Err(e) => {
            error!(error = %e, "Index rebuild task panicked");
            BTreeMap::new()
        },
    }
}

fn scan_rows(root: &Path) -> (BTreeMap<RecordId, BoundingBox>, usize) {
    let mut index = BTreeMap::new();
    let mut skipped = 0;

    for entry in WalkDir::new(root).into_iter().flatten().filter(is_row) {
        let path = entry.path();

        let row = match std::fs::read(path) {
            Ok(row) => row,
            Err(err) => {
                warn!(row = %path.display(), error = %err, "Skipping unreadable extent row");
                skipped += 1;
                continue;
            },
        };

        match serde_json::from_slice::<Extent>(&row) {
            Ok(extent) => {
                index.insert(extent.record_id, extent.bounding_box);
            },
            Err(err) => {
                warn!(row = %path.display(), error = %err, "Skipping undecodable extent row");
                skipped += 1;
            },
        }
    }

    (index, skipped)
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .flatten()
        .filter(|e| e.path() != root)
        .for_each(|entry| {
            let path = entry.path();

            if is_tmp(&entry) && is_stale(&entry, now, threshold) {
                match std::fs::remove_file(path) {
                    Ok(()) => removed += 1,
                    Err(e) => {
                        warn!(p = %path.display(), err = %e, "IO fail");
                        failed += 1;
                    },
                }
            }
        });

    (removed, failed)
}

fn is_row(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.path().extension().is_some_and(|ext| ext == EXTENT_FILE_EXT)
}

fn is_tmp(entry: &DirEntry) -> bool {
    if !entry.file_type().is_file() {
        return false;
    }
    entry
        .path()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(".gctmp."))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    std::fs::metadata(entry.path())
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}
