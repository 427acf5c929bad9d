//! On-disk layout: record-id validation and sharded path computation.
//!
//! Record ids become file names inside the sandbox root, so the character
//! set is restricted to ASCII alphanumerics, `-`, and `_`. This makes path
//! traversal through a hostile id impossible without a canonicalization
//! round-trip on every access.

use crate::error::StoreError;
use geocat_domain::RecordId;
use std::path::{Path, PathBuf};

pub(crate) const EXTENT_FILE_EXT: &str = "json";

/// Validates a record id for use as an on-disk key.
///
/// # Errors
/// Returns [`StoreError::InvalidRecordId`] if the id is empty or contains
/// characters outside `[a-zA-Z0-9_-]`.
pub(crate) fn validate_record_id(id: &RecordId) -> Result<(), StoreError> {
    if id.is_empty() {
        return Err(StoreError::InvalidRecordId {
            message: "EMPTY".into(),
            context: Some("Record id cannot be empty".into()),
        });
    }

    if !id.as_str().chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(StoreError::InvalidRecordId {
            message: id.as_str().to_owned().into(),
            context: Some("Record id contains illegal characters".into()),
        });
    }

    Ok(())
}

/// Resolves the physical path of a record's extent row.
///
/// The file name is sharded on its first four characters
/// (`<root>/ab/cd/abcd1234.json`) to keep directory fan-out flat for large
/// catalogs, matching the layout the index rebuild scan expects.
pub(crate) fn extent_path(root: &Path, id: &RecordId) -> Result<PathBuf, StoreError> {
    validate_record_id(id)?;

    let mut path = root.to_path_buf();
    let chars: Vec<char> = id.as_str().chars().collect();
    if chars.len() >= 4 {
        let shard1: String = chars[0..2].iter().collect();
        let shard2: String = chars[2..4].iter().collect();
        path.push(shard1);
        path.push(shard2);
    }
    path.push(format!("{id}.{EXTENT_FILE_EXT}"));

    Ok(path)
}
