//! The stored spatial footprint of a record.

use crate::geometry::{BoundingBox, Geometry};
use crate::record::RecordId;
use serde::{Deserialize, Serialize};

/// One record's spatial footprint: the validated geometry plus its bounding
/// box, derived once at validation time and never independently mutated.
///
/// This is also the persisted row shape — the storage engine serializes it
/// as one JSON document per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub record_id: RecordId,
    pub geometry: Geometry,
    pub bounding_box: BoundingBox,
}

impl Extent {
    #[must_use]
    pub fn new(record_id: impl Into<RecordId>, geometry: Geometry, bounding_box: BoundingBox) -> Self {
        Self { record_id: record_id.into(), geometry, bounding_box }
    }
}
