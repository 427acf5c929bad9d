//! Catalog record identity and the lifecycle inputs the spatial core consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a catalog record. At most one extent exists per id.
///
/// The id is carried as-is; the storage layer validates the character set
/// before embedding it in an on-disk path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a record's spatial declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraState {
    Active,
    Deleted,
}

/// A record's spatial declaration as received from the record store: the
/// raw, not-yet-decoded JSON payload plus its lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtra {
    pub state: ExtraState,
    pub value: String,
}

impl SpatialExtra {
    #[must_use]
    pub fn active(value: impl Into<String>) -> Self {
        Self { state: ExtraState::Active, value: value.into() }
    }

    #[must_use]
    pub fn deleted() -> Self {
        Self { state: ExtraState::Deleted, value: String::new() }
    }
}

/// The slice of a catalog record the spatial core needs to observe lifecycle
/// events: its identity and its spatial declaration, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub spatial: Option<SpatialExtra>,
}

impl Record {
    #[must_use]
    pub fn new(id: impl Into<RecordId>, spatial: Option<SpatialExtra>) -> Self {
        Self { id: id.into(), spatial }
    }
}
