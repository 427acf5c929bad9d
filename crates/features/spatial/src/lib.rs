//! Spatial metadata feature slice.
//!
//! Keeps a record's stored extent consistent with its lifecycle: the record
//! store calls [`SpatialMetadata::on_create`] / [`on_edit`] / [`on_delete`]
//! synchronously on each event, and this slice validates the declared
//! geometry and drives the extent store accordingly.
//!
//! The extent's life is entirely derived from the owning record's:
//! `NONE → ACTIVE` when a valid geometry is declared, `ACTIVE → ACTIVE` on
//! re-declaration (wholesale replacement), `ACTIVE → NONE` when the
//! declaration is marked deleted or the record itself is deleted.
//!
//! [`on_edit`]: SpatialMetadata::on_edit
//! [`on_delete`]: SpatialMetadata::on_delete

mod error;
pub mod validate;

pub use crate::error::{SpatialError, SpatialErrorExt, error_summary};
use geocat_domain::{Extent, ExtraState, Record, RecordId};
use geocat_storage::ExtentStore;
use tracing::{debug, warn};

/// Spatial metadata feature state.
///
/// Holds the extent store handle and the diagnostics flag; construction-time
/// configuration only, no ambient lookups.
#[derive(Debug, Clone)]
pub struct SpatialMetadata {
    store: ExtentStore,
    diagnostics: bool,
}

impl SpatialMetadata {
    #[must_use]
    pub const fn new(store: ExtentStore) -> Self {
        Self { store, diagnostics: false }
    }

    /// When enabled, storage failures propagate unwrapped
    /// ([`SpatialError::Store`]) instead of being summarized into a
    /// field-level message — useful when debugging persistence issues.
    #[must_use]
    pub const fn diagnostics(mut self, enable: bool) -> Self {
        self.diagnostics = enable;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &ExtentStore {
        &self.store
    }

    /// Handles record creation: validates and stores the spatial
    /// declaration, if the record carries one.
    ///
    /// # Errors
    /// Returns [`SpatialError::MalformedPayload`] /
    /// [`SpatialError::InvalidGeometry`] for a bad declaration — validation
    /// fails before anything is persisted, so no corrupt extent row can
    /// exist. Returns [`SpatialError::PersistFailed`] (or the raw
    /// [`SpatialError::Store`] in diagnostics mode) if the store rejects the
    /// write.
    pub async fn on_create(&self, record: &Record) -> Result<(), SpatialError> {
        self.apply_declaration(record).await
    }

    /// Handles a record edit. Same contract as [`SpatialMetadata::on_create`];
    /// an existing extent is replaced wholesale, never merged.
    ///
    /// # Errors
    /// See [`SpatialMetadata::on_create`].
    pub async fn on_edit(&self, record: &Record) -> Result<(), SpatialError> {
        self.apply_declaration(record).await
    }

    /// Handles record deletion: removes the extent unconditionally.
    /// Removing a record that never had an extent is a no-op.
    ///
    /// # Errors
    /// Returns [`SpatialError::PersistFailed`] (or [`SpatialError::Store`]
    /// in diagnostics mode) if the store cannot remove the row.
    pub async fn on_delete(&self, record: &Record) -> Result<(), SpatialError> {
        self.remove_extent(&record.id).await
    }

    async fn apply_declaration(&self, record: &Record) -> Result<(), SpatialError> {
        if record.id.is_empty() {
            warn!("Couldn't store spatial extent because no id was provided for the record");
            return Ok(());
        }

        let Some(extra) = &record.spatial else {
            return Ok(());
        };

        match extra.state {
            ExtraState::Active => {
                debug!(record_id = %record.id, payload = %extra.value, "Received spatial declaration");
                let value = validate::decode_payload(&extra.value)?;
                let (geometry, bbox) = validate::validate_geometry(&value)?;
                self.put_extent(&Extent::new(record.id.clone(), geometry, bbox)).await
            },
            ExtraState::Deleted => self.remove_extent(&record.id).await,
        }
    }

    async fn put_extent(&self, extent: &Extent) -> Result<(), SpatialError> {
        match self.store.put(extent).await {
            Ok(()) => Ok(()),
            Err(source) if self.diagnostics => Err(SpatialError::Store { source }),
            Err(source) => Err(SpatialError::PersistFailed {
                message: source.to_string().into(),
                context: None,
            }),
        }
    }

    async fn remove_extent(&self, id: &RecordId) -> Result<(), SpatialError> {
        if id.is_empty() {
            warn!("Couldn't delete spatial extent because no id was provided for the record");
            return Ok(());
        }

        match self.store.delete(id).await {
            Ok(()) => Ok(()),
            Err(source) if self.diagnostics => Err(SpatialError::Store { source }),
            Err(source) => Err(SpatialError::PersistFailed {
                message: source.to_string().into(),
                context: None,
            }),
        }
    }
}
