//! A sandboxed, file-backed store for record extents.
//! It owns the persisted spatial footprint of every catalog record — exactly
//! one row per record id — and answers bounding-box intersection queries from
//! an in-memory index. All examples use temporary directories to avoid
//! writing to the real filesystem.
//!
//! # Core Features
//!
//! - **Atomic Upserts**: Uses an "atomic swap" pattern (unique temp write +
//!   `fsync` + `rename`), so a reader never observes a row whose geometry and
//!   bounding box come from different writes.
//! - **Idempotent Deletes**: Deleting a record with no extent is a no-op; the
//!   extent's lifecycle is entirely driven by the owning record's.
//! - **Sharded Layout**: Rows are sharded on the first characters of the
//!   record id to keep directory fan-out flat for large catalogs.
//! - **Indexed Queries**: `intersecting` is a synchronous scan of the
//!   in-memory bounding-box index, rebuilt from disk at connect time.
//! - **Self-Healing**: Orphaned temporary files are cleaned up during
//!   initialization.
//!
//! # Architectural Overview
//!
//! 1.  **[`ExtentStore`]**: The primary thread-safe handle and entry point.
//! 2.  **[`StoreBuilder`]**: A type-safe fluent builder for configuration.
//!
//! # Examples
//!
//! ```rust
//! use geocat_domain::{BoundingBox, Extent, Geometry};
//! use geocat_storage::{ExtentStore, StoreError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StoreError> {
//!     // Use a temp directory for examples/tests
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("extents");
//!     let store = ExtentStore::builder()
//!         .root(&root)
//!         .create(true)
//!         .connect()
//!         .await?;
//!
//!     let geometry = Geometry::Polygon(vec![vec![
//!         [10.0, 10.0], [20.0, 10.0], [20.0, 20.0], [10.0, 20.0], [10.0, 10.0],
//!     ]]);
//!     let bbox = geometry.bounding_box().unwrap();
//!
//!     // Upsert, point read, bbox query
//!     store.put(&Extent::new("dataset-a", geometry, bbox)).await?;
//!     assert!(store.get(&"dataset-a".into()).await?.is_some());
//!
//!     let query = BoundingBox::checked(15.0, 15.0, 16.0, 16.0).unwrap();
//!     assert_eq!(store.intersecting(&query).len(), 1);
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod layout;
mod maintenance;

pub use builder::StoreBuilder;
pub use engine::ExtentStore;
pub use error::{StoreError, StoreErrorExt};
