//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`).
//! Keep it lean: no I/O, networking, or heavy logic—just data and simple helpers.

pub mod extent;
pub mod geometry;
pub mod record;

pub use extent::Extent;
pub use geometry::{BoundingBox, Geometry, Position};
pub use record::{ExtraState, Record, RecordId, SpatialExtra};
