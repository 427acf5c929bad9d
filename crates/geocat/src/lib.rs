//! Facade crate for the geocat spatial core.
//! Re-exports domain primitives and aggregates the feature slices.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Open an extent store with [`storage::StoreBuilder`].
//! - Wire record lifecycle events through [`features::spatial::SpatialMetadata`].
//! - Apply the spatial filter to searches with [`features::search::before_search`].

pub use geocat_domain as domain;
pub use geocat_storage as storage;

/// Feature registry.
pub mod features {
    pub use geocat_search as search;
    pub use geocat_spatial as spatial;
}
