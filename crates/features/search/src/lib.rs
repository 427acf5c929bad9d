//! Bounding-box search feature slice.
//!
//! Sits between the catalog's search surface and the extent store: an
//! incoming search may carry a `min_lon,min_lat,max_lon,max_lat` parameter,
//! and this slice rewrites the free-text query so the downstream engine only
//! returns records whose stored extents intersect that box.
//!
//! The spatial filter is approximate on purpose, box-vs-box against each
//! record's stored bounding box, never the full polygon.

pub mod bbox;
mod error;
pub mod rewrite;

pub use crate::bbox::parse_bbox;
pub use crate::error::{SearchError, SearchErrorExt};
pub use crate::rewrite::{RewriteOutcome, query, rewrite};

use geocat_storage::ExtentStore;

/// The mutable slice of a search request this feature operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text query, possibly empty.
    pub query: String,
    /// Raw bounding box parameter, verbatim from the request.
    pub bbox: Option<String>,
    /// Set when the search is known to return nothing; the caller must skip
    /// the downstream engine instead of executing the query.
    pub abort_search: bool,
}

/// Applies the spatial filter to a search request in place.
///
/// On a matching bbox the query text is rewritten; on a bbox that matches
/// nothing `abort_search` is raised and the query is left untouched; without
/// a bbox parameter the request passes through unchanged.
///
/// # Errors
/// Returns [`SearchError::InvalidBBox`] for a malformed bbox parameter. The
/// request must fail outright: silently dropping the filter would return
/// too-broad results.
pub fn before_search(store: &ExtentStore, params: &mut SearchParams) -> Result<(), SearchError> {
    match rewrite(store, &params.query, params.bbox.as_deref())? {
        RewriteOutcome::Unmodified => {},
        RewriteOutcome::ShortCircuitEmpty => params.abort_search = true,
        RewriteOutcome::Rewritten(query) => params.query = query,
    }
    Ok(())
}
