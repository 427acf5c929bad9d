//! Free-text query rewriting against the extent index.

use crate::bbox::parse_bbox;
use crate::error::{SearchError, SearchErrorExt};
use geocat_domain::{BoundingBox, RecordId};
use geocat_storage::ExtentStore;
use tracing::debug;

/// Outcome of rewriting a search query against a bounding box parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No bbox parameter (or an empty one); the query passes through as-is.
    Unmodified,
    /// The bbox matched nothing; the downstream search can be skipped
    /// entirely instead of running a query guaranteed to return no rows.
    ShortCircuitEmpty,
    /// The query text, now constrained to the matching record ids.
    Rewritten(String),
}

/// Finds every record whose stored extent intersects `bbox`.
///
/// A pure read against the in-memory index; the result is stable for a fixed
/// store state and ordered by record id.
#[must_use]
pub fn query(store: &ExtentStore, bbox: &BoundingBox) -> Vec<RecordId> {
    store.intersecting(bbox)
}

/// Rewrites `existing_query` to additionally constrain results to the
/// records whose extents intersect the given bbox parameter.
///
/// An absent or empty parameter leaves the query untouched. A valid bbox
/// with no matching extents short-circuits; otherwise the id clause is
/// appended, with `AND` only when there is an existing query to join onto.
///
/// # Errors
/// Returns [`SearchError::InvalidBBox`] for a malformed parameter. Callers
/// must abort the search on this error rather than fall back to an
/// unfiltered query.
pub fn rewrite(
    store: &ExtentStore,
    existing_query: &str,
    bbox_param: Option<&str>,
) -> Result<RewriteOutcome, SearchError> {
    let Some(param) = bbox_param.filter(|p| !p.trim().is_empty()) else {
        return Ok(RewriteOutcome::Unmodified);
    };

    let bbox = parse_bbox(param).context(format!("bbox parameter '{param}'"))?;
    let ids = query(store, &bbox);
    if ids.is_empty() {
        debug!(bbox = %param, "No extents intersect the requested bounding box");
        return Ok(RewriteOutcome::ShortCircuitEmpty);
    }

    debug!(bbox = %param, matches = ids.len(), "Constraining search to intersecting records");
    Ok(RewriteOutcome::Rewritten(join_query(existing_query, &ids)))
}

fn join_query(existing_query: &str, ids: &[RecordId]) -> String {
    let clause = ids
        .iter()
        .map(|id| format!("id:{id}"))
        .collect::<Vec<_>>()
        .join(" OR ");

    if existing_query.is_empty() {
        format!("({clause})")
    } else {
        format!("{existing_query} AND ({clause})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_clause_joins_with_or() {
        let ids = [RecordId::new("a"), RecordId::new("b"), RecordId::new("c")];
        assert_eq!(join_query("dogs", &ids), "dogs AND (id:a OR id:b OR id:c)");
    }

    #[test]
    fn empty_query_gets_no_and_prefix() {
        let ids = [RecordId::new("a")];
        assert_eq!(join_query("", &ids), "(id:a)");
    }
}
