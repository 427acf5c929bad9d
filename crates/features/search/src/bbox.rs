//! Bounding box parameter parsing.

use crate::error::SearchError;
use geocat_domain::BoundingBox;

/// Parses a `min_lon,min_lat,max_lon,max_lat` request parameter into a
/// validated [`BoundingBox`].
///
/// Whitespace around each component is tolerated; everything else is strict.
/// A parse failure aborts the search rather than silently returning the
/// unfiltered result set.
///
/// # Errors
/// Returns [`SearchError::InvalidBBox`] when the parameter does not split
/// into exactly four numbers, or when the numbers violate a box invariant
/// (ordering, geographic range, finiteness).
pub fn parse_bbox(param: &str) -> Result<BoundingBox, SearchError> {
    let parts: Vec<&str> = param.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(invalid(format!("expected 4 comma-separated values, got {}", parts.len())));
    }

    let mut values = [0.0_f64; 4];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|_| invalid(format!("'{part}' is not a number")))?;
    }

    let [min_lon, min_lat, max_lon, max_lat] = values;
    BoundingBox::checked(min_lon, min_lat, max_lon, max_lat)
        .ok_or_else(|| invalid("coordinates are out of range or out of order"))
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> SearchError {
    SearchError::InvalidBBox { message: message.into(), context: None }
}
