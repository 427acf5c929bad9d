//! # Geometry Validation Module
//!
//! Pure functions that turn a raw spatial declaration into a validated
//! [`Geometry`] plus its derived [`BoundingBox`].
//!
//! ## Validation Logic
//! The process follows two strict steps, with distinct failure modes:
//! 1. **Decode**: the raw payload must be JSON at all
//!    ([`SpatialError::MalformedPayload`] otherwise) — callers render a
//!    different message for "not JSON" than for "not a legal shape".
//! 2. **Shape Check**: the value must be one of the accepted GeoJSON shapes
//!    with structurally sound coordinates
//!    ([`SpatialError::InvalidGeometry`] otherwise).

use crate::error::SpatialError;
use geocat_domain::{BoundingBox, Geometry};

/// Decodes a raw spatial declaration into a JSON value.
///
/// # Errors
/// Returns [`SpatialError::MalformedPayload`] if the payload is not valid
/// JSON.
pub fn decode_payload(raw: &str) -> Result<serde_json::Value, SpatialError> {
    serde_json::from_str(raw)
        .map_err(|e| SpatialError::MalformedPayload { message: e.to_string().into(), context: None })
}

/// Validates a decoded declaration as a legal shape and derives its bounding
/// box.
///
/// Accepts `Point`, `Polygon`, and `MultiPolygon` with numeric coordinate
/// pairs. Rejects empty coordinate arrays, rings with fewer than 4
/// positions, and coordinates that are non-finite or outside the geographic
/// range. Pure function: validating the same value twice yields the same
/// result.
///
/// # Errors
/// Returns [`SpatialError::InvalidGeometry`] describing the first violation
/// found.
pub fn validate_geometry(value: &serde_json::Value) -> Result<(Geometry, BoundingBox), SpatialError> {
    let geometry: Geometry = serde_json::from_value(value.clone())
        .map_err(|e| invalid(e.to_string()))?;

    check_shape(&geometry)?;

    let bbox = geometry
        .bounding_box()
        .ok_or_else(|| invalid("coordinates are non-finite or outside the geographic range"))?;

    Ok((geometry, bbox))
}

fn check_shape(geometry: &Geometry) -> Result<(), SpatialError> {
    match geometry {
        Geometry::Point(_) => Ok(()),
        Geometry::Polygon(rings) => check_rings(rings),
        Geometry::MultiPolygon(parts) => {
            if parts.is_empty() {
                return Err(invalid("MultiPolygon has no parts"));
            }
            parts.iter().try_for_each(|rings| check_rings(rings))
        },
    }
}

fn check_rings(rings: &[Vec<geocat_domain::Position>]) -> Result<(), SpatialError> {
    if rings.is_empty() {
        return Err(invalid("Polygon has no rings"));
    }
    for ring in rings {
        if ring.len() < 4 {
            return Err(invalid(format!(
                "ring has {} positions, at least 4 are required",
                ring.len()
            )));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> SpatialError {
    SpatialError::InvalidGeometry { message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_rejects_non_json() {
        let err = decode_payload("{ not json").unwrap_err();
        assert!(matches!(err, SpatialError::MalformedPayload { .. }));
    }

    #[test]
    fn decode_then_validate_accepts_point() {
        let value = decode_payload(r#"{"type": "Point", "coordinates": [5.0, 10.0]}"#).unwrap();
        let (geometry, bbox) = validate_geometry(&value).unwrap();
        assert_eq!(geometry.kind(), "Point");
        assert_eq!((bbox.min_lon, bbox.max_lat), (5.0, 10.0));
    }

    #[test]
    fn polygon_bbox_spans_coordinates() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[10.0, 10.0], [20.0, 10.0], [20.0, 20.0], [10.0, 10.0]]]
        });
        let (_, bbox) = validate_geometry(&value).unwrap();
        assert_eq!(bbox, BoundingBox::checked(10.0, 10.0, 20.0, 20.0).unwrap());
    }

    #[test]
    fn validation_is_idempotent() {
        let value = json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 0.0]]]]
        });
        let first = validate_geometry(&value).unwrap();
        let second = validate_geometry(&value).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn wrong_shape_is_invalid_geometry_not_malformed() {
        let value = json!({"type": "Circle", "coordinates": [0.0, 0.0]});
        let err = validate_geometry(&value).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidGeometry { .. }));
    }

    #[test]
    fn short_ring_is_rejected() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]
        });
        let err = validate_geometry(&value).unwrap_err();
        assert!(err.to_string().contains("at least 4"));
    }

    #[test]
    fn empty_coordinate_arrays_are_rejected() {
        for value in [
            json!({"type": "Polygon", "coordinates": []}),
            json!({"type": "MultiPolygon", "coordinates": []}),
        ] {
            assert!(matches!(
                validate_geometry(&value).unwrap_err(),
                SpatialError::InvalidGeometry { .. }
            ));
        }
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        let value = json!({"type": "Point", "coordinates": ["five", "ten"]});
        assert!(matches!(
            validate_geometry(&value).unwrap_err(),
            SpatialError::InvalidGeometry { .. }
        ));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let value = json!({"type": "Point", "coordinates": [200.0, 0.0]});
        let err = validate_geometry(&value).unwrap_err();
        assert!(err.to_string().contains("geographic range"));
    }
}
