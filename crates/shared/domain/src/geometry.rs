//! Geographic shapes and their axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

/// A single `[longitude, latitude]` coordinate pair, GeoJSON axis order.
pub type Position = [f64; 2];

/// A spatial shape in a geographic coordinate reference system.
///
/// The serialized form follows the GeoJSON geometry layout:
/// `{"type": "Polygon", "coordinates": [...]}`. Only the three shapes the
/// catalog accepts are represented; anything else fails deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Computes the axis-aligned bounding box over every coordinate pair
    /// across all rings and parts.
    ///
    /// Returns `None` when the shape contains no coordinates at all, or when
    /// any coordinate is non-finite or outside the geographic range — such
    /// shapes have no meaningful box.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;

        self.for_each_position(&mut |[lon, lat]| {
            let (min_lon, min_lat, max_lon, max_lat) =
                bounds.get_or_insert((lon, lat, lon, lat));
            *min_lon = min_lon.min(lon);
            *min_lat = min_lat.min(lat);
            *max_lon = max_lon.max(lon);
            *max_lat = max_lat.max(lat);
        });

        let (min_lon, min_lat, max_lon, max_lat) = bounds?;
        BoundingBox::checked(min_lon, min_lat, max_lon, max_lat)
    }

    /// Visits every coordinate pair in the shape, in declaration order.
    pub fn for_each_position(&self, f: &mut impl FnMut(Position)) {
        match self {
            Self::Point(p) => f(*p),
            Self::Polygon(rings) => {
                rings.iter().flatten().for_each(|p| f(*p));
            },
            Self::MultiPolygon(parts) => {
                parts.iter().flatten().flatten().for_each(|p| f(*p));
            },
        }
    }

    /// Human-readable shape name, matching the GeoJSON `type` tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

/// An axis-aligned geographic rectangle `(min_lon, min_lat, max_lon, max_lat)`.
///
/// Invariants (enforced by [`BoundingBox::checked`]): `min_lon <= max_lon`,
/// `min_lat <= max_lat`, latitudes in `[-90, 90]`, longitudes in
/// `[-180, 180]`, all values finite. Longitudes do not wrap; a region
/// crossing the antimeridian must be expressed as two boxes by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Constructs a box, returning `None` if any invariant is violated.
    #[must_use]
    pub fn checked(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Option<Self> {
        let values = [min_lon, min_lat, max_lon, max_lat];
        if values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        if min_lon > max_lon || min_lat > max_lat {
            return None;
        }
        if min_lon < -180.0 || max_lon > 180.0 || min_lat < -90.0 || max_lat > 90.0 {
            return None;
        }
        Some(Self { min_lon, min_lat, max_lon, max_lat })
    }

    /// Axis-aligned box intersection test. Touching edges count as
    /// intersecting.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }
}
