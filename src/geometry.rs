//! Field Geometry
//!
//! Field boundary rings and their geodesic area.
//!
//! The ring is held as a `geo::LineString` of (longitude, latitude) degrees.
//! Area is the Chamberlain-Duquette spherical-excess approximation on the
//! WGS84 equatorial radius, the same one web-mapping libraries use for
//! polygon area.

use crate::error::{Result, VerificationError};
use crate::providers::GeometryProvider;
use geo::{ChamberlainDuquetteArea, Coord, LineString, MultiPoint, Point, Polygon, RemoveRepeatedPoints};
use serde::{Deserialize, Serialize};

/// WGS84 equatorial radius in metres
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

pub const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;

/// Closed ring of (longitude, latitude) pairs in degrees
///
/// Serialized as a plain `[[lon, lat], ...]` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct FieldBoundary {
    ring: LineString<f64>,
}

impl From<Vec<[f64; 2]>> for FieldBoundary {
    fn from(ring: Vec<[f64; 2]>) -> Self {
        Self::new(ring)
    }
}

impl From<FieldBoundary> for Vec<[f64; 2]> {
    fn from(boundary: FieldBoundary) -> Self {
        boundary.to_ring()
    }
}

impl FieldBoundary {
    /// Wrap a ring without validating it
    pub fn new(ring: Vec<[f64; 2]>) -> Self {
        Self {
            ring: LineString::from(ring),
        }
    }

    /// Build a boundary and validate it in one step
    pub fn try_new(ring: Vec<[f64; 2]>) -> Result<Self> {
        let boundary = Self::new(ring);
        boundary.validate()?;
        Ok(boundary)
    }

    pub fn line_string(&self) -> &LineString<f64> {
        &self.ring
    }

    /// Vertices as `[lon, lat]` pairs, closing vertex included
    pub fn to_ring(&self) -> Vec<[f64; 2]> {
        self.ring.coords().map(|c| [c.x, c.y]).collect()
    }

    /// Number of distinct vertices, closing vertex excluded
    pub fn distinct_vertex_count(&self) -> usize {
        let coords: &[Coord<f64>] = &self.ring.0;
        let open = match coords.split_last() {
            Some((_, rest)) => rest,
            None => return 0,
        };
        // Coord equality is f64 `==`, so signed zeros count once
        MultiPoint::new(open.iter().copied().map(Point::from).collect())
            .remove_repeated_points()
            .0
            .len()
    }

    /// Reject rings that are not closed, have fewer than three distinct
    /// vertices, or carry non-finite / out-of-range coordinates
    pub fn validate(&self) -> Result<()> {
        for (idx, coord) in self.ring.coords().enumerate() {
            let (lon, lat) = coord.x_y();
            if !lon.is_finite() || !lat.is_finite() {
                return Err(VerificationError::InvalidGeometry(format!(
                    "vertex {} has a non-finite coordinate ({}, {})",
                    idx, lon, lat
                )));
            }
            if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                return Err(VerificationError::InvalidGeometry(format!(
                    "vertex {} is outside longitude/latitude range ({}, {})",
                    idx, lon, lat
                )));
            }
        }

        let (first, last) = match (self.ring.0.first(), self.ring.0.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(VerificationError::InvalidGeometry(
                    "boundary has no vertices".to_string(),
                ))
            }
        };
        if !self.ring.is_closed() {
            return Err(VerificationError::InvalidGeometry(format!(
                "boundary ring is not closed: first vertex {:?} differs from last vertex {:?}",
                first.x_y(),
                last.x_y()
            )));
        }

        let distinct = self.distinct_vertex_count();
        if distinct < 3 {
            return Err(VerificationError::InvalidGeometry(format!(
                "boundary needs at least 3 distinct vertices, found {}",
                distinct
            )));
        }

        Ok(())
    }

    /// Geodesic area in square metres (ring assumed valid)
    pub fn area_square_metres(&self) -> f64 {
        if self.ring.0.len() < 4 {
            return 0.0;
        }
        Polygon::new(self.ring.clone(), vec![]).chamberlain_duquette_unsigned_area()
    }

    pub fn area_hectares(&self) -> f64 {
        self.area_square_metres() / SQUARE_METRES_PER_HECTARE
    }
}

/// Default geometry collaborator: spherical geodesic area of the ring
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalAreaProvider;

impl GeometryProvider for SphericalAreaProvider {
    fn area_hectares(&self, boundary: &FieldBoundary) -> Result<f64> {
        Ok(boundary.area_hectares())
    }
}
