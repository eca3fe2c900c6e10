//! Local planar projection for metric distance computation.
//!
//! Nearest-node queries and edge geometry work on planar coordinates in
//! meters, so Euclidean distance is meaningful. The projection is a local
//! equirectangular projection centered on the network centroid, fixed
//! when the graph is built. Within the coverage radius of a city-scale
//! network the round-trip error is far below a meter.

use geo::{Coord, Distance, Haversine, Point};

use crate::Error;

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Coordinates farther than this many network radii from the projection
/// center are outside the valid region.
const REGION_RADIUS_FACTOR: f64 = 3.0;

/// Lower bound on the valid-region radius, so tiny or single-node
/// networks still accept nearby coordinates.
const MIN_REGION_RADIUS_M: f64 = 1_000.0;

/// Local equirectangular projection centered on the road network.
///
/// `to_planar` and `to_geographic` are exact inverses up to float
/// rounding; distance distortion stays small as long as inputs are within
/// the valid region around the center.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    center: Point<f64>,
    cos_lat0: f64,
    /// Radius of the valid region around the center, meters.
    region_radius: f64,
}

impl LocalProjection {
    /// Fixes the projection from the node coordinates of a network: the
    /// center is the coordinate centroid, the valid region a multiple of
    /// the largest center-to-node distance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Projection`] when `points` is empty or contains a
    /// coordinate outside geographic range.
    pub fn from_points(points: &[Point<f64>]) -> Result<Self, Error> {
        if points.is_empty() {
            return Err(Error::Projection(
                "cannot fix a projection over zero coordinates".to_string(),
            ));
        }
        for point in points {
            validate_geographic(point)?;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        let center = Point::new(
            points.iter().map(|p| p.x()).sum::<f64>() / n,
            points.iter().map(|p| p.y()).sum::<f64>() / n,
        );

        let max_distance = points
            .iter()
            .map(|point| Haversine.distance(center, *point))
            .fold(0.0_f64, f64::max);

        Ok(Self {
            center,
            cos_lat0: center.y().to_radians().cos(),
            region_radius: (max_distance * REGION_RADIUS_FACTOR).max(MIN_REGION_RADIUS_M),
        })
    }

    pub fn center(&self) -> Point<f64> {
        self.center
    }

    pub fn region_radius(&self) -> f64 {
        self.region_radius
    }

    /// Whether a geographic coordinate falls inside the valid region.
    pub fn in_region(&self, point: &Point<f64>) -> bool {
        validate_geographic(point).is_ok() && Haversine.distance(self.center, *point) <= self.region_radius
    }

    /// Projects a geographic coordinate (lon/lat degrees) to planar
    /// meters relative to the projection center.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Projection`] for non-finite or out-of-range
    /// coordinates, or coordinates outside the valid region, where the
    /// projection would be degenerate.
    pub fn to_planar(&self, point: &Point<f64>) -> Result<Coord<f64>, Error> {
        validate_geographic(point)?;
        if Haversine.distance(self.center, *point) > self.region_radius {
            return Err(Error::Projection(format!(
                "coordinate ({:.5}, {:.5}) is outside the valid projection region",
                point.x(),
                point.y()
            )));
        }

        Ok(Coord {
            x: EARTH_RADIUS_M * (point.x() - self.center.x()).to_radians() * self.cos_lat0,
            y: EARTH_RADIUS_M * (point.y() - self.center.y()).to_radians(),
        })
    }

    /// Inverse of [`Self::to_planar`].
    pub fn to_geographic(&self, coord: Coord<f64>) -> Point<f64> {
        Point::new(
            self.center.x() + (coord.x / (EARTH_RADIUS_M * self.cos_lat0)).to_degrees(),
            self.center.y() + (coord.y / EARTH_RADIUS_M).to_degrees(),
        )
    }
}

fn validate_geographic(point: &Point<f64>) -> Result<(), Error> {
    let (lon, lat) = (point.x(), point.y());
    if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
        return Err(Error::Projection(format!(
            "({lon}, {lat}) is not a valid geographic coordinate"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_projection() -> LocalProjection {
        // Small cluster around central London
        let points = vec![
            Point::new(-0.118, 51.509),
            Point::new(-0.130, 51.515),
            Point::new(-0.100, 51.500),
        ];
        LocalProjection::from_points(&points).unwrap()
    }

    #[test]
    fn round_trip_within_tolerance() {
        let projection = test_projection();
        let original = Point::new(-0.1153, 51.5071);

        let planar = projection.to_planar(&original).unwrap();
        let recovered = projection.to_geographic(planar);

        let error = Haversine.distance(original, recovered);
        assert!(error < 1.0, "round-trip error {error} m exceeds tolerance");
    }

    #[test]
    fn planar_distance_approximates_ground_distance() {
        let projection = test_projection();
        let a = Point::new(-0.118, 51.509);
        let b = Point::new(-0.110, 51.512);

        let pa = projection.to_planar(&a).unwrap();
        let pb = projection.to_planar(&b).unwrap();
        let planar = ((pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2)).sqrt();
        let ground = Haversine.distance(a, b);

        assert!((planar - ground).abs() < ground * 0.01);
    }

    #[test]
    fn rejects_far_away_coordinates() {
        let projection = test_projection();
        // Sydney is far outside a London-sized region
        let err = projection.to_planar(&Point::new(151.21, -33.87)).unwrap_err();
        assert!(matches!(err, Error::Projection(_)));
        assert!(!projection.in_region(&Point::new(151.21, -33.87)));
    }

    #[test]
    fn rejects_invalid_coordinates() {
        let projection = test_projection();
        assert!(projection.to_planar(&Point::new(f64::NAN, 51.5)).is_err());
        assert!(projection.to_planar(&Point::new(-200.0, 51.5)).is_err());
        assert!(LocalProjection::from_points(&[]).is_err());
    }
}
