//! Point-to-line distance used by the simplifier.
//!
//! Latitude and longitude are treated as planar Cartesian coordinates.
//! Over long tracks this accumulates geodesic distortion; callers that
//! need metric accuracy must project their coordinates first.

use crate::types::Point;

/// Perpendicular distance from point `p` to the infinite line through `a`
/// and `b`.
///
/// Uses the formula: |cross(b-a, p-a)| / |b-a|.
/// When `a` and `b` coincide, returns the distance from `p` to `a`.
///
/// # Examples
///
/// ```
/// use wakeline_pipeline::Point;
/// use wakeline_pipeline::distance::perpendicular_distance;
///
/// let d = perpendicular_distance(
///     Point::new(1.0, 3.0),
///     Point::new(0.0, 0.0),
///     Point::new(2.0, 0.0),
/// );
/// assert!((d - 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dlat = b.lat - a.lat;
    let dlon = b.lon - a.lon;
    let length_sq = dlat.mul_add(dlat, dlon * dlon);

    if length_sq == 0.0 {
        // a and b are the same point.
        return p.distance(a);
    }

    let cross = dlat.mul_add(a.lon - p.lon, -(dlon * (a.lat - p.lat)));
    cross.abs() / length_sq.sqrt()
}
