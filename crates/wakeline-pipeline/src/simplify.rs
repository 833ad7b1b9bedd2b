//! Track simplification using the Ramer-Douglas-Peucker algorithm.
//!
//! Reduces the waypoint count of a route by removing points that lie
//! within a given tolerance of the line between the retained points on
//! either side of them. Output is always a subsequence of the input: no
//! point is moved or interpolated.
//!
//! Recorded tracks regularly run to tens of thousands of points, so the
//! divide-and-conquer step is driven by an explicit work stack rather than
//! native recursion. Worst-case cost is still O(n²) on adversarial input.

use std::ops::Range;

use crate::distance::perpendicular_distance;
use crate::types::{PipelineError, Point, Route, SimplifiedRoute, Tolerance};

/// Simplify a route using the Ramer-Douglas-Peucker algorithm.
///
/// Interior points whose deviation from the span being considered does
/// not exceed `epsilon` are removed. The first and last points are always
/// retained. Routes with fewer than 3 points are returned unchanged.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidTolerance`] if `epsilon` is negative.
/// The check happens before any point is examined.
///
/// # Examples
///
/// ```
/// use wakeline_pipeline::{Point, Route};
/// use wakeline_pipeline::simplify::simplify;
///
/// let route = Route::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(0.0, 2.0),
///     Point::new(0.0, 3.0),
/// ]);
/// let simplified = simplify(&route, 0.0)?;
/// assert_eq!(
///     simplified.route().points(),
///     &[Point::new(0.0, 0.0), Point::new(0.0, 3.0)],
/// );
/// # Ok::<(), wakeline_pipeline::PipelineError>(())
/// ```
pub fn simplify(route: &Route, epsilon: f64) -> Result<SimplifiedRoute, PipelineError> {
    let tolerance = Tolerance::new(epsilon)?;
    let indices = simplify_indices(route.points(), tolerance);
    tracing::trace!(
        before = route.len(),
        after = indices.len(),
        epsilon,
        "simplified route"
    );
    Ok(SimplifiedRoute::from_indices(route, indices))
}

/// Simplify several independent routes with the same tolerance.
///
/// Each route is processed on its own; nothing is shared between them.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidTolerance`] if `epsilon` is negative.
pub fn simplify_routes(routes: &[Route], epsilon: f64) -> Result<Vec<SimplifiedRoute>, PipelineError> {
    let tolerance = Tolerance::new(epsilon)?;
    Ok(routes
        .iter()
        .map(|route| {
            SimplifiedRoute::from_indices(route, simplify_indices(route.points(), tolerance))
        })
        .collect())
}

/// Simplify each continuous segment of a route on its own.
///
/// `segments` are index ranges into `route`, as produced by
/// [`Track::segments`](crate::types::Track::segments). Every segment keeps
/// its own endpoints, so a gap between segments is never bridged. Points
/// outside every segment are dropped; ranges past the end are ignored.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidTolerance`] if `epsilon` is negative.
pub fn simplify_segments(
    route: &Route,
    segments: &[Range<usize>],
    epsilon: f64,
) -> Result<SimplifiedRoute, PipelineError> {
    let tolerance = Tolerance::new(epsilon)?;
    let points = route.points();
    let mut indices = Vec::new();
    for range in segments {
        let Some(span) = points.get(range.clone()) else {
            continue;
        };
        indices.extend(
            simplify_indices(span, tolerance)
                .into_iter()
                .map(|i| i + range.start),
        );
    }
    tracing::trace!(
        before = route.len(),
        after = indices.len(),
        segments = segments.len(),
        epsilon,
        "simplified segments"
    );
    Ok(SimplifiedRoute::from_indices(route, indices))
}

/// Indices of the points retained by Ramer-Douglas-Peucker, ascending.
///
/// Slices with fewer than 3 points keep every index.
#[must_use = "returns the retained indices"]
pub fn simplify_indices(points: &[Point], tolerance: Tolerance) -> Vec<usize> {
    if points.len() < 3 {
        return (0..points.len()).collect();
    }

    let last = points.len() - 1;
    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[last] = true;

    // Pending (start, end) spans. The right half is pushed first so the
    // left half of every split is processed first.
    let mut stack = vec![(0, last)];
    while let Some((start, end)) = stack.pop() {
        let Some((max_idx, max_dist)) = farthest_point(points, start, end) else {
            continue;
        };
        if max_dist > tolerance.get() {
            kept[max_idx] = true;
            stack.push((max_idx, end));
            stack.push((start, max_idx));
        }
    }

    kept.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

/// The interior point of `points[start..=end]` farthest from the line
/// through `points[start]` and `points[end]`, with its distance.
///
/// Exact ties resolve to the lowest index. Returns `None` when the span
/// has no interior points.
#[must_use]
pub fn farthest_point(points: &[Point], start: usize, end: usize) -> Option<(usize, f64)> {
    if end <= start + 1 {
        return None;
    }

    let a = points[start];
    let b = points[end];
    let mut max_dist = 0.0;
    let mut max_idx = start + 1;

    for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = perpendicular_distance(p, a, b);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    Some((max_idx, max_dist))
}
