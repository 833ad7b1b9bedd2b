//! SVG overlay serializer.
//!
//! Renders the original route (light stroke) under the simplified route
//! (dark stroke, one marker per retained waypoint) using the [`svg`]
//! crate for document construction, XML escaping, and path data
//! formatting.
//!
//! Coordinates are projected planar and north-up: longitude grows to the
//! right, latitude grows upward. Both routes share one [`Projection`]
//! fitted to the original route, so they line up exactly. Each route is
//! drawn one `<path>` per continuous segment, so gaps in the recording
//! stay visible instead of being bridged by a straight line.
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>`, and `<metadata>`
//! elements so exported files identify the vessel and settings.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Path, Title};
use svg::node::{Node, Text, Value};

use wakeline_pipeline::{Point, ProcessResult};

/// Length of the longer side of the drawing area, in SVG user units.
const DRAWING_SIZE: f64 = 800.0;
/// Blank border around the drawing area, in SVG user units.
const MARGIN: f64 = 20.0;

const ORIGINAL_STROKE: &str = "#9ecae1";
const SIMPLIFIED_STROKE: &str = "#08306b";
const MARKER_RADIUS: f64 = 3.0;

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped automatically by
/// the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the vessel name or the input file stem.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized pipeline configuration, emitted inside `<metadata>` as a
    /// namespaced `<wakeline:pipeline>` element so the settings that
    /// produced the overlay can be recovered.
    pub config_json: Option<&'a str>,
}

/// Mapping from route coordinates to SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    min_lon: f64,
    max_lat: f64,
    scale: f64,
    width: f64,
    height: f64,
}

impl Projection {
    /// Fit a projection to the bounding box of `points`.
    ///
    /// The longer side of the box spans 800 user units; the aspect
    /// ratio is preserved. Degenerate boxes (a single point, or no points)
    /// get a unit scale.
    #[must_use]
    pub fn fit(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self {
                min_lon: 0.0,
                max_lat: 0.0,
                scale: 1.0,
                width: 2.0 * MARGIN,
                height: 2.0 * MARGIN,
            };
        };

        let (mut min_lat, mut max_lat) = (first.lat, first.lat);
        let (mut min_lon, mut max_lon) = (first.lon, first.lon);
        for p in &points[1..] {
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
            min_lon = min_lon.min(p.lon);
            max_lon = max_lon.max(p.lon);
        }

        let lat_span = max_lat - min_lat;
        let lon_span = max_lon - min_lon;
        let span = lat_span.max(lon_span);
        let scale = if span > 0.0 { DRAWING_SIZE / span } else { 1.0 };

        Self {
            min_lon,
            max_lat,
            scale,
            width: lon_span.mul_add(scale, 2.0 * MARGIN),
            height: lat_span.mul_add(scale, 2.0 * MARGIN),
        }
    }

    /// Project a point to `(x, y)` in SVG user units.
    #[must_use]
    pub fn project(&self, point: Point) -> (f64, f64) {
        (
            (point.lon - self.min_lon).mul_add(self.scale, MARGIN),
            (self.max_lat - point.lat).mul_add(self.scale, MARGIN),
        )
    }

    /// Document width including margins.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Document height including margins.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }
}

/// Build an SVG path `d` attribute string from a run of points.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for fewer than 2 points.
///
/// # Examples
///
/// ```
/// use wakeline_pipeline::{Point, Route};
/// use wakeline_export::{Projection, build_path_data};
///
/// let route = Route::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
/// let projection = Projection::fit(route.points());
/// assert_eq!(build_path_data(route.points(), &projection), "M20,820 L820,20");
/// ```
#[must_use]
pub fn build_path_data(points: &[Point], projection: &Projection) -> String {
    if points.len() < 2 {
        return String::new();
    }

    let mut data = Data::new().move_to(projection.project(points[0]));
    for &p in &points[1..] {
        data = data.line_to(projection.project(p));
    }
    String::from(Value::from(data))
}

fn segment_path(
    points: &[Point],
    projection: &Projection,
    stroke: &str,
    width: f64,
) -> Option<Path> {
    let d = build_path_data(points, projection);
    if d.is_empty() {
        return None;
    }
    Some(
        Path::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", stroke)
            .set("stroke-width", width)
            .set("stroke-linejoin", "round"),
    )
}

/// Render a pipeline result as an SVG overlay.
///
/// The original route is drawn first so the simplified route sits on
/// top. Each retained waypoint gets a circle marker, so a route reduced
/// to a single point is still visible.
#[must_use]
pub fn to_svg(result: &ProcessResult, metadata: &SvgMetadata<'_>) -> String {
    let simplified = result.simplified.route();
    let projection = if result.original.is_empty() {
        Projection::fit(simplified.points())
    } else {
        Projection::fit(result.original.points())
    };
    let (w, h) = (projection.width(), projection.height());

    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", format!("0 0 {w} {h}"));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut pipeline_el = Element::new("wakeline:pipeline");
        pipeline_el.assign("xmlns:wakeline", "urn:wakeline:pipeline:1");
        pipeline_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(pipeline_el);
        doc = doc.add(metadata_el);
    }

    let mut underlay = Group::new().set("id", "original");
    for segment in result.original_segments() {
        if let Some(path) = segment_path(segment, &projection, ORIGINAL_STROKE, 2.0) {
            underlay = underlay.add(path);
        }
    }
    doc = doc.add(underlay);

    let mut overlay = Group::new().set("id", "simplified");
    for segment in result.simplified_segments() {
        if let Some(path) = segment_path(segment, &projection, SIMPLIFIED_STROKE, 1.5) {
            overlay = overlay.add(path);
        }
    }
    for &p in simplified.points() {
        let (cx, cy) = projection.project(p);
        overlay = overlay.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", MARKER_RADIUS)
                .set("fill", SIMPLIFIED_STROKE),
        );
    }
    doc = doc.add(overlay);

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wakeline_pipeline::{PipelineConfig, process_json};

    fn result(json: &str, epsilon: f64) -> ProcessResult {
        let config = PipelineConfig {
            epsilon,
            ..PipelineConfig::default()
        };
        process_json(json, &config).unwrap()
    }

    const TRACK: &str = r#"[
        {"lat": 0.0, "lon": 0.0},
        {"lat": 0.0, "lon": 1.0},
        {"lat": 1.0, "lon": 1.0},
        {"lat": 0.0, "lon": 2.0}
    ]"#;

    #[test]
    fn projection_is_north_up() {
        let projection = Projection::fit(&[Point::new(10.0, 100.0), Point::new(12.0, 101.0)]);
        let (_, y_south) = projection.project(Point::new(10.0, 100.0));
        let (_, y_north) = projection.project(Point::new(12.0, 100.0));
        assert!(y_north < y_south);
    }

    #[test]
    fn projection_preserves_aspect_ratio() {
        let projection = Projection::fit(&[Point::new(0.0, 0.0), Point::new(1.0, 2.0)]);
        assert!((projection.width() - (DRAWING_SIZE + 2.0 * MARGIN)).abs() < 1e-9);
        assert!((projection.height() - (DRAWING_SIZE / 2.0 + 2.0 * MARGIN)).abs() < 1e-9);
    }

    #[test]
    fn single_point_projection_is_finite() {
        let projection = Projection::fit(&[Point::new(5.0, 5.0)]);
        let (x, y) = projection.project(Point::new(5.0, 5.0));
        assert!((x - MARGIN).abs() < 1e-9);
        assert!((y - MARGIN).abs() < 1e-9);
    }

    #[test]
    fn path_data_needs_two_points() {
        let points = [Point::new(1.0, 1.0)];
        assert!(build_path_data(&points, &Projection::fit(&points)).is_empty());
    }

    #[test]
    fn gaps_break_both_routes() {
        let svg = to_svg(
            &result(
                r#"[
                    {"lat": 0.0, "lon": 0.0},
                    {"lat": 0.0, "lon": 1.0},
                    {"lat": null, "lon": 1.5},
                    {"lat": 1.0, "lon": 2.0},
                    {"lat": 1.0, "lon": 3.0}
                ]"#,
                0.1,
            ),
            &SvgMetadata::default(),
        );
        assert_eq!(svg.matches("<path").count(), 4);
        assert_eq!(svg.matches("<circle").count(), 4);
    }

    #[test]
    fn overlay_has_both_routes_and_markers() {
        let svg = to_svg(&result(TRACK, 0.8), &SvgMetadata::default());
        assert!(svg.starts_with("<?xml"));
        assert_eq!(svg.matches("<path").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains(ORIGINAL_STROKE));
        assert!(svg.contains(SIMPLIFIED_STROKE));
    }

    #[test]
    fn original_is_drawn_beneath_simplified() {
        let svg = to_svg(&result(TRACK, 5.0), &SvgMetadata::default());
        let original = svg.find("id=\"original\"").unwrap();
        let simplified = svg.find("id=\"simplified\"").unwrap();
        assert!(original < simplified);
    }

    #[test]
    fn single_waypoint_renders_marker_only() {
        let svg = to_svg(
            &result(r#"[{"lat": 3.0, "lon": 4.0}]"#, 0.1),
            &SvgMetadata::default(),
        );
        assert!(!svg.contains("<path"));
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    #[test]
    fn metadata_is_escaped() {
        let metadata = SvgMetadata {
            title: Some("ORIENT <STAR>"),
            description: Some("epsilon=0.06 & clean"),
            config_json: Some(r#"{"epsilon":0.06}"#),
        };
        let svg = to_svg(&result(TRACK, 0.8), &metadata);
        assert!(svg.contains("<title>ORIENT &lt;STAR&gt;</title>"));
        assert!(svg.contains("epsilon=0.06 &amp; clean"));
        assert!(svg.contains("<metadata>"));
        assert!(svg.contains("xmlns:wakeline=\"urn:wakeline:pipeline:1\""));
    }
}
