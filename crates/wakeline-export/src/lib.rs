//! wakeline-export: Pure format serializers (sans-IO)
//!
//! Converts pipeline output into text formats: JSON records for routes
//! and tables, and an SVG overlay of the original and simplified tracks.

pub mod json;
pub mod svg;

pub use json::{result_to_json, route_to_json, table_to_json};
pub use svg::{Projection, SvgMetadata, build_path_data, to_svg};
