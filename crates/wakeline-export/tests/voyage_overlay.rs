//! Integration test: run a recorded voyage through the full pipeline and
//! export the result as JSON records and an SVG overlay.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use wakeline_export::{SvgMetadata, result_to_json, table_to_json, to_svg};
use wakeline_pipeline::{PipelineConfig, RecordTable, process_staged};

/// A coastal leg: a long straight run with a dog-leg in the middle,
/// recorded at roughly even intervals, plus an all-null column.
fn voyage_json() -> String {
    let mut rows = Vec::new();
    for i in 0..=40_u32 {
        let t = f64::from(i) * 0.05;
        // Bulge of 0.5 degrees between samples 15 and 25.
        let bulge = if (15..=25).contains(&i) { 0.5 } else { 0.0 };
        rows.push(format!(
            r#"{{"lat": {}, "lon": {}, "speed": {}, "remark": null}}"#,
            30.0 + bulge,
            120.0 + t,
            10.0 + f64::from(i % 3),
        ));
    }
    format!("[{}]", rows.join(","))
}

#[test]
fn voyage_pipeline_to_json_and_svg() {
    let table = RecordTable::from_json(&voyage_json()).unwrap();
    let config = PipelineConfig::default();
    let staged = process_staged(table, &config).expect("pipeline should succeed");

    assert_eq!(staged.original.len(), 41);
    assert!(staged.cleaned.column_index("remark").is_none());

    // The dog-leg corners survive; the straight runs collapse.
    let indices = staged.simplified.source_indices().to_vec();
    assert_eq!(indices, vec![0, 14, 15, 25, 26, 40]);

    // Pass-through columns follow the retained waypoints.
    let rows: serde_json::Value =
        serde_json::from_str(&table_to_json(&staged.simplified_rows).unwrap()).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), indices.len());
    assert_eq!(rows[1]["speed"], 12.0);
    assert!(rows[1].get("remark").is_none());

    let result = staged.into_process_result();
    let doc: serde_json::Value = serde_json::from_str(&result_to_json(&result).unwrap()).unwrap();
    assert_eq!(doc["original"].as_array().unwrap().len(), 41);
    assert_eq!(doc["simplified"].as_array().unwrap().len(), 6);

    let config_json = serde_json::to_string(&config).unwrap();
    let svg = to_svg(
        &result,
        &SvgMetadata {
            title: Some("coastal leg"),
            description: None,
            config_json: Some(&config_json),
        },
    );
    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
    assert!(svg.contains("<title>coastal leg</title>"));
    assert_eq!(svg.matches("<circle").count(), 6);
}
