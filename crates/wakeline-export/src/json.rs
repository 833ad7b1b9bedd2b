//! JSON record serializers.
//!
//! Routes are written as ordered arrays of `{"lat": .., "lon": ..}`
//! objects, tables as ordered arrays of row objects with `null` for
//! missing values. Point order is never changed.

use serde::Serialize;

use wakeline_pipeline::{ProcessResult, RecordTable, Route};

/// Serialize a route as a JSON array of `{lat, lon}` records.
///
/// # Examples
///
/// ```
/// use wakeline_pipeline::{Point, Route};
/// use wakeline_export::route_to_json;
///
/// let route = Route::new(vec![Point::new(1.5, 2.0), Point::new(3.0, 4.25)]);
/// assert_eq!(
///     route_to_json(&route)?,
///     r#"[{"lat":1.5,"lon":2.0},{"lat":3.0,"lon":4.25}]"#,
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn route_to_json(route: &Route) -> serde_json::Result<String> {
    serde_json::to_string(route)
}

/// Serialize a table as a JSON array of row objects.
///
/// Columns keep their table order within each object.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn table_to_json(table: &RecordTable) -> serde_json::Result<String> {
    serde_json::to_string(&table.to_json_value())
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    original: &'a Route,
    simplified: &'a Route,
    source_indices: &'a [usize],
    segments: Vec<[usize; 2]>,
    gap_rows: &'a [usize],
}

/// Serialize both routes of a pipeline result as one pretty-printed
/// document: `{"original": [...], "simplified": [...], "source_indices": [...],
/// "segments": [[start, end], ...], "gap_rows": [...]}`.
///
/// `segments` are half-open index ranges into `original`; `gap_rows` are
/// cleaned-table rows with no usable coordinate.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn result_to_json(result: &ProcessResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ResultRecord {
        original: &result.original,
        simplified: result.simplified.route(),
        source_indices: result.simplified.source_indices(),
        segments: result.segments.iter().map(|r| [r.start, r.end]).collect(),
        gap_rows: &result.gap_rows,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wakeline_pipeline::{PipelineConfig, process_json};

    #[test]
    fn empty_route_is_empty_array() {
        assert_eq!(route_to_json(&Route::default()).unwrap(), "[]");
    }

    #[test]
    fn table_rows_keep_column_order_and_nulls() {
        let table =
            RecordTable::from_json(r#"[{"lon": 2.0, "lat": 1.0, "name": "A"}, {"lat": 3.0}]"#)
                .unwrap();
        assert_eq!(
            table_to_json(&table).unwrap(),
            r#"[{"lon":2.0,"lat":1.0,"name":"A"},{"lon":null,"lat":3.0,"name":null}]"#,
        );
    }

    #[test]
    fn result_document_carries_both_routes() {
        let json = r#"[
            {"lat": 0.0, "lon": 0.0},
            {"lat": 0.0, "lon": 1.0},
            {"lat": 0.0, "lon": 2.0}
        ]"#;
        let result = process_json(json, &PipelineConfig::default()).unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&result_to_json(&result).unwrap()).unwrap();

        assert_eq!(doc["original"].as_array().unwrap().len(), 3);
        assert_eq!(doc["simplified"].as_array().unwrap().len(), 2);
        assert_eq!(doc["simplified"][1]["lon"], 2.0);
        assert_eq!(doc["source_indices"], serde_json::json!([0, 2]));
        assert_eq!(doc["segments"], serde_json::json!([[0, 3]]));
        assert_eq!(doc["gap_rows"], serde_json::json!([]));
    }

    #[test]
    fn result_document_records_gaps() {
        let json = r#"[
            {"lat": 0.0, "lon": 0.0},
            {"lat": null, "lon": 0.5},
            {"lat": 0.0, "lon": 1.0},
            {"lat": 0.0, "lon": 2.0},
            {"lat": 0.0, "lon": null}
        ]"#;
        let result = process_json(json, &PipelineConfig::default()).unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&result_to_json(&result).unwrap()).unwrap();

        assert_eq!(doc["original"].as_array().unwrap().len(), 3);
        assert_eq!(doc["segments"], serde_json::json!([[0, 1], [1, 3]]));
        assert_eq!(doc["gap_rows"], serde_json::json!([1, 4]));
        assert_eq!(doc["source_indices"], serde_json::json!([0, 1, 2]));
    }
}
