//! Row-oriented record tables: the tabular form a recorded track arrives in.
//!
//! A [`RecordTable`] holds a declared column list and rows of optional
//! cells. Missing values are kept as `None` so gaps stay visible; the
//! only structural change the pipeline makes is dropping columns that are
//! missing in every row.

use serde::{Deserialize, Serialize};

use crate::types::{PipelineError, Point, Route, Track};

/// A single table value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A numeric value.
    Number(f64),
    /// A boolean flag.
    Bool(bool),
    /// Free text.
    Text(String),
}

impl Cell {
    /// The numeric value, if this cell holds one.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }
}

/// One row of a [`RecordTable`], aligned with its column list.
pub type Row = Vec<Option<Cell>>;

/// A row-oriented table with an explicit column list.
///
/// Every row has exactly one slot per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RecordTable {
    /// Build a table from a column list and rows.
    ///
    /// Rows shorter than the column list are padded with missing values;
    /// extra trailing cells are discarded.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Parse a JSON array of row objects (`[{"lat": 1.0, "lon": 2.0}, ...]`).
    ///
    /// Columns appear in the order they are first seen. A key absent from
    /// a row and an explicit `null` are both treated as a missing value.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parse`] if the text is not a JSON array of
    /// objects with scalar values.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let records: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(json)?;

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(records.len());
        for mut record in records {
            let mut row = Vec::with_capacity(columns.len());
            for column in &columns {
                let cell = match record.remove(column) {
                    None | Some(serde_json::Value::Null) => None,
                    Some(value) => Some(serde_json::from_value::<Cell>(value)?),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// The declared columns, in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of `name` in the column list.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Return a table without the columns that are missing in every row.
    ///
    /// Rows are never dropped, and a missing value in a surviving column
    /// stays missing. A table with no rows loses every column.
    #[must_use]
    pub fn drop_empty_columns(&self) -> Self {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&c| self.rows.iter().any(|row| row[c].is_some()))
            .collect();

        let columns = keep.iter().map(|&c| self.columns[c].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().map(|&c| row[c].clone()).collect())
            .collect();
        Self { columns, rows }
    }

    /// Extract the track described by the `lat_column` and `lon_column`
    /// columns, one point per complete row in row order.
    ///
    /// A row missing either coordinate becomes a gap in the returned
    /// [`Track`]: it yields no point and splits the route there.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::StructuralInput`] if either column is absent or
    ///   missing in every row.
    /// - [`PipelineError::NonNumericCoordinate`] if a value is not a number.
    pub fn extract_track(&self, lat_column: &str, lon_column: &str) -> Result<Track, PipelineError> {
        let lat = self.coordinate_column(lat_column)?;
        let lon = self.coordinate_column(lon_column)?;

        let mut points = Vec::with_capacity(self.rows.len());
        let mut rows = Vec::with_capacity(self.rows.len());
        let mut gap_rows = Vec::new();
        for (row, cells) in self.rows.iter().enumerate() {
            let lat = coordinate(cells[lat].as_ref(), row, lat_column)?;
            let lon = coordinate(cells[lon].as_ref(), row, lon_column)?;
            if let (Some(lat), Some(lon)) = (lat, lon) {
                points.push(Point::new(lat, lon));
                rows.push(row);
            } else {
                gap_rows.push(row);
            }
        }

        if !gap_rows.is_empty() {
            tracing::debug!(gaps = gap_rows.len(), "rows without coordinates");
        }
        Ok(Track::new(Route::new(points), rows, gap_rows))
    }

    /// Return a table holding only the rows at `indices`, in that order.
    ///
    /// Used to carry pass-through columns along with a simplified route.
    /// Indices out of range are skipped.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Serialize the table as a JSON array of row objects.
    ///
    /// Missing values are written as `null`, so every object carries the
    /// full column list.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let object = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| {
                        let value = match cell {
                            None => serde_json::Value::Null,
                            Some(Cell::Number(n)) => serde_json::Number::from_f64(*n)
                                .map_or(serde_json::Value::Null, serde_json::Value::Number),
                            Some(Cell::Bool(b)) => serde_json::Value::Bool(*b),
                            Some(Cell::Text(s)) => serde_json::Value::String(s.clone()),
                        };
                        (column.clone(), value)
                    })
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(records)
    }

    fn coordinate_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name)
            .filter(|&c| self.rows.iter().any(|row| row[c].is_some()))
            .ok_or_else(|| PipelineError::StructuralInput {
                column: name.to_owned(),
            })
    }
}

fn coordinate(cell: Option<&Cell>, row: usize, column: &str) -> Result<Option<f64>, PipelineError> {
    cell.map(|cell| {
        cell.as_f64()
            .ok_or_else(|| PipelineError::NonNumericCoordinate {
                row,
                column: column.to_owned(),
            })
    })
    .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TRACK_JSON: &str = r#"[
        {"lat": 31.0, "lon": 121.0, "speed": 12.5, "remark": null},
        {"lat": 31.1, "lon": 121.2, "speed": null, "remark": null},
        {"lat": 31.2, "lon": 121.5, "speed": 11.0}
    ]"#;

    #[test]
    fn from_json_collects_columns_in_first_seen_order() {
        let table = RecordTable::from_json(TRACK_JSON).unwrap();
        assert_eq!(table.columns(), &["lat", "lon", "speed", "remark"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[1][2], None);
        assert_eq!(table.rows()[2][3], None);
    }

    #[test]
    fn from_json_reads_mixed_cell_types() {
        let table =
            RecordTable::from_json(r#"[{"lat": 1, "lon": 2, "name": "EVER GIVEN", "ais": true}]"#)
                .unwrap();
        assert_eq!(
            table.rows()[0],
            vec![
                Some(Cell::Number(1.0)),
                Some(Cell::Number(2.0)),
                Some(Cell::Text("EVER GIVEN".to_owned())),
                Some(Cell::Bool(true)),
            ],
        );
    }

    #[test]
    fn from_json_rejects_non_array() {
        assert!(matches!(
            RecordTable::from_json(r#"{"lat": 1}"#),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn from_json_rejects_nested_values() {
        assert!(matches!(
            RecordTable::from_json(r#"[{"lat": [1, 2], "lon": 0}]"#),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn new_pads_short_rows() {
        let table = RecordTable::new(
            vec!["lat".to_owned(), "lon".to_owned()],
            vec![vec![Some(Cell::Number(1.0))]],
        );
        assert_eq!(table.rows()[0], vec![Some(Cell::Number(1.0)), None]);
    }

    #[test]
    fn drop_empty_columns_removes_only_fully_missing_columns() {
        let table = RecordTable::from_json(TRACK_JSON).unwrap();
        let cleaned = table.drop_empty_columns();
        assert_eq!(cleaned.columns(), &["lat", "lon", "speed"]);
        assert_eq!(cleaned.row_count(), 3);
        // The partial gap in `speed` survives cleaning.
        assert_eq!(cleaned.rows()[1][2], None);
    }

    #[test]
    fn drop_empty_columns_on_empty_table() {
        let table = RecordTable::new(vec!["lat".to_owned(), "lon".to_owned()], vec![]);
        let cleaned = table.drop_empty_columns();
        assert!(cleaned.columns().is_empty());
        assert_eq!(cleaned.row_count(), 0);
    }

    #[test]
    fn extract_track_preserves_row_order() {
        let table = RecordTable::from_json(TRACK_JSON).unwrap();
        let track = table.extract_track("lat", "lon").unwrap();
        assert_eq!(track.rows(), &[0, 1, 2]);
        assert!(track.gap_rows().is_empty());
        assert_eq!(
            track.route().points(),
            &[
                Point::new(31.0, 121.0),
                Point::new(31.1, 121.2),
                Point::new(31.2, 121.5),
            ],
        );
    }

    #[test]
    fn extract_track_missing_column_is_structural() {
        let table = RecordTable::from_json(r#"[{"lat": 1.0, "speed": 3.0}]"#).unwrap();
        let err = table.extract_track("lat", "lon").unwrap_err();
        assert!(matches!(err, PipelineError::StructuralInput { ref column } if column == "lon"));
    }

    #[test]
    fn extract_track_all_missing_column_is_structural() {
        let table =
            RecordTable::from_json(r#"[{"lat": null, "lon": 1.0}, {"lat": null, "lon": 2.0}]"#)
                .unwrap();
        let err = table.extract_track("lat", "lon").unwrap_err();
        assert!(matches!(err, PipelineError::StructuralInput { ref column } if column == "lat"));
    }

    #[test]
    fn extract_track_keeps_gap_rows() {
        let table = RecordTable::from_json(
            r#"[
                {"lat": null, "lon": 0.0},
                {"lat": 1.0, "lon": 1.0},
                {"lat": 2.0, "lon": null},
                {"lat": 3.0, "lon": 3.0},
                {"lat": 4.0, "lon": 4.0}
            ]"#,
        )
        .unwrap();
        let track = table.extract_track("lat", "lon").unwrap();
        assert_eq!(track.gap_rows(), &[0, 2]);
        assert_eq!(track.rows(), &[1, 3, 4]);
        assert_eq!(track.route().len(), 3);
        assert_eq!(track.segments(), vec![0..1, 1..3]);
    }

    #[test]
    fn extract_track_rejects_text_coordinate() {
        let table = RecordTable::from_json(r#"[{"lat": "north", "lon": 1.0}]"#).unwrap();
        let err = table.extract_track("lat", "lon").unwrap_err();
        assert!(matches!(err, PipelineError::NonNumericCoordinate { row: 0, .. }));
    }

    #[test]
    fn extract_track_with_custom_column_names() {
        let table = RecordTable::from_json(r#"[{"y": 5.0, "x": 6.0}]"#).unwrap();
        let track = table.extract_track("y", "x").unwrap();
        assert_eq!(track.route().points(), &[Point::new(5.0, 6.0)]);
    }

    #[test]
    fn select_rows_keeps_columns_and_order() {
        let table = RecordTable::from_json(TRACK_JSON).unwrap();
        let selected = table.select_rows(&[0, 2]);
        assert_eq!(selected.columns(), table.columns());
        assert_eq!(selected.row_count(), 2);
        assert_eq!(selected.rows()[1][2], Some(Cell::Number(11.0)));
    }

    #[test]
    fn to_json_value_writes_nulls_for_gaps() {
        let table = RecordTable::from_json(TRACK_JSON).unwrap().drop_empty_columns();
        let value = table.to_json_value();
        assert_eq!(
            value[1],
            serde_json::json!({"lat": 31.1, "lon": 121.2, "speed": null}),
        );
    }
}
