//! Query results as handed over by the query executor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single scalar cell in a result row.
///
/// Dates are produced by executors but arrive over the wire as plain text,
/// so the `Date` variant is never chosen when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    #[serde(skip_deserializing)]
    Date(DateTime<Utc>),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(d: DateTime<Utc>) -> Self {
        CellValue::Date(d)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// Outcome of a single query execution.
///
/// Missing or `null` `columns` and `rows` decode as empty rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rows: Vec<Vec<CellValue>>,
    #[serde(default)]
    pub row_count: usize,
    /// Total rows on the backend when `rows` was truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
    /// Formatted duration, e.g. "0.42s".
    #[serde(default)]
    pub execution_time: String,
    #[serde(default)]
    pub has_data: bool,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl QueryResult {
    /// Build a result, deriving `row_count` and `has_data` from `rows`.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        execution_time: impl Into<String>,
    ) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            total_rows: None,
            execution_time: execution_time.into(),
            has_data: row_count > 0,
        }
    }

    /// Mark this result as a truncated view of `total` backend rows.
    pub fn with_total_rows(mut self, total: usize) -> Self {
        self.total_rows = Some(total);
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.total_rows.is_some_and(|total| total > self.row_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_derives_counts() {
        let result = QueryResult::new(
            vec!["A".into(), "B".into()],
            vec![vec![1i64.into(), "x".into()], vec![2i64.into(), "y".into()]],
            "0.1s",
        );
        assert_eq!(result.row_count, 2);
        assert!(result.has_data);
        assert_eq!(result.column_count(), 2);
        assert!(!result.is_truncated());

        let empty = QueryResult::new(vec![], vec![], "0s");
        assert!(!empty.has_data);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let result: QueryResult = serde_json::from_value(json!({ "rowCount": 3 })).unwrap();
        assert!(result.columns.is_empty());
        assert!(result.rows.is_empty());
        assert_eq!(result.row_count, 3);
        assert_eq!(result.total_rows, None);
    }

    #[test]
    fn test_null_columns_and_rows_decode_as_empty() {
        let result: QueryResult =
            serde_json::from_value(json!({ "columns": null, "rows": null, "rowCount": 0 })).unwrap();
        assert!(result.columns.is_empty());
        assert!(result.rows.is_empty());
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn test_cell_values_decode_by_shape() {
        let row: Vec<CellValue> =
            serde_json::from_value(json!([null, true, 7, 1.5, "2024-01-01T00:00:00Z"])).unwrap();
        assert_eq!(
            row,
            vec![
                CellValue::Null,
                CellValue::Bool(true),
                CellValue::Integer(7),
                CellValue::Number(1.5),
                CellValue::Text("2024-01-01T00:00:00Z".into()),
            ]
        );
    }

    #[test]
    fn test_truncated() {
        let result = QueryResult::new(vec!["A".into()], vec![vec![1i64.into()]], "1s")
            .with_total_rows(500);
        assert!(result.is_truncated());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["totalRows"], 500);
    }
}
