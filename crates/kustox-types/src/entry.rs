//! The stored result entry and its JSON projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CellValue, QueryResult};

/// Note placed in the document when no rendered visual is attached.
pub const NO_VISUAL_NOTE: &str = "Chart visualization available in the results panel";

/// The most recent query outcome and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    /// Opaque identity, only ever compared for equality.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub result: QueryResult,
    pub database: String,
    pub cluster: String,
    pub row_count: usize,
    pub column_count: usize,
    /// Back-reference to a rendered visual. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webview_uri: Option<String>,
}

impl ResultEntry {
    pub fn new(
        id: String,
        query: String,
        result: QueryResult,
        cluster: String,
        database: String,
        webview_uri: Option<String>,
    ) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            query,
            row_count: result.row_count,
            column_count: result.columns.len(),
            result,
            database,
            cluster,
            webview_uri,
        }
    }

    /// First `len` characters of the id, for display.
    pub fn short_id(&self, len: usize) -> &str {
        match self.id.char_indices().nth(len) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// Header of the latest-result document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub cluster: String,
    pub database: String,
    pub row_count: usize,
    pub column_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
    pub execution_time: String,
    pub visualization: String,
}

/// One schema record per result column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    /// Always "string"; no type inference is attempted.
    #[serde(rename = "type")]
    pub column_type: String,
}

/// The JSON document served at the latest-result path.
///
/// `data` is the entry's rows unmodified, so decoding it yields the same JSON
/// values. `CellValue::Date` cells are written as RFC 3339 strings and decode
/// back as `CellValue::Text`, so typed equality with the source rows holds only
/// for rows without dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    pub metadata: DocumentMetadata,
    pub schema: Vec<SchemaColumn>,
    pub data: Vec<Vec<CellValue>>,
}

impl From<&ResultEntry> for ResultDocument {
    fn from(entry: &ResultEntry) -> Self {
        let visualization = entry
            .webview_uri
            .clone()
            .unwrap_or_else(|| NO_VISUAL_NOTE.to_string());

        Self {
            metadata: DocumentMetadata {
                id: entry.id.clone(),
                timestamp: entry.timestamp,
                query: entry.query.clone(),
                cluster: entry.cluster.clone(),
                database: entry.database.clone(),
                row_count: entry.row_count,
                column_count: entry.column_count,
                total_rows: entry.result.total_rows,
                execution_time: entry.result.execution_time.clone(),
                visualization,
            },
            schema: entry
                .result
                .columns
                .iter()
                .map(|name| SchemaColumn {
                    name: name.clone(),
                    column_type: "string".to_string(),
                })
                .collect(),
            data: entry.result.rows.clone(),
        }
    }
}

/// Approximate memory footprint of the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// 0 or 1.
    pub memory_count: usize,
    #[serde(rename = "totalSizeMB")]
    pub total_size_mb: f64,
}
