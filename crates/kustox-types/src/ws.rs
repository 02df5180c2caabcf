//! WebSocket messages pushed to presentation clients.

use serde::{Deserialize, Serialize};

use crate::FileChangeType;

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// A virtual file was written or removed.
    FileChanged { change: FileChangeType, uri: String },
    /// A new result replaced the current one.
    ResultAdded {
        id: String,
        row_count: usize,
        column_count: usize,
    },
    /// The tree listing should be re-fetched.
    TreeChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_changed_serialization() {
        let msg = WsServerMessage::FileChanged {
            change: FileChangeType::Deleted,
            uri: "kustox-ai://results/latest-result.json".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "file_changed");
        assert_eq!(json["change"], "deleted");
    }

    #[test]
    fn test_tree_changed_serialization() {
        let json = serde_json::to_string(&WsServerMessage::TreeChanged).unwrap();
        assert_eq!(json, r#"{"type":"tree_changed"}"#);
    }
}
