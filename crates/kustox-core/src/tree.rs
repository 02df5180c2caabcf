//! Flat tree projection of the result store.

use crate::{EventEmitter, ResultStore, Subscription};
use kustox_types::{FileChangeType, ResultEntry, TreeCommand, TreeItem, TreeItemKind};
use std::sync::Arc;
use tracing::debug;

/// Number of id characters shown in a result label.
const LABEL_ID_LEN: usize = 8;

/// Command id attached to the result item.
pub const OPEN_RESULT_COMMAND: &str = "kustox.openResult";

/// What the tree currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Empty,
    HasResult,
}

/// Observes the store and projects it into at most one display item.
///
/// Holds no copy of the entry; every listing is derived from the store.
pub struct TreeSynchronizer {
    store: Arc<ResultStore>,
    tree_changed: Arc<EventEmitter<()>>,
    _subscriptions: Vec<Subscription>,
}

impl TreeSynchronizer {
    pub fn new(store: Arc<ResultStore>) -> Self {
        let tree_changed = Arc::new(EventEmitter::new("tree_changed"));

        let on_added = {
            let tree_changed = tree_changed.clone();
            store.on_did_add_result(move |entry: &ResultEntry| {
                debug!(target: "kustox::tree", "Result {} added, refreshing", entry.id);
                tree_changed.fire(&());
            })
        };

        let on_cleared = {
            let tree_changed = tree_changed.clone();
            store.on_did_change_file(move |event| {
                if event.change == FileChangeType::Deleted && event.uri.is_latest() {
                    debug!(target: "kustox::tree", "Latest result removed, refreshing");
                    tree_changed.fire(&());
                }
            })
        };

        Self {
            store,
            tree_changed,
            _subscriptions: vec![on_added, on_cleared],
        }
    }

    /// Listen for "re-fetch the listing" notifications.
    pub fn on_did_change_tree_data<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&()) + Send + Sync + 'static,
    {
        self.tree_changed.subscribe(listener)
    }

    /// Force listeners to re-fetch.
    pub fn refresh(&self) {
        self.tree_changed.fire(&());
    }

    pub fn state(&self) -> TreeState {
        if self.store.has_result() {
            TreeState::HasResult
        } else {
            TreeState::Empty
        }
    }

    /// Root request (`None`) yields exactly one item. Items have no children.
    pub fn get_children(&self, element: Option<&TreeItem>) -> Vec<TreeItem> {
        if element.is_some() {
            return Vec::new();
        }

        match self.store.get_current_result() {
            Some(entry) => vec![self.result_item(&entry)],
            None => vec![placeholder_item()],
        }
    }

    fn result_item(&self, entry: &ResultEntry) -> TreeItem {
        let mut tooltip = format!(
            "Query: {}\nCluster: {}\nDatabase: {}\nExecution time: {}",
            entry.query, entry.cluster, entry.database, entry.result.execution_time
        );
        if let Some(total) = entry.result.total_rows.filter(|_| entry.result.is_truncated()) {
            tooltip.push_str(&format!("\nShowing {} of {} rows", entry.row_count, total));
        }

        TreeItem {
            kind: TreeItemKind::Result,
            label: format!("Result {}", entry.short_id(LABEL_ID_LEN)),
            description: Some(format!("{} rows • {}", entry.row_count, entry.database)),
            tooltip: Some(tooltip),
            command: Some(TreeCommand {
                command: OPEN_RESULT_COMMAND.to_string(),
                title: "Open Result".to_string(),
                uri: self.store.latest_uri().to_string(),
            }),
        }
    }
}

fn placeholder_item() -> TreeItem {
    TreeItem {
        kind: TreeItemKind::Placeholder,
        label: "No results yet".to_string(),
        description: Some("Run a query to see results here".to_string()),
        tooltip: None,
        command: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileSystemProvider;
    use kustox_types::{QueryResult, ResultUri};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(sync: &TreeSynchronizer) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let sub = sync.on_did_change_tree_data(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (count, sub)
    }

    fn two_rows() -> QueryResult {
        QueryResult::new(
            vec!["A".into(), "B".into()],
            vec![vec![1i64.into(), "x".into()], vec![2i64.into(), "y".into()]],
            "0.1s",
        )
    }

    #[test]
    fn test_fresh_store_shows_placeholder() {
        let store = Arc::new(ResultStore::new());
        let sync = TreeSynchronizer::new(store.clone());

        let items = sync.get_children(None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, TreeItemKind::Placeholder);
        assert!(items[0].command.is_none());
        assert_eq!(sync.state(), TreeState::Empty);

        store.clear_cache();
        let items = sync.get_children(None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, TreeItemKind::Placeholder);
    }

    #[test]
    fn test_result_item_after_add() {
        let store = Arc::new(ResultStore::new());
        let sync = TreeSynchronizer::new(store.clone());
        let id = store.add_query_result("T | take 5", two_rows(), "clusterX", "dbY", None);

        let items = sync.get_children(None);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.kind, TreeItemKind::Result);
        assert!(item.label.contains(&id[..LABEL_ID_LEN]));
        assert!(item.description.as_deref().unwrap().contains("2 rows"));

        let command = item.command.as_ref().unwrap();
        assert_eq!(command.uri, ResultUri::latest().to_string());
        assert_eq!(sync.state(), TreeState::HasResult);
    }

    #[test]
    fn test_children_of_item_are_empty() {
        let store = Arc::new(ResultStore::new());
        let sync = TreeSynchronizer::new(store.clone());
        store.add_query_result("q", two_rows(), "c", "d", None);

        let root = sync.get_children(None);
        assert!(sync.get_children(Some(&root[0])).is_empty());
    }

    #[test]
    fn test_transitions_fire_tree_changed() {
        let store = Arc::new(ResultStore::new());
        let sync = TreeSynchronizer::new(store.clone());
        let (count, _sub) = counting(&sync);

        store.add_query_result("q1", two_rows(), "c", "d", None);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        store.add_query_result("q2", QueryResult::new(vec![], vec![], "0s"), "c", "d", None);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(sync.get_children(None)[0].description.as_deref().unwrap().contains("0 rows"));

        store.clear_cache();
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(sync.state(), TreeState::Empty);

        sync.refresh();
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_raw_writes_do_not_refresh() {
        let store = Arc::new(ResultStore::new());
        let sync = TreeSynchronizer::new(store.clone());
        let (count, _sub) = counting(&sync);

        store.write_file(&ResultUri::new("/other.json"), b"{}").unwrap();
        store.delete(&ResultUri::new("/other.json")).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_releases_store_subscriptions() {
        let store = Arc::new(ResultStore::new());
        let sync = TreeSynchronizer::new(store.clone());
        assert_eq!(store.listener_count(), 2);

        drop(sync);
        assert_eq!(store.listener_count(), 0);
        store.add_query_result("q", two_rows(), "c", "d", None);
    }
}
