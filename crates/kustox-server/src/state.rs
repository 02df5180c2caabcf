//! Shared application state.

use crate::config::Config;
use kustox_core::{ResultStore, Subscription, TreeSynchronizer};
use kustox_types::WsServerMessage;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state.
pub struct AppState {
    pub store: Arc<ResultStore>,
    pub tree: Arc<TreeSynchronizer>,
    pub config: Config,
    event_tx: broadcast::Sender<WsServerMessage>,
    _bridges: Vec<Subscription>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(ResultStore::new());
        let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));

        // Store bridges go first so clients see result_added before tree_changed.
        // Sends fail only when no client is connected; those events are dropped.
        let mut bridges = vec![
            {
                let tx = event_tx.clone();
                store.on_did_change_file(move |event| {
                    let _ = tx.send(WsServerMessage::FileChanged {
                        change: event.change,
                        uri: event.uri.to_string(),
                    });
                })
            },
            {
                let tx = event_tx.clone();
                store.on_did_add_result(move |entry| {
                    let _ = tx.send(WsServerMessage::ResultAdded {
                        id: entry.id.clone(),
                        row_count: entry.row_count,
                        column_count: entry.column_count,
                    });
                })
            },
        ];

        let tree = Arc::new(TreeSynchronizer::new(store.clone()));
        bridges.push({
            let tx = event_tx.clone();
            tree.on_did_change_tree_data(move |_| {
                let _ = tx.send(WsServerMessage::TreeChanged);
            })
        });

        Self {
            store,
            tree,
            config,
            event_tx,
            _bridges: bridges,
        }
    }

    /// Subscribe to events destined for WebSocket clients.
    pub fn subscribe(&self) -> broadcast::Receiver<WsServerMessage> {
        self.event_tx.subscribe()
    }
}
