//! Ephemeral single-slot result store with virtual file-system semantics.
//!
//! The store keeps exactly one [`ResultEntry`] (the latest result) and a small
//! table of virtual files keyed by path. The latest-result document is a
//! projection of the entry and is rebuilt in full whenever the entry changes.
//! Nothing here survives a process restart.

use crate::{EventEmitter, FileSystemProvider, KustoxError, Result, Subscription};
use chrono::Utc;
use kustox_types::{
    FileChangeEvent, FileChangeType, FileStat, FileType, QueryResult, ResultDocument,
    ResultEntry, ResultUri, StorageStats, LATEST_RESULT_NAME, LATEST_RESULT_PATH,
};
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Length of the random part of a result id.
const ID_SUFFIX_LEN: usize = 9;

/// Contents of the single result slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SlotState {
    #[default]
    Empty,
    HasResult(ResultEntry),
}

impl SlotState {
    pub fn entry(&self) -> Option<&ResultEntry> {
        match self {
            SlotState::Empty => None,
            SlotState::HasResult(entry) => Some(entry),
        }
    }
}

/// Byte payload stored at a virtual path.
#[derive(Debug, Clone)]
struct VirtualFile {
    content: Vec<u8>,
    created_at: i64,
    modified_at: i64,
}

#[derive(Debug)]
struct StoreInner {
    slot: SlotState,
    files: HashMap<String, VirtualFile>,
    created_at: i64,
    modified_at: i64,
}

impl StoreInner {
    fn put_file(&mut self, path: &str, content: Vec<u8>, now: i64) {
        let created_at = self
            .files
            .get(path)
            .map(|f| f.created_at)
            .unwrap_or(now);
        self.files.insert(
            path.to_string(),
            VirtualFile {
                content,
                created_at,
                modified_at: now,
            },
        );
        self.modified_at = now;
    }
}

/// Holds the most recent query result and serves it as a virtual file.
pub struct ResultStore {
    inner: RwLock<StoreInner>,
    file_changed: EventEmitter<FileChangeEvent>,
    result_added: EventEmitter<ResultEntry>,
}

impl ResultStore {
    pub fn new() -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            inner: RwLock::new(StoreInner {
                slot: SlotState::Empty,
                files: HashMap::new(),
                created_at: now,
                modified_at: now,
            }),
            file_changed: EventEmitter::new("file_changed"),
            result_added: EventEmitter::new("result_added"),
        }
    }

    /// Canonical URI of the latest-result document.
    pub fn latest_uri(&self) -> ResultUri {
        ResultUri::latest()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Domain operations
    // =========================================================================

    /// Replace the current result and rebuild the latest-result document.
    ///
    /// Fires a file change for the latest path, then a result-added event.
    /// Returns the id of the new entry.
    pub fn add_query_result(
        &self,
        query: impl Into<String>,
        result: QueryResult,
        cluster: impl Into<String>,
        database: impl Into<String>,
        webview_uri: Option<String>,
    ) -> String {
        let entry = ResultEntry::new(
            generate_id(),
            query.into(),
            result,
            cluster.into(),
            database.into(),
            webview_uri,
        );
        let content = encode_document(&entry);
        let now = entry.timestamp.timestamp_millis();

        {
            let mut inner = self.write();
            inner.slot = SlotState::HasResult(entry.clone());
            inner.put_file(LATEST_RESULT_PATH, content, now);
        }

        info!(
            target: "kustox::store",
            "Stored result {} ({} rows, {} columns) from {}/{}",
            entry.id, entry.row_count, entry.column_count, entry.cluster, entry.database
        );

        self.file_changed.fire(&FileChangeEvent {
            change: FileChangeType::Changed,
            uri: ResultUri::latest(),
        });
        self.result_added.fire(&entry);

        entry.id
    }

    pub fn get_current_result(&self) -> Option<ResultEntry> {
        self.read().slot.entry().cloned()
    }

    /// The current entry if its id matches. Stale ids resolve to `None`.
    pub fn get_result(&self, id: &str) -> Option<ResultEntry> {
        self.read()
            .slot
            .entry()
            .filter(|entry| entry.id == id)
            .cloned()
    }

    /// Zero or one entries.
    pub fn get_all_results(&self) -> Vec<ResultEntry> {
        self.get_current_result().into_iter().collect()
    }

    pub fn has_result(&self) -> bool {
        self.read().slot.entry().is_some()
    }

    pub fn slot(&self) -> SlotState {
        self.read().slot.clone()
    }

    /// Drop the current entry and every stored payload.
    ///
    /// Always fires a deletion for the latest path, even when already empty.
    pub fn clear_cache(&self) {
        let removed = {
            let mut inner = self.write();
            let had_entry = inner.slot.entry().is_some();
            inner.slot = SlotState::Empty;
            inner.files.clear();
            inner.modified_at = Utc::now().timestamp_millis();
            had_entry
        };

        if removed {
            info!(target: "kustox::store", "Cleared current result");
        } else {
            debug!(target: "kustox::store", "Clear requested on empty store");
        }

        self.file_changed.fire(&FileChangeEvent {
            change: FileChangeType::Deleted,
            uri: ResultUri::latest(),
        });
    }

    /// Approximate footprint, measured from the serialized entry.
    pub fn get_storage_stats(&self) -> StorageStats {
        let inner = self.read();
        match inner.slot.entry() {
            Some(entry) => {
                let size = serde_json::to_vec(entry).map(|b| b.len()).unwrap_or(0);
                StorageStats {
                    memory_count: 1,
                    total_size_mb: size as f64 / BYTES_PER_MB,
                }
            }
            None => StorageStats {
                memory_count: 0,
                total_size_mb: 0.0,
            },
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Listen for every change in the result space.
    pub fn on_did_change_file<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&FileChangeEvent) + Send + Sync + 'static,
    {
        self.file_changed.subscribe(listener)
    }

    /// Listen for new results.
    pub fn on_did_add_result<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ResultEntry) + Send + Sync + 'static,
    {
        self.result_added.subscribe(listener)
    }

    /// Live listeners across both store channels.
    pub fn listener_count(&self) -> usize {
        self.file_changed.listener_count() + self.result_added.listener_count()
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemProvider for ResultStore {
    fn watch(
        &self,
        uri: &ResultUri,
        listener: Box<dyn Fn(&FileChangeEvent) + Send + Sync>,
    ) -> Subscription {
        // No per-path filtering: every watcher sees every change.
        debug!(target: "kustox::store", "Watching {}", uri);
        self.file_changed.subscribe(listener)
    }

    fn stat(&self, uri: &ResultUri) -> Result<FileStat> {
        let inner = self.read();

        if uri.is_latest() {
            if let Some(file) = inner.files.get(LATEST_RESULT_PATH) {
                return Ok(FileStat {
                    file_type: FileType::File,
                    ctime: file.created_at,
                    mtime: file.modified_at,
                    size: file.content.len() as u64,
                });
            }
        } else if uri.is_root() {
            return Ok(FileStat {
                file_type: FileType::Directory,
                ctime: inner.created_at,
                mtime: inner.modified_at,
                size: 0,
            });
        }

        // Anything else must not resolve, or hosts start probing this space
        // as a workspace (.git, package.json, ...).
        debug!(target: "kustox::store", "stat: {} not found", uri);
        Err(KustoxError::NotFound(uri.to_string()))
    }

    fn read_directory(&self, uri: &ResultUri) -> Result<Vec<(String, FileType)>> {
        if !uri.is_root() {
            return Err(KustoxError::NotFound(uri.to_string()));
        }

        if self.has_result() {
            Ok(vec![(LATEST_RESULT_NAME.to_string(), FileType::File)])
        } else {
            Ok(Vec::new())
        }
    }

    fn read_file(&self, uri: &ResultUri) -> Result<Vec<u8>> {
        ensure_result_space(uri)?;
        self.read()
            .files
            .get(&uri.path)
            .map(|file| file.content.clone())
            .ok_or_else(|| KustoxError::NotFound(uri.to_string()))
    }

    /// Raw byte write. Does not touch the current entry.
    fn write_file(&self, uri: &ResultUri, content: &[u8]) -> Result<()> {
        ensure_result_space(uri)?;
        let now = Utc::now().timestamp_millis();
        self.write().put_file(&uri.path, content.to_vec(), now);
        debug!(target: "kustox::store", "Wrote {} bytes to {}", content.len(), uri);

        self.file_changed.fire(&FileChangeEvent {
            change: FileChangeType::Changed,
            uri: uri.clone(),
        });
        Ok(())
    }

    /// Raw byte removal. The current entry survives; only `clear_cache` drops it.
    fn delete(&self, uri: &ResultUri) -> Result<()> {
        ensure_result_space(uri)?;
        {
            let mut inner = self.write();
            inner.files.remove(&uri.path);
            inner.modified_at = Utc::now().timestamp_millis();
        }
        debug!(target: "kustox::store", "Deleted {}", uri);

        self.file_changed.fire(&FileChangeEvent {
            change: FileChangeType::Deleted,
            uri: uri.clone(),
        });
        Ok(())
    }
}

/// Reject addresses outside `kustox-ai://results`.
fn ensure_result_space(uri: &ResultUri) -> Result<()> {
    if uri.is_result_space() {
        Ok(())
    } else {
        debug!(target: "kustox::store", "{} is outside the result space", uri);
        Err(KustoxError::NotFound(uri.to_string()))
    }
}

/// Pretty-printed latest-result document for `entry`.
fn encode_document(entry: &ResultEntry) -> Vec<u8> {
    match serde_json::to_vec_pretty(&ResultDocument::from(entry)) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(target: "kustox::store", "Failed to encode result {}: {}", entry.id, e);
            Vec::new()
        }
    }
}

/// Base36 timestamp followed by a random base36 suffix.
fn generate_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(COUNTER.fetch_add(1, Ordering::Relaxed));
    hasher.write_u64(millis);

    format!(
        "{}-{}",
        to_base36(millis, 0),
        to_base36(hasher.finish(), ID_SUFFIX_LEN)
    )
}

/// Base36 digits of `value`. With a non-zero `width`, exactly `width` low digits.
fn to_base36(mut value: u64, width: usize) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(char::from_digit((value % 36) as u32, 36).unwrap_or('0'));
        value /= 36;
        if (width == 0 && value == 0) || (width > 0 && digits.len() == width) {
            break;
        }
    }
    digits.iter().rev().collect()
}
