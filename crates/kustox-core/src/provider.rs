//! File-system provider contract exposed to the presentation host.

use crate::{Result, Subscription};
use kustox_types::{FileChangeEvent, FileStat, FileType, ResultUri};

/// Minimal read/write virtual file system rooted at one scheme and authority.
pub trait FileSystemProvider: Send + Sync {
    /// Register for change notifications. Every watcher sees every change.
    fn watch(
        &self,
        uri: &ResultUri,
        listener: Box<dyn Fn(&FileChangeEvent) + Send + Sync>,
    ) -> Subscription;

    fn stat(&self, uri: &ResultUri) -> Result<FileStat>;

    fn read_directory(&self, uri: &ResultUri) -> Result<Vec<(String, FileType)>>;

    fn read_file(&self, uri: &ResultUri) -> Result<Vec<u8>>;

    fn write_file(&self, uri: &ResultUri, content: &[u8]) -> Result<()>;

    fn delete(&self, uri: &ResultUri) -> Result<()>;

    fn create_directory(&self, _uri: &ResultUri) -> Result<()> {
        Ok(())
    }

    fn rename(&self, _from: &ResultUri, _to: &ResultUri) -> Result<()> {
        Ok(())
    }
}
