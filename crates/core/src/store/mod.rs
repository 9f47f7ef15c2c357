//! Persistence boundary: named node blobs.

mod file;
mod manager;
mod memory;

pub use file::{FileNodeStore, NODE_FILE_EXTENSION};
pub use manager::NodeManager;
pub use memory::MemoryNodeStore;

use crate::error::Result;

/// Byte-level storage of node blobs, keyed by node name.
///
/// Reading a name that was never written yields `Ok(None)`; removing it is a
/// no-op. Errors are reserved for genuine I/O failures.
pub trait NodeStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the blob stored under `name`. Readers see either the old or
    /// the new blob, never a mix.
    fn put(&self, name: &str, bytes: &[u8]) -> Result<()>;

    fn remove(&self, name: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// Names of every stored blob.
    fn names(&self) -> Result<Vec<String>>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.names()?.is_empty())
    }
}
