use super::NodeStore;
use crate::error::Result;
use dashmap::DashMap;

/// In-memory store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    blobs: DashMap<String, Vec<u8>>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl NodeStore for MemoryNodeStore {
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(name).map(|blob| blob.value().clone()))
    }

    fn put(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.blobs.remove(name);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.blobs.clear();
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.blobs.iter().map(|entry| entry.key().clone()).collect())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.blobs.is_empty())
    }
}
