use super::NodeStore;
use crate::codec::Codecs;
use crate::error::Result;
use crate::model::ContextRef;
use crate::node::{IndexNode, decode_node, encode_node};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reads and writes [`IndexNode`]s through a [`NodeStore`] and keeps the total
/// location count of everything stored.
///
/// Failures are logged and degrade to "no node": callers never see a
/// persistence error.
pub struct NodeManager {
    store: Arc<dyn NodeStore>,
    codecs: Arc<Codecs>,
    counts: DashMap<String, usize>,
    total: AtomicUsize,
}

impl NodeManager {
    pub fn new(store: Arc<dyn NodeStore>, codecs: Arc<Codecs>) -> Self {
        Self {
            store,
            codecs,
            counts: DashMap::new(),
            total: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.store
    }

    pub fn new_node(&self, context: ContextRef) -> IndexNode {
        IndexNode::new(Arc::clone(&self.codecs), context)
    }

    pub fn get_node(&self, name: &str) -> Option<IndexNode> {
        match self.read_node(name) {
            Ok(node) => node,
            Err(e) => {
                tracing::warn!("Failed to read index node {}: {}", name, e);
                None
            }
        }
    }

    fn read_node(&self, name: &str) -> Result<Option<IndexNode>> {
        let Some(bytes) = self.store.get(name)? else {
            return Ok(None);
        };
        decode_node(&self.codecs, &bytes)
    }

    /// Stores `node` under `name`, replacing any previous node. Returns `false`
    /// if the node could not be written; the previous node is dropped then.
    pub fn put_node(&self, name: &str, node: &IndexNode) -> bool {
        let written = encode_node(node).and_then(|bytes| self.store.put(name, &bytes));
        match written {
            Ok(()) => {
                self.set_count(name, node.location_count());
                true
            }
            Err(e) => {
                tracing::error!("Failed to write index node {}: {}", name, e);
                self.remove_node(name);
                false
            }
        }
    }

    pub fn remove_node(&self, name: &str) {
        if let Err(e) = self.store.remove(name) {
            tracing::warn!("Failed to remove index node {}: {}", name, e);
        }
        self.set_count(name, 0);
    }

    fn set_count(&self, name: &str, count: usize) {
        let previous = if count == 0 {
            self.counts.remove(name).map(|(_, c)| c)
        } else {
            self.counts.insert(name.to_string(), count)
        };
        let previous = previous.unwrap_or(0);
        if count >= previous {
            self.total.fetch_add(count - previous, Ordering::SeqCst);
        } else {
            self.total.fetch_sub(previous - count, Ordering::SeqCst);
        }
    }

    pub fn location_count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear node store: {}", e);
        }
        self.counts.clear();
        self.total.store(0, Ordering::SeqCst);
    }
}
