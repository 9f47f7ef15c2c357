use crate::inspect::is_node_file;
use splitdex_core::store::{FileNodeStore, NodeStore};
use tracing::info;

/// Removes every node file in the store's directory, including ones written
/// by other processes. Returns how many were removed.
pub(crate) fn clear_all(store: &FileNodeStore) -> splitdex_core::Result<usize> {
    let mut removed = 0;
    for name in store.names()? {
        if is_node_file(&name) {
            store.remove(&name)?;
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn run(store: &FileNodeStore) -> Result<(), Box<dyn std::error::Error>> {
    info!("Clearing nodes at: {}...", store.dir().display());
    let removed = clear_all(store)?;
    info!("Removed {} nodes.", removed);
    Ok(())
}
