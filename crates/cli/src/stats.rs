use crate::human_size;
use crate::inspect::scan;
use serde::Serialize;
use splitdex_core::store::FileNodeStore;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize)]
pub(crate) struct DirectoryStats {
    pub dir: PathBuf,
    pub nodes: usize,
    pub unreadable: usize,
    pub contexts: usize,
    pub entries: usize,
    pub locations: usize,
    pub bytes: u64,
}

pub(crate) fn collect(store: &FileNodeStore) -> splitdex_core::Result<DirectoryStats> {
    let mut stats = DirectoryStats {
        dir: store.dir().to_path_buf(),
        ..DirectoryStats::default()
    };
    let mut contexts = BTreeSet::new();
    for scanned in scan(store)? {
        stats.bytes += scanned.size;
        match scanned.node {
            Ok(node) => {
                stats.nodes += 1;
                stats.entries += node.entry_count();
                stats.locations += node.location_count();
                contexts.insert(node.context_id);
            }
            Err(_) => stats.unreadable += 1,
        }
    }
    stats.contexts = contexts.len();
    Ok(stats)
}

pub fn run(store: &FileNodeStore, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stats = collect(store)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("Node Directory: {}", stats.dir.display());
    println!("Nodes:          {}", stats.nodes);
    if stats.unreadable > 0 {
        println!("Unreadable:     {}", stats.unreadable);
    }
    println!("Contexts:       {}", stats.contexts);
    println!("Entries:        {}", stats.entries);
    println!("Locations:      {}", stats.locations);
    println!("Size on Disk:   {}", human_size(stats.bytes));
    Ok(())
}
