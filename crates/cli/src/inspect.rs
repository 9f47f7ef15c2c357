use crate::human_size;
use splitdex_core::node::{RawNode, decode_raw};
use splitdex_core::store::{FileNodeStore, NODE_FILE_EXTENSION, NodeStore};
use tabled::{Table, Tabled};

/// One stored node as read from disk.
pub(crate) struct ScannedNode {
    pub name: String,
    pub size: u64,
    pub node: Result<RawNode, String>,
}

pub(crate) fn is_node_file(name: &str) -> bool {
    name.strip_suffix(NODE_FILE_EXTENSION)
        .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
}

fn read(store: &FileNodeStore, name: &str) -> Result<RawNode, String> {
    match store.get(name) {
        Ok(Some(bytes)) => decode_raw(&bytes).map_err(|e| e.to_string()),
        Ok(None) => Err("vanished while reading".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

pub(crate) fn scan(store: &FileNodeStore) -> splitdex_core::Result<Vec<ScannedNode>> {
    let mut nodes = Vec::new();
    for name in store.names()? {
        if !is_node_file(&name) {
            continue;
        }
        let size = store.file_size(&name)?.unwrap_or(0);
        let node = read(store, &name);
        nodes.push(ScannedNode { name, size, node });
    }
    Ok(nodes)
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    name: String,
    #[tabled(rename = "Ver")]
    version: String,
    #[tabled(rename = "Context")]
    context: String,
    #[tabled(rename = "Entries")]
    entries: String,
    #[tabled(rename = "Locations")]
    locations: String,
    #[tabled(rename = "Size")]
    size: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Element")]
    element: u32,
    #[tabled(rename = "Relationship")]
    relationship: u32,
    #[tabled(rename = "Locations")]
    locations: usize,
}

pub fn run(store: &FileNodeStore, name: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match name {
        Some(name) => inspect_one(store, name),
        None => list(store),
    }
}

fn list(store: &FileNodeStore) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<NodeRow> = scan(store)?
        .into_iter()
        .map(|scanned| {
            let size = human_size(scanned.size);
            match scanned.node {
                Ok(node) => NodeRow {
                    name: scanned.name,
                    version: node.version.to_string(),
                    context: node.context_id.0.to_string(),
                    entries: node.entry_count().to_string(),
                    locations: node.location_count().to_string(),
                    size,
                },
                Err(e) => NodeRow {
                    name: scanned.name,
                    version: "-".to_string(),
                    context: "-".to_string(),
                    entries: format!("unreadable: {}", e),
                    locations: "-".to_string(),
                    size,
                },
            }
        })
        .collect();

    if rows.is_empty() {
        println!("No nodes found in {}", store.dir().display());
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

fn inspect_one(store: &FileNodeStore, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(bytes) = store.get(name)? else {
        println!("Node not found: {}", name);
        return Ok(());
    };
    let node = decode_raw(&bytes)?;

    println!("Node Summary:");
    println!("  Name:      {}", name);
    println!("  Version:   {}", node.version);
    println!("  Context:   {}", node.context_id.0);
    println!("  Entries:   {}", node.entry_count());
    println!("  Locations: {}", node.location_count());

    let mut rows: Vec<EntryRow> = node
        .relations
        .iter()
        .map(|(key, records)| EntryRow {
            element: key.element.0,
            relationship: key.relationship.0,
            locations: records.len(),
        })
        .collect();
    rows.sort_by_key(|row| (row.element, row.relationship));
    if !rows.is_empty() {
        println!("\n{}", Table::new(rows));
    }
    Ok(())
}
