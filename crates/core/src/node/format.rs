//! Binary node format.
//!
//! ```text
//! [version:u8][msgpack: [context_id, [[subject, relationship, [[element, offset, length], ..]], ..]]]
//! ```
//!
//! MessagePack stores integers and array lengths in variable width, so small
//! ids cost a single byte.

use super::key::{LocationRecord, RelationKey};
use super::node::IndexNode;
use crate::codec::{Codecs, ContextId, ElementId, RelationshipId};
use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const FORMAT_VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct EntryBody(u32, u32, Vec<(u32, i32, i32)>);

#[derive(Serialize, Deserialize)]
struct NodeBody(i32, Vec<EntryBody>);

/// A decoded node that is not bound to a live context.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub version: u8,
    pub context_id: ContextId,
    pub relations: HashMap<RelationKey, Vec<LocationRecord>>,
}

impl RawNode {
    pub fn entry_count(&self) -> usize {
        self.relations.len()
    }

    pub fn location_count(&self) -> usize {
        self.relations.values().map(Vec::len).sum()
    }
}

pub fn encode_node(node: &IndexNode) -> Result<Vec<u8>> {
    let mut keys: Vec<_> = node.relations().keys().copied().collect();
    keys.sort();
    let entries = keys
        .into_iter()
        .map(|key| {
            let records = node.relations()[&key]
                .iter()
                .map(|r| (r.element.0, r.offset, r.length))
                .collect();
            EntryBody(key.element.0, key.relationship.0, records)
        })
        .collect();

    let mut bytes = vec![FORMAT_VERSION];
    rmp_serde::encode::write(&mut bytes, &NodeBody(node.context_id().0, entries))?;
    Ok(bytes)
}

pub fn decode_raw(bytes: &[u8]) -> Result<RawNode> {
    let (&version, body) = bytes.split_first().ok_or(IndexError::Truncated)?;
    if version != FORMAT_VERSION {
        return Err(IndexError::UnsupportedVersion(version));
    }
    let NodeBody(context_id, entries) = rmp_serde::from_slice(body)?;

    let mut relations: HashMap<RelationKey, Vec<LocationRecord>> =
        HashMap::with_capacity(entries.len());
    for EntryBody(element, relationship, records) in entries {
        let key = RelationKey::new(ElementId(element), RelationshipId(relationship));
        relations.entry(key).or_default().extend(
            records
                .into_iter()
                .map(|(element, offset, length)| LocationRecord::new(ElementId(element), offset, length)),
        );
    }

    Ok(RawNode {
        version,
        context_id: ContextId(context_id),
        relations,
    })
}

/// Decodes a node and binds it to its context. `Ok(None)` means the context
/// has been removed since the node was written.
pub fn decode_node(codecs: &Arc<Codecs>, bytes: &[u8]) -> Result<Option<IndexNode>> {
    let raw = decode_raw(bytes)?;
    let Some(context) = codecs.contexts.decode(raw.context_id) else {
        return Ok(None);
    };
    let mut node = IndexNode::new(Arc::clone(codecs), context);
    node.set_relations(raw.relations);
    Ok(Some(node))
}
