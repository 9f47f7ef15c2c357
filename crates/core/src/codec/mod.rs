//! Integer encodings for strings, contexts, elements and relationships.
//!
//! All tables are append-mostly and internally synchronized, so one [`Codecs`]
//! bundle is shared by the writer path and every reader.

mod context;
mod element;
mod relationship;
mod string;

pub use context::{ContextId, ContextTable};
pub use element::{ElementCodec, ElementId};
pub use relationship::{RelationshipCodec, RelationshipId};
pub use string::{StringId, StringTable};

use crate::config::IndexConfig;
use std::sync::Arc;

pub struct Codecs {
    pub strings: Arc<StringTable>,
    pub contexts: ContextTable,
    pub elements: ElementCodec,
    pub relationships: RelationshipCodec,
}

impl Codecs {
    pub fn new(config: &IndexConfig) -> Self {
        let strings = Arc::new(StringTable::new());
        Self {
            contexts: ContextTable::new(),
            elements: ElementCodec::new(
                Arc::clone(&strings),
                config.table_capacity,
                config.load_factor,
            ),
            relationships: RelationshipCodec::new(Arc::clone(&strings)),
            strings,
        }
    }
}

impl Default for Codecs {
    fn default() -> Self {
        Self::new(&IndexConfig::default())
    }
}
