use super::string::{StringId, StringTable};
use crate::model::Relationship;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipId(pub u32);

pub struct RelationshipCodec {
    strings: Arc<StringTable>,
}

impl RelationshipCodec {
    pub fn new(strings: Arc<StringTable>) -> Self {
        Self { strings }
    }

    pub fn encode(&self, relationship: &Relationship) -> RelationshipId {
        RelationshipId(self.strings.encode(relationship.name()).0)
    }

    pub fn lookup(&self, relationship: &Relationship) -> Option<RelationshipId> {
        self.strings
            .lookup(relationship.name())
            .map(|id| RelationshipId(id.0))
    }

    pub fn decode(&self, id: RelationshipId) -> Option<Relationship> {
        self.strings.decode(StringId(id.0)).map(Relationship::named)
    }
}
