use super::key::{LocationRecord, RelationKey};
use crate::codec::{Codecs, ContextId};
use crate::model::{ContextRef, Element, Location, Relationship};
use std::collections::HashMap;
use std::sync::Arc;

/// Relationship facts for one node, bound to the context they resolve in.
pub struct IndexNode {
    context: ContextRef,
    context_id: ContextId,
    codecs: Arc<Codecs>,
    relations: HashMap<RelationKey, Vec<LocationRecord>>,
}

impl IndexNode {
    pub fn new(codecs: Arc<Codecs>, context: ContextRef) -> Self {
        let context_id = codecs.contexts.encode(&context);
        Self {
            context,
            context_id,
            codecs,
            relations: HashMap::new(),
        }
    }

    pub fn context(&self) -> &ContextRef {
        &self.context
    }

    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    /// Records that `subject` has `relationship` at `location`. Missing
    /// subjects or locations are ignored. Recording a fact twice stores it twice.
    pub fn record_relationship(
        &mut self,
        subject: Option<&dyn Element>,
        relationship: &Relationship,
        location: Option<&Location>,
    ) {
        let (Some(subject), Some(location)) = (subject, location) else {
            return;
        };
        let key = RelationKey::new(
            self.codecs.elements.encode(subject),
            self.codecs.relationships.encode(relationship),
        );
        let record = LocationRecord::from_location(&self.codecs.elements, location);
        self.relations.entry(key).or_default().push(record);
    }

    /// Live locations for `subject`/`relationship`. Records whose element no
    /// longer resolves are skipped.
    pub fn get_relationships(
        &self,
        subject: &dyn Element,
        relationship: &Relationship,
    ) -> Vec<Location> {
        let (Some(element), Some(relationship)) = (
            self.codecs.elements.lookup(subject),
            self.codecs.relationships.lookup(relationship),
        ) else {
            return Vec::new();
        };
        self.locations(&RelationKey::new(element, relationship))
    }

    pub fn locations(&self, key: &RelationKey) -> Vec<Location> {
        let Some(records) = self.relations.get(key) else {
            return Vec::new();
        };
        records
            .iter()
            .filter_map(|record| record.to_location(&self.codecs.elements, self.context.as_ref()))
            .collect()
    }

    pub fn location_count(&self) -> usize {
        self.relations.values().map(Vec::len).sum()
    }

    pub fn relations(&self) -> &HashMap<RelationKey, Vec<LocationRecord>> {
        &self.relations
    }

    pub fn set_relations(&mut self, relations: HashMap<RelationKey, Vec<LocationRecord>>) {
        self.relations = relations;
    }
}
