use crate::codec::{Codecs, ContextId, ElementId};
use crate::model::{ContextRef, Element, Location, Relationship, Source};
use crate::node::IndexNode;
use std::collections::{BTreeSet, HashSet};
use std::thread::ThreadId;

/// An open indexing pass: the node being buffered for one unit.
pub(crate) struct IndexPass {
    pub context: ContextRef,
    pub context_id: ContextId,
    pub library: Source,
    pub unit: Source,
    /// The library's current parts, when this pass indexes its defining unit.
    pub parts: Option<BTreeSet<Source>>,
    pub node: IndexNode,
    /// Hash ids of every recorded subject.
    pub subjects: HashSet<ElementId>,
    /// The thread that opened the pass; only it may record into or finish it.
    pub owner: ThreadId,
}

impl IndexPass {
    pub fn record(
        &mut self,
        codecs: &Codecs,
        subject: Option<&dyn Element>,
        relationship: &Relationship,
        location: Option<&Location>,
    ) {
        let (Some(subject), Some(location)) = (subject, location) else {
            return;
        };
        self.subjects.insert(codecs.elements.encode_hash(subject));
        self.node
            .record_relationship(Some(subject), relationship, Some(location));
    }
}

/// Records facts into the pass opened by [`SplitIndex::index_unit`].
///
/// [`SplitIndex::index_unit`]: super::SplitIndex::index_unit
pub struct PassRecorder<'a> {
    pass: &'a mut IndexPass,
    codecs: &'a Codecs,
}

impl<'a> PassRecorder<'a> {
    pub(crate) fn new(pass: &'a mut IndexPass, codecs: &'a Codecs) -> Self {
        Self { pass, codecs }
    }

    pub fn record_relationship(
        &mut self,
        subject: &dyn Element,
        relationship: &Relationship,
        location: &Location,
    ) {
        self.pass
            .record(self.codecs, Some(subject), relationship, Some(location));
    }

    /// The unit being indexed.
    pub fn unit(&self) -> &Source {
        &self.pass.unit
    }

    pub fn library(&self) -> &Source {
        &self.pass.library
    }
}
