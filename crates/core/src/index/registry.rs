//! What the index knows about its nodes, independent of their contents.

use crate::codec::{ContextId, ElementId, StringId};
use crate::collections::IntToIntSetMap;
use crate::model::Source;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeInfo {
    pub context: ContextId,
    pub library: Source,
    pub unit: Source,
    /// String id of the node's name, as stored in `routing`.
    pub name_id: StringId,
    /// Hash ids of the subjects routed to this node.
    pub subjects: Vec<ElementId>,
}

pub(crate) struct Registry {
    /// Live nodes by name.
    pub nodes: HashMap<String, NodeInfo>,
    /// Units with a live node, per library, per context.
    pub libraries: HashMap<ContextId, HashMap<Source, BTreeSet<Source>>>,
    /// Subject hash id -> string ids of the names of nodes that mention it.
    /// Kept in step with `nodes`.
    pub routing: IntToIntSetMap,
}

impl Registry {
    pub fn new(capacity: usize, load_factor: f32) -> Self {
        Self {
            nodes: HashMap::new(),
            libraries: HashMap::new(),
            routing: IntToIntSetMap::new(capacity, load_factor),
        }
    }

    /// Records `name`, replacing whatever was known about it before.
    pub fn insert(&mut self, name: String, info: NodeInfo) {
        self.remove(&name);
        for subject in &info.subjects {
            self.routing.add(subject.0 as i32, info.name_id.0 as i32);
        }
        self.libraries
            .entry(info.context)
            .or_default()
            .entry(info.library.clone())
            .or_default()
            .insert(info.unit.clone());
        self.nodes.insert(name, info);
    }

    /// Forgets `name`, returning what was known about it.
    pub fn remove(&mut self, name: &str) -> Option<NodeInfo> {
        let info = self.nodes.remove(name)?;
        for subject in &info.subjects {
            self.routing.remove(subject.0 as i32, info.name_id.0 as i32);
        }
        if let Some(libraries) = self.libraries.get_mut(&info.context) {
            if let Some(units) = libraries.get_mut(&info.library) {
                units.remove(&info.unit);
                if units.is_empty() {
                    libraries.remove(&info.library);
                }
            }
            if libraries.is_empty() {
                self.libraries.remove(&info.context);
            }
        }
        Some(info)
    }

    pub fn routes(&self, subject: ElementId) -> impl Iterator<Item = StringId> + '_ {
        self.routing
            .get(subject.0 as i32)
            .iter()
            .map(|&id| StringId(id as u32))
    }

    /// Names of the nodes matching `filter`.
    pub fn names_where(&self, filter: impl Fn(&NodeInfo) -> bool) -> Vec<String> {
        let mut names: Vec<String> = self
            .nodes
            .iter()
            .filter(|(_, info)| filter(info))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Units recorded under `library` in `context`.
    pub fn units_of(&self, context: ContextId, library: &Source) -> Vec<Source> {
        self.libraries
            .get(&context)
            .and_then(|libraries| libraries.get(library))
            .map(|units| units.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every library and unit known in `context`.
    pub fn sources_of(&self, context: ContextId) -> BTreeSet<Source> {
        let mut sources = BTreeSet::new();
        if let Some(libraries) = self.libraries.get(&context) {
            for (library, units) in libraries {
                sources.insert(library.clone());
                sources.extend(units.iter().cloned());
            }
        }
        sources
    }

    /// Distinct sources across all contexts.
    pub fn source_count(&self) -> usize {
        let mut sources: HashSet<&Source> = HashSet::new();
        for libraries in self.libraries.values() {
            for (library, units) in libraries {
                sources.insert(library);
                sources.extend(units.iter());
            }
        }
        sources.len()
    }

    pub fn context_count(&self) -> usize {
        self.libraries.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.libraries.clear();
        self.routing.clear();
    }
}
