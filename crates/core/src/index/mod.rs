//! The split index: relationship facts partitioned into one node per indexed
//! unit, with per-library aggregation on top.
//!
//! Writers go through a single pass slot guarded by a mutex. A pass belongs to
//! the thread that opened it, and other threads opening a pass wait until it
//! is committed or discarded. Readers take the registry read lock for the
//! whole query, so a query sees either the state before a commit or after it,
//! never a mix. Lock order is always writer slot first, then registry.

mod pass;
mod registry;
mod stats;

pub use pass::PassRecorder;
pub use stats::IndexStatistics;

use crate::codec::{Codecs, ContextId};
use crate::config::IndexConfig;
use crate::model::{
    CompilationUnitElement, ContextRef, Element, HtmlElement, Location, Relationship, Source,
    SourceContainer, UniverseElement, context_key, unwrap_context,
};
use crate::node::IndexNode;
use crate::store::{MemoryNodeStore, NODE_FILE_EXTENSION, NodeManager, NodeStore};
use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use pass::IndexPass;
use registry::{NodeInfo, Registry};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::thread;

pub struct SplitIndex {
    codecs: Arc<Codecs>,
    nodes: NodeManager,
    registry: RwLock<Registry>,
    writer: Mutex<Option<IndexPass>>,
    /// Signalled whenever the writer slot is emptied.
    pass_done: Condvar,
}

impl SplitIndex {
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self::with_config(store, &IndexConfig::default())
    }

    pub fn with_config(store: Arc<dyn NodeStore>, config: &IndexConfig) -> Self {
        let codecs = Arc::new(Codecs::new(config));
        Self {
            nodes: NodeManager::new(store, Arc::clone(&codecs)),
            registry: RwLock::new(Registry::new(config.table_capacity, config.load_factor)),
            writer: Mutex::new(None),
            pass_done: Condvar::new(),
            codecs,
        }
    }

    /// An index whose nodes live only in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryNodeStore::new()))
    }

    pub fn codecs(&self) -> &Arc<Codecs> {
        &self.codecs
    }

    pub fn node_manager(&self) -> &NodeManager {
        &self.nodes
    }

    /// Locks the writer slot once it is empty or holds a pass of the calling
    /// thread.
    fn acquire_slot(&self) -> MutexGuard<'_, Option<IndexPass>> {
        let current = thread::current().id();
        let mut writer = self.writer.lock();
        while writer.as_ref().is_some_and(|pass| pass.owner != current) {
            self.pass_done.wait(&mut writer);
        }
        writer
    }

    /// Opens a pass for `unit`. Returns `false`, recording nothing, when the
    /// context is disposed or the unit has no library or defining unit.
    ///
    /// Blocks while another thread has a pass open. An unfinished pass of the
    /// calling thread is discarded.
    pub fn begin_unit(
        &self,
        context: &ContextRef,
        unit: Option<&dyn CompilationUnitElement>,
    ) -> bool {
        let mut writer = self.acquire_slot();
        self.begin_unit_locked(&mut writer, context, unit)
    }

    fn begin_unit_locked(
        &self,
        slot: &mut Option<IndexPass>,
        context: &ContextRef,
        unit: Option<&dyn CompilationUnitElement>,
    ) -> bool {
        let context = unwrap_context(context);
        if context.is_disposed() {
            tracing::debug!("Skipping unit in disposed context");
            return false;
        }
        let Some(unit) = unit else {
            return false;
        };
        let Some(library) = unit.library() else {
            tracing::debug!("Skipping {}: no library", unit.source());
            return false;
        };
        let Some(defining) = library.defining_unit() else {
            tracing::debug!("Skipping {}: library has no defining unit", unit.source());
            return false;
        };

        let library_source = defining.source();
        let unit_source = unit.source();
        let parts = (unit_source == library_source)
            .then(|| library.parts().iter().map(|part| part.source()).collect());
        self.open_pass(slot, context, library_source, unit_source, parts);
        true
    }

    /// Opens a pass for an HTML unit, which is its own library.
    pub fn begin_html_unit(&self, context: &ContextRef, html: Option<&dyn HtmlElement>) -> bool {
        let context = unwrap_context(context);
        if context.is_disposed() {
            tracing::debug!("Skipping HTML unit in disposed context");
            return false;
        }
        let Some(html) = html else {
            return false;
        };
        let source = html.source();
        let mut writer = self.acquire_slot();
        self.open_pass(&mut writer, context, source.clone(), source, None);
        true
    }

    fn open_pass(
        &self,
        slot: &mut Option<IndexPass>,
        context: ContextRef,
        library: Source,
        unit: Source,
        parts: Option<BTreeSet<Source>>,
    ) {
        if let Some(previous) = slot.take() {
            tracing::warn!("Discarding unfinished index pass for {}", previous.unit);
        }
        let context_id = self.codecs.contexts.encode(&context);
        let node = self.nodes.new_node(Arc::clone(&context));
        *slot = Some(IndexPass {
            context,
            context_id,
            library,
            unit,
            parts,
            node,
            subjects: HashSet::new(),
            owner: thread::current().id(),
        });
    }

    /// Buffers one fact into the calling thread's open pass. Ignored when the
    /// thread has no pass open or either the subject or the location is
    /// missing.
    pub fn record_relationship(
        &self,
        subject: Option<&dyn Element>,
        relationship: &Relationship,
        location: Option<&Location>,
    ) {
        let current = thread::current().id();
        let mut writer = self.writer.lock();
        match writer.as_mut() {
            Some(pass) if pass.owner == current => {
                pass.record(&self.codecs, subject, relationship, location)
            }
            Some(pass) => tracing::trace!(
                "Index pass for {} belongs to another thread, dropping {}",
                pass.unit,
                relationship
            ),
            None => tracing::trace!("No open index pass, dropping {}", relationship),
        }
    }

    /// Commits the calling thread's open pass, replacing the unit's previous
    /// node.
    pub fn done_index(&self) {
        let current = thread::current().id();
        let mut writer = self.writer.lock();
        if writer.as_ref().is_some_and(|pass| pass.owner == current) {
            if let Some(pass) = writer.take() {
                self.commit(pass);
            }
            self.pass_done.notify_all();
        }
    }

    /// Runs a whole pass for `unit`: opens it, lets `record` add facts, and
    /// commits. Other writers wait until the pass is committed.
    pub fn index_unit<F>(
        &self,
        context: &ContextRef,
        unit: Option<&dyn CompilationUnitElement>,
        record: F,
    ) -> bool
    where
        F: FnOnce(&mut PassRecorder<'_>),
    {
        let mut writer = self.acquire_slot();
        if !self.begin_unit_locked(&mut writer, context, unit) {
            return false;
        }
        if let Some(pass) = writer.as_mut() {
            record(&mut PassRecorder::new(pass, &self.codecs));
        }
        if let Some(pass) = writer.take() {
            self.commit(pass);
        }
        self.pass_done.notify_all();
        true
    }

    fn node_name(&self, context: ContextId, library: &Source, unit: &Source) -> String {
        format!(
            "{}_{}_{}.{}",
            context.0,
            self.codecs.strings.encode(library.full_name()).0,
            self.codecs.strings.encode(unit.full_name()).0,
            NODE_FILE_EXTENSION
        )
    }

    fn commit(&self, pass: IndexPass) {
        let name = self.node_name(pass.context_id, &pass.library, &pass.unit);
        let name_id = self.codecs.strings.encode(&name);
        let mut registry = self.registry.write();

        if let Some(parts) = &pass.parts {
            for unit in registry.units_of(pass.context_id, &pass.library) {
                if unit != pass.library && !parts.contains(&unit) {
                    let stale = self.node_name(pass.context_id, &pass.library, &unit);
                    tracing::debug!("{} is no longer a part of {}", unit, pass.library);
                    self.nodes.remove_node(&stale);
                    registry.remove(&stale);
                }
            }
        }

        if self.nodes.put_node(&name, &pass.node) {
            tracing::debug!(
                "Committed {} for {} ({} locations)",
                name,
                pass.unit,
                pass.node.location_count()
            );
            registry.insert(
                name,
                NodeInfo {
                    context: pass.context_id,
                    library: pass.library,
                    unit: pass.unit,
                    name_id,
                    subjects: pass.subjects.into_iter().collect(),
                },
            );
        } else {
            registry.remove(&name);
        }
    }

    /// Every live location where `subject` has `relationship`, across all
    /// contexts. The universe element matches facts in every node.
    pub fn get_relationships(
        &self,
        subject: &dyn Element,
        relationship: &Relationship,
    ) -> Vec<Location> {
        let registry = self.registry.read();
        let names = if UniverseElement::is_universe(subject) {
            registry.names_where(|_| true)
        } else {
            let Some(hash) = self.codecs.elements.lookup_hash(subject) else {
                return Vec::new();
            };
            let mut names: Vec<String> = registry
                .routes(hash)
                .filter_map(|id| self.codecs.strings.decode(id))
                .filter(|name| registry.nodes.contains_key(*name))
                .map(str::to_string)
                .collect();
            names.sort();
            names
        };

        let mut locations = Vec::new();
        for name in names {
            if let Some(node) = self.nodes.get_node(&name) {
                locations.extend(node.get_relationships(subject, relationship));
            }
        }
        locations
    }

    /// The library's view: one node holding the facts of every unit currently
    /// recorded under `library`. `None` when nothing is known about it.
    pub fn library_node(&self, context: &ContextRef, library: &Source) -> Option<IndexNode> {
        let context = unwrap_context(context);
        let context_id = self.codecs.contexts.lookup(&context)?;
        let registry = self.registry.read();
        let units = registry.units_of(context_id, library);
        if units.is_empty() {
            return None;
        }

        let mut relations = HashMap::new();
        for unit in units {
            let name = self.node_name(context_id, library, &unit);
            let Some(node) = self.nodes.get_node(&name) else {
                continue;
            };
            for (key, records) in node.relations() {
                relations
                    .entry(*key)
                    .or_insert_with(Vec::new)
                    .extend(records.iter().copied());
            }
        }
        let mut merged = self.nodes.new_node(context);
        merged.set_relations(relations);
        Some(merged)
    }

    /// Drops every node of `context` and forgets the context. An open pass in
    /// that context is discarded.
    pub fn remove_context(&self, context: Option<&ContextRef>) {
        let Some(context) = context else {
            return;
        };
        let context = unwrap_context(context);
        let mut writer = self.writer.lock();
        if writer
            .as_ref()
            .is_some_and(|pass| context_key(&pass.context) == context_key(&context))
        {
            tracing::debug!("Discarding open index pass of a removed context");
            *writer = None;
            self.pass_done.notify_all();
        }
        let Some(context_id) = self.codecs.contexts.lookup(&context) else {
            return;
        };

        let mut registry = self.registry.write();
        let names = registry.names_where(|info| info.context == context_id);
        for name in &names {
            self.nodes.remove_node(name);
            registry.remove(name);
        }
        self.codecs.contexts.remove(&context);
        tracing::info!("Removed context {} ({} nodes)", context_id.0, names.len());
    }

    /// Drops the nodes whose unit or library is `source`.
    pub fn remove_source(&self, context: Option<&ContextRef>, source: &Source) {
        let Some(context_id) = self.context_id_of(context) else {
            return;
        };
        let _writer = self.writer.lock();
        let mut registry = self.registry.write();
        self.remove_source_locked(&mut registry, context_id, source);
    }

    /// Drops the nodes of every known source that `container` contains.
    pub fn remove_sources(
        &self,
        context: Option<&ContextRef>,
        container: Option<&dyn SourceContainer>,
    ) {
        let (Some(context_id), Some(container)) = (self.context_id_of(context), container) else {
            return;
        };
        let _writer = self.writer.lock();
        let mut registry = self.registry.write();
        for source in registry.sources_of(context_id) {
            if container.contains(&source) {
                self.remove_source_locked(&mut registry, context_id, &source);
            }
        }
    }

    fn context_id_of(&self, context: Option<&ContextRef>) -> Option<ContextId> {
        let context = unwrap_context(context?);
        self.codecs.contexts.lookup(&context)
    }

    fn remove_source_locked(&self, registry: &mut Registry, context: ContextId, source: &Source) {
        let names = registry.names_where(|info| {
            info.context == context && (info.unit == *source || info.library == *source)
        });
        for name in names {
            self.nodes.remove_node(&name);
            registry.remove(&name);
        }
    }

    /// Removes every node. Context ids stay assigned.
    pub fn clear(&self) {
        let _writer = self.writer.lock();
        let mut registry = self.registry.write();
        self.nodes.clear();
        registry.clear();
    }

    pub fn statistics(&self) -> IndexStatistics {
        let registry = self.registry.read();
        IndexStatistics {
            location_count: self.nodes.location_count(),
            source_count: registry.source_count(),
            node_count: registry.nodes.len(),
            context_count: registry.context_count(),
        }
    }

    /// Human-readable summary, e.g. `"2 locations, 3 sources, 2 nodes, 1 contexts"`.
    pub fn get_statistics(&self) -> String {
        self.statistics().to_string()
    }

    pub fn location_count(&self) -> usize {
        self.nodes.location_count()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().nodes.is_empty()
    }
}

impl Default for SplitIndex {
    fn default() -> Self {
        Self::in_memory()
    }
}
