use crate::model::{ContextRef, context_key};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub i32);

#[derive(Default)]
struct Inner {
    by_key: HashMap<usize, ContextId>,
    slots: Vec<Option<ContextRef>>,
    /// Slots released by `remove`, handed out lowest first.
    free: BTreeSet<i32>,
}

/// Interns context handles to small integers.
///
/// The table holds a strong reference to each encoded context until it is
/// removed, so a handle's identity cannot be recycled while its id is live.
#[derive(Default)]
pub struct ContextTable {
    inner: RwLock<Inner>,
}

impl ContextTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&self, context: &ContextRef) -> ContextId {
        let key = context_key(context);
        if let Some(id) = self.inner.read().by_key.get(&key) {
            return *id;
        }

        let mut inner = self.inner.write();
        if let Some(id) = inner.by_key.get(&key) {
            return *id;
        }
        let id = match inner.free.pop_first() {
            Some(slot) => {
                inner.slots[slot as usize] = Some(Arc::clone(context));
                ContextId(slot)
            }
            None => {
                inner.slots.push(Some(Arc::clone(context)));
                ContextId(inner.slots.len() as i32 - 1)
            }
        };
        inner.by_key.insert(key, id);
        id
    }

    /// Id of an already encoded context, without assigning one.
    pub fn lookup(&self, context: &ContextRef) -> Option<ContextId> {
        self.inner.read().by_key.get(&context_key(context)).copied()
    }

    pub fn decode(&self, id: ContextId) -> Option<ContextRef> {
        if id.0 < 0 {
            return None;
        }
        self.inner.read().slots.get(id.0 as usize)?.clone()
    }

    /// Forgets `context` and frees its slot for the next new context.
    pub fn remove(&self, context: &ContextRef) -> Option<ContextId> {
        let mut inner = self.inner.write();
        let id = inner.by_key.remove(&context_key(context))?;
        inner.slots[id.0 as usize] = None;
        inner.free.insert(id.0);
        Some(id)
    }

    /// Number of live contexts.
    pub fn len(&self) -> usize {
        self.inner.read().by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisContext, ElementLocation, ElementRef};

    struct Ctx;

    impl AnalysisContext for Ctx {
        fn is_disposed(&self) -> bool {
            false
        }

        fn element(&self, _location: &ElementLocation) -> Option<ElementRef> {
            None
        }
    }

    fn ctx() -> ContextRef {
        Arc::new(Ctx)
    }

    #[test]
    fn test_distinct_contexts_get_distinct_ids() {
        let table = ContextTable::new();
        let (a, b) = (ctx(), ctx());
        let id_a = table.encode(&a);
        let id_b = table.encode(&b);
        assert_ne!(id_a, id_b);
        assert_eq!(table.encode(&a), id_a);
        assert_eq!(table.encode(&Arc::clone(&b)), id_b);
    }

    #[test]
    fn test_decode() {
        let table = ContextTable::new();
        let a = ctx();
        let id = table.encode(&a);
        let decoded = table.decode(id).unwrap();
        assert!(Arc::ptr_eq(&decoded, &a));
        assert!(table.decode(ContextId(7)).is_none());
        assert!(table.decode(ContextId(-1)).is_none());
    }

    #[test]
    fn test_remove_frees_slot_for_next_context() {
        let table = ContextTable::new();
        let (a, b, c) = (ctx(), ctx(), ctx());
        assert_eq!(table.encode(&a), ContextId(0));
        assert_eq!(table.encode(&b), ContextId(1));

        assert_eq!(table.remove(&a), Some(ContextId(0)));
        assert!(table.decode(ContextId(0)).is_none());
        assert!(table.lookup(&a).is_none());

        assert_eq!(table.encode(&c), ContextId(0));
        assert_eq!(table.encode(&b), ContextId(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let table = ContextTable::new();
        assert_eq!(table.remove(&ctx()), None);
    }
}
