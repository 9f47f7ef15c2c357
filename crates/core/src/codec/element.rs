//! Element identities packed into integers.
//!
//! An [`ElementLocation`] is turned into an `i32` path and interned in an
//! [`IntArrayKeyMap`]; the id is the path's position in the table. The path is
//!
//! ```text
//! [prefix_len, prefix_0, .., prefix_n, name_0, offset_0, name_1, offset_1, ..]
//! ```
//!
//! where the prefix holds the library and unit components whole, and every
//! deeper component `name@offset` is split into its name's string id and its
//! offset (`NO_OFFSET` when it has none).
//!
//! The hash form replaces the offset of the outermost offset-bearing level with
//! `STRIPPED_OFFSET`, so a local re-parsed at a different offset keeps its hash
//! id. Deeper offsets are kept: they tell apart shadowed locals inside it.

use super::string::{StringId, StringTable};
use crate::collections::IntArrayKeyMap;
use crate::model::{AnalysisContext, Element, ElementLocation, ElementRef};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// Library and unit components are kept whole.
const PREFIX_LEN: usize = 2;
const NO_OFFSET: i32 = -1;
const STRIPPED_OFFSET: i32 = -2;

struct PathTable {
    ids: IntArrayKeyMap<u32>,
    paths: Vec<Box<[i32]>>,
}

pub struct ElementCodec {
    strings: Arc<StringTable>,
    table: RwLock<PathTable>,
}

/// Splits `foo@12` into `("foo", Some(12))`. A suffix that is not a
/// non-negative integer is part of the name.
fn split_offset(component: &str) -> (&str, Option<i32>) {
    if let Some((name, suffix)) = component.rsplit_once('@') {
        if let Ok(offset) = suffix.parse::<i32>() {
            if offset >= 0 && !suffix.starts_with('+') {
                return (name, Some(offset));
            }
        }
    }
    (component, None)
}

impl ElementCodec {
    pub fn new(strings: Arc<StringTable>, capacity: usize, load_factor: f32) -> Self {
        Self {
            strings,
            table: RwLock::new(PathTable {
                ids: IntArrayKeyMap::new(capacity, load_factor),
                paths: Vec::new(),
            }),
        }
    }

    /// Full id: every offset is kept.
    pub fn encode(&self, element: &dyn Element) -> ElementId {
        let path = self.build_path(&element.location(), false, true);
        self.intern(path)
    }

    /// Hash id: the outermost local offset is dropped.
    pub fn encode_hash(&self, element: &dyn Element) -> ElementId {
        let path = self.build_path(&element.location(), true, true);
        self.intern(path)
    }

    /// Full id of an element that was encoded before; never allocates.
    pub fn lookup(&self, element: &dyn Element) -> Option<ElementId> {
        self.lookup_path(&element.location(), false)
    }

    /// Hash id of an element that was hash-encoded before; never allocates.
    pub fn lookup_hash(&self, element: &dyn Element) -> Option<ElementId> {
        self.lookup_path(&element.location(), true)
    }

    fn lookup_path(&self, location: &ElementLocation, hash: bool) -> Option<ElementId> {
        let path = self.build_path(location, hash, false);
        if path.is_empty() {
            return None;
        }
        let id = self.table.read().ids.get(&path, u32::MAX);
        (id != u32::MAX).then_some(ElementId(id))
    }

    /// Resolves `id` to a live element of `context`, or `None` if it was never
    /// produced by this codec or the context no longer has it.
    pub fn decode(&self, context: &dyn AnalysisContext, id: ElementId) -> Option<ElementRef> {
        let location = self.location(id)?;
        context.element(&location)
    }

    pub fn location(&self, id: ElementId) -> Option<ElementLocation> {
        let table = self.table.read();
        let path = table.paths.get(id.0 as usize)?;
        self.components(path).map(ElementLocation::new)
    }

    pub fn len(&self) -> usize {
        self.table.read().paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn intern(&self, path: Vec<i32>) -> ElementId {
        if let Some(id) = self.existing(&path) {
            return id;
        }
        let mut table = self.table.write();
        let id = table.ids.get(&path, u32::MAX);
        if id != u32::MAX {
            return ElementId(id);
        }
        let id = table.paths.len() as u32;
        table.ids.put(&path, id);
        table.paths.push(path.into_boxed_slice());
        ElementId(id)
    }

    fn existing(&self, path: &[i32]) -> Option<ElementId> {
        let id = self.table.read().ids.get(path, u32::MAX);
        (id != u32::MAX).then_some(ElementId(id))
    }

    /// Builds the packed path. With `intern == false` a component string that
    /// was never interned yields an empty path, which matches nothing.
    fn build_path(&self, location: &ElementLocation, hash: bool, intern: bool) -> Vec<i32> {
        let string_id = |s: &str| -> Option<i32> {
            if intern {
                Some(self.strings.encode(s).0 as i32)
            } else {
                self.strings.lookup(s).map(|id| id.0 as i32)
            }
        };

        let components = location.components();
        let prefix_len = components.len().min(PREFIX_LEN);
        let mut path = Vec::with_capacity(1 + prefix_len + 2 * (components.len() - prefix_len));
        path.push(prefix_len as i32);
        for component in &components[..prefix_len] {
            match string_id(component.as_str()) {
                Some(id) => path.push(id),
                None => return Vec::new(),
            }
        }

        let mut stripped = false;
        for component in &components[prefix_len..] {
            let (name, offset) = split_offset(component);
            let Some(name_id) = string_id(name) else {
                return Vec::new();
            };
            path.push(name_id);
            path.push(match offset {
                Some(_) if hash && !stripped => {
                    stripped = true;
                    STRIPPED_OFFSET
                }
                Some(offset) => offset,
                None => NO_OFFSET,
            });
        }
        path
    }

    fn components(&self, path: &[i32]) -> Option<Vec<String>> {
        let (&prefix_len, rest) = path.split_first()?;
        let prefix_len = usize::try_from(prefix_len).ok()?;
        if rest.len() < prefix_len || (rest.len() - prefix_len) % 2 != 0 {
            return None;
        }
        let resolve = |id: i32| self.strings.decode(StringId(id as u32));

        let (prefix, nested) = rest.split_at(prefix_len);
        let mut components = Vec::with_capacity(prefix_len + nested.len() / 2);
        for &id in prefix {
            components.push(resolve(id)?.to_string());
        }
        for pair in nested.chunks_exact(2) {
            let name = resolve(pair[0])?;
            components.push(if pair[1] >= 0 {
                format!("{name}@{}", pair[1])
            } else {
                name.to_string()
            });
        }
        Some(components)
    }
}
