use lasso::{Key, Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StringId(pub u32);

/// Append-only string interner. Ids stay valid for the lifetime of the table.
#[derive(Debug, Default)]
pub struct StringTable {
    rodeo: ThreadedRodeo,
}

impl StringTable {
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    pub fn encode(&self, value: &str) -> StringId {
        StringId(self.rodeo.get_or_intern(value).into_usize() as u32)
    }

    /// Id of an already interned string, without interning it.
    pub fn lookup(&self, value: &str) -> Option<StringId> {
        self.rodeo.get(value).map(|spur| StringId(spur.into_usize() as u32))
    }

    pub fn decode(&self, id: StringId) -> Option<&str> {
        let spur = Spur::try_from_usize(id.0 as usize)?;
        self.rodeo.try_resolve(&spur)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_idempotent() {
        let table = StringTable::new();
        let a = table.encode("a");
        let b = table.encode("b");
        assert_ne!(a, b);
        assert_eq!(table.encode("a"), a);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_decode() {
        let table = StringTable::new();
        let id = table.encode("/home/user/a.dart");
        assert_eq!(table.decode(id), Some("/home/user/a.dart"));
        assert_eq!(table.decode(StringId(999)), None);
        assert_eq!(table.lookup("/home/user/a.dart"), Some(id));
        assert_eq!(table.lookup("missing"), None);
    }
}
