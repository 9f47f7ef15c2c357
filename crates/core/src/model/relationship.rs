use std::fmt;
use std::sync::Arc;

/// A named kind of semantic link. Relationships are identified by name only:
/// two values with the same name are the same relationship.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Relationship(Arc<str>);

impl Relationship {
    pub fn named(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relationship({})", self.0)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
