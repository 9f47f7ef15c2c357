use std::fmt;
use std::sync::Arc;

/// A source file, identified by its full name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Source {
    full_name: Arc<str>,
}

impl Source {
    pub fn new(full_name: &str) -> Self {
        Self {
            full_name: Arc::from(full_name),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({})", self.full_name)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

pub trait CompilationUnitElement: Send + Sync {
    fn source(&self) -> Source;
    fn library(&self) -> Option<Arc<dyn LibraryElement>>;
}

pub trait LibraryElement: Send + Sync {
    fn source(&self) -> Source;
    fn defining_unit(&self) -> Option<Arc<dyn CompilationUnitElement>>;
    /// Units currently declared as parts, excluding the defining unit.
    fn parts(&self) -> Vec<Arc<dyn CompilationUnitElement>>;
}

pub trait HtmlElement: Send + Sync {
    fn source(&self) -> Source;
}

/// A set of sources, used to select what to remove.
pub trait SourceContainer {
    fn contains(&self, source: &Source) -> bool;
}

impl<F> SourceContainer for F
where
    F: Fn(&Source) -> bool,
{
    fn contains(&self, source: &Source) -> bool {
        self(source)
    }
}
