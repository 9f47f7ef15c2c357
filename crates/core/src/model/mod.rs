//! Collaborator types the index consumes.
//!
//! The semantic analyzer owns the real implementations; the index only relies
//! on the behavior described by these traits.

pub mod context;
pub mod element;
pub mod location;
pub mod relationship;
pub mod source;

pub use context::{AnalysisContext, ContextRef, context_key, unwrap_context};
pub use element::{Element, ElementLocation, ElementRef, UniverseElement};
pub use location::Location;
pub use relationship::Relationship;
pub use source::{CompilationUnitElement, HtmlElement, LibraryElement, Source, SourceContainer};
