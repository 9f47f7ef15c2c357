use super::element::{ElementLocation, ElementRef};
use std::sync::Arc;

pub type ContextRef = Arc<dyn AnalysisContext>;

/// An analysis context: the scope in which element locations resolve.
pub trait AnalysisContext: Send + Sync {
    fn is_disposed(&self) -> bool;

    /// Element at the given location, or `None` if it no longer exists.
    fn element(&self, location: &ElementLocation) -> Option<ElementRef>;

    /// The wrapped context when this one only instruments another.
    fn basis(&self) -> Option<ContextRef> {
        None
    }
}

/// Identity of a context handle. Two refs are the same context iff they point
/// at the same allocation.
pub fn context_key(context: &ContextRef) -> usize {
    Arc::as_ptr(context) as *const () as usize
}

/// Strips one level of instrumentation.
pub fn unwrap_context(context: &ContextRef) -> ContextRef {
    context.basis().unwrap_or_else(|| Arc::clone(context))
}
