use super::element::ElementRef;
use std::fmt;
use std::sync::Arc;

/// A place in source text where a relationship holds.
#[derive(Clone)]
pub struct Location {
    pub element: ElementRef,
    pub offset: i32,
    pub length: i32,
}

impl Location {
    pub fn new(element: ElementRef, offset: i32, length: i32) -> Self {
        Self {
            element,
            offset,
            length,
        }
    }

    /// Same element allocation, offset and length.
    pub fn same_as(&self, other: &Location) -> bool {
        Arc::ptr_eq(&self.element, &other.element)
            && self.offset == other.offset
            && self.length == other.length
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location({} @ {}+{})",
            self.element.location(),
            self.offset,
            self.length
        )
    }
}
