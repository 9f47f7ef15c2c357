use crate::codec::{ElementCodec, ElementId, RelationshipId};
use crate::model::{AnalysisContext, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationKey {
    pub element: ElementId,
    pub relationship: RelationshipId,
}

impl RelationKey {
    pub fn new(element: ElementId, relationship: RelationshipId) -> Self {
        Self {
            element,
            relationship,
        }
    }
}

/// Codec-level form of a [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationRecord {
    pub element: ElementId,
    pub offset: i32,
    pub length: i32,
}

impl LocationRecord {
    pub fn new(element: ElementId, offset: i32, length: i32) -> Self {
        Self {
            element,
            offset,
            length,
        }
    }

    pub fn from_location(codec: &ElementCodec, location: &Location) -> Self {
        Self::new(
            codec.encode(location.element.as_ref()),
            location.offset,
            location.length,
        )
    }

    /// `None` when the element no longer exists in `context`.
    pub fn to_location(
        &self,
        codec: &ElementCodec,
        context: &dyn AnalysisContext,
    ) -> Option<Location> {
        let element = codec.decode(context, self.element)?;
        Some(Location::new(element, self.offset, self.length))
    }
}
