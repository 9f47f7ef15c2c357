use std::fmt;
use std::sync::Arc;

pub type ElementRef = Arc<dyn Element>;

/// An opaque program element, identified within its context by its location.
pub trait Element: Send + Sync + fmt::Debug {
    fn location(&self) -> ElementLocation;
}

/// Ordered path components identifying an element within one context, e.g.
/// `["file:/lib.dart", "file:/unit.dart", "A", "foo@12"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementLocation {
    components: Vec<String>,
}

impl ElementLocation {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for ElementLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join(";"))
    }
}

/// Sentinel subject for relationships that are not tied to one declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniverseElement;

impl UniverseElement {
    pub const LOCATION_COMPONENT: &'static str = "--universe--";

    pub fn location() -> ElementLocation {
        ElementLocation::new([Self::LOCATION_COMPONENT])
    }

    pub fn is_universe(element: &dyn Element) -> bool {
        let location = element.location();
        location.len() == 1 && location.components()[0] == Self::LOCATION_COMPONENT
    }
}

impl Element for UniverseElement {
    fn location(&self) -> ElementLocation {
        UniverseElement::location()
    }
}
