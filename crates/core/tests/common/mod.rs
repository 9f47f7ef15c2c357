#![allow(dead_code)]

use parking_lot::Mutex;
use splitdex_core::model::{
    AnalysisContext, CompilationUnitElement, ContextRef, Element, ElementLocation, ElementRef,
    HtmlElement, LibraryElement, Location, Source,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct TestElement {
    location: ElementLocation,
}

impl Element for TestElement {
    fn location(&self) -> ElementLocation {
        self.location.clone()
    }
}

/// A context resolving the elements registered with [`TestContext::element`].
#[derive(Default)]
pub struct TestContext {
    elements: Mutex<HashMap<ElementLocation, ElementRef>>,
    disposed: AtomicBool,
}

impl TestContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates an element resolvable in this context.
    pub fn element(&self, components: &[&str]) -> ElementRef {
        let element: ElementRef = Arc::new(TestElement {
            location: ElementLocation::new(components.iter().copied()),
        });
        self.elements
            .lock()
            .insert(element.location(), Arc::clone(&element));
        element
    }

    /// Makes the element at `components` unresolvable, as after an edit.
    pub fn forget(&self, components: &[&str]) {
        self.elements
            .lock()
            .remove(&ElementLocation::new(components.iter().copied()));
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

impl AnalysisContext for TestContext {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn element(&self, location: &ElementLocation) -> Option<ElementRef> {
        self.elements.lock().get(location).cloned()
    }
}

/// Wraps another context, the way instrumentation does.
pub struct InstrumentedContext {
    pub basis: ContextRef,
}

impl AnalysisContext for InstrumentedContext {
    // Always reports live, so only the basis can tell the index it is disposed.
    fn is_disposed(&self) -> bool {
        false
    }

    fn element(&self, location: &ElementLocation) -> Option<ElementRef> {
        self.basis.element(location)
    }

    fn basis(&self) -> Option<ContextRef> {
        Some(Arc::clone(&self.basis))
    }
}

pub struct TestUnit {
    source: Source,
    library: Mutex<Option<Arc<TestLibrary>>>,
}

impl TestUnit {
    pub fn new(source: &Source) -> Arc<Self> {
        Arc::new(Self {
            source: source.clone(),
            library: Mutex::new(None),
        })
    }

    pub fn set_library(&self, library: &Arc<TestLibrary>) {
        *self.library.lock() = Some(Arc::clone(library));
    }
}

impl CompilationUnitElement for TestUnit {
    fn source(&self) -> Source {
        self.source.clone()
    }

    fn library(&self) -> Option<Arc<dyn LibraryElement>> {
        self.library
            .lock()
            .clone()
            .map(|library| library as Arc<dyn LibraryElement>)
    }
}

pub struct TestLibrary {
    source: Source,
    defining: Mutex<Option<Arc<TestUnit>>>,
    parts: Mutex<Vec<Arc<TestUnit>>>,
}

impl TestLibrary {
    pub fn new(source: &Source) -> Arc<Self> {
        Arc::new(Self {
            source: source.clone(),
            defining: Mutex::new(None),
            parts: Mutex::new(Vec::new()),
        })
    }

    pub fn set_defining_unit(&self, unit: &Arc<TestUnit>) {
        *self.defining.lock() = Some(Arc::clone(unit));
    }

    pub fn set_parts(&self, parts: &[&Arc<TestUnit>]) {
        *self.parts.lock() = parts.iter().map(|unit| Arc::clone(unit)).collect();
    }
}

impl LibraryElement for TestLibrary {
    fn source(&self) -> Source {
        self.source.clone()
    }

    fn defining_unit(&self) -> Option<Arc<dyn CompilationUnitElement>> {
        self.defining
            .lock()
            .clone()
            .map(|unit| unit as Arc<dyn CompilationUnitElement>)
    }

    fn parts(&self) -> Vec<Arc<dyn CompilationUnitElement>> {
        self.parts
            .lock()
            .iter()
            .map(|unit| Arc::clone(unit) as Arc<dyn CompilationUnitElement>)
            .collect()
    }
}

pub struct TestHtml {
    pub source: Source,
}

impl HtmlElement for TestHtml {
    fn source(&self) -> Source {
        self.source.clone()
    }
}

/// A library with a defining unit and parts `A`, `B` and `C`.
pub struct LibraryFixture {
    pub library: Arc<TestLibrary>,
    pub library_unit: Arc<TestUnit>,
    pub unit_a: Arc<TestUnit>,
    pub unit_b: Arc<TestUnit>,
    pub unit_c: Arc<TestUnit>,
}

impl LibraryFixture {
    pub fn new() -> Self {
        let library_source = Source::new("/home/user/lib.dart");
        let library = TestLibrary::new(&library_source);
        let library_unit = TestUnit::new(&library_source);
        let unit_a = TestUnit::new(&Source::new("/home/user/sourceA.dart"));
        let unit_b = TestUnit::new(&Source::new("/home/user/sourceB.dart"));
        let unit_c = TestUnit::new(&Source::new("/home/user/sourceC.dart"));
        for unit in [&library_unit, &unit_a, &unit_b, &unit_c] {
            unit.set_library(&library);
        }
        library.set_defining_unit(&library_unit);
        library.set_parts(&[&unit_a, &unit_b, &unit_c]);
        Self {
            library,
            library_unit,
            unit_a,
            unit_b,
            unit_c,
        }
    }

    pub fn library_source(&self) -> Source {
        self.library_unit.source()
    }
}

pub fn context_ref(context: &Arc<TestContext>) -> ContextRef {
    Arc::clone(context) as ContextRef
}

pub fn location(element: &ElementRef, offset: i32, length: i32) -> Location {
    Location::new(Arc::clone(element), offset, length)
}

/// Asserts that `actual` holds exactly `expected`, in any order.
pub fn assert_locations(actual: &[Location], expected: &[&Location]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "expected {expected:?}, got {actual:?}"
    );
    for want in expected {
        assert!(
            actual.iter().any(|got| got.same_as(want)),
            "missing {want:?} in {actual:?}"
        );
    }
}

pub fn unit(unit: &Arc<TestUnit>) -> Option<&dyn CompilationUnitElement> {
    Some(unit.as_ref())
}
