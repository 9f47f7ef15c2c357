mod common;

use common::{LibraryFixture, TestContext, assert_locations, context_ref, location, unit};
use splitdex_core::model::{CompilationUnitElement, Relationship};
use splitdex_core::store::{FileNodeStore, NodeStore};
use splitdex_core::{IndexConfig, SplitIndex};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_missing_names() {
    let temp = TempDir::new().unwrap();
    let store = FileNodeStore::new(temp.path().join("nodes"));
    assert_eq!(store.get("0_1_2.index").unwrap(), None);
    store.remove("0_1_2.index").unwrap();
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_clear_keeps_foreign_files() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_path_buf();
    fs::write(dir.join("notes.txt"), "keep me").unwrap();

    let store = FileNodeStore::new(dir.clone());
    store.put("0_1_2.index", b"one").unwrap();
    store.put("0_1_3.index", b"two").unwrap();
    assert_eq!(
        store.names().unwrap(),
        vec!["0_1_2.index", "0_1_3.index", "notes.txt"]
    );

    store.clear().unwrap();
    assert_eq!(store.names().unwrap(), vec!["notes.txt"]);
    assert_eq!(fs::read_to_string(dir.join("notes.txt")).unwrap(), "keep me");
}

#[test]
fn test_put_replaces_blob() {
    let temp = TempDir::new().unwrap();
    let store = FileNodeStore::with_compression(temp.path().to_path_buf(), 3);
    store.put("n.index", &[1; 512]).unwrap();
    store.put("n.index", &[2; 16]).unwrap();
    assert_eq!(store.get("n.index").unwrap(), Some(vec![2; 16]));
    assert!(store.file_size("n.index").unwrap().is_some());
    assert!(store.file_size("missing.index").unwrap().is_none());
}

#[test]
fn test_split_index_over_files() {
    let temp = TempDir::new().unwrap();
    let config = IndexConfig {
        index_dir: temp.path().join("nodes"),
        ..IndexConfig::default()
    };
    let store = Arc::new(FileNodeStore::from_config(&config));
    let index = SplitIndex::with_config(store.clone(), &config);

    let context = TestContext::new();
    let ctx = context_ref(&context);
    let lib = LibraryFixture::new();
    let element_a = context.element(&["/home/user/sourceA.dart", "ClassA"]);
    let element_b = context.element(&["/home/user/sourceB.dart", "ClassB"]);
    let relationship = Relationship::named("is-referenced-by");
    let location_a = location(&element_a, 10, 3);
    let location_b = location(&element_b, 20, 3);

    for (part, at) in [(&lib.unit_a, &location_a), (&lib.unit_b, &location_b)] {
        assert!(index.index_unit(&ctx, unit(part), |recorder| {
            recorder.record_relationship(element_a.as_ref(), &relationship, at);
        }));
    }

    assert_eq!(store.names().unwrap().len(), 2);
    assert_locations(
        &index.get_relationships(element_a.as_ref(), &relationship),
        &[&location_a, &location_b],
    );

    index.remove_source(Some(&ctx), &lib.unit_a.source());
    assert_eq!(store.names().unwrap().len(), 1);

    index.clear();
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_corrupt_node_degrades_to_nothing() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileNodeStore::new(temp.path().to_path_buf()));
    let index = SplitIndex::new(store.clone());

    let context = TestContext::new();
    let ctx = context_ref(&context);
    let lib = LibraryFixture::new();
    let element_a = context.element(&["/home/user/sourceA.dart", "ClassA"]);
    let relationship = Relationship::named("is-referenced-by");
    let location_a = location(&element_a, 10, 3);
    index.index_unit(&ctx, unit(&lib.unit_a), |recorder| {
        recorder.record_relationship(element_a.as_ref(), &relationship, &location_a);
    });

    let names = store.names().unwrap();
    assert_eq!(names.len(), 1);
    fs::write(temp.path().join(&names[0]), b"not zstd").unwrap();

    assert!(
        index
            .get_relationships(element_a.as_ref(), &relationship)
            .is_empty()
    );
}

#[test]
fn test_unknown_version_degrades_to_nothing() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileNodeStore::new(temp.path().to_path_buf()));
    let index = SplitIndex::new(store.clone());

    let context = TestContext::new();
    let ctx = context_ref(&context);
    let lib = LibraryFixture::new();
    let element_a = context.element(&["/home/user/sourceA.dart", "ClassA"]);
    let relationship = Relationship::named("is-referenced-by");
    let location_a = location(&element_a, 10, 3);
    index.index_unit(&ctx, unit(&lib.unit_a), |recorder| {
        recorder.record_relationship(element_a.as_ref(), &relationship, &location_a);
    });

    let name = store.names().unwrap().remove(0);
    let mut bytes = store.get(&name).unwrap().unwrap();
    bytes[0] = 99;
    store.put(&name, &bytes).unwrap();

    assert!(
        index
            .get_relationships(element_a.as_ref(), &relationship)
            .is_empty()
    );
}
