//! Unit lifecycle and handle caching

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::*;

#[test]
fn repeated_lookups_share_one_handle() {
    let state = TestState::new();
    let unit = state.unit();

    let a = unit.dictionary::<String, Item>("index").unwrap();
    let b = unit.dictionary::<String, Item>("Index").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let other = state.unit();
    let c = other.dictionary::<String, Item>("index").unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn store_provider_runs_on_first_lookup() {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = Arc::new(MemoryStore::new());
    let factory = {
        let calls = calls.clone();
        StateFactory::new(registry(StatefulConfig::default()), move || {
            calls.fetch_add(1, Ordering::SeqCst);
            store.clone()
        })
    };

    let unit = factory.create_unit();
    unit.commit().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let unit = factory.create_unit();
    unit.queue::<u32>("jobs").unwrap();
    unit.stack::<u32>("undo").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn lookups_are_checked_against_registration() {
    let state = TestState::new();
    let unit = state.unit();

    assert!(matches!(
        unit.queue::<u32>("nope"),
        Err(Error::UnknownState(name)) if name == "nope"
    ));
    assert!(matches!(
        unit.list::<u32>("jobs"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        unit.array::<u32>("slots"),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn disposed_unit_rejects_everything() {
    let state = TestState::new();

    let unit = state.unit();
    unit.abort().unwrap();
    assert!(matches!(unit.commit(), Err(Error::DisposedUnit)));
    assert!(matches!(unit.abort(), Err(Error::DisposedUnit)));
    assert!(matches!(
        unit.object::<Item>("profile"),
        Err(Error::DisposedUnit)
    ));
    unit.dispose();

    let unit = state.unit();
    unit.dispose();
    unit.dispose();
    assert!(unit.is_disposed());
    assert!(matches!(unit.commit(), Err(Error::DisposedUnit)));
}

#[tokio::test]
async fn handles_keep_working_after_commit() {
    let state = TestState::new();
    let unit = state.unit();
    let profile = unit.object::<Item>("profile").unwrap();
    unit.commit().unwrap();

    profile.set(Item::new(1, "late")).await.unwrap();
    let stored: Item = state.store.get("profile").await.unwrap();
    assert_eq!(stored, Item::new(1, "late"));
}
