//! Deleting state of every kind

use crate::common::*;

#[tokio::test]
async fn delete_empties_every_kind() {
    let state = TestState::new();
    let unit = state.unit();

    let items = unit.list::<Item>("items").unwrap();
    let jobs = unit.queue::<u32>("jobs").unwrap();
    let undo = unit.stack::<u32>("undo").unwrap();
    let index = unit.dictionary::<String, Item>("index").unwrap();
    let counters = unit.array::<u64>("counters").unwrap();
    let profile = unit.object::<Item>("profile").unwrap();

    items.add_range([Item::new(1, "a"), Item::new(2, "b")]).await.unwrap();
    jobs.enqueue_range([1, 2, 3]).await.unwrap();
    undo.push_range([4, 5]).await.unwrap();
    index.add("a".to_string(), Item::new(1, "a")).await.unwrap();
    index.add("b".to_string(), Item::new(2, "b")).await.unwrap();
    counters.set(3, 9).await.unwrap();
    profile.set(Item::new(0, "me")).await.unwrap();
    assert!(!state.store.is_empty());

    items.delete_state().await.unwrap();
    jobs.delete_state().await.unwrap();
    undo.delete_state().await.unwrap();
    index.delete_state().await.unwrap();
    counters.delete_state().await.unwrap();
    profile.delete_state().await.unwrap();

    assert!(state.store.is_empty(), "left behind: {:?}", state.store.keys());

    assert_eq!(items.count().await.unwrap(), 0);
    assert_eq!(jobs.count().await.unwrap(), 0);
    assert_eq!(undo.count().await.unwrap(), 0);
    assert_eq!(index.count().await.unwrap(), 0);
    assert!(items.cursor().collect().await.unwrap().is_empty());
    assert!(jobs.cursor().collect().await.unwrap().is_empty());
    assert!(undo.cursor().collect().await.unwrap().is_empty());
    assert!(index.cursor().collect().await.unwrap().is_empty());

    // an array keeps its shape: `length` slots, all defaults, nothing stored
    assert!(!counters.has_state().await.unwrap());
    assert_eq!(counters.count().await.unwrap(), counters.length());
    let slots = counters.cursor().collect().await.unwrap();
    assert_eq!(slots.len() as u64, counters.length());
    assert!(slots.iter().all(|v| *v == 0));
}

#[tokio::test]
async fn teardown_removes_live_records_plus_manifest() {
    let state = TestState::new();
    let unit = state.unit();
    let items = unit.list::<Item>("items").unwrap();

    items
        .add_range((0..5).map(|i| Item::new(i, "x")))
        .await
        .unwrap();
    items.remove_at(2).await.unwrap();
    state.store.reset_stats();

    items.delete_state().await.unwrap();
    assert_eq!(state.store.stats().removes, 4 + 1);
}

#[tokio::test]
async fn delete_of_absent_state_is_noop() {
    let state = TestState::new();
    let unit = state.unit();

    unit.list::<Item>("items").unwrap().delete_state().await.unwrap();
    unit.dictionary::<String, Item>("index")
        .unwrap()
        .delete_state()
        .await
        .unwrap();
    unit.array::<u64>("counters")
        .unwrap()
        .delete_state()
        .await
        .unwrap();
    assert_eq!(state.store.stats().removes, 0);
}
