//! Fixed arrays through the unit

use stateful_primitives::ArrayState;

use crate::common::*;

#[tokio::test]
async fn single_slot_scenario() {
    let state = TestState::new();
    let unit = state.unit();
    let slots = unit.array::<String>("slots").unwrap();

    assert_eq!(slots.get(0).await.unwrap(), "");
    slots.set(0, "A".to_string()).await.unwrap();
    assert_eq!(slots.get(0).await.unwrap(), "A");
    assert!(matches!(
        slots.get(1).await,
        Err(Error::IndexOutOfRange { index: 1, len: 1 })
    ));
}

#[tokio::test]
async fn bounds_and_defaults() {
    let state = TestState::new();
    let unit = state.unit();
    let counters = unit.array::<u64>("counters").unwrap();

    assert!(matches!(counters.get(-1).await, Err(Error::IndexOutOfRange { .. })));
    assert!(matches!(counters.get(8).await, Err(Error::IndexOutOfRange { .. })));
    assert_eq!(counters.get(0).await.unwrap(), 0);
    assert!(!counters.has_state().await.unwrap());

    counters.set(7, 42).await.unwrap();
    let values = counters.cursor().collect().await.unwrap();
    assert_eq!(values.len(), 8);
    assert_eq!(values[7], 42);
    assert!(values[..7].iter().all(|v| *v == 0));
    assert_eq!(counters.count().await.unwrap(), 8);
}

#[tokio::test]
async fn reopening_with_another_length_fails() {
    let state = TestState::new();
    let unit = state.unit();
    unit.array::<u64>("counters")
        .unwrap()
        .set(0, 1)
        .await
        .unwrap();

    let resized = ArrayState::<_, u64>::new(state.store.clone(), "counters", 4).unwrap();
    assert!(matches!(
        resized.get(0).await,
        Err(Error::InconsistentLength {
            configured: 4,
            persisted: 8
        })
    ));

    // the failure is not cached as success: every call keeps failing
    assert!(resized.set(0, 2).await.is_err());
    assert_eq!(
        unit.array::<u64>("counters").unwrap().get(0).await.unwrap(),
        1
    );
}
