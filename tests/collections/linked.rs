//! List, queue and stack through the unit

use std::sync::Arc;

use stateful_primitives::{LinkedChain, LinkedManifest, LinkedNode};

use crate::common::*;

mod queue {
    use super::*;

    #[tokio::test]
    async fn values_leave_in_arrival_order() {
        let state = TestState::new();
        let unit = state.unit();
        let jobs = unit.queue::<u32>("jobs").unwrap();

        jobs.enqueue_range(1..=5).await.unwrap();
        jobs.enqueue(6).await.unwrap();
        assert_eq!(jobs.try_peek().await.unwrap(), Some(1));

        let mut dequeued = Vec::new();
        while let Some(value) = jobs.try_dequeue().await.unwrap() {
            dequeued.push(value);
        }
        assert_eq!(dequeued, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(jobs.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn state_survives_across_units() {
        let state = TestState::new();

        let unit = state.unit();
        unit.queue::<u32>("jobs")
            .unwrap()
            .enqueue_range([10, 20])
            .await
            .unwrap();
        unit.commit().unwrap();

        let unit = state.unit();
        let jobs = unit.queue::<u32>("jobs").unwrap();
        assert_eq!(jobs.try_dequeue().await.unwrap(), Some(10));
        unit.abort().unwrap();

        // aborting does not roll back the dequeue
        let unit = state.unit();
        let jobs = unit.queue::<u32>("JOBS").unwrap();
        assert_eq!(jobs.cursor().collect().await.unwrap(), vec![20]);
    }
}

mod stack {
    use super::*;

    #[tokio::test]
    async fn values_leave_in_reverse_order() {
        let state = TestState::new();
        let unit = state.unit();
        let undo = unit.stack::<u32>("undo").unwrap();

        for value in 1..=4 {
            undo.push(value).await.unwrap();
        }
        assert_eq!(undo.try_peek().await.unwrap(), Some(4));

        let mut popped = Vec::new();
        while let Some(value) = undo.try_pop().await.unwrap() {
            popped.push(value);
        }
        assert_eq!(popped, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn push_range_matches_sequential_pushes() {
        let state = TestState::new();
        let unit = state.unit();
        let undo = unit.stack::<u32>("undo").unwrap();

        undo.push_range([1, 2, 3]).await.unwrap();
        assert_eq!(undo.cursor().collect().await.unwrap(), vec![3, 2, 1]);
    }
}

mod list {
    use super::*;

    fn items(ids: &[u32]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(*id, &format!("item-{}", id))).collect()
    }

    #[tokio::test]
    async fn insert_then_get_returns_first_inserted() {
        let state = TestState::new();
        let unit = state.unit();
        let list = unit.list::<Item>("items").unwrap();

        list.add_range(items(&[1, 4])).await.unwrap();
        let before = list.count().await.unwrap();
        list.insert_range(1, items(&[2, 3])).await.unwrap();

        assert_eq!(list.try_get_at(1).await.unwrap(), Some(Item::new(2, "item-2")));
        assert_eq!(list.count().await.unwrap(), before + 2);
        assert_eq!(list.try_get().await.unwrap(), Some(items(&[1, 2, 3, 4])));
    }

    #[tokio::test]
    async fn remove_first_match_leaves_linked_residue() {
        let state = TestState::new();
        let unit = state.unit();
        let list = unit.list::<Item>("items").unwrap();

        list.add_range(items(&[1, 2, 3, 2])).await.unwrap();
        let removed = list.remove(|item| item.id == 2).await.unwrap();
        assert_eq!(removed, Some(Item::new(2, "item-2")));
        assert_eq!(list.count().await.unwrap(), 3);
        assert_eq!(list.try_get().await.unwrap(), Some(items(&[1, 3, 2])));

        // neighbours of the removed node now point at each other
        let first: LinkedNode<Item> = state.store.get("items:0").await.unwrap();
        let third: LinkedNode<Item> = state.store.get("items:2").await.unwrap();
        assert_eq!(first.next, Some(2));
        assert_eq!(third.previous, Some(0));
        assert!(!state.store.contains("items:1").await.unwrap());
    }

    #[tokio::test]
    async fn out_of_range_positions() {
        let state = TestState::new();
        let unit = state.unit();
        let list = unit.list::<Item>("items").unwrap();
        list.add_range(items(&[1])).await.unwrap();

        assert!(matches!(
            list.insert(2, Item::default()).await,
            Err(Error::IndexOutOfRange { index: 2, len: 1 })
        ));
        assert!(matches!(
            list.insert(-1, Item::default()).await,
            Err(Error::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            list.remove_at(1).await,
            Err(Error::IndexOutOfRange { .. })
        ));
        assert_eq!(list.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_and_contains() {
        let state = TestState::new();
        let unit = state.unit();
        let list = unit.list::<Item>("items").unwrap();
        list.add_range(items(&[5, 6, 7])).await.unwrap();

        assert_eq!(
            list.try_find(|item| item.id > 5).await.unwrap(),
            Some(Item::new(6, "item-6"))
        );
        assert!(list.contains(|item| item.label == "item-7").await.unwrap());
        assert!(!list.contains_value(&Item::new(8, "item-8")).await.unwrap());
    }
}

#[tokio::test]
async fn insert_first_into_empty_chain() {
    let store = Arc::new(MemoryStore::new());
    let chain = LinkedChain::<_, String>::new(store.clone(), "chain");

    chain
        .insert_first(vec!["I1".to_string(), "I2".to_string()])
        .await
        .unwrap();

    let manifest: LinkedManifest = store.get("chain").await.unwrap();
    assert_eq!(manifest.first, Some(0));
    assert_eq!(manifest.last, Some(1));
    assert_eq!(manifest.count, 2);

    let i1: LinkedNode<String> = store.get("chain:0").await.unwrap();
    let i2: LinkedNode<String> = store.get("chain:1").await.unwrap();
    assert_eq!((i1.value.as_str(), i1.previous, i1.next), ("I1", None, Some(1)));
    assert_eq!((i2.value.as_str(), i2.previous, i2.next), ("I2", Some(0), None));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_names_run_in_parallel() {
    let registry = StateRegistry::builder(StatefulConfig::default())
        .queue::<u32>("q0")
        .queue::<u32>("q1")
        .queue::<u32>("q2")
        .queue::<u32>("q3")
        .build()
        .unwrap();
    let factory = StateFactory::with_store(registry, Arc::new(MemoryStore::new()));
    let unit = factory.create_unit();

    let mut tasks = Vec::new();
    for q in 0..4u32 {
        let queue = unit.queue::<u32>(&format!("q{}", q)).unwrap();
        tasks.push(tokio::spawn(async move {
            for value in 0..50 {
                queue.enqueue(q * 100 + value).await.unwrap();
            }
            queue.cursor().collect().await.unwrap()
        }));
    }

    for (q, task) in tasks.into_iter().enumerate() {
        let values = task.await.unwrap();
        let expected: Vec<u32> = (0..50).map(|v| q as u32 * 100 + v).collect();
        assert_eq!(values, expected);
    }
    unit.commit().unwrap();
}
