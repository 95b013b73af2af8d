//! Dictionary through the unit

use stateful_core::bucket_key;
use stateful_primitives::{HashBucket, HashManifest};

use crate::common::*;

#[tokio::test]
async fn add_lookup_duplicate_remove() {
    let state = TestState::new();
    let unit = state.unit();
    let index = unit.dictionary::<String, Item>("index").unwrap();
    let key = "A".to_string();
    let v1 = Item::new(1, "first");

    index.add(key.clone(), v1.clone()).await.unwrap();
    assert!(index.contains_key(&key).await.unwrap());
    assert_eq!(index.try_get_value(&key).await.unwrap(), Some(v1.clone()));

    let duplicate = index.add(key.clone(), Item::new(2, "second")).await;
    assert!(matches!(duplicate, Err(Error::DuplicateKey)));
    assert_eq!(index.try_get_value(&key).await.unwrap(), Some(v1));

    let bucket = index.bucket_of(&key);
    assert!(index.remove(&key).await.unwrap());
    assert!(!index.contains_key(&key).await.unwrap());
    assert!(!state
        .store
        .contains(&bucket_key("index", bucket))
        .await
        .unwrap());
}

#[tokio::test]
async fn buckets_follow_insertion_order() {
    let state = TestState::new();
    let unit = state.unit();
    let index = unit.dictionary::<String, Item>("index").unwrap();
    let a = "A".to_string();
    let b = "B".to_string();
    assert_ne!(index.bucket_of(&a), index.bucket_of(&b));

    index.add(a.clone(), Item::new(1, "a")).await.unwrap();
    index.add(b.clone(), Item::new(2, "b")).await.unwrap();

    let manifest: HashManifest = state.store.get("index").await.unwrap();
    assert_eq!(manifest.head, Some(index.bucket_of(&a)));
    assert_eq!(manifest.tail, Some(index.bucket_of(&b)));

    let first: HashBucket = state
        .store
        .get(&bucket_key("index", index.bucket_of(&a)))
        .await
        .unwrap();
    assert_eq!(first.next, Some(index.bucket_of(&b)));

    let keys: Vec<String> = index
        .cursor()
        .collect()
        .await
        .unwrap()
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(keys, vec![a, b]);
}

#[tokio::test]
async fn key_node_indices_share_one_sequence() {
    let state = TestState::new();
    let unit = state.unit();
    let index = unit.dictionary::<String, Item>("index").unwrap();

    for (i, key) in ["x", "y", "z"].iter().enumerate() {
        index
            .add(key.to_string(), Item::new(i as u32, key))
            .await
            .unwrap();
    }
    index.remove(&"y".to_string()).await.unwrap();
    index.add("w".to_string(), Item::default()).await.unwrap();

    let manifest: HashManifest = state.store.get("index").await.unwrap();
    assert_eq!(manifest.next, 4);
    assert_eq!(manifest.count, 3);
}

#[tokio::test]
async fn contains_scans_pairs() {
    let state = TestState::new();
    let unit = state.unit();
    let index = unit.dictionary::<String, Item>("index").unwrap();
    index.add("k".to_string(), Item::new(3, "three")).await.unwrap();

    assert!(index
        .contains(|(key, item)| key == "k" && item.id == 3)
        .await
        .unwrap());
    assert!(!index.contains(|(_, item)| item.id == 4).await.unwrap());
}
