//! Configuration file driving registration

use stateful::CONFIG_FILE_NAME;
use tempfile::TempDir;

use crate::common::*;

fn write_config(contents: &str) -> (TempDir, StatefulConfig) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, contents).unwrap();
    let config = StatefulConfig::from_file(&path).unwrap();
    (dir, config)
}

#[tokio::test]
async fn configured_array_takes_length_from_file() {
    let (_dir, config) = write_config("[arrays]\nboard = 9\n");
    let registry = StateRegistry::builder(config)
        .configured_array::<u8>("Board")
        .build()
        .unwrap();
    let factory = StateFactory::with_store(registry, std::sync::Arc::new(MemoryStore::new()));

    let unit = factory.create_unit();
    let board = unit.array::<u8>("board").unwrap();
    assert_eq!(board.length(), 9);
    assert!(matches!(
        board.get(9).await,
        Err(Error::IndexOutOfRange { index: 9, len: 9 })
    ));
}

#[tokio::test]
async fn bucket_modulus_bounds_dictionary_buckets() {
    let (_dir, config) = write_config("[dictionary]\nbucket_modulus = 8\n");
    let state = TestState::with_config(config);
    let unit = state.unit();
    let index = unit.dictionary::<String, Item>("index").unwrap();

    for i in 0..40 {
        index
            .add(format!("key-{}", i), Item::new(i, "v"))
            .await
            .unwrap();
    }
    assert_eq!(index.count().await.unwrap(), 40);
    for i in 0..40 {
        let key = format!("key-{}", i);
        assert!(index.bucket_of(&key) < 8);
        assert_eq!(index.try_get_value(&key).await.unwrap().map(|item| item.id), Some(i));
    }

    let buckets = state
        .store
        .keys()
        .into_iter()
        .filter(|key| key.matches(':').count() == 1)
        .count();
    assert!(buckets <= 8);
}

#[test]
fn default_file_is_created_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    StatefulConfig::write_default_if_missing(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, StatefulConfig::default_toml());

    std::fs::write(&path, "[arrays]\nslots = 3\n").unwrap();
    StatefulConfig::write_default_if_missing(&path).unwrap();
    let config = StatefulConfig::from_file(&path).unwrap();
    assert_eq!(config.arrays.get("slots"), Some(&3));
}
