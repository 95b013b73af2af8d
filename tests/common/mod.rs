//! Shared fixtures for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use serde::{Deserialize, Serialize};
pub use stateful::{
    CollectionState, Error, MemoryStore, StateCursor, StateFactory, StateRegistry, StateStore,
    StateUnit, StatefulConfig,
};

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness; shown for failing tests
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Element type used where a plain integer would hide serialization issues
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub label: String,
}

impl Item {
    pub fn new(id: u32, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
        }
    }
}

/// Registry with one state of every kind
pub fn registry(config: StatefulConfig) -> StateRegistry {
    StateRegistry::builder(config)
        .object::<Item>("profile")
        .list::<Item>("items")
        .queue::<u32>("jobs")
        .stack::<u32>("undo")
        .dictionary::<String, Item>("index")
        .array::<String>("slots", 1)
        .array::<u64>("counters", 8)
        .build()
        .expect("registry builds")
}

/// Store plus a factory over it
pub struct TestState {
    pub store: Arc<MemoryStore>,
    pub factory: StateFactory<MemoryStore>,
}

impl TestState {
    pub fn new() -> Self {
        Self::with_config(StatefulConfig::default())
    }

    pub fn with_config(config: StatefulConfig) -> Self {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        let factory = StateFactory::with_store(registry(config), store.clone());
        Self { store, factory }
    }

    pub fn unit(&self) -> StateUnit<MemoryStore> {
        self.factory.create_unit()
    }
}
