//! State engine: configuration, registration and units
//!
//! This crate ties the primitives to an application:
//! - `StatefulConfig`: settings from `stateful.toml` that fix the stored format
//! - `StateRegistry`: names bound to a kind and element types before first use
//! - `StateFactory`: holds the registry and a store provider, creates units
//! - `StateUnit`: resolves and caches typed handles for one logical operation
//!
//! ```rust,ignore
//! let registry = StateRegistry::builder(StatefulConfig::default())
//!     .queue::<Job>("jobs")
//!     .build()?;
//! let factory = StateFactory::with_store(registry, store);
//!
//! let unit = factory.create_unit();
//! unit.queue::<Job>("jobs")?.enqueue(job).await?;
//! unit.commit()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod factory;
pub mod registry;
pub mod unit;

pub use config::{DictionaryConfig, StatefulConfig, CONFIG_FILE_NAME};
pub use factory::StateFactory;
pub use registry::{StateKind, StateRegistration, StateRegistry, StateRegistryBuilder};
pub use unit::{StateUnit, StoreProvider};
