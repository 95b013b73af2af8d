//! Registration of named states
//!
//! Every state a unit can hand out is registered up front with its kind and
//! element types (and, for arrays, its length). Lookups are checked against
//! the registration, so a name can never be opened as two different shapes.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use stateful_core::{Error, Result, StateKey};
use stateful_primitives::BucketAddressing;

use crate::config::StatefulConfig;

/// Shape of a registered state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Single value
    Object,
    /// Indexed sequence
    List,
    /// FIFO sequence
    Queue,
    /// LIFO sequence
    Stack,
    /// Hash dictionary
    Dictionary,
    /// Fixed-length array
    Array,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Object => "Object",
            StateKind::List => "List",
            StateKind::Queue => "Queue",
            StateKind::Stack => "Stack",
            StateKind::Dictionary => "Dictionary",
            StateKind::Array => "Array",
        };
        f.write_str(name)
    }
}

/// Render a kind with its type arguments, e.g. `Dictionary<String, u32>`
pub(crate) fn describe(kind: StateKind, type_names: &[&'static str]) -> String {
    format!("{}<{}>", kind, type_names.join(", "))
}

/// A registered state
#[derive(Debug, Clone)]
pub struct StateRegistration {
    key: StateKey,
    kind: StateKind,
    types: Vec<TypeId>,
    type_names: Vec<&'static str>,
    length: Option<u64>,
}

impl StateRegistration {
    /// Registered name
    pub fn key(&self) -> &StateKey {
        &self.key
    }

    /// Registered kind
    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// Array length; `None` for every other kind
    pub fn length(&self) -> Option<u64> {
        self.length
    }

    /// Kind and element types, e.g. `List<u32>`
    pub fn describe(&self) -> String {
        describe(self.kind, &self.type_names)
    }

    fn matches(&self, kind: StateKind, types: &[TypeId]) -> bool {
        self.kind == kind && self.types == types
    }
}

/// Immutable set of registrations, built with [`StateRegistry::builder`]
#[derive(Debug, Clone)]
pub struct StateRegistry {
    states: HashMap<StateKey, StateRegistration>,
    addressing: BucketAddressing,
}

impl StateRegistry {
    /// Start registering states under `config`
    pub fn builder(config: StatefulConfig) -> StateRegistryBuilder {
        StateRegistryBuilder {
            config,
            pending: Vec::new(),
        }
    }

    /// Registration for `name`, ignoring case
    pub fn get(&self, name: &str) -> Option<&StateRegistration> {
        let key = StateKey::new(name).ok()?;
        self.states.get(&key)
    }

    /// Number of registered states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Bucket addressing every dictionary handle is opened with
    pub fn addressing(&self) -> BucketAddressing {
        self.addressing
    }

    /// Registration for `key`, checked against the requested shape
    ///
    /// # Errors
    ///
    /// Returns `UnknownState` if `key` is not registered and `TypeMismatch`
    /// if it is registered with another kind or other element types.
    pub fn resolve(
        &self,
        key: &StateKey,
        kind: StateKind,
        types: &[TypeId],
        type_names: &[&'static str],
    ) -> Result<&StateRegistration> {
        let registration = self
            .states
            .get(key)
            .ok_or_else(|| Error::UnknownState(key.to_string()))?;

        if !registration.matches(kind, types) {
            return Err(Error::TypeMismatch {
                name: key.to_string(),
                expected: describe(kind, type_names),
                registered: registration.describe(),
            });
        }
        Ok(registration)
    }
}

#[derive(Debug)]
enum Length {
    None,
    Fixed(u64),
    Configured,
}

#[derive(Debug)]
struct Pending {
    name: String,
    kind: StateKind,
    types: Vec<TypeId>,
    type_names: Vec<&'static str>,
    length: Length,
}

/// Collects registrations; all validation happens in [`build`](Self::build)
///
/// # Example
///
/// ```rust,ignore
/// let registry = StateRegistry::builder(StatefulConfig::default())
///     .queue::<Job>("jobs")
///     .dictionary::<String, u64>("visits")
///     .array::<u8>("slots", 16)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct StateRegistryBuilder {
    config: StatefulConfig,
    pending: Vec<Pending>,
}

impl StateRegistryBuilder {
    fn register(
        mut self,
        name: &str,
        kind: StateKind,
        types: Vec<TypeId>,
        type_names: Vec<&'static str>,
        length: Length,
    ) -> Self {
        self.pending.push(Pending {
            name: name.to_string(),
            kind,
            types,
            type_names,
            length,
        });
        self
    }

    fn single<T: 'static>(self, name: &str, kind: StateKind, length: Length) -> Self {
        self.register(
            name,
            kind,
            vec![TypeId::of::<T>()],
            vec![type_name::<T>()],
            length,
        )
    }

    /// Register a single-value state
    pub fn object<T: 'static>(self, name: &str) -> Self {
        self.single::<T>(name, StateKind::Object, Length::None)
    }

    /// Register a list
    pub fn list<T: 'static>(self, name: &str) -> Self {
        self.single::<T>(name, StateKind::List, Length::None)
    }

    /// Register a queue
    pub fn queue<T: 'static>(self, name: &str) -> Self {
        self.single::<T>(name, StateKind::Queue, Length::None)
    }

    /// Register a stack
    pub fn stack<T: 'static>(self, name: &str) -> Self {
        self.single::<T>(name, StateKind::Stack, Length::None)
    }

    /// Register a dictionary
    pub fn dictionary<K: 'static, V: 'static>(self, name: &str) -> Self {
        self.register(
            name,
            StateKind::Dictionary,
            vec![TypeId::of::<K>(), TypeId::of::<V>()],
            vec![type_name::<K>(), type_name::<V>()],
            Length::None,
        )
    }

    /// Register an array of `length` slots
    pub fn array<T: 'static>(self, name: &str, length: u64) -> Self {
        self.single::<T>(name, StateKind::Array, Length::Fixed(length))
    }

    /// Register an array whose length comes from the `[arrays]` config section
    pub fn configured_array<T: 'static>(self, name: &str) -> Self {
        self.single::<T>(name, StateKind::Array, Length::Configured)
    }

    /// Validate and freeze the registrations
    ///
    /// # Errors
    ///
    /// - `Config` if the config is invalid or a configured array has no length
    /// - `InvalidArgument` for an empty or duplicate name (ignoring case) or
    ///   an array length of zero
    pub fn build(self) -> Result<StateRegistry> {
        self.config.validate()?;
        let addressing = self.config.bucket_addressing()?;

        let mut states = HashMap::with_capacity(self.pending.len());
        for pending in self.pending {
            let key = StateKey::new(pending.name)?;

            let length = match pending.length {
                Length::None => None,
                Length::Fixed(length) => Some(length),
                Length::Configured => Some(self.config.array_length(&key).ok_or_else(|| {
                    Error::Config(format!("no length configured for array '{}'", key))
                })?),
            };
            if length == Some(0) {
                return Err(Error::InvalidArgument(format!(
                    "array '{}' must have a length of at least 1",
                    key
                )));
            }

            if states.contains_key(&key) {
                return Err(Error::InvalidArgument(format!(
                    "state '{}' is registered more than once",
                    key
                )));
            }

            debug!(name = %key, kind = %pending.kind, "registered state");
            let registration = StateRegistration {
                key: key.clone(),
                kind: pending.kind,
                types: pending.types,
                type_names: pending.type_names,
                length,
            };
            states.insert(key, registration);
        }

        Ok(StateRegistry { states, addressing })
    }
}
