//! Generic keyed table of handler factories.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::types::{ComponentKey, ComponentKind, Described};

/// Zero-argument constructor for a handler.
///
/// Returning `None` signals that construction failed.
pub type Factory<V> = fn() -> Option<Box<V>>;

/// Registry mapping component keys to handler factories.
///
/// One registry exists per handler kind. It is populated once (see
/// [`Registries::discover`](super::Registries::discover)) and is read-only
/// while conversions run. Registering an existing key replaces the previous
/// binding.
pub struct Registry<V: ?Sized> {
    kind: ComponentKind,
    factories: HashMap<ComponentKey, Factory<V>>,
}

impl<V: ?Sized> Registry<V> {
    /// Create a new empty registry for a handler kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            factories: HashMap::new(),
        }
    }

    /// Handler kind this registry holds.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Remove every binding.
    pub fn init(&mut self) {
        self.factories.clear();
    }

    /// Bind a key to a factory, silently replacing an existing binding.
    pub fn register(&mut self, key: ComponentKey, factory: Factory<V>) {
        if self.factories.insert(key, factory).is_some() {
            tracing::debug!(kind = %self.kind, key = %key, "Replacing registered handler");
        }
    }

    /// Bind a factory under every descriptor `T` declares for this kind.
    ///
    /// Returns the number of keys bound.
    pub fn register_described<T: Described>(&mut self, factory: Factory<V>) -> usize {
        let kind = self.kind;
        let mut bound = 0;
        for descriptor in T::DESCRIPTORS.iter().filter(|d| d.kind == kind) {
            self.register(descriptor.key(), factory);
            bound += 1;
        }
        bound
    }

    /// Instantiate the handler bound to a key.
    ///
    /// Returns `None` when the key is unknown or the factory fails, including
    /// when it panics. Callers treat a broken handler like a missing one.
    #[must_use]
    pub fn get(&self, key: &ComponentKey) -> Option<Box<V>> {
        let factory = self.factories.get(key)?;
        match panic::catch_unwind(AssertUnwindSafe(factory)) {
            Ok(Some(handler)) => Some(handler),
            Ok(None) => {
                tracing::warn!(kind = %self.kind, key = %key, "Handler construction failed");
                None
            }
            Err(_) => {
                tracing::warn!(kind = %self.kind, key = %key, "Handler construction panicked");
                None
            }
        }
    }

    /// Check if a key is bound.
    #[must_use]
    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.factories.contains_key(key)
    }

    /// Extract the key `T` declares for this registry's kind.
    ///
    /// Returns `None` when `T` declares nothing of this kind.
    #[must_use]
    pub fn resolve_metadata<T: Described>(&self) -> Option<ComponentKey> {
        T::DESCRIPTORS
            .iter()
            .find(|d| d.kind == self.kind)
            .map(|d| d.key())
    }

    /// Return all bound keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<ComponentKey> {
        let mut keys: Vec<_> = self.factories.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of bound keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// `true` when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<V: ?Sized> Clone for Registry<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            factories: self.factories.clone(),
        }
    }
}

impl<V: ?Sized> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("keys", &self.keys())
            .finish()
    }
}
