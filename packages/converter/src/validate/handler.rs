//! Validator trait definition.

use crate::context::Context;
use crate::model::{Detail, Node};

/// Trait for validators.
///
/// A validator inspects one node (its own subtree is reachable through the
/// node) and reports every defect it finds. Returning an empty list means the
/// node is valid.
pub trait Validator: Send + Sync {
    /// Check `node` and return its defects.
    fn validate(&self, node: &Node, context: &Context) -> Vec<Detail>;
}

/// Factory for registering a default-constructible validator.
#[must_use]
pub fn boxed<T: Validator + Default + 'static>() -> Option<Box<dyn Validator>> {
    Some(Box::new(T::default()))
}
