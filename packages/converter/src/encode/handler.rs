//! Encoder trait definition.

use super::wrapper::JsonWrapper;
use crate::context::Context;
use crate::error::EncodeError;
use crate::model::Node;

/// Closure type for encoding a child node into a wrapper.
///
/// Encoders call it to delegate a child to whatever encoder the registry holds
/// for the child's template.
pub type EncodeFn<'a> = dyn Fn(&Node, &mut JsonWrapper) -> Result<(), EncodeError> + 'a;

/// Trait for encoders.
pub trait Encoder: Send + Sync {
    /// Write `node` into `wrapper`.
    ///
    /// Children are not encoded automatically; an encoder decides which
    /// children to hand to `recurse` and into which wrapper.
    ///
    /// # Errors
    /// Returns an `EncodeError` for faults that make the output unusable.
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        context: &Context,
        recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError>;
}

/// Factory for registering a default-constructible encoder.
#[must_use]
pub fn boxed<T: Encoder + Default + 'static>() -> Option<Box<dyn Encoder>> {
    Some(Box::new(T::default()))
}
