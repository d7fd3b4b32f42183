//! Decoder trait definition.

use roxmltree::Node as Element;

use crate::context::Context;
use crate::model::Node;

/// Control signal returned by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeResult {
    /// Descend into the element's children and attach what they decode to.
    Continue,
    /// Keep the node but do not descend; the decoder consumed the subtree.
    Finish,
    /// Discard the node; it is not attached to its parent.
    Skip,
}

/// Trait for decoders.
///
/// A decoder receives the source element and a fresh node (template and path
/// already set) to populate. Children are decoded by the pipeline, not by the
/// decoder, unless it returns [`DecodeResult::Finish`].
pub trait Decoder: Send + Sync {
    /// Populate `node` from `element`.
    fn decode(
        &self,
        element: Element<'_, '_>,
        node: &mut Node,
        context: &Context,
    ) -> DecodeResult;
}

/// Factory for registering a default-constructible decoder.
#[must_use]
pub fn boxed<T: Decoder + Default + 'static>() -> Option<Box<dyn Decoder>> {
    Some(Box::new(T::default()))
}
