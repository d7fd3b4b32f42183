//! Encode engine that turns the node tree into JSON.

use super::handler::EncodeFn;
use super::wrapper::JsonWrapper;
use crate::context::Context;
use crate::error::EncodeError;
use crate::model::Node;

/// Engine that dispatches nodes to their registered encoders.
///
/// A node without an encoder writes nothing itself; its children are encoded
/// into the same wrapper.
pub struct EncodeEngine<'c> {
    context: &'c Context,
}

impl<'c> EncodeEngine<'c> {
    /// Create an engine for a context.
    #[must_use]
    pub fn new(context: &'c Context) -> Self {
        Self { context }
    }

    /// Encode a whole tree into a fresh wrapper.
    ///
    /// # Errors
    /// Returns the first `EncodeError` an encoder raises.
    pub fn encode(&self, tree: &Node) -> Result<JsonWrapper, EncodeError> {
        let mut wrapper = JsonWrapper::new();
        self.encode_into(tree, &mut wrapper)?;
        Ok(wrapper)
    }

    /// Encode `node` into an existing wrapper.
    ///
    /// # Errors
    /// Returns the first `EncodeError` an encoder raises.
    pub fn encode_into(&self, node: &Node, wrapper: &mut JsonWrapper) -> Result<(), EncodeError> {
        let Some(encoder) = self.context.encoder_for(node.template()) else {
            tracing::debug!(template = %node.template(), path = %node.path(), "No encoder, descending");
            for child in node.children() {
                self.encode_into(child, wrapper)?;
            }
            return Ok(());
        };

        let recurse: &EncodeFn<'_> = &|child, target| self.encode_into(child, target);
        encoder.encode(wrapper, node, self.context, recurse)
    }
}

/// Encode a tree with the handlers in `context`.
///
/// # Errors
/// Returns the first `EncodeError` an encoder raises.
pub fn encode(context: &Context, tree: &Node) -> Result<JsonWrapper, EncodeError> {
    EncodeEngine::new(context).encode(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;
    use crate::model::TemplateId;
    use crate::registry::{ComponentKey, Registries};
    use serde_json::json;

    #[derive(Default)]
    struct SectionEncoder;

    impl Encoder for SectionEncoder {
        fn encode(
            &self,
            wrapper: &mut JsonWrapper,
            node: &Node,
            _context: &Context,
            recurse: &EncodeFn<'_>,
        ) -> Result<(), EncodeError> {
            wrapper.put_string("category", "aci");
            for child in node.children() {
                let mut measurement = JsonWrapper::new();
                recurse(child, &mut measurement)?;
                if !measurement.is_empty() {
                    wrapper.push_to("measurements", measurement);
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountEncoder;

    impl Encoder for CountEncoder {
        fn encode(
            &self,
            wrapper: &mut JsonWrapper,
            node: &Node,
            _context: &Context,
            _recurse: &EncodeFn<'_>,
        ) -> Result<(), EncodeError> {
            wrapper.put_integer("count", node.value("aggregateCount").unwrap_or_default())
        }
    }

    fn context() -> Context {
        let mut registries = Registries::empty();
        registries.encoders.register(
            ComponentKey::generic(TemplateId::AciSection),
            crate::encode::boxed::<SectionEncoder>,
        );
        registries.encoders.register(
            ComponentKey::generic(TemplateId::AciAggregateCount),
            crate::encode::boxed::<CountEncoder>,
        );
        Context::default().with_registries(registries)
    }

    fn section(counts: &[&str]) -> Node {
        let mut section = Node::new(TemplateId::AciSection);
        for count in counts {
            section.add_child(
                Node::new(TemplateId::AciAggregateCount).with_value("aggregateCount", *count),
            );
        }
        // no encoder for this one
        section.add_child(Node::new(TemplateId::MeasurePerformed));
        section
    }

    #[test]
    fn test_encoders_delegate_through_recurse() {
        let mut root = Node::new(TemplateId::Placeholder);
        root.add_child(section(&["1", "2"]));

        let wrapper = encode(&context(), &root).unwrap();

        assert_eq!(
            wrapper.to_value(),
            json!({
                "category": "aci",
                "measurements": [ { "count": 1 }, { "count": 2 } ]
            })
        );
    }

    #[test]
    fn test_encode_error_propagates() {
        let err = encode(&context(), &section(&["1", "x"])).unwrap_err();
        assert!(matches!(err, EncodeError::NotAnInteger { .. }));
    }

    #[test]
    fn test_unencoded_tree_is_empty() {
        let tree = Node::new(TemplateId::IaMeasure);
        let context = Context::default().with_registries(Registries::empty());
        assert!(encode(&context, &tree).unwrap().is_empty());
    }
}
