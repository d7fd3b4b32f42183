//! Decode engine that walks a QRDA document and builds the node tree.

use roxmltree::Node as Element;

use super::handler::{DecodeResult, Decoder};
use crate::context::Context;
use crate::error::DecodeError;
use crate::model::{Node, TemplateId};
use crate::xml::{absolute_path, element_children, get_tag_name, template_roots};

/// Engine that dispatches source elements to their registered decoders.
///
/// Elements without a decoder produce no node, but their children are still
/// visited and attach to the nearest decoded ancestor.
pub struct DecodeEngine<'c> {
    context: &'c Context,
}

impl<'c> DecodeEngine<'c> {
    /// Create an engine for a context.
    #[must_use]
    pub fn new(context: &'c Context) -> Self {
        Self { context }
    }

    /// Decode a whole document.
    ///
    /// # Arguments
    /// * `root` - The document's root element
    ///
    /// # Returns
    /// The decoded tree. When no decoder claims the root itself, a
    /// [`TemplateId::Placeholder`] node collects the top-level results, unless
    /// exactly one node was produced, which is then returned directly.
    ///
    /// # Errors
    /// Returns `NotValidQrda` if the root does not carry the clinical document
    /// template.
    pub fn decode(&self, root: Element<'_, '_>) -> Result<Node, DecodeError> {
        let is_qrda = template_roots(root)
            .into_iter()
            .any(|r| TemplateId::find_by_root(r) == Some(TemplateId::ClinicalDocument));
        if !is_qrda {
            return Err(DecodeError::NotValidQrda(get_tag_name(root).to_string()));
        }

        let mut wrapper = Node::new(TemplateId::Placeholder).with_path(absolute_path(root));
        self.decode_into(root, &mut wrapper);

        let mut children = wrapper.take_children();
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return Ok(only);
            }
        }
        wrapper.add_children(children);
        Ok(wrapper)
    }

    /// Decode `element` and attach whatever it produces to `parent`.
    pub fn decode_into(&self, element: Element<'_, '_>, parent: &mut Node) {
        let Some((template, decoder)) = self.resolve(element) else {
            self.decode_children(element, parent);
            return;
        };

        let mut node = Node::new(template).with_path(absolute_path(element));
        match decoder.decode(element, &mut node, self.context) {
            DecodeResult::Continue => {
                self.decode_children(element, &mut node);
                parent.add_child(node);
            }
            DecodeResult::Finish => parent.add_child(node),
            DecodeResult::Skip => {
                tracing::debug!(template = %template, path = %node.path(), "Decoder skipped node");
            }
        }
    }

    fn decode_children(&self, element: Element<'_, '_>, parent: &mut Node) {
        for child in element_children(element) {
            self.decode_into(child, parent);
        }
    }

    /// Find the template and decoder for an element.
    ///
    /// The first `templateId` that has a decoder wins. Elements that carry
    /// templates but match none fall back to the default decoder.
    fn resolve(&self, element: Element<'_, '_>) -> Option<(TemplateId, Box<dyn Decoder>)> {
        let roots = template_roots(element);
        if roots.is_empty() {
            return None;
        }

        let found = roots
            .iter()
            .filter_map(|root| TemplateId::find_by_root(root))
            .find_map(|template| {
                self.context
                    .decoder_for(template)
                    .map(|decoder| (template, decoder))
            });
        if found.is_some() {
            return found;
        }

        let fallback = self.context.default_decoder();
        if fallback.is_none() {
            tracing::debug!(
                tag = %get_tag_name(element),
                template = %roots.join(","),
                "No decoder for templated element, descending"
            );
        }
        fallback.map(|decoder| (TemplateId::Default, decoder))
    }
}

/// Decode a document with the handlers in `context`.
///
/// # Errors
/// Returns `NotValidQrda` if the root does not carry the clinical document
/// template.
pub fn decode(context: &Context, root: Element<'_, '_>) -> Result<Node, DecodeError> {
    DecodeEngine::new(context).decode(root)
}
