//! Fallback decoder for templated elements no other decoder claims.

use crate::context::Context;
use crate::decode::{DecodeResult, Decoder, Element};
use crate::model::{Node, TemplateId};
use crate::registry::{Described, Descriptor};
use crate::xml::template_roots;

/// Node value recording the unrecognised template.
pub const TEMPLATE_ROOT: &str = "templateRoot";

/// Decoder bound to the default key.
///
/// It keeps the structure of unrecognised elements so their recognised
/// descendants still decode beneath them.
#[derive(Debug, Default)]
pub struct DefaultDecoder;

impl Described for DefaultDecoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::decoder(TemplateId::Default)];
}

impl Decoder for DefaultDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(root) = template_roots(element).first() {
            node.put_value(TEMPLATE_ROOT, *root);
        }
        DecodeResult::Continue
    }
}
