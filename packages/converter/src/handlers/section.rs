//! Measure section handlers (eCQM, IA and ACI sections).

use crate::config::SUBMISSION_METHOD;
use crate::context::Context;
use crate::decode::{DecodeResult, Decoder, Element};
use crate::encode::{EncodeFn, Encoder, JsonWrapper};
use crate::error::EncodeError;
use crate::model::{Node, TemplateId};
use crate::registry::{Described, Descriptor};

pub const CATEGORY: &str = "category";
pub const SUBMISSION_METHOD_FIELD: &str = "submissionMethod";
pub const MEASUREMENTS: &str = "measurements";

const SECTIONS: &[Descriptor] = &[
    Descriptor::decoder(TemplateId::MeasureSection),
    Descriptor::decoder(TemplateId::IaSection),
    Descriptor::decoder(TemplateId::AciSection),
];

/// Measurement category reported for a section template.
#[must_use]
pub fn category_for(template: TemplateId) -> Option<&'static str> {
    match template {
        TemplateId::MeasureSection => Some("quality"),
        TemplateId::IaSection => Some("ia"),
        TemplateId::AciSection => Some("aci"),
        _ => None,
    }
}

/// Tags a section with its measurement category.
#[derive(Debug, Default)]
pub struct MeasureSectionDecoder;

impl Described for MeasureSectionDecoder {
    const DESCRIPTORS: &'static [Descriptor] = SECTIONS;
}

impl Decoder for MeasureSectionDecoder {
    fn decode(&self, _element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(category) = category_for(node.template()) {
            node.put_value(CATEGORY, category);
        }
        DecodeResult::Continue
    }
}

/// Writes one measurement set.
///
/// The reporting parameters act fills in the performance period on the set
/// itself; every other child becomes an entry in `measurements`.
#[derive(Debug, Default)]
pub struct MeasureSectionEncoder;

impl Described for MeasureSectionEncoder {
    const DESCRIPTORS: &'static [Descriptor] = &[
        Descriptor::encoder(TemplateId::MeasureSection),
        Descriptor::encoder(TemplateId::IaSection),
        Descriptor::encoder(TemplateId::AciSection),
    ];
}

impl Encoder for MeasureSectionEncoder {
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        _context: &Context,
        recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        if let Some(category) = node.value(CATEGORY) {
            wrapper.put_string(CATEGORY, category);
        }
        wrapper.put_string(SUBMISSION_METHOD_FIELD, SUBMISSION_METHOD);

        for child in node.children() {
            if child.template() == TemplateId::ReportingParametersAct {
                recurse(child, wrapper)?;
                continue;
            }
            let mut measurement = JsonWrapper::new();
            recurse(child, &mut measurement)?;
            if !measurement.is_empty() {
                wrapper.push_to(MEASUREMENTS, measurement);
            }
        }
        Ok(())
    }
}
