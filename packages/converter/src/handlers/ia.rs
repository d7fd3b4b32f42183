//! Improvement activity handlers.

use super::MEASURE_ID;
use crate::context::Context;
use crate::decode::{DecodeResult, Decoder, Element};
use crate::encode::{EncodeFn, Encoder, JsonWrapper};
use crate::error::EncodeError;
use crate::model::{Detail, Node, TemplateId};
use crate::registry::{Described, Descriptor};
use crate::validate::{Checker, Validator};
use crate::xml::attribute_at;

/// Node value holding the `Y`/`N` performed code.
pub const MEASURE_PERFORMED: &str = "measurePerformed";

pub const MEASURE_ID_REQUIRED: &str = "IA Measure must have a measure id";
pub const MEASURE_PERFORMED_REQUIRED: &str =
    "IA Measure must have exactly one Measure Performed child";
pub const PERFORMED_VALUE_REQUIRED: &str = "Measure Performed must have a value";
pub const PERFORMED_VALUE_INVALID: &str = "Measure Performed value must be Y or N";

#[derive(Debug, Default)]
pub struct IaMeasureDecoder;

impl Described for IaMeasureDecoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::decoder(TemplateId::IaMeasure)];
}

impl Decoder for IaMeasureDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(id) = attribute_at(element, "reference/externalDocument/id", "extension") {
            node.put_value(MEASURE_ID, id.trim());
        }
        DecodeResult::Continue
    }
}

/// Reads `value/@code`.
#[derive(Debug, Default)]
pub struct MeasurePerformedDecoder;

impl Described for MeasurePerformedDecoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::decoder(TemplateId::MeasurePerformed)];
}

impl Decoder for MeasurePerformedDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(code) = attribute_at(element, "value", "code") {
            node.put_value(MEASURE_PERFORMED, code.trim());
        }
        DecodeResult::Finish
    }
}

#[derive(Debug, Default)]
pub struct IaMeasureValidator;

impl Described for IaMeasureValidator {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::validator(TemplateId::IaMeasure)];
}

impl Validator for IaMeasureValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        Checker::check(node)
            .value(MEASURE_ID_REQUIRED, MEASURE_ID)
            .child_exact(MEASURE_PERFORMED_REQUIRED, 1, &[TemplateId::MeasurePerformed])
            .into_details()
    }
}

#[derive(Debug, Default)]
pub struct MeasurePerformedValidator;

impl Described for MeasurePerformedValidator {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::validator(TemplateId::MeasurePerformed)];
}

impl Validator for MeasurePerformedValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        Checker::check(node)
            .value(PERFORMED_VALUE_REQUIRED, MEASURE_PERFORMED)
            .one_of(PERFORMED_VALUE_INVALID, MEASURE_PERFORMED, &["Y", "N"])
            .into_details()
    }
}

/// Writes `{"measureId": .., "value": bool}`.
#[derive(Debug, Default)]
pub struct IaMeasureEncoder;

impl Described for IaMeasureEncoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::encoder(TemplateId::IaMeasure)];
}

impl Encoder for IaMeasureEncoder {
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        _context: &Context,
        _recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        let id = node.value(MEASURE_ID).ok_or_else(|| EncodeError::MissingValue {
            field: MEASURE_ID.to_string(),
            template: node.template().to_string(),
        })?;
        wrapper.put_string(MEASURE_ID, id);

        let performed = node
            .find_child(TemplateId::MeasurePerformed)
            .and_then(|child| child.value(MEASURE_PERFORMED))
            .is_some_and(|code| code.trim() == "Y");
        wrapper.put_boolean("value", performed);
        Ok(())
    }
}
