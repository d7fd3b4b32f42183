//! Advancing care information handlers: aggregate counts and proportion
//! measures with their numerator and denominator.

use super::{child_aggregate_count, AGGREGATE_COUNT, MEASURE_ID};
use crate::context::Context;
use crate::decode::{DecodeResult, Decoder, Element};
use crate::encode::{EncodeFn, Encoder, JsonWrapper};
use crate::error::EncodeError;
use crate::model::{Detail, Node, TemplateId};
use crate::registry::{Described, Descriptor};
use crate::validate::{Checker, Validator};
use crate::xml::attribute_at;

/// Node value naming a numerator or denominator.
pub const NAME: &str = "name";
pub const NUMERATOR: &str = "numerator";
pub const DENOMINATOR: &str = "denominator";

pub const AGGREGATE_COUNT_REQUIRED: &str = "Aggregate count must have a value";
pub const AGGREGATE_COUNT_NOT_INTEGER: &str = "Aggregate count value must be an integer";
pub const MEASURE_ID_REQUIRED: &str = "ACI Proportion Measure must have a measure id";
pub const NUMERATOR_REQUIRED: &str = "ACI Proportion Measure must have exactly one Numerator";
pub const DENOMINATOR_REQUIRED: &str = "ACI Proportion Measure must have exactly one Denominator";
pub const NUMERATOR_EXCEEDS_DENOMINATOR: &str =
    "ACI Proportion Measure numerator must not be greater than its denominator";

/// `{label}` is `Numerator` or `Denominator`.
pub fn exactly_one_count(label: &str) -> String {
    format!("ACI {label} Node must have exactly one Aggregate Count node")
}

pub fn not_an_integer_value(label: &str) -> String {
    format!("The ACI {label} aggregate count value must be an integer")
}

pub fn invalid_value(label: &str) -> String {
    format!("The ACI {label} aggregate count value must be a non-negative integer")
}

/// Reads `value/@value`.
#[derive(Debug, Default)]
pub struct AggregateCountDecoder;

impl Described for AggregateCountDecoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::decoder(TemplateId::AciAggregateCount)];
}

impl Decoder for AggregateCountDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(value) = attribute_at(element, "value", "value") {
            node.put_value(AGGREGATE_COUNT, value.trim());
        }
        DecodeResult::Finish
    }
}

#[derive(Debug, Default)]
pub struct AggregateCountValidator;

impl Described for AggregateCountValidator {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::validator(TemplateId::AciAggregateCount)];
}

impl Validator for AggregateCountValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        // numerators and denominators report their count with a labelled message
        let in_part = node.parent().is_some_and(|p| {
            matches!(
                p.template,
                TemplateId::AciProportionNumerator | TemplateId::AciProportionDenominator
            )
        });
        if in_part {
            return Vec::new();
        }

        Checker::check(node)
            .value(AGGREGATE_COUNT_REQUIRED, AGGREGATE_COUNT)
            .int_value(AGGREGATE_COUNT_NOT_INTEGER, AGGREGATE_COUNT)
            .into_details()
    }
}

/// Reads the ACI measure identifier.
#[derive(Debug, Default)]
pub struct AciProportionMeasureDecoder;

impl Described for AciProportionMeasureDecoder {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::decoder(TemplateId::AciProportionMeasure)];
}

impl Decoder for AciProportionMeasureDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(id) = attribute_at(element, "reference/externalDocument/id", "extension") {
            node.put_value(MEASURE_ID, id.trim());
        }
        DecodeResult::Continue
    }
}

#[derive(Debug, Default)]
pub struct AciProportionMeasureValidator;

impl Described for AciProportionMeasureValidator {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::validator(TemplateId::AciProportionMeasure)];
}

impl Validator for AciProportionMeasureValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        let count = |template| {
            node.find_child(template)
                .and_then(child_aggregate_count)
                .and_then(|v| v.trim().parse::<i64>().ok())
        };
        let in_range = match (
            count(TemplateId::AciProportionNumerator),
            count(TemplateId::AciProportionDenominator),
        ) {
            (Some(numerator), Some(denominator)) => numerator <= denominator,
            // unparsable parts are reported by their own validators
            _ => true,
        };

        Checker::check(node)
            .value(MEASURE_ID_REQUIRED, MEASURE_ID)
            .child_exact(NUMERATOR_REQUIRED, 1, &[TemplateId::AciProportionNumerator])
            .child_exact(DENOMINATOR_REQUIRED, 1, &[TemplateId::AciProportionDenominator])
            .that(NUMERATOR_EXCEEDS_DENOMINATOR, in_range)
            .into_details()
    }
}

/// Writes an ACI measurement: the measure id and a numerator/denominator value.
#[derive(Debug, Default)]
pub struct AciProportionMeasureEncoder;

impl Described for AciProportionMeasureEncoder {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::encoder(TemplateId::AciProportionMeasure)];
}

impl Encoder for AciProportionMeasureEncoder {
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        _context: &Context,
        recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        if let Some(id) = node.value(MEASURE_ID) {
            wrapper.put_string(MEASURE_ID, id);
        }
        let mut value = JsonWrapper::new();
        for child in node.children() {
            recurse(child, &mut value)?;
        }
        wrapper.put_object("value", value);
        Ok(())
    }
}

fn validate_part(node: &Node, label: &str) -> Vec<Detail> {
    let mut details = Checker::check(node)
        .child_exact(&exactly_one_count(label), 1, &[TemplateId::AciAggregateCount])
        .into_details();
    if let Some(count) = node.find_child(TemplateId::AciAggregateCount) {
        details.extend(
            Checker::check(count)
                .value(&not_an_integer_value(label), AGGREGATE_COUNT)
                .int_value(&not_an_integer_value(label), AGGREGATE_COUNT)
                .non_negative(&invalid_value(label), AGGREGATE_COUNT)
                .into_details(),
        );
    }
    details
}

fn encode_part(wrapper: &mut JsonWrapper, node: &Node, field: &str) -> Result<(), EncodeError> {
    let value = child_aggregate_count(node).ok_or_else(|| EncodeError::MissingValue {
        field: AGGREGATE_COUNT.to_string(),
        template: node.template().to_string(),
    })?;
    wrapper.put_integer(field, value)
}

macro_rules! proportion_part {
    ($decoder:ident, $validator:ident, $encoder:ident, $template:expr, $name:expr, $label:expr, $field:expr) => {
        #[derive(Debug, Default)]
        pub struct $decoder;

        impl Described for $decoder {
            const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::decoder($template)];
        }

        impl Decoder for $decoder {
            fn decode(
                &self,
                _element: Element<'_, '_>,
                node: &mut Node,
                _context: &Context,
            ) -> DecodeResult {
                node.put_value(NAME, $name);
                DecodeResult::Continue
            }
        }

        #[derive(Debug, Default)]
        pub struct $validator;

        impl Described for $validator {
            const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::validator($template)];
        }

        impl Validator for $validator {
            fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
                validate_part(node, $label)
            }
        }

        #[derive(Debug, Default)]
        pub struct $encoder;

        impl Described for $encoder {
            const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::encoder($template)];
        }

        impl Encoder for $encoder {
            fn encode(
                &self,
                wrapper: &mut JsonWrapper,
                node: &Node,
                _context: &Context,
                _recurse: &EncodeFn<'_>,
            ) -> Result<(), EncodeError> {
                encode_part(wrapper, node, $field)
            }
        }
    };
}

proportion_part!(
    AciNumeratorDecoder,
    AciNumeratorValidator,
    AciNumeratorEncoder,
    TemplateId::AciProportionNumerator,
    "aciProportionNumerator",
    "Numerator",
    NUMERATOR
);

proportion_part!(
    AciDenominatorDecoder,
    AciDenominatorValidator,
    AciDenominatorEncoder,
    TemplateId::AciProportionDenominator,
    "aciProportionDenominator",
    "Denominator",
    DENOMINATOR
);
