//! Reporting parameters act: the performance period of a section.

use chrono::NaiveDate;

use crate::config::DATE_PATTERN;
use crate::context::Context;
use crate::decode::{DecodeResult, Decoder, Element};
use crate::encode::{EncodeFn, Encoder, JsonWrapper};
use crate::error::EncodeError;
use crate::model::{Detail, Node, TemplateId};
use crate::registry::{Described, Descriptor};
use crate::validate::{Checker, Validator};
use crate::xml::attribute_at;

pub const PERFORMANCE_START: &str = "performanceStart";
pub const PERFORMANCE_END: &str = "performanceEnd";

pub const MISSING_START: &str = "Must have a performance start";
pub const MISSING_END: &str = "Must have a performance end";
pub const INVALID_START: &str = "The performance start must be a date in YYYYMMDD format";
pub const INVALID_END: &str = "The performance end must be a date in YYYYMMDD format";
pub const START_AFTER_END: &str = "The performance start must not be after the performance end";

/// Reads `effectiveTime/low` and `effectiveTime/high`.
#[derive(Debug, Default)]
pub struct ReportingParametersDecoder;

impl Described for ReportingParametersDecoder {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::decoder(TemplateId::ReportingParametersAct)];
}

impl Decoder for ReportingParametersDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(start) = attribute_at(element, "effectiveTime/low", "value") {
            node.put_value(PERFORMANCE_START, start.trim());
        }
        if let Some(end) = attribute_at(element, "effectiveTime/high", "value") {
            node.put_value(PERFORMANCE_END, end.trim());
        }
        DecodeResult::Finish
    }
}

#[derive(Debug, Default)]
pub struct ReportingParametersValidator;

impl Described for ReportingParametersValidator {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::validator(TemplateId::ReportingParametersAct)];
}

impl Validator for ReportingParametersValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        let checker = Checker::check(node)
            .value(MISSING_START, PERFORMANCE_START)
            .value(MISSING_END, PERFORMANCE_END)
            .matches(INVALID_START, PERFORMANCE_START, &DATE_PATTERN)
            .matches(INVALID_END, PERFORMANCE_END, &DATE_PATTERN);
        if checker.failures() > 0 {
            return checker.into_details();
        }

        let start = calendar_day(node, PERFORMANCE_START);
        let end = calendar_day(node, PERFORMANCE_END);
        let checker = checker
            .that(INVALID_START, start.is_some())
            .that(INVALID_END, end.is_some());
        match (start, end) {
            (Some(start), Some(end)) => checker.that(START_AFTER_END, start <= end).into_details(),
            _ => checker.into_details(),
        }
    }
}

/// The `YYYYMMDD` prefix as a real calendar date.
fn calendar_day(node: &Node, name: &str) -> Option<NaiveDate> {
    let digits = node.value(name)?.get(..8)?;
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// Writes the performance period onto the enclosing measurement set.
#[derive(Debug, Default)]
pub struct ReportingParametersEncoder;

impl Described for ReportingParametersEncoder {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::encoder(TemplateId::ReportingParametersAct)];
}

impl Encoder for ReportingParametersEncoder {
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        _context: &Context,
        _recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        if let Some(start) = node.value(PERFORMANCE_START) {
            wrapper.put_date(PERFORMANCE_START, start)?;
        }
        if let Some(end) = node.value(PERFORMANCE_END) {
            wrapper.put_date(PERFORMANCE_END, end)?;
        }
        Ok(())
    }
}
