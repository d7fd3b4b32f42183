//! eCQM quality measure handlers.
//!
//! A measure reference groups population segments (`IPOP`/`IPP`, `DENOM`,
//! `DENEX`, `NUMER`), each carrying an aggregate count. The encoder folds them
//! into the QPP performance-rate value.

use super::{child_aggregate_count, MEASURE_ID};
use crate::config::EMEASURE_ROOT;
use crate::context::Context;
use crate::decode::{DecodeResult, Decoder, Element};
use crate::encode::{EncodeFn, Encoder, JsonWrapper};
use crate::error::EncodeError;
use crate::measures::measure_id_for;
use crate::model::{Detail, Node, TemplateId};
use crate::registry::{Described, Descriptor};
use crate::validate::{Checker, Validator};
use crate::xml::{attribute_at, id_extension};

/// Node value holding the population code of a measure data segment.
pub const MEASURE_TYPE: &str = "type";

pub const IS_END_TO_END_REPORTED: &str = "isEndToEndReported";
pub const ELIGIBLE_POPULATION: &str = "eligiblePopulation";
pub const ELIGIBLE_POPULATION_EXCLUSION: &str = "eligiblePopulationExclusion";
pub const PERFORMANCE_MET: &str = "performanceMet";
pub const PERFORMANCE_NOT_MET: &str = "performanceNotMet";

pub const MEASURE_GUID_MISSING: &str = "The measure reference results must have a measure GUID";
pub const REQUIRES_DENOM: &str = "The measure reference results must have a DENOM population";
pub const REQUIRES_NUMER: &str = "The measure reference results must have a NUMER population";
pub const REQUIRES_IPOP: &str = "The measure reference results must have an IPOP population";

const IPOP: &[&str] = &["IPOP", "IPP"];

/// Reads the eMeasure GUID of a measure reference.
#[derive(Debug, Default)]
pub struct QualityMeasureIdDecoder;

impl Described for QualityMeasureIdDecoder {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::decoder(TemplateId::MeasureReferenceResultsCmsV2)];
}

impl Decoder for QualityMeasureIdDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(guid) = id_extension(element, "reference/externalDocument/id", EMEASURE_ROOT) {
            node.put_value(MEASURE_ID, guid.trim());
        }
        DecodeResult::Continue
    }
}

/// Reads the population code of a measure data segment.
#[derive(Debug, Default)]
pub struct MeasureDataDecoder;

impl Described for MeasureDataDecoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::decoder(TemplateId::MeasureDataCmsV2)];
}

impl Decoder for MeasureDataDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(code) = attribute_at(element, "value", "code") {
            node.put_value(MEASURE_TYPE, code.trim());
        }
        DecodeResult::Continue
    }
}

fn populations<'a>(node: &'a Node, codes: &'a [&'a str]) -> impl Iterator<Item = &'a Node> {
    node.children_of(TemplateId::MeasureDataCmsV2)
        .filter(move |data| data.value(MEASURE_TYPE).is_some_and(|t| codes.contains(&t)))
}

#[derive(Debug, Default)]
pub struct QualityMeasureIdValidator;

impl Described for QualityMeasureIdValidator {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::validator(TemplateId::MeasureReferenceResultsCmsV2)];
}

impl Validator for QualityMeasureIdValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        let has = |codes: &[&str]| populations(node, codes).next().is_some();
        Checker::check(node)
            .value(MEASURE_GUID_MISSING, MEASURE_ID)
            .that(REQUIRES_DENOM, has(&["DENOM"]))
            .that(REQUIRES_NUMER, has(&["NUMER"]))
            .that(REQUIRES_IPOP, has(IPOP))
            .into_details()
    }
}

/// Writes a quality measurement.
///
/// `performanceNotMet` is the eligible population minus the met and excluded
/// counts; it may be negative.
#[derive(Debug, Default)]
pub struct QualityMeasureIdEncoder;

impl Described for QualityMeasureIdEncoder {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::encoder(TemplateId::MeasureReferenceResultsCmsV2)];
}

impl QualityMeasureIdEncoder {
    /// Aggregate count of the first population with one of `codes`, or 0.
    fn count(node: &Node, codes: &[&str], field: &str) -> Result<i64, EncodeError> {
        let Some(raw) = populations(node, codes).find_map(child_aggregate_count) else {
            return Ok(0);
        };
        raw.trim()
            .parse()
            .map_err(|_| EncodeError::NotAnInteger {
                field: field.to_string(),
                value: raw.to_string(),
            })
    }
}

impl Encoder for QualityMeasureIdEncoder {
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        _context: &Context,
        _recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        let guid = node.value(MEASURE_ID).ok_or_else(|| EncodeError::MissingValue {
            field: MEASURE_ID.to_string(),
            template: node.template().to_string(),
        })?;
        wrapper.put_string(MEASURE_ID, measure_id_for(guid));

        let eligible = Self::count(node, IPOP, ELIGIBLE_POPULATION)?;
        let exclusion = Self::count(node, &["DENEX"], ELIGIBLE_POPULATION_EXCLUSION)?;
        let met = Self::count(node, &["NUMER"], PERFORMANCE_MET)?;

        let mut value = JsonWrapper::new();
        value.put_boolean(IS_END_TO_END_REPORTED, true);
        value.put_integer_value(ELIGIBLE_POPULATION, eligible);
        value.put_integer_value(ELIGIBLE_POPULATION_EXCLUSION, exclusion);
        value.put_integer_value(PERFORMANCE_MET, met);
        value.put_integer_value(PERFORMANCE_NOT_MET, eligible - met - exclusion);
        wrapper.put_object("value", value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::AGGREGATE_COUNT;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const GUID: &str = "40280381-51f0-825b-0152-22b98cff181a";

    fn measure(populations: &[(&str, &str)]) -> Node {
        let mut measure = Node::new(TemplateId::MeasureReferenceResultsCmsV2)
            .with_value(MEASURE_ID, GUID);
        for (code, count) in populations {
            let mut data = Node::new(TemplateId::MeasureDataCmsV2).with_value(MEASURE_TYPE, *code);
            data.add_child(
                Node::new(TemplateId::AciAggregateCount).with_value(AGGREGATE_COUNT, *count),
            );
            measure.add_child(data);
        }
        measure
    }

    fn encode(node: &Node) -> Result<JsonWrapper, EncodeError> {
        let mut wrapper = JsonWrapper::new();
        let noop: &EncodeFn<'_> = &|_, _| Ok(());
        QualityMeasureIdEncoder.encode(&mut wrapper, node, &Context::default(), noop)?;
        Ok(wrapper)
    }

    #[test]
    fn test_measure_performed_arithmetic() {
        let node = measure(&[
            ("IPOP", "600"),
            ("DENEX", "600"),
            ("NUMER", "600"),
            ("DENOM", "600"),
        ]);

        let wrapper = encode(&node).unwrap();

        assert_eq!(
            wrapper.to_value(),
            json!({
                "measureId": "236",
                "value": {
                    "isEndToEndReported": true,
                    "eligiblePopulation": 600,
                    "eligiblePopulationExclusion": 600,
                    "performanceMet": 600,
                    "performanceNotMet": -600
                }
            })
        );
    }

    #[test]
    fn test_ipp_counts_as_eligible_population() {
        let node = measure(&[("IPP", "50"), ("NUMER", "20"), ("DENOM", "50")]);

        let wrapper = encode(&node).unwrap();
        let value = wrapper.get("value").unwrap();

        assert_eq!(value["eligiblePopulation"], json!(50));
        assert_eq!(value["eligiblePopulationExclusion"], json!(0));
        assert_eq!(value["performanceNotMet"], json!(30));
    }

    #[test]
    fn test_unknown_guid_passes_through() {
        let mut node = measure(&[("IPOP", "1")]);
        node.put_value(MEASURE_ID, "not-a-known-guid");
        assert_eq!(encode(&node).unwrap().get_string(MEASURE_ID), Some("not-a-known-guid"));
    }

    #[test]
    fn test_non_integer_count_fails() {
        let node = measure(&[("IPOP", "many")]);
        assert!(matches!(
            encode(&node),
            Err(EncodeError::NotAnInteger { field, .. }) if field == ELIGIBLE_POPULATION
        ));
    }

    #[test]
    fn test_validator_requires_populations() {
        let node = measure(&[("IPOP", "1")]);
        let messages: Vec<_> = QualityMeasureIdValidator
            .validate(&node, &Context::default())
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(messages, vec![REQUIRES_DENOM, REQUIRES_NUMER]);
    }

    #[test]
    fn test_decodes_guid_and_population() {
        let xml = r#"<organizer>
            <templateId root="2.16.840.1.113883.10.20.27.3.17"/>
            <reference typeCode="REFR">
                <externalDocument classCode="DOC">
                    <id root="2.16.840.1.113883.4.738" extension="40280381-51f0-825b-0152-22b98cff181a"/>
                </externalDocument>
            </reference>
            <component>
                <observation>
                    <templateId root="2.16.840.1.113883.10.20.27.3.16"/>
                    <value code="DENOM"/>
                </observation>
            </component>
        </organizer>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();

        let context = Context::default();
        let mut parent = Node::new(TemplateId::Placeholder);
        crate::decode::DecodeEngine::new(&context).decode_into(doc.root_element(), &mut parent);

        let measure = &parent.children()[0];
        assert_eq!(measure.value(MEASURE_ID), Some(GUID));
        let data = measure.find_child(TemplateId::MeasureDataCmsV2).unwrap();
        assert_eq!(data.value(MEASURE_TYPE), Some("DENOM"));
    }
}
