//! Clinical document (QRDA III report root) handlers.

use crate::config::{NPI_PATTERN, NPI_ROOT, PROGRAM_ROOT, TIN_PATTERN, TIN_ROOT};
use crate::context::Context;
use crate::decode::{DecodeResult, Decoder, Element};
use crate::encode::{EncodeFn, Encoder, JsonWrapper};
use crate::error::EncodeError;
use crate::handlers::reporting::PERFORMANCE_START;
use crate::model::{Detail, Node, Program, TemplateId};
use crate::registry::{Described, Descriptor};
use crate::validate::{Checker, Validator};
use crate::xml::{absolute_path, find_all_by_path, find_id, id_extension};

pub const PROGRAM_NAME: &str = "programName";
pub const ENTITY_TYPE: &str = "entityType";
pub const TAX_PAYER_IDENTIFICATION_NUMBER: &str = "taxpayerIdentificationNumber";
pub const NATIONAL_PROVIDER_IDENTIFIER: &str = "nationalProviderIdentifier";
pub const PERFORMANCE_YEAR: &str = "performanceYear";
pub const MEASUREMENT_SETS: &str = "measurementSets";

pub const ENTITY_INDIVIDUAL: &str = "individual";
pub const ENTITY_GROUP: &str = "group";

pub const ONE_CHILD_REQUIRED: &str =
    "Clinical Document Node must have at least one Aci or IA or eCQM Section Node as a child";
pub const CONTAINS_PROGRAM_NAME: &str = "Clinical Document must have a program name";
pub const INCORRECT_PROGRAM_NAME: &str =
    "Clinical Document program name is not recognized, expected MIPS or CPCPLUS";
pub const CONTAINS_TAX_ID_NUMBER: &str =
    "Clinical Document must have Taxpayer Identification Number (TIN)";
pub const INVALID_TAX_ID_NUMBER: &str = "The Taxpayer Identification Number (TIN) must be 9 digits";
pub const INVALID_NPI: &str = "The National Provider Identifier (NPI) must be 10 digits";
pub const CPC_MEASURE_SECTION_REQUIRED: &str =
    "CPC+ submissions must contain an eCQM (measure) section";

const PERFORMER_PATH: &str = "documentationOf/serviceEvent/performer/assignedEntity";
const TIN_ID_PATH: &str = "representedOrganization/id";
const RECIPIENT_PATH: &str = "informationRecipient/intendedRecipient/id";

/// Reads the submitter's identity and program.
#[derive(Debug, Default)]
pub struct ClinicalDocumentDecoder;

impl Described for ClinicalDocumentDecoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::decoder(TemplateId::ClinicalDocument)];
}

impl Decoder for ClinicalDocumentDecoder {
    fn decode(&self, element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        if let Some(recipient) = id_extension(element, RECIPIENT_PATH, PROGRAM_ROOT) {
            let name = recipient
                .parse::<Program>()
                .map(|p| p.output_name().to_string())
                .unwrap_or_else(|_| recipient.trim().to_lowercase());
            node.put_value(PROGRAM_NAME, name);
        }

        let performers = find_all_by_path(element, PERFORMER_PATH);
        let npi = performers
            .iter()
            .find_map(|entity| id_extension(*entity, "id", NPI_ROOT));
        let tin = performers
            .iter()
            .find_map(|entity| id_extension(*entity, TIN_ID_PATH, TIN_ROOT));

        if let Some(tin) = tin {
            node.put_value(TAX_PAYER_IDENTIFICATION_NUMBER, tin.trim());
        }
        match npi {
            Some(npi) => {
                node.put_value(NATIONAL_PROVIDER_IDENTIFIER, npi.trim());
                node.put_value(ENTITY_TYPE, ENTITY_INDIVIDUAL);
            }
            None => node.put_value(ENTITY_TYPE, ENTITY_GROUP),
        }

        node.add_children(performers.into_iter().filter_map(npi_tin));

        DecodeResult::Continue
    }
}

/// One performer's identifiers as an [`TemplateId::NpiTinId`] node.
///
/// A performer without both `id` elements is skipped. An `id` without an
/// `extension` still counts; the value is simply left unset.
fn npi_tin(entity: Element<'_, '_>) -> Option<Node> {
    let npi = find_id(entity, "id", NPI_ROOT)?;
    let tin = find_id(entity, TIN_ID_PATH, TIN_ROOT)?;

    let mut node = Node::new(TemplateId::NpiTinId).with_path(absolute_path(entity));
    if let Some(npi) = npi.attribute("extension") {
        node.put_value(NATIONAL_PROVIDER_IDENTIFIER, npi.trim());
    }
    if let Some(tin) = tin.attribute("extension") {
        node.put_value(TAX_PAYER_IDENTIFICATION_NUMBER, tin.trim());
    }
    Some(node)
}

/// Checks the submitter identity and that something is reported.
#[derive(Debug, Default)]
pub struct ClinicalDocumentValidator;

impl Described for ClinicalDocumentValidator {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::validator(TemplateId::ClinicalDocument)];
}

impl Validator for ClinicalDocumentValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        Checker::check(node)
            .child_minimum(
                ONE_CHILD_REQUIRED,
                1,
                &[
                    TemplateId::AciSection,
                    TemplateId::IaSection,
                    TemplateId::MeasureSection,
                ],
            )
            .value(CONTAINS_PROGRAM_NAME, PROGRAM_NAME)
            .one_of(
                INCORRECT_PROGRAM_NAME,
                PROGRAM_NAME,
                &[Program::Mips.output_name(), Program::Cpcplus.output_name()],
            )
            .value(CONTAINS_TAX_ID_NUMBER, TAX_PAYER_IDENTIFICATION_NUMBER)
            .matches(INVALID_TAX_ID_NUMBER, TAX_PAYER_IDENTIFICATION_NUMBER, &TIN_PATTERN)
            .matches(INVALID_NPI, NATIONAL_PROVIDER_IDENTIFIER, &NPI_PATTERN)
            .into_details()
    }
}

/// CPC+ reports must include quality measures.
#[derive(Debug, Default)]
pub struct CpcClinicalDocumentValidator;

impl Described for CpcClinicalDocumentValidator {
    const DESCRIPTORS: &'static [Descriptor] =
        &[Descriptor::validator(TemplateId::ClinicalDocument).for_program(Program::Cpcplus)];
}

impl Validator for CpcClinicalDocumentValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        Checker::check(node)
            .child_minimum(CPC_MEASURE_SECTION_REQUIRED, 1, &[TemplateId::MeasureSection])
            .into_details()
    }
}

/// Writes the submission header and one measurement set per section.
#[derive(Debug, Default)]
pub struct ClinicalDocumentEncoder;

impl Described for ClinicalDocumentEncoder {
    const DESCRIPTORS: &'static [Descriptor] = &[Descriptor::encoder(TemplateId::ClinicalDocument)];
}

impl Encoder for ClinicalDocumentEncoder {
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        context: &Context,
        recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        let program = node
            .value(PROGRAM_NAME)
            .unwrap_or_else(|| context.program().output_name());
        wrapper.put_string(PROGRAM_NAME, program);
        if let Some(entity) = node.value(ENTITY_TYPE) {
            wrapper.put_string(ENTITY_TYPE, entity);
        }
        if let Some(tin) = node.value(TAX_PAYER_IDENTIFICATION_NUMBER) {
            wrapper.put_string(TAX_PAYER_IDENTIFICATION_NUMBER, tin);
        }
        if let Some(npi) = node.value(NATIONAL_PROVIDER_IDENTIFIER) {
            wrapper.put_string(NATIONAL_PROVIDER_IDENTIFIER, npi);
        }
        if let Some(start) = node
            .find_descendant(TemplateId::ReportingParametersAct)
            .and_then(|act| act.value(PERFORMANCE_START))
        {
            let year = start.get(..4).unwrap_or(start);
            wrapper.put_integer(PERFORMANCE_YEAR, year)?;
        }

        for child in node.children() {
            if child.template().is_section() {
                let mut set = JsonWrapper::new();
                recurse(child, &mut set)?;
                wrapper.push_to(MEASUREMENT_SETS, set);
            } else {
                recurse(child, wrapper)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    const HEADER: &str = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
        <templateId root="2.16.840.1.113883.10.20.27.1.1" extension="2017-06-01"/>
        <informationRecipient>
            <intendedRecipient>
                <id root="2.16.840.1.113883.3.249.7" extension="MIPS"/>
            </intendedRecipient>
        </informationRecipient>
        <documentationOf>
            <serviceEvent>
                <performer typeCode="PRF">
                    <assignedEntity>
                        <id root="2.16.840.1.113883.4.6" extension="2567891421"/>
                        <representedOrganization>
                            <id root="2.16.840.1.113883.4.2" extension="123456789"/>
                        </representedOrganization>
                    </assignedEntity>
                </performer>
            </serviceEvent>
        </documentationOf>
    </ClinicalDocument>"#;

    fn decoded(xml: &str) -> Node {
        let doc = Document::parse(xml).unwrap();
        let mut node = Node::new(TemplateId::ClinicalDocument);
        ClinicalDocumentDecoder.decode(doc.root_element(), &mut node, &Context::default());
        node
    }

    const PERFORMERS: &str = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
        <templateId root="2.16.840.1.113883.10.20.27.1.1" extension="2017-06-01"/>
        <documentationOf>
            <serviceEvent>
                <performer typeCode="PRF">
                    <assignedEntity>
                        <id root="2.16.840.1.113883.4.6" extension="NPI-1"/>
                        <representedOrganization>
                            <id root="2.16.840.1.113883.4.2" extension="TIN-1"/>
                        </representedOrganization>
                    </assignedEntity>
                </performer>
                <performer typeCode="PRF">
                    <assignedEntity>
                        <id root="2.16.840.1.113883.4.6" extension="NPI-2"/>
                        <representedOrganization>
                            <id root="2.16.840.1.113883.4.2" extension="TIN-2"/>
                        </representedOrganization>
                    </assignedEntity>
                </performer>
                <performer typeCode="PRF">
                    <assignedEntity>
                        <id root="2.16.840.1.113883.4.6" extension="NPI-3"/>
                        <representedOrganization>
                            <id root="2.16.840.1.113883.4.2" extension="TIN-3"/>
                        </representedOrganization>
                    </assignedEntity>
                </performer>
            </serviceEvent>
        </documentationOf>
    </ClinicalDocument>"#;

    /// `(npi, tin)` of every performer child.
    fn npi_tins(node: &Node) -> Vec<(Option<&str>, Option<&str>)> {
        node.children_of(TemplateId::NpiTinId)
            .map(|c| {
                (
                    c.value(NATIONAL_PROVIDER_IDENTIFIER),
                    c.value(TAX_PAYER_IDENTIFICATION_NUMBER),
                )
            })
            .collect()
    }

    fn messages(details: Vec<Detail>) -> Vec<String> {
        details.into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_decodes_identity() {
        let node = decoded(HEADER);

        assert_eq!(node.value(PROGRAM_NAME), Some("mips"));
        assert_eq!(node.value(TAX_PAYER_IDENTIFICATION_NUMBER), Some("123456789"));
        assert_eq!(node.value(NATIONAL_PROVIDER_IDENTIFIER), Some("2567891421"));
        assert_eq!(node.value(ENTITY_TYPE), Some(ENTITY_INDIVIDUAL));
    }

    #[test]
    fn test_one_child_per_performer() {
        let node = decoded(PERFORMERS);

        assert_eq!(
            npi_tins(&node),
            vec![
                (Some("NPI-1"), Some("TIN-1")),
                (Some("NPI-2"), Some("TIN-2")),
                (Some("NPI-3"), Some("TIN-3")),
            ]
        );
        assert_eq!(node.value(NATIONAL_PROVIDER_IDENTIFIER), Some("NPI-1"));
        assert_eq!(node.value(TAX_PAYER_IDENTIFICATION_NUMBER), Some("TIN-1"));
        assert_eq!(
            node.children()[1].path(),
            "/ClinicalDocument/documentationOf[1]/serviceEvent[1]/performer[2]/assignedEntity[1]"
        );
    }

    #[test]
    fn test_performer_without_npi_is_skipped() {
        let node = decoded(&PERFORMERS.replace(
            r#"<id root="2.16.840.1.113883.4.6" extension="NPI-1"/>"#,
            "",
        ));

        assert_eq!(
            npi_tins(&node),
            vec![(Some("NPI-2"), Some("TIN-2")), (Some("NPI-3"), Some("TIN-3"))]
        );
        assert_eq!(node.value(NATIONAL_PROVIDER_IDENTIFIER), Some("NPI-2"));
    }

    #[test]
    fn test_performer_without_tin_is_skipped() {
        let node = decoded(&PERFORMERS.replace(
            r#"<id root="2.16.840.1.113883.4.2" extension="TIN-1"/>"#,
            "",
        ));
        assert_eq!(npi_tins(&node).len(), 2);
    }

    #[test]
    fn test_performer_without_organization_is_skipped() {
        let node = decoded(
            &PERFORMERS
                .replacen("<representedOrganization>", "", 1)
                .replacen("</representedOrganization>", "", 1),
        );
        assert_eq!(npi_tins(&node).len(), 2);
    }

    #[test]
    fn test_missing_extensions_are_tolerated() {
        let node = decoded(&PERFORMERS.replace(r#"extension="NPI-1""#, ""));
        assert_eq!(npi_tins(&node)[0], (None, Some("TIN-1")));

        let node = decoded(&PERFORMERS.replace(r#"extension="TIN-1""#, ""));
        assert_eq!(npi_tins(&node)[0], (Some("NPI-1"), None));

        let node = decoded(
            &PERFORMERS
                .replace(r#"extension="NPI-1""#, "")
                .replace(r#"extension="TIN-1""#, ""),
        );
        assert_eq!(npi_tins(&node)[0], (None, None));
        assert_eq!(npi_tins(&node).len(), 3);
    }

    #[test]
    fn test_group_without_npi() {
        let node = decoded(&HEADER.replace(
            r#"<id root="2.16.840.1.113883.4.6" extension="2567891421"/>"#,
            "",
        ));
        assert_eq!(node.value(ENTITY_TYPE), Some(ENTITY_GROUP));
        assert!(!node.has_value(NATIONAL_PROVIDER_IDENTIFIER));
    }

    #[test]
    fn test_cpcplus_program_name() {
        let node = decoded(&HEADER.replace(r#"extension="MIPS""#, r#"extension="CPCPLUS""#));
        assert_eq!(node.value(PROGRAM_NAME), Some("cpcPlus"));
    }

    #[test]
    fn test_validator_reports_every_identity_defect() {
        let node = Node::new(TemplateId::ClinicalDocument)
            .with_value(PROGRAM_NAME, "pqrs")
            .with_value(TAX_PAYER_IDENTIFICATION_NUMBER, "1234")
            .with_value(NATIONAL_PROVIDER_IDENTIFIER, "99");

        let details = ClinicalDocumentValidator.validate(&node, &Context::default());

        assert_eq!(
            messages(details),
            vec![
                ONE_CHILD_REQUIRED,
                INCORRECT_PROGRAM_NAME,
                INVALID_TAX_ID_NUMBER,
                INVALID_NPI
            ]
        );
    }

    #[test]
    fn test_validator_requires_tin() {
        let mut node = decoded(HEADER);
        node.remove_value(TAX_PAYER_IDENTIFICATION_NUMBER);
        node.add_child(Node::new(TemplateId::IaSection));

        let details = ClinicalDocumentValidator.validate(&node, &Context::default());

        assert_eq!(messages(details), vec![CONTAINS_TAX_ID_NUMBER]);
    }

    #[test]
    fn test_cpcplus_requires_measure_section() {
        let mut node = decoded(HEADER);
        node.add_child(Node::new(TemplateId::AciSection));

        let details = CpcClinicalDocumentValidator.validate(&node, &Context::default());
        assert_eq!(messages(details), vec![CPC_MEASURE_SECTION_REQUIRED]);

        node.add_child(Node::new(TemplateId::MeasureSection));
        assert!(CpcClinicalDocumentValidator
            .validate(&node, &Context::default())
            .is_empty());
    }
}
