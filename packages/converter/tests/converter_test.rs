//! End-to-end conversion tests over QRDA III fixtures.

mod common;

use std::fs::File;
use std::io::Read;
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{
    fixture, load_fixture, with_failing_encoder, with_jenny, with_only_jenny_validator,
    JENNY, JENNY_ERROR,
};
use qpp_converter::config::{NOT_VALID_QRDA_DOCUMENT, NOT_VALID_XML_DOCUMENT, UNEXPECTED_ERROR};
use qpp_converter::handlers::aci::{invalid_value, not_an_integer_value};
use qpp_converter::handlers::reporting::INVALID_END;
use qpp_converter::{
    AllErrors, Context, Converter, PathQrdaSource, Program, Stage, StreamQrdaSource,
    TransformError,
};

fn convert(name: &str) -> Result<qpp_converter::JsonWrapper, TransformError> {
    Converter::new(PathQrdaSource::new(fixture(name))).transform()
}

fn convert_with(name: &str, context: Context) -> Result<qpp_converter::JsonWrapper, TransformError> {
    Converter::new(PathQrdaSource::new(fixture(name)))
        .with_context(context)
        .transform()
}

/// Exactly one error carrying exactly one detail with `message`.
fn assert_structural(errors: &AllErrors, message: &str) {
    assert_eq!(errors.errors().len(), 1, "There must only be one error source.");
    assert_eq!(errors.detail_count(), 1, "There must be only one detail.");
    assert_eq!(errors.messages().collect::<Vec<_>>(), vec![message]);
}

#[test]
fn test_valid_qpp_file() {
    let wrapper = convert("valid-QRDA-III.xml").unwrap();

    assert_eq!(
        wrapper.to_value(),
        json!({
            "programName": "mips",
            "entityType": "individual",
            "taxpayerIdentificationNumber": "123456789",
            "nationalProviderIdentifier": "2567891421",
            "performanceYear": 2017,
            "measurementSets": [
                {
                    "category": "ia",
                    "submissionMethod": "electronicHealthRecord",
                    "performanceStart": "2017-01-01",
                    "performanceEnd": "2017-12-31",
                    "measurements": [ { "measureId": "IA_EPA_1", "value": true } ]
                },
                {
                    "category": "aci",
                    "submissionMethod": "electronicHealthRecord",
                    "performanceStart": "2017-01-02",
                    "performanceEnd": "2017-12-31",
                    "measurements": [
                        { "measureId": "ACI-PEA-1", "value": { "numerator": 600, "denominator": 800 } }
                    ]
                },
                {
                    "category": "quality",
                    "submissionMethod": "electronicHealthRecord",
                    "performanceStart": "2017-01-01",
                    "performanceEnd": "2017-12-31",
                    "measurements": [
                        {
                            "measureId": "236",
                            "value": {
                                "isEndToEndReported": true,
                                "eligiblePopulation": 600,
                                "eligiblePopulationExclusion": 600,
                                "performanceMet": 600,
                                "performanceNotMet": -600
                            }
                        }
                    ]
                }
            ]
        })
    );
}

#[test]
fn test_valid_qpp_stream() {
    let path = fixture("valid-QRDA-III.xml");
    let source = StreamQrdaSource::new("valid-QRDA-III.xml", move || {
        File::open(&path)
            .ok()
            .map(|file| Box::new(file) as Box<dyn Read + Send>)
    });

    let mut converter = Converter::new(source);
    assert!(converter.transform().is_ok());
    assert_eq!(converter.stage(), Stage::Done);
}

#[test]
fn test_field_order_follows_encoders() {
    let wrapper = convert("valid-QRDA-III.xml").unwrap();
    let keys: Vec<_> = wrapper.keys().collect();
    assert_eq!(
        keys,
        vec![
            "programName",
            "entityType",
            "taxpayerIdentificationNumber",
            "nationalProviderIdentifier",
            "performanceYear",
            "measurementSets"
        ]
    );
}

#[test]
fn test_invalid_xml() {
    let err = convert("non-xml-file.xml").unwrap_err();

    assert_eq!(err.stage(), Stage::Loading);
    assert_structural(err.details(), NOT_VALID_XML_DOCUMENT);
    assert_eq!(err.details().errors()[0].source_identifier, "non-xml-file.xml");
}

#[test]
fn test_not_a_qrda_iii_file() {
    let err = convert("not-a-QRDA-III-file.xml").unwrap_err();

    assert_eq!(err.stage(), Stage::Decoding);
    assert_structural(err.details(), NOT_VALID_QRDA_DOCUMENT);
}

#[test]
fn test_not_a_qrda_iii_file_without_defaults_or_validation() {
    let context = Context::default().with_defaults(false).with_validation(false);
    let err = convert_with("not-a-QRDA-III-file.xml", context).unwrap_err();

    assert_structural(err.details(), NOT_VALID_QRDA_DOCUMENT);
}

#[test]
fn test_unexpected_error_on_missing_stream() {
    let mut converter = Converter::new(StreamQrdaSource::new("valid-QRDA-III.xml", || None));

    let err = converter.transform().unwrap_err();

    assert_eq!(err.stage(), Stage::Loading);
    assert_structural(err.details(), UNEXPECTED_ERROR);
    assert_eq!(converter.stage(), Stage::Failed);
}

#[test]
fn test_unexpected_error_on_missing_file() {
    let err = convert("does-not-exist.xml").unwrap_err();
    assert_structural(err.details(), UNEXPECTED_ERROR);
}

#[test]
fn test_encoding_errors() {
    let context = with_failing_encoder(Context::default().with_defaults(false).with_validation(false));

    let err = convert_with("defaultedNode.xml", context).unwrap_err();

    assert_eq!(err.stage(), Stage::Encoding);
    assert_structural(err.details(), NOT_VALID_XML_DOCUMENT);
}

#[test]
fn test_validation_errors_grouped_by_source() {
    let context = with_only_jenny_validator(with_jenny(Context::default()));

    let err = convert_with("errantDefaultedNode.xml", context).unwrap_err();

    assert_eq!(err.stage(), Stage::Validating);
    let errors = err.details().errors();
    assert_eq!(errors.len(), 1, "There must only be one error source.");
    assert_eq!(errors[0].source_identifier, "IA Section");
    assert_eq!(
        errors[0].path.as_deref(),
        Some("/ClinicalDocument/component[1]/structuredBody[1]/component[1]/section[1]")
    );
    assert!(errors[0].details.iter().any(|d| d.message == JENNY_ERROR));
}

#[test]
fn test_defaults() {
    let context = with_jenny(Context::default().with_validation(false));

    let wrapper = convert_with("defaultedNode.xml", context).unwrap();

    assert!(wrapper.to_string().contains(JENNY));
}

#[test]
fn test_skip_defaults() {
    let context = with_jenny(Context::default().with_defaults(false).with_validation(false));

    let wrapper = convert_with("defaultedNode.xml", context).unwrap();

    assert!(!wrapper.to_string().contains(JENNY));
}

#[test]
fn test_invalid_aggregate_counts() {
    let err = convert("angerTheConverter.xml").unwrap_err();

    let errors = err.details();
    assert_eq!(errors.errors().len(), 2);
    assert!(errors.errors().iter().all(|e| e.source_identifier == "ACI Section"));

    let content = errors.to_json_pretty().unwrap();
    assert!(content.contains(&not_an_integer_value("Numerator")));
    assert!(content.contains(&invalid_value("Denominator")));
    assert!(!content.contains("null"));
}

#[test]
fn test_impossible_performance_end_is_a_validation_error() {
    let xml = load_fixture("valid-QRDA-III.xml").replace("20171231", "20170231");

    let err = Converter::new(StreamQrdaSource::from_bytes("feb31.xml", xml))
        .transform()
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Validating);
    let messages: Vec<_> = err.details().messages().collect();
    assert_eq!(messages.len(), 3, "one per section: {messages:?}");
    assert!(messages.iter().all(|m| *m == INVALID_END));
}

#[test]
fn test_cpcplus_requires_measure_section() {
    let xml = load_fixture("valid-QRDA-III.xml").replace("extension=\"MIPS\"", "extension=\"CPCPLUS\"");
    // the eCQM section no longer counts as one
    let stripped = xml.replacen(
        "root=\"2.16.840.1.113883.10.20.27.2.3\"",
        "root=\"2.16.840.1.113883.10.20.27.2.999\"",
        1,
    );

    let context = Context::new(Program::Cpcplus);
    let ok = Converter::new(StreamQrdaSource::from_bytes("cpc.xml", xml.clone()))
        .with_context(context.clone())
        .transform()
        .unwrap();
    assert_eq!(ok.get_string("programName"), Some("cpcPlus"));

    let err = Converter::new(StreamQrdaSource::from_bytes("cpc.xml", stripped))
        .with_context(context)
        .transform()
        .unwrap_err();
    assert!(err
        .details()
        .messages()
        .any(|m| m == "CPC+ submissions must contain an eCQM (measure) section"));
}

#[test]
fn test_concurrent_conversions_share_context() {
    let context = Arc::new(Context::new(Program::Mips));
    let expected = convert("valid-QRDA-III.xml").unwrap().to_value();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                Converter::new(PathQrdaSource::new(fixture("valid-QRDA-III.xml")))
                    .with_context((*context).clone())
                    .transform()
                    .map(|wrapper| wrapper.to_value())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), expected);
    }
}
