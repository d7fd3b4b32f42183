//! Registry configuration for QRDA III handlers.
//!
//! Every concrete handler declares its keys through [`Described`]; the
//! functions below list the handler types and bind each one. Adding a handler
//! means implementing it and adding one line here.

use super::core::Registry;
use super::types::ComponentKind;
use crate::decode::{self, Decoder};
use crate::encode::{self, Encoder};
use crate::handlers::aci::{
    AciDenominatorDecoder, AciDenominatorEncoder, AciDenominatorValidator, AciNumeratorDecoder,
    AciNumeratorEncoder, AciNumeratorValidator, AciProportionMeasureDecoder,
    AciProportionMeasureEncoder, AciProportionMeasureValidator, AggregateCountDecoder,
    AggregateCountValidator,
};
use crate::handlers::defaults::DefaultDecoder;
use crate::handlers::document::{
    ClinicalDocumentDecoder, ClinicalDocumentEncoder, ClinicalDocumentValidator,
    CpcClinicalDocumentValidator,
};
use crate::handlers::ia::{
    IaMeasureDecoder, IaMeasureEncoder, IaMeasureValidator, MeasurePerformedDecoder,
    MeasurePerformedValidator,
};
use crate::handlers::quality::{
    MeasureDataDecoder, QualityMeasureIdDecoder, QualityMeasureIdEncoder,
    QualityMeasureIdValidator,
};
use crate::handlers::reporting::{
    ReportingParametersDecoder, ReportingParametersEncoder, ReportingParametersValidator,
};
use crate::handlers::section::{MeasureSectionDecoder, MeasureSectionEncoder};
use crate::validate::{self, Validator};

/// The three handler registries a conversion dispatches through.
#[derive(Debug, Clone)]
pub struct Registries {
    /// Decoders keyed by template and program.
    pub decoders: Registry<dyn Decoder>,
    /// Validators keyed by template and program.
    pub validators: Registry<dyn Validator>,
    /// Encoders keyed by template and program.
    pub encoders: Registry<dyn Encoder>,
}

impl Registries {
    /// Registries with nothing bound.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            decoders: Registry::new(ComponentKind::Decoder),
            validators: Registry::new(ComponentKind::Validator),
            encoders: Registry::new(ComponentKind::Encoder),
        }
    }

    /// Registries populated with every built-in handler.
    #[must_use]
    pub fn discover() -> Self {
        let registries = Self {
            decoders: create_decoder_registry(),
            validators: create_validator_registry(),
            encoders: create_encoder_registry(),
        };
        tracing::debug!(
            decoders = registries.decoders.len(),
            validators = registries.validators.len(),
            encoders = registries.encoders.len(),
            "Discovered handlers"
        );
        registries
    }

    /// Clear every binding in all three registries.
    pub fn init(&mut self) {
        self.decoders.init();
        self.validators.init();
        self.encoders.init();
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::discover()
    }
}

/// Create a decoder registry with every built-in decoder bound.
#[must_use]
pub fn create_decoder_registry() -> Registry<dyn Decoder> {
    let mut registry = Registry::new(ComponentKind::Decoder);

    // Document structure
    registry.register_described::<ClinicalDocumentDecoder>(decode::boxed::<ClinicalDocumentDecoder>);
    registry.register_described::<MeasureSectionDecoder>(decode::boxed::<MeasureSectionDecoder>);
    registry.register_described::<ReportingParametersDecoder>(
        decode::boxed::<ReportingParametersDecoder>,
    );

    // Quality measures
    registry.register_described::<QualityMeasureIdDecoder>(decode::boxed::<QualityMeasureIdDecoder>);
    registry.register_described::<MeasureDataDecoder>(decode::boxed::<MeasureDataDecoder>);
    registry.register_described::<AggregateCountDecoder>(decode::boxed::<AggregateCountDecoder>);

    // Advancing care information
    registry.register_described::<AciProportionMeasureDecoder>(
        decode::boxed::<AciProportionMeasureDecoder>,
    );
    registry.register_described::<AciNumeratorDecoder>(decode::boxed::<AciNumeratorDecoder>);
    registry.register_described::<AciDenominatorDecoder>(decode::boxed::<AciDenominatorDecoder>);

    // Improvement activities
    registry.register_described::<IaMeasureDecoder>(decode::boxed::<IaMeasureDecoder>);
    registry.register_described::<MeasurePerformedDecoder>(decode::boxed::<MeasurePerformedDecoder>);

    // Fallback for templated elements nothing else claims
    registry.register_described::<DefaultDecoder>(decode::boxed::<DefaultDecoder>);

    registry
}

/// Create a validator registry with every built-in validator bound.
#[must_use]
pub fn create_validator_registry() -> Registry<dyn Validator> {
    let mut registry = Registry::new(ComponentKind::Validator);

    registry.register_described::<ClinicalDocumentValidator>(
        validate::boxed::<ClinicalDocumentValidator>,
    );
    registry.register_described::<CpcClinicalDocumentValidator>(
        validate::boxed::<CpcClinicalDocumentValidator>,
    );
    registry.register_described::<ReportingParametersValidator>(
        validate::boxed::<ReportingParametersValidator>,
    );
    registry.register_described::<QualityMeasureIdValidator>(
        validate::boxed::<QualityMeasureIdValidator>,
    );
    registry.register_described::<AggregateCountValidator>(
        validate::boxed::<AggregateCountValidator>,
    );
    registry.register_described::<AciProportionMeasureValidator>(
        validate::boxed::<AciProportionMeasureValidator>,
    );
    registry.register_described::<AciNumeratorValidator>(validate::boxed::<AciNumeratorValidator>);
    registry
        .register_described::<AciDenominatorValidator>(validate::boxed::<AciDenominatorValidator>);
    registry.register_described::<IaMeasureValidator>(validate::boxed::<IaMeasureValidator>);
    registry.register_described::<MeasurePerformedValidator>(
        validate::boxed::<MeasurePerformedValidator>,
    );

    registry
}

/// Create an encoder registry with every built-in encoder bound.
#[must_use]
pub fn create_encoder_registry() -> Registry<dyn Encoder> {
    let mut registry = Registry::new(ComponentKind::Encoder);

    registry.register_described::<ClinicalDocumentEncoder>(encode::boxed::<ClinicalDocumentEncoder>);
    registry.register_described::<MeasureSectionEncoder>(encode::boxed::<MeasureSectionEncoder>);
    registry.register_described::<ReportingParametersEncoder>(
        encode::boxed::<ReportingParametersEncoder>,
    );
    registry.register_described::<QualityMeasureIdEncoder>(encode::boxed::<QualityMeasureIdEncoder>);
    registry.register_described::<AciProportionMeasureEncoder>(
        encode::boxed::<AciProportionMeasureEncoder>,
    );
    registry.register_described::<AciNumeratorEncoder>(encode::boxed::<AciNumeratorEncoder>);
    registry.register_described::<AciDenominatorEncoder>(encode::boxed::<AciDenominatorEncoder>);
    registry.register_described::<IaMeasureEncoder>(encode::boxed::<IaMeasureEncoder>);

    registry
}
