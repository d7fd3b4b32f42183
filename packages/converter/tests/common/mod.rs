//! Shared fixtures and stub handlers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use qpp_converter::decode::{DecodeResult, Decoder, Element};
use qpp_converter::encode::{EncodeFn, Encoder, JsonWrapper};
use qpp_converter::error::EncodeError;
use qpp_converter::model::{Detail, Node, TemplateId};
use qpp_converter::registry::ComponentKey;
use qpp_converter::validate::Validator;
use qpp_converter::Context;

pub const JENNY: &str = "Jenny";
pub const JENNY_ERROR: &str = "Test validation error for Jenny";

/// Path of a fixture under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load fixture file content.
pub fn load_fixture(name: &str) -> String {
    let path = fixture(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Default-key decoder that marks every node it claims.
#[derive(Debug, Default)]
pub struct JennyDecoder;

impl Decoder for JennyDecoder {
    fn decode(&self, _element: Element<'_, '_>, node: &mut Node, _context: &Context) -> DecodeResult {
        node.put_value("name", JENNY);
        DecodeResult::Continue
    }
}

/// Default-key encoder that writes the mark.
#[derive(Debug, Default)]
pub struct Jenncoder;

impl Encoder for Jenncoder {
    fn encode(
        &self,
        wrapper: &mut JsonWrapper,
        node: &Node,
        _context: &Context,
        _recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        wrapper.put_string("name", node.value("name").unwrap_or(JENNY));
        Ok(())
    }
}

/// Default-key validator that always fails.
#[derive(Debug, Default)]
pub struct JennyValidator;

impl Validator for JennyValidator {
    fn validate(&self, node: &Node, _context: &Context) -> Vec<Detail> {
        vec![Detail::new(JENNY_ERROR).with_path(node.path())]
    }
}

/// Encoder that always fails.
#[derive(Debug, Default)]
pub struct FailingEncoder;

impl Encoder for FailingEncoder {
    fn encode(
        &self,
        _wrapper: &mut JsonWrapper,
        _node: &Node,
        _context: &Context,
        _recurse: &EncodeFn<'_>,
    ) -> Result<(), EncodeError> {
        Err(EncodeError::Other("mocked".to_string()))
    }
}

/// Bind the Jenny decoder and encoder under the default key.
pub fn with_jenny(mut context: Context) -> Context {
    let key = ComponentKey::default_handler();
    let registries = context.registries_mut();
    registries
        .decoders
        .register(key, qpp_converter::decode::boxed::<JennyDecoder>);
    registries
        .encoders
        .register(key, qpp_converter::encode::boxed::<Jenncoder>);
    context
}

/// Replace every validator with the Jenny validator under the default key.
pub fn with_only_jenny_validator(mut context: Context) -> Context {
    let validators = &mut context.registries_mut().validators;
    validators.init();
    validators.register(
        ComponentKey::default_handler(),
        qpp_converter::validate::boxed::<JennyValidator>,
    );
    context
}

/// Fail encoding of the document root.
pub fn with_failing_encoder(mut context: Context) -> Context {
    context.registries_mut().encoders.register(
        ComponentKey::generic(TemplateId::ClinicalDocument),
        qpp_converter::encode::boxed::<FailingEncoder>,
    );
    context
}
