//! Conversion context: program scope, feature toggles and handler lookup.

use std::sync::{Arc, LazyLock};

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::model::{Program, TemplateId};
use crate::registry::{ComponentKey, Registries};
use crate::validate::Validator;

/// Registries discovered once per process and shared by default contexts.
static DISCOVERED: LazyLock<Arc<Registries>> = LazyLock::new(|| Arc::new(Registries::discover()));

/// Configuration for one or more conversions.
///
/// The registries are shared read-only between clones. Mutating them through
/// [`Context::registries_mut`] copies them first, so contexts already handed
/// to running conversions never observe the change.
#[derive(Debug, Clone)]
pub struct Context {
    program: Program,
    do_defaults: bool,
    do_validation: bool,
    registries: Arc<Registries>,
}

impl Context {
    /// Create a context for a program, using the discovered handlers.
    #[must_use]
    pub fn new(program: Program) -> Self {
        Self {
            program,
            do_defaults: true,
            do_validation: true,
            registries: Arc::clone(&DISCOVERED),
        }
    }

    /// Replace the handler registries.
    #[must_use]
    pub fn with_registries(mut self, registries: Registries) -> Self {
        self.registries = Arc::new(registries);
        self
    }

    /// Set the program scope.
    #[must_use]
    pub fn with_program(mut self, program: Program) -> Self {
        self.program = program;
        self
    }

    /// Set whether the default decoder applies to unrecognised templates.
    #[must_use]
    pub fn with_defaults(mut self, enabled: bool) -> Self {
        self.do_defaults = enabled;
        self
    }

    /// Set whether the validation stage runs.
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.do_validation = enabled;
        self
    }

    /// Program the conversion reports under.
    #[must_use]
    pub fn program(&self) -> Program {
        self.program
    }

    /// Whether the default decoder may claim unrecognised templates.
    #[must_use]
    pub fn do_defaults(&self) -> bool {
        self.do_defaults
    }

    /// Whether the validation stage runs.
    #[must_use]
    pub fn do_validation(&self) -> bool {
        self.do_validation
    }

    /// In-place form of [`Context::with_defaults`].
    pub fn set_do_defaults(&mut self, enabled: bool) {
        self.do_defaults = enabled;
    }

    /// In-place form of [`Context::with_validation`].
    pub fn set_do_validation(&mut self, enabled: bool) {
        self.do_validation = enabled;
    }

    /// The handler registries.
    #[must_use]
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Mutable access to this context's own copy of the registries.
    pub fn registries_mut(&mut self) -> &mut Registries {
        Arc::make_mut(&mut self.registries)
    }

    /// Program-specific key first, then the generic one.
    fn scoped_keys(&self, template: TemplateId) -> impl Iterator<Item = ComponentKey> {
        let specific = (self.program != Program::All)
            .then(|| ComponentKey::new(template, self.program));
        specific
            .into_iter()
            .chain(std::iter::once(ComponentKey::generic(template)))
    }

    /// Whether any decoder is bound for a template in this program scope.
    #[must_use]
    pub fn has_decoder(&self, template: TemplateId) -> bool {
        self.scoped_keys(template)
            .any(|key| self.registries.decoders.contains(&key))
    }

    /// Resolve the decoder for a template.
    ///
    /// The program-specific binding wins; the generic one is the fallback.
    #[must_use]
    pub fn decoder_for(&self, template: TemplateId) -> Option<Box<dyn Decoder>> {
        self.scoped_keys(template)
            .find_map(|key| self.registries.decoders.get(&key))
    }

    /// Resolve the fallback decoder, if defaulting is enabled.
    #[must_use]
    pub fn default_decoder(&self) -> Option<Box<dyn Decoder>> {
        if !self.do_defaults {
            return None;
        }
        self.registries
            .decoders
            .get(&ComponentKey::default_handler())
    }

    /// Resolve every validator that applies to a template.
    ///
    /// Validators are additive: the program-specific one runs before the
    /// generic one.
    #[must_use]
    pub fn validators_for(&self, template: TemplateId) -> Vec<Box<dyn Validator>> {
        self.scoped_keys(template)
            .filter_map(|key| self.registries.validators.get(&key))
            .collect()
    }

    /// Resolve the encoder for a template.
    ///
    /// The program-specific binding wins; the generic one is the fallback.
    #[must_use]
    pub fn encoder_for(&self, template: TemplateId) -> Option<Box<dyn Encoder>> {
        self.scoped_keys(template)
            .find_map(|key| self.registries.encoders.get(&key))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Program::All)
    }
}
