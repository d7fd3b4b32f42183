//! Types for the component registry system.

use std::fmt;

use crate::model::{Program, TemplateId};

/// The three handler kinds a component can be registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Builds nodes from XML elements.
    Decoder,
    /// Checks nodes and reports defects.
    Validator,
    /// Writes nodes into the output JSON.
    Encoder,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Decoder => "decoder",
            Self::Validator => "validator",
            Self::Encoder => "encoder",
        })
    }
}

/// Registry lookup key: a template identifier scoped to a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    /// Template the handler applies to.
    pub template: TemplateId,
    /// Program the handler is scoped to.
    pub program: Program,
}

impl ComponentKey {
    /// Create a new key.
    #[must_use]
    pub const fn new(template: TemplateId, program: Program) -> Self {
        Self { template, program }
    }

    /// Key scoped to every program.
    #[must_use]
    pub const fn generic(template: TemplateId) -> Self {
        Self::new(template, Program::All)
    }

    /// Key of the fallback decoder.
    #[must_use]
    pub const fn default_handler() -> Self {
        Self::generic(TemplateId::Default)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.template, self.program)
    }
}

/// Static registration metadata declared by a concrete handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Which registry the handler belongs in.
    pub kind: ComponentKind,
    /// Template the handler applies to.
    pub template: TemplateId,
    /// Program scope.
    pub program: Program,
}

impl Descriptor {
    /// Generic decoder descriptor.
    #[must_use]
    pub const fn decoder(template: TemplateId) -> Self {
        Self {
            kind: ComponentKind::Decoder,
            template,
            program: Program::All,
        }
    }

    /// Generic validator descriptor.
    #[must_use]
    pub const fn validator(template: TemplateId) -> Self {
        Self {
            kind: ComponentKind::Validator,
            template,
            program: Program::All,
        }
    }

    /// Generic encoder descriptor.
    #[must_use]
    pub const fn encoder(template: TemplateId) -> Self {
        Self {
            kind: ComponentKind::Encoder,
            template,
            program: Program::All,
        }
    }

    /// Narrow the descriptor to a program.
    #[must_use]
    pub const fn for_program(mut self, program: Program) -> Self {
        self.program = program;
        self
    }

    /// Registry key this descriptor binds.
    #[must_use]
    pub const fn key(&self) -> ComponentKey {
        ComponentKey::new(self.template, self.program)
    }
}

/// Handlers that declare where they should be registered.
///
/// This is the explicit stand-in for annotation scanning: discovery reads
/// `DESCRIPTORS` and binds every entry of the matching kind.
pub trait Described {
    /// Registration metadata, possibly for several templates.
    const DESCRIPTORS: &'static [Descriptor];
}
