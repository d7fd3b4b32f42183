//! Handler registry system.
//!
//! Decoders, validators and encoders are bound under a
//! [`ComponentKey`] (template identifier plus program). Handlers declare their
//! keys statically through [`Described`]; [`Registries::discover`] binds every
//! built-in handler once at startup.

mod config;
mod core;
mod types;

pub use config::{
    create_decoder_registry, create_encoder_registry, create_validator_registry, Registries,
};
pub use core::{Factory, Registry};
pub use types::{ComponentKey, ComponentKind, Described, Descriptor};
