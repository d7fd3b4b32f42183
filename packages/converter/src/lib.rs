//! QPP Converter - Convert QRDA Category III documents to QPP submission JSON.
//!
//! A document is parsed into an XML element tree, decoded into a tree of
//! template-tagged [`model::Node`]s, validated, and encoded into a
//! [`encode::JsonWrapper`]. Every failure ends in one aggregated
//! [`model::AllErrors`] report.
//!
//! # Example
//!
//! ```
//! use qpp_converter::{Converter, StreamQrdaSource};
//!
//! let xml = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
//!     <templateId root="2.16.840.1.113883.10.20.27.1.1"/>
//! </ClinicalDocument>"#;
//!
//! let mut converter = Converter::new(StreamQrdaSource::from_bytes("report.xml", xml));
//! converter.context_mut().set_do_validation(false);
//!
//! let json = converter.transform().unwrap();
//! assert_eq!(json.get_string("entityType"), Some("group"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, limits and environment settings
//! - [`model`]: Template identifiers, programs, nodes and the error report
//! - [`registry`]: Keyed handler registries and discovery
//! - [`context`]: Program scope, toggles and handler resolution
//! - [`xml`]: XML utilities
//! - [`decode`]: Decoder trait and decode pipeline
//! - [`validate`]: Validator trait, checks and validate pipeline
//! - [`encode`]: Encoder trait, JSON wrapper and encode pipeline
//! - [`handlers`]: QRDA III decoders, validators and encoders
//! - [`measures`]: eCQM measure lookup
//! - [`source`]: Document sources
//! - [`converter`]: Conversion state machine
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod context;
pub mod converter;
pub mod decode;
pub mod encode;
pub mod error;
pub mod handlers;
pub mod measures;
pub mod model;
pub mod registry;
pub mod source;
pub mod validate;
pub mod xml;

// Re-export commonly used items
pub use config::ConverterConfig;
pub use context::Context;
pub use converter::{Converter, Stage};
pub use encode::JsonWrapper;
pub use error::{ConverterError, Result, TransformError};
pub use model::{AllErrors, Detail, Error, Node, Program, TemplateId};
pub use registry::{ComponentKey, Registries};
pub use source::{PathQrdaSource, QrdaSource, StreamQrdaSource};
