//! Core data types: template identifiers, programs, the node tree and the
//! error report.

mod node;
mod program;
mod report;
mod template_id;

pub use node::{Node, ParentRef};
pub use program::Program;
pub use report::{AllErrors, Detail, Error};
pub use template_id::TemplateId;
