//! Validate stage: exhaustive defect collection over the node tree.

mod checker;
mod engine;
mod handler;

pub use checker::Checker;
pub use engine::{validate, ValidateEngine};
pub use handler::{boxed, Validator};
