//! Decode stage: QRDA elements to the intermediate node tree.

mod engine;
mod handler;

pub use engine::{decode, DecodeEngine};
pub use handler::{boxed, DecodeResult, Decoder};
pub use roxmltree::Node as Element;
