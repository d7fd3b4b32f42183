//! Encode stage: node tree to ordered QPP JSON.

mod engine;
mod handler;
mod wrapper;

pub use engine::{encode, EncodeEngine};
pub use handler::{boxed, EncodeFn, Encoder};
pub use wrapper::JsonWrapper;
