//! Value types for ROI-DSL output documents

pub mod value;

pub use value::{Map, Value};
