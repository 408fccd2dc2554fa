//! Transformation module.
//!
//! - Records: the pure line-to-record conversion
//! - Pipeline: open/decode/convert with logging

pub mod pipeline;
pub mod records;

pub use pipeline::*;
pub use records::{clean_line, convert, parse_records, split_tokens, Record, FIELD_MARKER};
