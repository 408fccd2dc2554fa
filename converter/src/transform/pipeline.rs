//! High-level pipeline API: open, decode, convert.
//!
//! # Example
//!
//! ```rust,ignore
//! use caris_converter::transform::pipeline::convert_file;
//! use std::path::Path;
//!
//! let conversion = convert_file(Path::new("lines.txt"), None)?;
//! println!("{}", conversion.preview());
//! ```

use std::path::Path;

use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::PipelineResult;
use crate::output::{render_output, render_preview};
use crate::source::{decode_source, read_source_file, SourceInfo, SourceText};
use super::records::convert;

/// Result of converting one source.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Decoded, newline-normalised source text
    pub source: String,
    /// Rendered record blocks, one per source line
    pub records: Vec<String>,
    /// Source metadata
    pub info: SourceInfo,
}

impl Conversion {
    /// Preview text as shown to the user.
    pub fn preview(&self) -> String {
        render_preview(&self.records)
    }

    /// Exact payload a save writes.
    pub fn output(&self) -> String {
        render_output(&self.records)
    }
}

/// Read a file and convert it.
pub fn convert_file(path: &Path, encoding: Option<&str>) -> PipelineResult<Conversion> {
    log_info(format!("📖 Reading {}", path.display()));
    let source = read_source_file(path, encoding)?;
    Ok(convert_source(source))
}

/// Decode bytes (e.g. an upload) and convert them.
pub fn convert_bytes(bytes: &[u8], origin: &str, encoding: Option<&str>) -> PipelineResult<Conversion> {
    log_info(format!("📖 Decoding {} ({} bytes)", origin, bytes.len()));
    let source = decode_source(bytes, origin, encoding)?;
    Ok(convert_source(source))
}

/// Convert text that is already in memory.
pub fn convert_text(text: &str, origin: &str) -> Conversion {
    convert_source(SourceText::from_text(text, origin))
}

fn convert_source(source: SourceText) -> Conversion {
    let SourceText { text, info } = source;

    log_success(format!("Encoding: {}", info.encoding));
    log_info_indent(format!("{} lines", info.line_count), 1);
    if text.ends_with('\n') {
        log_warning("Source ends with a newline; the last record is empty");
    }

    log_info("⚙️  Converting lines...");
    let records = convert(&text);
    log_success(format!("{} records", records.len()));

    Conversion {
        source: text,
        records,
        info,
    }
}
