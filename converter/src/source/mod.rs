//! Source file reading with encoding auto-detection.
//!
//! Caris exports are UTF-8 by convention, but files touched by older Windows
//! tooling show up as Windows-1252 or UTF-16. Bytes are decoded to text and
//! line endings are normalised to `\n` before anything is converted.

use std::path::Path;

use crate::api::logs::log_warning;
use crate::error::{SourceError, SourceResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Metadata about an opened source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// File path or upload name
    pub origin: String,
    /// Encoding used to decode the bytes
    pub encoding: String,
    /// Size of the raw input
    pub byte_len: usize,
    /// Number of `\n`-delimited lines in the decoded text
    pub line_count: usize,
}

/// Decoded source text plus where it came from.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    pub info: SourceInfo,
}

impl SourceText {
    /// Wrap text that is already decoded.
    pub fn from_text(text: impl Into<String>, origin: impl Into<String>) -> Self {
        let text = normalize_newlines(&text.into());
        let info = SourceInfo {
            origin: origin.into(),
            encoding: "utf-8".to_string(),
            byte_len: text.len(),
            line_count: text.split('\n').count(),
        };
        Self { text, info }
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "utf-16le" | "utf-16" => "utf-16le".to_string(),
        "utf-16be" => "utf-16be".to_string(),
        _ => charset,
    }
}

/// Decode bytes with an explicit encoding label.
pub fn decode_content(bytes: &[u8], encoding: &str) -> SourceResult<String> {
    let label = encoding.trim().to_lowercase();
    if matches!(label.as_str(), "utf-8" | "utf8" | "ascii") {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        return String::from_utf8(bytes.to_vec())
            .map_err(|e| SourceError::Encoding(format!("invalid utf-8: {}", e)));
    }

    let codec = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| SourceError::Encoding(format!("unknown encoding '{}'", encoding)))?;
    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        log_warning(format!("Some bytes are not valid {}", codec.name()));
    }
    Ok(text.into_owned())
}

/// Decode bytes, preferring UTF-8 and falling back to chardet's guess.
///
/// Returns the text and the name of the encoding that was used.
pub fn decode_auto(bytes: &[u8]) -> (String, String) {
    let stripped = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(stripped) {
        return (text.to_string(), "utf-8".to_string());
    }

    let detected = detect_encoding(bytes);
    match decode_content(bytes, &detected) {
        Ok(text) => (text, detected),
        Err(_) => {
            log_warning(format!("Unsupported encoding '{}', decoding as lossy utf-8", detected));
            (String::from_utf8_lossy(stripped).into_owned(), "utf-8".to_string())
        }
    }
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode uploaded or already-read bytes into [`SourceText`].
///
/// `encoding` forces a decoder; `None` auto-detects.
pub fn decode_source(
    bytes: &[u8],
    origin: impl Into<String>,
    encoding: Option<&str>,
) -> SourceResult<SourceText> {
    let (raw, used) = match encoding {
        Some(label) => (decode_content(bytes, label)?, label.trim().to_lowercase()),
        None => decode_auto(bytes),
    };

    let text = normalize_newlines(&raw);
    let info = SourceInfo {
        origin: origin.into(),
        encoding: used,
        byte_len: bytes.len(),
        line_count: text.split('\n').count(),
    };

    Ok(SourceText { text, info })
}

/// Read and decode a source file.
///
/// # Example
/// ```ignore
/// let source = read_source_file("survey_lines.txt", None)?;
/// println!("{} lines ({})", source.info.line_count, source.info.encoding);
/// ```
pub fn read_source_file<P: AsRef<Path>>(path: P, encoding: Option<&str>) -> SourceResult<SourceText> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || path.is_dir() {
        return Err(SourceError::NotSelected);
    }
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    decode_source(&bytes, path.display().to_string(), encoding)
}
