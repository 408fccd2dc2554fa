//! # Caris converter - Caris line exports to CSV records
//!
//! Converts the plain-text line export of a Caris survey tool into
//! semicolon-delimited record blocks, one block per source line.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Source .txt │────▶│   Source    │────▶│  Transform  │────▶│ Output .csv │
//! │ (UTF8/1252) │     │ (auto-enc)  │     │ (records)   │     │ (; records) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use caris_converter::convert;
//!
//! let records = convert("12 345,6 (m) 78,9 (m) 1,0 (m) 2,5");
//! assert_eq!(records, vec!["1\n123456;789\n10;25\n"]);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Defaults and environment overrides
//! - [`source`] - Source reading with encoding auto-detection
//! - [`transform`] - Record conversion and pipeline
//! - [`output`] - Preview rendering and saving
//! - [`session`] - Current open/convert/save state
//! - [`api`] - HTTP preview server and log streaming

// Core modules
pub mod config;
pub mod error;

// Reading
pub mod source;

// Conversion
pub mod transform;

// Writing
pub mod output;

// Session
pub mod session;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{PipelineError, SaveError, ServerError, SessionError, SourceError};

// =============================================================================
// Re-exports - Conversion
// =============================================================================

pub use transform::{
    clean_line,
    convert,
    parse_records,
    split_tokens,
    Record,
    FIELD_MARKER,
};

pub use transform::pipeline::{convert_bytes, convert_file, convert_text, Conversion};

// =============================================================================
// Re-exports - Source / Output
// =============================================================================

pub use source::{decode_source, detect_encoding, read_source_file, SourceInfo, SourceText};

pub use output::{
    default_destination,
    destination_for,
    render_output,
    render_preview,
    resolve_destination,
    save_output,
    SavedOutput,
};

// =============================================================================
// Re-exports - Session / Config
// =============================================================================

pub use config::AppConfig;
pub use session::Session;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
