//! REST API types for browser preview clients.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::pipeline::Conversion;

/// Response sent after a source upload is converted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready" or "error"
    pub status: String,

    /// Record blocks, one per source line
    pub records: Vec<String>,

    /// Text to show in the preview pane
    pub preview: String,

    /// Exact content of the file a save would write
    pub output: String,

    /// Metadata about the conversion
    pub metadata: ConvertMetadata,
}

/// Metadata about the converted source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertMetadata {
    pub origin: String,
    pub encoding: String,
    pub byte_length: usize,
    pub line_count: usize,
    pub record_count: usize,
    /// RFC 3339 timestamp
    pub converted_at: String,
}

impl From<Conversion> for ConvertResponse {
    fn from(conversion: Conversion) -> Self {
        let preview = conversion.preview();
        let output = conversion.output();
        let Conversion { records, info, .. } = conversion;

        ConvertResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "ready".to_string(),
            metadata: ConvertMetadata {
                origin: info.origin,
                encoding: info.encoding,
                byte_length: info.byte_len,
                line_count: info.line_count,
                record_count: records.len(),
                converted_at: Utc::now().to_rfc3339(),
            },
            records,
            preview,
            output,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "records": [],
        "preview": "",
        "output": ""
    })
}
