//! The JSON envelope wire shape.
//!
//! Each request is one JSON object on a single line; each reply is exactly
//! one JSON object terminated by the first newline. Requests carry a
//! session token and a UUID request identifier — exchanges are strictly
//! serialized, so the identifier exists for server-side logging, not for
//! response correlation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Operation names understood by the envelope server.
pub mod ops {
    /// Authenticate and obtain a session token.
    pub const USER_LOGIN: &str = "user_login";
    /// Discard the session token.
    pub const USER_LOGOUT: &str = "user_logout";
    /// Create a file with inline content.
    pub const FILE_CREATE: &str = "file_create";
    /// Read a file's content.
    pub const FILE_READ: &str = "file_read";
    /// Delete a file.
    pub const FILE_DELETE: &str = "file_delete";
    /// Create a directory.
    pub const DIR_CREATE: &str = "dir_create";
    /// List a directory.
    pub const DIR_LIST: &str = "dir_list";
    /// Fetch file-system statistics.
    pub const GET_STATS: &str = "get_stats";
}

/// Status value marking a successful reply.
pub const STATUS_SUCCESS: &str = "success";

/// One outbound envelope request.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeRequest {
    /// Operation name from [`ops`].
    pub operation: String,
    /// Session token from the last login, or empty when anonymous.
    pub session_id: String,
    /// Fresh UUIDv4 identifying this request in server logs.
    pub request_id: String,
    /// Operation-specific parameter object.
    pub parameters: Value,
}

impl EnvelopeRequest {
    /// Build a request with a freshly generated identifier.
    #[must_use]
    pub fn new(operation: &str, session_id: Option<&str>, parameters: Value) -> Self {
        Self {
            operation: operation.to_owned(),
            session_id: session_id.unwrap_or_default().to_owned(),
            request_id: Uuid::new_v4().to_string(),
            parameters,
        }
    }

    /// Render the newline-terminated request line.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn encode(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// One inbound envelope reply.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeResponse {
    /// `"success"` or a server-defined failure status.
    pub status: String,
    /// Operation-specific result object; absent on failures.
    #[serde(default)]
    pub data: Value,
    /// Human-readable failure description; empty on success.
    #[serde(default)]
    pub error_message: String,
}

impl EnvelopeResponse {
    /// Whether the server reported success.
    #[must_use]
    pub fn is_success(&self) -> bool { self.status == STATUS_SUCCESS }

    /// Decode a reply from received text, considering only the first line.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the first line is not a
    /// valid response object.
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        let first_line = text.split('\n').next().unwrap_or_default();
        serde_json::from_str(first_line)
    }

    /// String field of the `data` object, if present.
    #[must_use]
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}
