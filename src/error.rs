//! Canonical error type for the OFS client engine.
//!
//! The taxonomy mirrors the recovery options available to callers: connect
//! failures are terminal for the attempt and never retried automatically,
//! transport failures close the connection and clear the session before
//! surfacing, and envelope codec failures identify a reply the server sent
//! but the client could not interpret. Framing ambiguity (an idle window
//! elapsing mid-record, or the receive cap truncating a batch) is not an
//! error at this level; the tokenizer's drop-malformed policy absorbs it.

use std::io;

/// Errors emitted by [`crate::OfsClient`] and the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum OfsError {
    /// The TCP connect failed (refused, unreachable, or name resolution).
    #[error("connect to {host}:{port} failed: {source}")]
    Connect {
        /// Host the connect was attempted against.
        host: String,
        /// Port the connect was attempted against.
        port: u16,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
    /// The TCP connect did not complete within the configured timeout.
    #[error("connect to {host}:{port} timed out")]
    ConnectTimeout {
        /// Host the connect was attempted against.
        host: String,
        /// Port the connect was attempted against.
        port: u16,
    },
    /// An operation required a live connection and lazy reconnection failed.
    #[error("not connected to the server")]
    NotConnected,
    /// A socket operation failed mid-exchange. The engine has already closed
    /// the connection and cleared the session when this is returned.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    /// The server produced no bytes at all for an envelope request.
    #[error("no reply from server")]
    NoReply,
    /// The envelope request could not be serialized.
    #[error("failed to encode envelope request")]
    EnvelopeEncode(#[source] serde_json::Error),
    /// The envelope reply was not a valid JSON response object.
    #[error("failed to decode envelope reply")]
    EnvelopeDecode(#[source] serde_json::Error),
    /// The server answered a value-producing envelope operation with a
    /// failure status. A plain failure, not a protocol violation.
    #[error("server rejected {operation}: {message}")]
    Rejected {
        /// Operation the server refused.
        operation: &'static str,
        /// Server-supplied failure description.
        message: String,
    },
    /// The configured wire shape cannot express the requested operation.
    ///
    /// The two wire shapes are not interchangeable; rather than silently
    /// guessing, operations outside the envelope shape's vocabulary are
    /// rejected.
    #[error("operation {0} is not supported by the envelope protocol")]
    UnsupportedOperation(&'static str),
}
