//! Client configuration and tuning constants.

use std::time::Duration;

use crate::{protocol::WireShape, transport::SocketOptions};

/// Hard cap on bytes collected per receive cycle.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Idle windows and deadlines for each phase of an exchange.
///
/// The single/multi windows are the idle-framing heuristic's tuning knobs:
/// every receive waits out its window even when the server is already done,
/// so they trade latency against truncation risk. The defaults match the
/// counterpart server's observed pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Deadline for establishing the TCP connection.
    pub connect: Duration,
    /// Idle window for draining the server greeting after connect.
    pub greeting: Duration,
    /// Idle window for single-response commands.
    pub single_response: Duration,
    /// Idle window for multi-response commands (directory and user
    /// listings), which must wait for the whole batch.
    pub multi_response: Duration,
    /// Idle window for the upload handshake's informational prompt.
    pub upload_prompt: Duration,
    /// Idle window for the upload handshake's final result.
    pub upload_result: Duration,
    /// Per-read deadline for the envelope shape's newline-framed reply.
    pub envelope_reply: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            greeting: Duration::from_millis(250),
            single_response: Duration::from_millis(200),
            multi_response: Duration::from_millis(400),
            upload_prompt: Duration::from_millis(500),
            upload_result: Duration::from_millis(600),
            envelope_reply: Duration::from_secs(5),
        }
    }
}

/// Full configuration for an [`crate::OfsClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server hostname or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Wire shape this deployment speaks.
    pub shape: WireShape,
    /// Exchange timing.
    pub timeouts: Timeouts,
    /// Receive-cycle byte cap.
    pub max_response_bytes: usize,
    /// Socket options applied on connect.
    pub socket_options: SocketOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            shape: WireShape::default(),
            timeouts: Timeouts::default(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            socket_options: SocketOptions::default(),
        }
    }
}
