//! The client facade composing transport, framing, protocol, and session.
//!
//! [`OfsClient`] is the surface a presentation layer (TUI, REPL, scripting)
//! calls: named logical operations that map onto one of the two wire shapes
//! depending on configuration. Operations take `&mut self`, which statically
//! serializes exchanges — the protocol is strictly half-duplex
//! request-then-response, so responses always correspond to the immediately
//! preceding request.

use crate::{error::OfsError, session::SessionState, transport::Transport};

mod builder;
mod config;
mod envelope_exchange;
mod line_exchange;
mod ops;

pub use builder::OfsClientBuilder;
pub use config::{ClientConfig, DEFAULT_MAX_RESPONSE_BYTES, Timeouts};

/// Client for the OFS file service.
#[derive(Debug)]
pub struct OfsClient {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Transport,
    pub(crate) session: SessionState,
}

impl OfsClient {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> OfsClientBuilder { OfsClientBuilder::new() }

    /// Inspect the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig { &self.config }

    /// Inspect the session (login status, username, session token).
    #[must_use]
    pub const fn session(&self) -> &SessionState { &self.session }

    /// Whether a connection is currently held.
    #[must_use]
    pub const fn is_connected(&self) -> bool { self.transport.is_connected() }

    /// Establish a fresh connection, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns [`OfsError::Connect`] or [`OfsError::ConnectTimeout`] when
    /// the server cannot be reached. Connect failures are never retried
    /// automatically.
    pub async fn connect(&mut self) -> Result<(), OfsError> {
        let timeouts = self.config.timeouts;
        self.transport
            .connect(
                timeouts.connect,
                timeouts.greeting,
                self.config.max_response_bytes,
            )
            .await
    }

    /// Close the connection and reset the session to anonymous.
    ///
    /// Idempotent; safe to call on an already disconnected client.
    pub fn disconnect(&mut self) {
        self.transport.close();
        self.session.clear();
    }

    /// Reconnect lazily if no connection is held, returning a success flag
    /// rather than an error so callers can degrade gracefully.
    pub async fn ensure_connected(&mut self) -> bool {
        let timeouts = self.config.timeouts;
        self.transport
            .ensure_connected(
                timeouts.connect,
                timeouts.greeting,
                self.config.max_response_bytes,
            )
            .await
    }

    /// Close the connection and tear down the session, telling a
    /// line-command server goodbye first.
    pub async fn shutdown(mut self) {
        if self.is_connected() && self.config.shape == crate::protocol::WireShape::LineCommand {
            // Best effort; the connection is going away either way.
            if let Err(error) = self
                .execute_line(&crate::protocol::line::LineCommand::Exit)
                .await
            {
                log::debug!("EXIT on shutdown failed: {error}");
            }
        }
        self.disconnect();
    }

    /// Close the connection and clear the session after a mid-exchange
    /// failure. The caller may reconnect and retry at its discretion.
    pub(crate) fn fail_connection(&mut self) {
        log::warn!("closing connection after transport failure");
        self.disconnect();
    }
}
