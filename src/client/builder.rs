//! Builder for configuring and connecting an OFS client.

use std::time::Duration;

use super::{ClientConfig, OfsClient, Timeouts};
use crate::{
    error::OfsError,
    protocol::WireShape,
    session::SessionState,
    transport::Transport,
};

/// Builder for [`OfsClient`].
///
/// # Examples
///
/// ```no_run
/// use ofswire::{OfsClient, WireShape};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ofswire::OfsError> {
/// let mut client = OfsClient::builder()
///     .host("127.0.0.1")
///     .port(8080)
///     .shape(WireShape::LineCommand)
///     .connect()
///     .await?;
/// let ok = client.login("alice", "s3cret").await?;
/// # let _ = ok;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OfsClientBuilder {
    config: ClientConfig,
}

impl OfsClientBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Set the server hostname or address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Select the wire shape this deployment speaks.
    #[must_use]
    pub fn shape(mut self, shape: WireShape) -> Self {
        self.config.shape = shape;
        self
    }

    /// Replace all exchange timing values.
    #[must_use]
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    /// Override the receive-cycle byte cap.
    #[must_use]
    pub fn max_response_bytes(mut self, cap: usize) -> Self {
        self.config.max_response_bytes = cap;
        self
    }

    /// Configure `TCP_NODELAY`.
    #[must_use]
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.socket_options = self.config.socket_options.nodelay(enabled);
        self
    }

    /// Configure `SO_KEEPALIVE`.
    #[must_use]
    pub fn keepalive(mut self, idle: Option<Duration>) -> Self {
        self.config.socket_options = self.config.socket_options.keepalive(idle);
        self
    }

    /// Finish the builder without dialling; the first operation will
    /// connect lazily.
    #[must_use]
    pub fn build(self) -> OfsClient {
        let transport = Transport::new(
            self.config.host.clone(),
            self.config.port,
            self.config.socket_options,
        );
        OfsClient {
            config: self.config,
            transport,
            session: SessionState::new(),
        }
    }

    /// Finish the builder and establish the connection eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`OfsError::Connect`] or [`OfsError::ConnectTimeout`] if the
    /// server cannot be reached.
    pub async fn connect(self) -> Result<OfsClient, OfsError> {
        let mut client = self.build();
        client.connect().await?;
        Ok(client)
    }
}
