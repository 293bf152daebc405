//! Socket ownership and connection lifecycle.
//!
//! [`Transport`] exclusively owns the TCP stream for one client instance.
//! Exchanges are strictly serialized by the caller holding `&mut` access, so
//! no lock is needed: the borrow checker enforces the single in-flight
//! exchange invariant.

use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;

use crate::{
    error::OfsError,
    receiver::{FrameReceiver, IdleTimeoutReceiver},
};

/// Socket options applied to each freshly connected stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SocketOptions {
    nodelay: Option<bool>,
    keepalive: Option<Duration>,
}

impl SocketOptions {
    /// Configure `TCP_NODELAY`. Request lines are small; disabling Nagle
    /// keeps the prompt phase of the upload handshake snappy.
    #[must_use]
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.nodelay = Some(enabled);
        self
    }

    /// Configure `SO_KEEPALIVE` with the given idle time.
    #[must_use]
    pub fn keepalive(mut self, idle: Option<Duration>) -> Self {
        self.keepalive = idle;
        self
    }

    fn apply(self, stream: &TcpStream) -> std::io::Result<()> {
        let sock = SockRef::from(stream);
        if let Some(enabled) = self.nodelay {
            sock.set_tcp_nodelay(enabled)?;
        }
        if let Some(idle) = self.keepalive {
            sock.set_tcp_keepalive(&TcpKeepalive::new().with_time(idle))?;
        }
        Ok(())
    }
}

/// Owner of the connection to the OFS server.
///
/// At most one connection is alive per transport; [`Transport::connect`]
/// replaces any prior stream (dropping it first, so descriptors never leak)
/// and [`Transport::close`] is idempotent.
#[derive(Debug)]
pub struct Transport {
    host: String,
    port: u16,
    options: SocketOptions,
    stream: Option<TcpStream>,
}

impl Transport {
    /// Create a disconnected transport for `host:port`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, options: SocketOptions) -> Self {
        Self {
            host: host.into(),
            port,
            options,
            stream: None,
        }
    }

    /// Host this transport dials.
    #[must_use]
    pub fn host(&self) -> &str { &self.host }

    /// Port this transport dials.
    #[must_use]
    pub const fn port(&self) -> u16 { self.port }

    /// Whether a stream is currently held.
    ///
    /// A held stream may still be dead on the wire; liveness is only
    /// discovered by the next exchange.
    #[must_use]
    pub const fn is_connected(&self) -> bool { self.stream.is_some() }

    /// Establish a fresh connection, replacing any prior one.
    ///
    /// After connecting, one short bounded read (`greeting_window`) drains
    /// any server greeting so it cannot be mistaken for the first response.
    ///
    /// # Errors
    ///
    /// Returns [`OfsError::ConnectTimeout`] if the dial exceeds
    /// `connect_timeout` and [`OfsError::Connect`] for refused connections,
    /// name-resolution failures, or socket-option failures.
    pub async fn connect(
        &mut self,
        connect_timeout: Duration,
        greeting_window: Duration,
        max_greeting_bytes: usize,
    ) -> Result<(), OfsError> {
        // Drop any prior stream before dialling.
        self.stream = None;

        let dial = TcpStream::connect((self.host.as_str(), self.port));
        let mut stream = match tokio::time::timeout(connect_timeout, dial).await {
            Err(_elapsed) => {
                return Err(OfsError::ConnectTimeout {
                    host: self.host.clone(),
                    port: self.port,
                });
            }
            Ok(Err(source)) => {
                return Err(OfsError::Connect {
                    host: self.host.clone(),
                    port: self.port,
                    source,
                });
            }
            Ok(Ok(stream)) => stream,
        };
        self.options.apply(&stream).map_err(|source| OfsError::Connect {
            host: self.host.clone(),
            port: self.port,
            source,
        })?;

        let greeting = IdleTimeoutReceiver
            .receive(&mut stream, greeting_window, max_greeting_bytes)
            .await;
        if !greeting.is_empty() {
            log::debug!(
                "server greeting ({} bytes): {:?}",
                greeting.len(),
                greeting.trim_end()
            );
        }

        self.stream = Some(stream);
        Ok(())
    }

    /// Release the socket. Safe to call repeatedly.
    pub fn close(&mut self) { self.stream = None; }

    /// Reconnect lazily if no stream is held.
    ///
    /// Returns `false` instead of an error on failure so callers can degrade
    /// gracefully; the failure itself is logged.
    pub async fn ensure_connected(
        &mut self,
        connect_timeout: Duration,
        greeting_window: Duration,
        max_greeting_bytes: usize,
    ) -> bool {
        if self.stream.is_some() {
            return true;
        }
        match self
            .connect(connect_timeout, greeting_window, max_greeting_bytes)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                log::warn!("lazy reconnect failed: {error}");
                false
            }
        }
    }

    /// Borrow the live stream for an exchange.
    ///
    /// # Errors
    ///
    /// Returns [`OfsError::NotConnected`] if no stream is held.
    pub(crate) fn stream_mut(&mut self) -> Result<&mut TcpStream, OfsError> {
        self.stream.as_mut().ok_or(OfsError::NotConnected)
    }
}
