//! Shared utilities for integration tests: ephemeral listeners, shortened
//! exchange timing, and line-oriented reads for mock servers.

#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::{net::SocketAddr, time::Duration};

use ofswire::{OfsClientBuilder, Timeouts, WireShape};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::{TcpListener, TcpStream},
};

/// Boxed-error result alias for test functions.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Bind a listener to a free local port.
pub async fn bind() -> TestResult<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

/// Exchange timing shortened to keep the suite fast while preserving the
/// ordering between the windows (single < multi < prompt < result).
pub fn test_timeouts() -> Timeouts {
    Timeouts {
        connect: Duration::from_secs(2),
        greeting: Duration::from_millis(100),
        single_response: Duration::from_millis(100),
        multi_response: Duration::from_millis(150),
        upload_prompt: Duration::from_millis(150),
        upload_result: Duration::from_millis(200),
        envelope_reply: Duration::from_millis(300),
    }
}

/// Builder pre-configured for a mock server at `addr`.
pub fn client_for(addr: SocketAddr, shape: WireShape) -> OfsClientBuilder {
    ofswire::OfsClient::builder()
        .host(addr.ip().to_string())
        .port(addr.port())
        .shape(shape)
        .timeouts(test_timeouts())
}

/// Read one `\n`-terminated line from a mock server's accepted stream.
pub async fn read_line(reader: &mut BufReader<TcpStream>) -> TestResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    Ok(line)
}
