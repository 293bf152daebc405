//! Client engine for the OFS file service.
//!
//! This crate implements the protocol side of an OFS client: connection
//! lifecycle, response framing over an unframed byte stream, batch
//! tokenization, the content-upload handshake, and session tracking. It
//! deliberately contains no presentation logic — a terminal UI or REPL sits
//! on top of [`OfsClient`] and renders whatever the engine returns.
//!
//! Two wire shapes are supported behind the one facade, selected by
//! configuration:
//!
//! - [`WireShape::LineCommand`]: newline-terminated command lines with
//!   idle-window-framed responses of concatenated JSON-like records.
//! - [`WireShape::Envelope`]: one-line JSON requests with exactly one
//!   newline-terminated JSON reply each.
//!
//! # Examples
//!
//! ```no_run
//! use ofswire::OfsClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), ofswire::OfsError> {
//! let mut client = OfsClient::builder().host("127.0.0.1").port(8080).connect().await?;
//! if client.login("alice", "s3cret").await? {
//!     for entry in client.list("/").await? {
//!         println!("{} ({:?})", entry.name, entry.kind);
//!     }
//! }
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod receiver;
pub mod session;
pub mod tokenizer;
pub mod transport;

pub use client::{ClientConfig, DEFAULT_MAX_RESPONSE_BYTES, OfsClient, OfsClientBuilder, Timeouts};
pub use error::OfsError;
pub use protocol::{
    WireShape,
    envelope::{EnvelopeRequest, EnvelopeResponse},
    line::{LineCommand, ResponseMode, UploadReply},
};
pub use receiver::{FrameReceiver, IdleTimeoutReceiver, NewlineDelimitedReceiver};
pub use session::SessionState;
pub use tokenizer::{DirEntry, EntryKind, Record, dir_entries, parse_records};
pub use transport::{SocketOptions, Transport};
