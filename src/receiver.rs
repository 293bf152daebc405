//! Response framing over an unframed byte stream.
//!
//! The OFS wire protocol carries no message-length prefix, so the client
//! must decide for itself when a response batch is complete. Two framing
//! heuristics are implemented behind one trait seam so a future
//! length-prefixed transport can be swapped in without touching calling
//! code:
//!
//! - [`IdleTimeoutReceiver`] treats a period of socket silence as the
//!   end-of-batch signal. This is inherently racy — a server pausing
//!   mid-record for longer than the window truncates the batch — and is a
//!   documented compatibility shim for the line-command server, which
//!   defines the wire format. The tokenizer's drop-malformed tolerance
//!   absorbs the truncation case.
//! - [`NewlineDelimitedReceiver`] terminates as soon as a newline byte is
//!   observed in a received chunk. The envelope server emits exactly one
//!   newline-terminated JSON object per request, making this the stricter,
//!   less racy framing.
//!
//! Both receivers enforce a hard byte cap to bound memory against a
//! misbehaving peer, decode permissively (undecodable sequences become
//! replacement characters — display fidelity matters more than strict
//! correctness here), and never fail: a mid-batch I/O error or peer close
//! returns whatever was buffered. Timeouts are scoped to each read call, so
//! no socket-wide timeout state needs restoring afterwards.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read granularity; one `recv` worth of bytes per loop iteration.
const READ_CHUNK: usize = 4096;

/// Byte stream a receiver can drain. Object-safe so receivers stay
/// swappable behind [`FrameReceiver`].
pub type ReceiverStream<'a> = &'a mut (dyn AsyncRead + Unpin + Send);

/// Strategy for deciding when one response batch is complete.
#[async_trait]
pub trait FrameReceiver: Send + Sync {
    /// Drain one response batch from `stream`.
    ///
    /// `window` bounds each individual read; `max_bytes` caps the batch. The
    /// final chunk is kept whole even when it straddles the cap, and no
    /// further reads are issued once the cap is reached.
    async fn receive(&self, stream: ReceiverStream<'_>, window: Duration, max_bytes: usize)
    -> String;
}

/// Idle-timeout framing: the batch ends when the server goes quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleTimeoutReceiver;

#[async_trait]
impl FrameReceiver for IdleTimeoutReceiver {
    async fn receive(
        &self,
        stream: ReceiverStream<'_>,
        window: Duration,
        max_bytes: usize,
    ) -> String {
        let buffer = accumulate(stream, window, max_bytes, |_| false).await;
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Newline framing: the batch ends with the first chunk carrying `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewlineDelimitedReceiver;

#[async_trait]
impl FrameReceiver for NewlineDelimitedReceiver {
    async fn receive(
        &self,
        stream: ReceiverStream<'_>,
        window: Duration,
        max_bytes: usize,
    ) -> String {
        let buffer = accumulate(stream, window, max_bytes, |chunk| {
            chunk.contains(&b'\n')
        })
        .await;
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Shared accumulation loop. Terminates on an elapsed read window, a
/// zero-length read (peer closed), the byte cap, a read error, or
/// `complete` returning true for the latest chunk.
async fn accumulate(
    stream: ReceiverStream<'_>,
    window: Duration,
    max_bytes: usize,
    complete: impl Fn(&[u8]) -> bool,
) -> BytesMut {
    let mut buffer = BytesMut::with_capacity(READ_CHUNK.min(max_bytes));
    let mut chunk = [0_u8; READ_CHUNK];
    while buffer.len() < max_bytes {
        match tokio::time::timeout(window, stream.read(&mut chunk)).await {
            // Window elapsed with no new bytes: the server is idle.
            Err(_elapsed) => break,
            // Peer closed; return what was buffered, not an error.
            Ok(Ok(0)) => break,
            Ok(Ok(read)) => {
                buffer.extend_from_slice(&chunk[..read]);
                if complete(&chunk[..read]) {
                    break;
                }
            }
            Ok(Err(error)) => {
                log::warn!("receive aborted after {} bytes: {error}", buffer.len());
                break;
            }
        }
    }
    buffer
}

#[cfg(test)]
mod tests;
