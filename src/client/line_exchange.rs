//! Line-command exchanges: request/response cycles and the content-upload
//! handshake.

use tokio::io::AsyncWriteExt;

use super::OfsClient;
use crate::{
    error::OfsError,
    protocol::line::{LineCommand, ResponseMode, SUCCESS_MARKER, UploadReply, frame_upload_payload},
    receiver::{FrameReceiver, IdleTimeoutReceiver},
};

impl OfsClient {
    /// Send one command line and collect its response batch.
    ///
    /// The idle window is chosen from the command's static classification:
    /// listing commands wait longer so the whole multi-record batch
    /// arrives.
    ///
    /// # Errors
    ///
    /// Returns [`OfsError::NotConnected`] when lazy reconnection fails and
    /// [`OfsError::Transport`] when the send fails; in the latter case the
    /// connection has been closed and the session cleared.
    pub(crate) async fn execute_line(&mut self, command: &LineCommand) -> Result<String, OfsError> {
        if !self.ensure_connected().await {
            return Err(OfsError::NotConnected);
        }
        let seq = self.session.next_request_seq();
        tracing::debug!(seq, verb = command.verb(), "sending command line");
        self.send_bytes(command.encode().as_bytes()).await?;

        let window = match command.response_mode() {
            ResponseMode::Single => self.config.timeouts.single_response,
            ResponseMode::Multi => self.config.timeouts.multi_response,
        };
        let cap = self.config.max_response_bytes;
        let stream = self.transport.stream_mut()?;
        let text = IdleTimeoutReceiver.receive(stream, window, cap).await;
        tracing::trace!(seq, bytes = text.len(), "response batch collected");
        Ok(text)
    }

    /// Send a command line and check the reply for the acknowledgement
    /// marker.
    pub(crate) async fn execute_line_acknowledged(
        &mut self,
        command: &LineCommand,
    ) -> Result<bool, OfsError> {
        let reply = self.execute_line(command).await?;
        Ok(reply.contains(SUCCESS_MARKER))
    }

    /// Run the content-upload handshake for `CREATE` and `EDIT`.
    ///
    /// Sequence: command line → informational prompt (drained and logged) →
    /// payload with exactly one trailing newline → sentinel line → final
    /// result. An empty final read yields [`UploadReply::PromptOnly`] and a
    /// warning; partial uploads are never retried here — the caller must
    /// re-issue the whole operation.
    ///
    /// # Errors
    ///
    /// Any socket failure aborts the handshake, closes the connection,
    /// clears the session, and surfaces as [`OfsError::Transport`].
    pub(crate) async fn execute_line_with_content(
        &mut self,
        command: &LineCommand,
        content: &str,
    ) -> Result<UploadReply, OfsError> {
        if !self.ensure_connected().await {
            return Err(OfsError::NotConnected);
        }
        let seq = self.session.next_request_seq();
        tracing::debug!(seq, verb = command.verb(), "starting upload handshake");
        self.send_bytes(command.encode().as_bytes()).await?;

        let timeouts = self.config.timeouts;
        let cap = self.config.max_response_bytes;

        let stream = self.transport.stream_mut()?;
        let prompt = IdleTimeoutReceiver
            .receive(stream, timeouts.upload_prompt, cap)
            .await;
        tracing::debug!(seq, prompt = %prompt.trim_end(), "upload prompt");

        self.send_bytes(&frame_upload_payload(content)).await?;

        let stream = self.transport.stream_mut()?;
        let reply = IdleTimeoutReceiver
            .receive(stream, timeouts.upload_result, cap)
            .await;
        if reply.is_empty() {
            // Diagnostic fallback, not a success signal.
            tracing::warn!(seq, verb = command.verb(), "upload produced no final result");
            return Ok(UploadReply::PromptOnly { prompt });
        }
        let acknowledged = reply.contains(SUCCESS_MARKER);
        Ok(UploadReply::Completed {
            acknowledged,
            reply,
        })
    }

    /// Write raw bytes, closing the connection on failure.
    pub(crate) async fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), OfsError> {
        let stream = self.transport.stream_mut()?;
        if let Err(error) = stream.write_all(bytes).await {
            self.fail_connection();
            return Err(OfsError::Transport(error));
        }
        Ok(())
    }
}
