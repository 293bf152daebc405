//! Envelope exchanges: one JSON request line, one newline-framed JSON
//! reply per exchange, over the persistent connection.

use serde_json::Value;

use super::OfsClient;
use crate::{
    error::OfsError,
    protocol::envelope::{EnvelopeRequest, EnvelopeResponse},
    receiver::{FrameReceiver, NewlineDelimitedReceiver},
};

impl OfsClient {
    /// Send one envelope request and decode its reply.
    ///
    /// # Errors
    ///
    /// Returns [`OfsError::NotConnected`] when lazy reconnection fails,
    /// [`OfsError::Transport`] when the send fails, [`OfsError::NoReply`]
    /// when the server produced no bytes before the deadline (the
    /// connection is closed in that case, since a half-finished exchange
    /// cannot be resumed), and [`OfsError::EnvelopeDecode`] when the reply
    /// is not a valid response object.
    pub(crate) async fn execute_envelope(
        &mut self,
        operation: &'static str,
        parameters: Value,
    ) -> Result<EnvelopeResponse, OfsError> {
        if !self.ensure_connected().await {
            return Err(OfsError::NotConnected);
        }
        let seq = self.session.next_request_seq();
        let request = EnvelopeRequest::new(operation, self.session.session_id(), parameters);
        let line = request.encode().map_err(OfsError::EnvelopeEncode)?;
        tracing::debug!(seq, operation, request_id = %request.request_id, "sending envelope");
        self.send_bytes(line.as_bytes()).await?;

        let deadline = self.config.timeouts.envelope_reply;
        let cap = self.config.max_response_bytes;
        let stream = self.transport.stream_mut()?;
        let text = NewlineDelimitedReceiver.receive(stream, deadline, cap).await;
        if text.is_empty() {
            self.fail_connection();
            return Err(OfsError::NoReply);
        }
        let response = EnvelopeResponse::decode(&text).map_err(OfsError::EnvelopeDecode)?;
        tracing::trace!(seq, status = %response.status, "envelope reply");
        Ok(response)
    }
}
