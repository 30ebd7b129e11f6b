//! Typed signaling exchange on top of a [`Client`].

use std::time::Duration;

use super::{
    client::Client,
    error::SignalingError,
    message::{MessageKind, SignalMessage},
};

impl Client {
    pub async fn send_message(&self, message: &SignalMessage) -> Result<(), SignalingError> {
        self.send(message.encode()).await?;
        Ok(())
    }

    pub async fn receive_message(&self) -> Result<SignalMessage, SignalingError> {
        let raw = self.receive().await?;
        SignalMessage::decode(&raw)
    }

    /// Receive until a message of `expected` kind arrives.
    ///
    /// `hold` messages are skipped; any other kind is a protocol error.
    pub async fn receive_expected(
        &self,
        expected: MessageKind,
        timeout: Option<Duration>,
    ) -> Result<SignalMessage, SignalingError> {
        match timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.receive_until(expected))
                .await
                .map_err(|_| SignalingError::RelayTimeout { expected, timeout })?,
            None => self.receive_until(expected).await,
        }
    }

    async fn receive_until(&self, expected: MessageKind) -> Result<SignalMessage, SignalingError> {
        loop {
            let message = self.receive_message().await?;
            match message.kind {
                MessageKind::Hold => {
                    tracing::debug!("Client {} is holding", self.id());
                }
                kind if kind == expected => return Ok(message),
                received => {
                    return Err(SignalingError::UnexpectedMessageKind { expected, received });
                }
            }
        }
    }
}
