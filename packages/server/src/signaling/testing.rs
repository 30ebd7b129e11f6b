//! In-memory transport used by the signaling unit tests.

use std::{io, time::Duration};

use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;

use super::{Client, SignalMessage};

pub(crate) const TIMEOUT: Duration = Duration::from_secs(2);

/// The browser side of a [`Client`] created by [`test_client`].
pub(crate) struct TestPeer {
    to_server: UnboundedSender<Result<String, io::Error>>,
    from_server: UnboundedReceiver<String>,
}

pub(crate) fn test_client() -> (Client, TestPeer) {
    let (to_server_tx, to_server_rx) = mpsc::unbounded::<Result<String, io::Error>>();
    let (from_server_tx, from_server_rx) = mpsc::unbounded::<String>();
    let client = Client::spawn(from_server_tx, to_server_rx);
    let peer = TestPeer {
        to_server: to_server_tx,
        from_server: from_server_rx,
    };
    (client, peer)
}

impl TestPeer {
    pub(crate) fn push_raw(&self, raw: &str) {
        let _ = self.to_server.unbounded_send(Ok(raw.to_string()));
    }

    pub(crate) fn send(&self, message: &SignalMessage) {
        self.push_raw(&message.encode());
    }

    /// Make the next read on the server side fail.
    pub(crate) fn fail_read(&self, reason: &str) {
        let _ = self
            .to_server
            .unbounded_send(Err(io::Error::other(reason.to_string())));
    }

    /// End the inbound stream, as a browser closing its socket would.
    pub(crate) fn disconnect(&self) {
        self.to_server.close_channel();
    }

    /// Make every further write on the server side fail.
    pub(crate) fn break_write(&mut self) {
        self.from_server.close();
    }

    /// Next frame written by the server, `None` once the server closed the socket.
    pub(crate) async fn next_raw(&mut self) -> Option<String> {
        tokio::time::timeout(TIMEOUT, self.from_server.next())
            .await
            .expect("timed out waiting for a frame from the server")
    }

    pub(crate) async fn next_message(&mut self) -> SignalMessage {
        let raw = self
            .next_raw()
            .await
            .expect("server closed the socket unexpectedly");
        SignalMessage::decode(&raw).expect("server sent an illegal message")
    }

    /// Assert that nothing is written to this peer for a short while.
    pub(crate) async fn assert_silent(&mut self) {
        let next = tokio::time::timeout(Duration::from_millis(100), self.from_server.next()).await;
        assert!(next.is_err(), "unexpected frame from the server: {next:?}");
    }
}
