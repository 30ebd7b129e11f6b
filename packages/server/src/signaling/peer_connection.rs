//! Signaling engine of a room.
//!
//! The two earliest-joined connections are paired: the earlier one becomes the
//! sender and is asked for an offer, the other one is the receiver and answers
//! it. Everybody else waits. When a paired connection leaves, the engine pairs
//! again from the join order, so the next waiting connection moves up.
//!
//! The relay runs inline in whichever task triggered it (a join or a
//! departure) and is serialized per engine by the `roles` mutex.
//!
//! Once the engine has been found empty it is retired under that same mutex
//! and rejects every later join, so a join racing the last departure never
//! lands in an engine its owner has already dropped.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::Mutex as AsyncMutex;

use super::{
    client::{Client, ConnectionId},
    client_list::ClientList,
    error::{EngineRetired, SignalingError},
    message::{MessageKind, SignalMessage},
};

static NEXT_PEER_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Tunables of the signaling engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalingConfig {
    /// Upper bound for each wait on a peer during the relay. `None` waits forever.
    pub relay_timeout: Option<Duration>,
}

#[derive(Default)]
struct Roles {
    sender: Option<Client>,
    receiver: Option<Client>,
    retired: bool,
}

impl Roles {
    fn is_full(&self) -> bool {
        self.sender.is_some() && self.receiver.is_some()
    }

    fn is_vacant(&self) -> bool {
        self.sender.is_none() && self.receiver.is_none()
    }

    /// Clear the role held by `id`, returning whether it held one.
    fn release(&mut self, id: ConnectionId) -> bool {
        let mut released = false;
        if self.sender.as_ref().is_some_and(|c| c.id() == id) {
            self.sender = None;
            released = true;
        }
        if self.receiver.as_ref().is_some_and(|c| c.id() == id) {
            self.receiver = None;
            released = true;
        }
        released
    }

    fn clear(&mut self) {
        self.sender = None;
        self.receiver = None;
    }
}

type EmptyCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Pairs connections of one room and relays their offer/answer exchange.
pub struct PeerConnection {
    id: u64,
    clients: ClientList,
    roles: AsyncMutex<Roles>,
    on_empty: EmptyCallback,
    config: SignalingConfig,
}

impl PeerConnection {
    pub fn new(config: SignalingConfig) -> Self {
        Self {
            id: NEXT_PEER_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            clients: ClientList::new(),
            roles: AsyncMutex::new(Roles::default()),
            on_empty: Box::new(|| {}),
            config,
        }
    }

    /// Set the callback run when the last connection has left.
    pub fn with_on_empty<F>(mut self, on_empty: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_empty = Box::new(on_empty);
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of attached connections, including the waiting ones.
    pub fn connection_count(&self) -> usize {
        self.clients.size()
    }

    /// Ids of the current sender and receiver.
    ///
    /// Waits for a relay in progress to finish.
    pub async fn pair_ids(&self) -> (Option<ConnectionId>, Option<ConnectionId>) {
        let roles = self.roles.lock().await;
        (
            roles.sender.as_ref().map(Client::id),
            roles.receiver.as_ref().map(Client::id),
        )
    }

    /// Retire the engine if nobody is attached and nothing is in flight.
    ///
    /// Returns `true` if the engine is retired (now or before). A join or
    /// departure holding the roles lock counts as activity.
    pub fn retire_if_idle(&self) -> bool {
        let Ok(mut roles) = self.roles.try_lock() else {
            return false;
        };
        if !roles.retired && roles.is_vacant() && self.clients.size() == 0 {
            roles.retired = true;
            tracing::debug!("PeerConnection {} retired while idle", self.id);
        }
        roles.retired
    }

    /// Attach a connection and pair it if a role is free.
    ///
    /// Returns once the relay triggered by this connection (if any) is over.
    /// A retired engine leaves the client untouched.
    pub async fn add_connection(self: &Arc<Self>, client: Client) -> Result<(), EngineRetired> {
        let mut roles = self.roles.lock().await;
        if roles.retired {
            tracing::debug!(
                "PeerConnection {} is retired, rejecting client {}",
                self.id,
                client.id()
            );
            return Err(EngineRetired(self.id));
        }

        self.clients.add(client.clone());
        let engine = Arc::downgrade(self);
        let departed = client.id();
        client.on_close(move || {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            engine.clients.remove_by_id(departed);
            tokio::spawn(async move { engine.handle_departure(departed).await });
        });
        tracing::debug!("PeerConnection {} added client {}", self.id, client.id());

        if roles.is_full() {
            if let Err(e) = client.send_message(&SignalMessage::wait_for_room()).await {
                tracing::error!(
                    "PeerConnection {} failed to notify client {}: {}",
                    self.id,
                    client.id(),
                    e
                );
            }
            return Ok(());
        }

        if let Err(e) = self.pair(&mut roles).await {
            tracing::error!(
                "PeerConnection {} signaling on add of client {} failed: {}",
                self.id,
                client.id(),
                e
            );
            let _ = client
                .send_message(&SignalMessage::error(e.to_string()))
                .await;
        }
        Ok(())
    }

    async fn handle_departure(&self, departed: ConnectionId) {
        let mut roles = self.roles.lock().await;
        tracing::debug!("PeerConnection {} lost client {}", self.id, departed);

        if roles.release(departed)
            && let Err(e) = self.pair(&mut roles).await
        {
            tracing::error!(
                "PeerConnection {} signaling after close of client {} failed: {}",
                self.id,
                departed,
                e
            );
        }

        if !roles.retired && roles.is_vacant() && self.clients.size() == 0 {
            roles.retired = true;
            tracing::debug!("PeerConnection {} is empty", self.id);
            (self.on_empty)();
        }
    }

    async fn pair(&self, roles: &mut Roles) -> Result<(), SignalingError> {
        let (sender, receiver) = match <[Client; 2]>::try_from(self.clients.first_n(2)) {
            Ok([sender, receiver]) => (sender, receiver),
            Err(waiting) => {
                roles.clear();
                for client in waiting {
                    if let Err(e) = client.send_message(&SignalMessage::wait_for_peer()).await {
                        tracing::debug!(
                            "PeerConnection {} failed to notify client {}: {}",
                            self.id,
                            client.id(),
                            e
                        );
                    }
                }
                return Ok(());
            }
        };

        roles.sender = Some(sender.clone());
        roles.receiver = Some(receiver.clone());
        tracing::debug!(
            "PeerConnection {} starting signaling: sender {}, receiver {}",
            self.id,
            sender.id(),
            receiver.id()
        );

        self.relay(&sender, &receiver).await?;

        tracing::debug!(
            "PeerConnection {} finished signaling: sender {}, receiver {}",
            self.id,
            sender.id(),
            receiver.id()
        );
        Ok(())
    }

    async fn relay(&self, sender: &Client, receiver: &Client) -> Result<(), SignalingError> {
        let timeout = self.config.relay_timeout;

        sender.send_message(&SignalMessage::request_offer()).await?;
        let offer = sender.receive_expected(MessageKind::Offer, timeout).await?;
        receiver.send_message(&offer).await?;
        let answer = receiver
            .receive_expected(MessageKind::Answer, timeout)
            .await?;
        sender.send_message(&answer).await?;
        Ok(())
    }
}
