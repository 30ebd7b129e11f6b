//! Join-ordered registry of the connections attached to one room.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use super::client::{Client, ConnectionId};

#[derive(Default)]
struct Registry {
    /// join order -> client
    by_order: BTreeMap<u64, Client>,
    /// client -> join order
    order_of: HashMap<ConnectionId, u64>,
    next_order: u64,
}

/// Thread-safe set of clients, each tagged with a strictly increasing join
/// counter that is never reused.
#[derive(Default)]
pub struct ClientList {
    registry: RwLock<Registry>,
}

impl ClientList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.read().by_order.len()
    }

    pub fn contains(&self, client: &Client) -> bool {
        self.read().order_of.contains_key(&client.id())
    }

    /// Register `client` behind every client added before it.
    ///
    /// Adding an already registered client moves it to the back.
    pub fn add(&self, client: Client) {
        let mut registry = self.write();
        let order = registry.next_order;
        registry.next_order += 1;
        if let Some(previous) = registry.order_of.insert(client.id(), order) {
            registry.by_order.remove(&previous);
        }
        registry.by_order.insert(order, client);
    }

    /// Unregister `client` and make sure its connection is closed.
    ///
    /// Returns `false` if the client was not registered.
    pub fn remove(&self, client: &Client) -> bool {
        self.remove_by_id(client.id()).is_some()
    }

    /// Unregister the client with the given id, closing its connection.
    pub fn remove_by_id(&self, id: ConnectionId) -> Option<Client> {
        let removed = {
            let mut registry = self.write();
            registry
                .order_of
                .remove(&id)
                .and_then(|order| registry.by_order.remove(&order))
        };
        if let Some(client) = &removed {
            client.close();
        }
        removed
    }

    /// The `n` earliest-joined clients still registered, earliest first.
    pub fn first_n(&self, n: usize) -> Vec<Client> {
        self.read().by_order.values().take(n).cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}
