use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::WsMessage;

pub type WsSender = mpsc::UnboundedSender<WsMessage>;

/// Tracks live websocket connections and which groups each user is
/// watching. One connection per user; a reconnect replaces the old sender.
#[derive(Clone, Default)]
pub struct ConnectionManager {
    connections: Arc<DashMap<Uuid, WsSender>>,
    /// group id -> user ids subscribed to that group's entry stream
    subscriptions: Arc<DashMap<String, HashSet<Uuid>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connection(&self, user_id: Uuid, sender: WsSender) {
        self.connections.insert(user_id, sender);
    }

    pub fn remove_connection(&self, user_id: &Uuid) {
        self.connections.remove(user_id);
        for mut entry in self.subscriptions.iter_mut() {
            entry.value_mut().remove(user_id);
        }
    }

    pub fn subscribe(&self, group_id: &str, user_id: Uuid) {
        self.subscriptions
            .entry(group_id.to_string())
            .or_default()
            .insert(user_id);
    }

    pub fn unsubscribe(&self, group_id: &str, user_id: &Uuid) {
        if let Some(mut subscribers) = self.subscriptions.get_mut(group_id) {
            subscribers.remove(user_id);
        }
    }

    /// Delivers a message to every connected subscriber of the group.
    pub fn broadcast_to_group(&self, group_id: &str, message: WsMessage) {
        let Some(subscribers) = self.subscriptions.get(group_id) else {
            return;
        };
        for user_id in subscribers.iter() {
            if let Some(sender) = self.connections.get(user_id) {
                let _ = sender.send(message.clone());
            }
        }
    }

    /// Drops a group's subscriber set entirely (used on group deletion).
    pub fn drop_group(&self, group_id: &str) {
        self.subscriptions.remove(group_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_and_broadcast() {
        let manager = ConnectionManager::new();
        let user = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();

        manager.add_connection(user, tx);
        manager.subscribe("DG-AAAAAA", user);
        manager.broadcast_to_group("DG-AAAAAA", WsMessage::Ping);

        assert!(matches!(rx.try_recv(), Ok(WsMessage::Ping)));
    }

    #[test]
    fn unsubscribed_user_receives_nothing() {
        let manager = ConnectionManager::new();
        let user = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();

        manager.add_connection(user, tx);
        manager.subscribe("DG-AAAAAA", user);
        manager.unsubscribe("DG-AAAAAA", &user);
        manager.broadcast_to_group("DG-AAAAAA", WsMessage::Ping);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn evicted_subscriber_stops_receiving_while_others_continue() {
        let manager = ConnectionManager::new();
        let evicted = Uuid::new_v4();
        let kept = Uuid::new_v4();
        let (evicted_tx, mut evicted_rx) = mpsc::unbounded_channel();
        let (kept_tx, mut kept_rx) = mpsc::unbounded_channel();

        manager.add_connection(evicted, evicted_tx);
        manager.add_connection(kept, kept_tx);
        manager.subscribe("DG-CCCCCC", evicted);
        manager.subscribe("DG-CCCCCC", kept);

        // Server-side eviction, as after member removal or rejection.
        manager.unsubscribe("DG-CCCCCC", &evicted);
        manager.broadcast_to_group("DG-CCCCCC", WsMessage::Ping);

        assert!(evicted_rx.try_recv().is_err());
        assert!(matches!(kept_rx.try_recv(), Ok(WsMessage::Ping)));
    }

    #[test]
    fn remove_connection_clears_subscriptions() {
        let manager = ConnectionManager::new();
        let user = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();

        manager.add_connection(user, tx);
        manager.subscribe("DG-BBBBBB", user);
        manager.remove_connection(&user);
        manager.broadcast_to_group("DG-BBBBBB", WsMessage::Ping);

        assert!(rx.try_recv().is_err());
    }
}
