use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};

/// What changed in a store. Subscribers re-query the store for the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum ChangeEvent {
    Session,
    Users,
    Items,
    Messages,
    Loading { loading: bool },
    Flash { message: Option<String> },
}

/// Fan-out of change events to any number of subscribers.
#[derive(Clone, Default)]
pub struct Subscribers {
    senders: Arc<RwLock<Vec<mpsc::UnboundedSender<ChangeEvent>>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.write().await.push(tx);
        rx
    }

    /// Delivers `event` to every live subscriber and forgets the ones whose
    /// receiver has been dropped.
    pub async fn notify(&self, event: ChangeEvent) {
        let mut senders = self.senders.write().await;
        senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub async fn subscriber_count(&self) -> usize {
        self.senders.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_is_notified() {
        let subscribers = Subscribers::new();
        let mut first = subscribers.subscribe().await;
        let mut second = subscribers.subscribe().await;

        subscribers.notify(ChangeEvent::Items).await;

        assert_eq!(first.recv().await, Some(ChangeEvent::Items));
        assert_eq!(second.recv().await, Some(ChangeEvent::Items));
    }

    #[tokio::test]
    async fn test_dropped_subscribers_are_pruned() {
        let subscribers = Subscribers::new();
        let kept = subscribers.subscribe().await;
        drop(subscribers.subscribe().await);

        subscribers.notify(ChangeEvent::Session).await;

        assert_eq!(subscribers.subscriber_count().await, 1);
        drop(kept);
    }

    #[test]
    fn test_events_serialize_with_topic() {
        let json = serde_json::to_string(&ChangeEvent::Loading { loading: false }).unwrap();
        assert_eq!(json, r#"{"topic":"loading","loading":false}"#);
    }
}
