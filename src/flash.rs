use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::events::{ChangeEvent, Subscribers};

#[derive(Default)]
struct FlashState {
    message: Option<String>,
    generation: u64,
    clear_task: Option<JoinHandle<()>>,
}

/// A single transient notice that clears itself after `duration`.
///
/// Each `set` aborts the previous clear task, and the task re-checks the
/// generation under the lock, so an old timer never clears a newer message.
#[derive(Clone)]
pub struct FlashSlot {
    state: Arc<Mutex<FlashState>>,
    duration: Duration,
    subscribers: Subscribers,
}

impl FlashSlot {
    pub fn new(duration: Duration, subscribers: Subscribers) -> Self {
        FlashSlot {
            state: Arc::new(Mutex::new(FlashState::default())),
            duration,
            subscribers,
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.state.lock().await.message.clone()
    }

    pub async fn set(&self, message: Option<String>) {
        let message = message.filter(|m| !m.is_empty());

        {
            let mut state = self.state.lock().await;
            state.generation += 1;
            if let Some(task) = state.clear_task.take() {
                task.abort();
            }
            state.message.clone_from(&message);

            if message.is_some() {
                let generation = state.generation;
                let slot = self.clone();
                state.clear_task = Some(tokio::spawn(async move {
                    tokio::time::sleep(slot.duration).await;
                    slot.expire(generation).await;
                }));
            }
        }

        self.subscribers.notify(ChangeEvent::Flash { message }).await;
    }

    async fn expire(&self, generation: u64) {
        {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                return;
            }
            state.message = None;
            state.clear_task = None;
        }
        self.subscribers
            .notify(ChangeEvent::Flash { message: None })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(3);

    fn slot() -> FlashSlot {
        FlashSlot::new(INTERVAL, Subscribers::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_visible_then_cleared() {
        let flash = slot();
        flash.set(Some("X".to_string())).await;
        assert_eq!(flash.get().await.as_deref(), Some("X"));

        tokio::time::sleep(INTERVAL + Duration::from_millis(1)).await;
        assert_eq!(flash.get().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_outlives_older_timer() {
        let flash = slot();
        flash.set(Some("first".to_string())).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        flash.set(Some("second".to_string())).await;

        // The first timer would have fired here.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(flash.get().await.as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(flash.get().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_explicitly() {
        let flash = slot();
        flash.set(Some("hello".to_string())).await;
        flash.set(None).await;
        assert_eq!(flash.get().await, None);

        flash.set(Some(String::new())).await;
        assert_eq!(flash.get().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_changes_are_published() {
        let subscribers = Subscribers::new();
        let mut events = subscribers.subscribe().await;
        let flash = FlashSlot::new(INTERVAL, subscribers);

        flash.set(Some("saved".to_string())).await;
        assert_eq!(
            events.recv().await,
            Some(ChangeEvent::Flash { message: Some("saved".to_string()) })
        );
        assert_eq!(events.recv().await, Some(ChangeEvent::Flash { message: None }));
    }
}
