use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use tokio::sync::{mpsc, RwLock};

use crate::config::{ReportPolicy, StoreConfig};
use crate::error::StoreError;
use crate::events::{ChangeEvent, Subscribers};
use crate::flash::FlashSlot;
use crate::ids::IdSource;
use crate::image;
use crate::models::{
    ConversationSummary, Item, ItemStatus, Message, NewItem, NewMessage, StatusCounts,
};
use crate::seed;

/// Characters of a title compared when looking for duplicate reports.
const DUPLICATE_PREFIX_LEN: usize = 5;

struct DataState {
    items: Vec<Item>,
    messages: Vec<Message>,
    loading: bool,
    initialized: bool,
}

/// Items, messages and the flash notice for one running app.
#[derive(Clone)]
pub struct DataStore {
    state: Arc<RwLock<DataState>>,
    item_ids: Arc<IdSource>,
    message_ids: Arc<IdSource>,
    config: StoreConfig,
    flash: FlashSlot,
    subscribers: Subscribers,
}

impl DataStore {
    pub fn new(config: StoreConfig) -> Self {
        let subscribers = Subscribers::new();
        DataStore {
            state: Arc::new(RwLock::new(DataState {
                items: Vec::new(),
                messages: Vec::new(),
                loading: true,
                initialized: false,
            })),
            item_ids: Arc::new(IdSource::new()),
            message_ids: Arc::new(IdSource::new()),
            config,
            flash: FlashSlot::new(config.flash_duration, subscribers.clone()),
            subscribers,
        }
    }

    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        self.subscribers.subscribe().await
    }

    /// Loads the seed data set. Only the first call has any effect. Items and
    /// messages written while the load was in flight are kept: new items stay
    /// in front of the seed, new messages after it.
    pub async fn initialize(&self) {
        {
            let mut state = self.state.write().await;
            if state.initialized {
                return;
            }
            state.initialized = true;
        }

        tokio::time::sleep(self.config.latency.initial_load).await;

        let items = seed::items();
        let messages = seed::messages();
        for item in &items {
            self.item_ids.observe(item.id);
        }
        for message in &messages {
            self.message_ids.observe(message.id);
        }

        {
            let mut state = self.state.write().await;
            info!("Loaded {} items and {} messages", items.len(), messages.len());
            state.items.extend(items);
            let written = std::mem::replace(&mut state.messages, messages);
            state.messages.extend(written);
            state.loading = false;
        }

        self.subscribers.notify(ChangeEvent::Items).await;
        self.subscribers.notify(ChangeEvent::Messages).await;
        self.subscribers
            .notify(ChangeEvent::Loading { loading: false })
            .await;
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn items(&self) -> Vec<Item> {
        self.state.read().await.items.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    /// Validates and stores a new report at the front of the list.
    pub async fn add_item(&self, new_item: NewItem) -> Result<Item, StoreError> {
        let status = self.report_status(&new_item)?;

        tokio::time::sleep(self.config.latency.add_item).await;

        let item = Item {
            id: self.item_ids.next(),
            title: new_item.title,
            description: new_item.description,
            image: new_item.image,
            location: new_item.location,
            datetime: new_item.datetime,
            status,
            user_id: new_item.user_id,
        };

        self.state.write().await.items.insert(0, item.clone());
        info!("Item {} reported as {} by user {}", item.id, item.status.as_str(), item.user_id);

        self.subscribers.notify(ChangeEvent::Items).await;
        Ok(item)
    }

    fn report_status(&self, new_item: &NewItem) -> Result<ItemStatus, StoreError> {
        for (field, value) in [
            ("title", &new_item.title),
            ("description", &new_item.description),
            ("location", &new_item.location),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::MissingField(field));
            }
        }
        if let Some(image) = &new_item.image {
            image::validate(image)?;
        }

        match self.config.report_policy {
            ReportPolicy::Direct if new_item.status.is_reportable() => Ok(new_item.status),
            ReportPolicy::Direct => Err(StoreError::UnreportableStatus(new_item.status)),
            ReportPolicy::Moderated => Ok(ItemStatus::Pending),
        }
    }

    /// Changes one item's status in place. Unknown ids are ignored.
    pub async fn update_item_status(&self, item_id: u64, status: ItemStatus) -> Option<Item> {
        tokio::time::sleep(self.config.latency.update_status).await;

        let updated = {
            let mut state = self.state.write().await;
            let item = state.items.iter_mut().find(|i| i.id == item_id)?;
            item.status = status;
            item.clone()
        };

        info!("Item {} is now {}", item_id, status.as_str());
        self.subscribers.notify(ChangeEvent::Items).await;
        Some(updated)
    }

    pub async fn send_message(&self, new_message: NewMessage) -> Message {
        tokio::time::sleep(self.config.latency.send_message).await;

        let message = Message {
            id: self.message_ids.next(),
            sender_id: new_message.sender_id,
            receiver_id: new_message.receiver_id,
            item_id: new_message.item_id,
            content: new_message.content,
            timestamp: Utc::now(),
        };

        self.state.write().await.messages.push(message.clone());
        debug!(
            "Message {} from {} to {} about item {}",
            message.id, message.sender_id, message.receiver_id, message.item_id
        );

        self.subscribers.notify(ChangeEvent::Messages).await;
        message
    }

    pub async fn get_item_by_id(&self, item_id: u64) -> Option<Item> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
    }

    /// One summary per (item, counterparty), most recent activity first.
    pub async fn get_conversations(&self, user_id: u64) -> Vec<ConversationSummary> {
        let state = self.state.read().await;

        let mut involved: Vec<&Message> = state
            .messages
            .iter()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
            .collect();
        involved.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

        let mut seen = HashSet::new();
        let mut summaries = Vec::new();
        for message in involved {
            let other_user_id = if message.sender_id == user_id {
                message.receiver_id
            } else {
                message.sender_id
            };
            if seen.insert((message.item_id, other_user_id)) {
                summaries.push(ConversationSummary {
                    item: state.items.iter().find(|i| i.id == message.item_id).cloned(),
                    other_user_id,
                    last_message: message.clone(),
                });
            }
        }
        summaries
    }

    /// Messages about `item_id` exchanged between two users, oldest first.
    pub async fn thread(&self, item_id: u64, user_a: u64, user_b: u64) -> Vec<Message> {
        let mut thread: Vec<Message> = self
            .state
            .read()
            .await
            .messages
            .iter()
            .filter(|m| {
                m.item_id == item_id
                    && ((m.sender_id == user_a && m.receiver_id == user_b)
                        || (m.sender_id == user_b && m.receiver_id == user_a))
            })
            .cloned()
            .collect();
        thread.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        thread
    }

    /// Items with `status` (any status when `None`) whose title, description
    /// or location contains `query`, ignoring case.
    pub async fn search_items(&self, status: Option<ItemStatus>, query: &str) -> Vec<Item> {
        let needle = query.trim().to_lowercase();
        self.state
            .read()
            .await
            .items
            .iter()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .filter(|i| {
                needle.is_empty()
                    || i.title.to_lowercase().contains(&needle)
                    || i.description.to_lowercase().contains(&needle)
                    || i.location.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub async fn recent_items(&self, status: ItemStatus, limit: usize) -> Vec<Item> {
        self.state
            .read()
            .await
            .items
            .iter()
            .filter(|i| i.status == status)
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in &self.state.read().await.items {
            counts.record(item.status);
        }
        counts
    }

    /// Other non-pending items whose title contains the start of this one's.
    pub async fn find_duplicates(&self, item_id: u64) -> Vec<Item> {
        let state = self.state.read().await;
        let Some(current) = state.items.iter().find(|i| i.id == item_id) else {
            return Vec::new();
        };
        let prefix: String = current
            .title
            .to_lowercase()
            .chars()
            .take(DUPLICATE_PREFIX_LEN)
            .collect();

        state
            .items
            .iter()
            .filter(|i| {
                i.id != item_id
                    && i.status != ItemStatus::Pending
                    && i.title.to_lowercase().contains(&prefix)
            })
            .cloned()
            .collect()
    }

    pub async fn set_flash_message(&self, message: Option<String>) {
        self.flash.set(message).await;
    }

    pub async fn flash_message(&self) -> Option<String> {
        self.flash.get().await
    }
}
