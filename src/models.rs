use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
    Pending,
    Rejected,
    Resolved,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 5] = [
        ItemStatus::Lost,
        ItemStatus::Found,
        ItemStatus::Pending,
        ItemStatus::Rejected,
        ItemStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Lost => "lost",
            ItemStatus::Found => "found",
            ItemStatus::Pending => "pending",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Resolved => "resolved",
        }
    }

    /// Statuses a user may pick when reporting an item.
    pub fn is_reportable(self) -> bool {
        matches!(self, ItemStatus::Lost | ItemStatus::Found)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admin {
    pub id: u64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Who is signed in. At most one identity at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Session {
    #[default]
    None,
    User(User),
    Admin(Admin),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub location: String,
    pub datetime: DateTime<Utc>,
    pub status: ItemStatus,
    pub user_id: u64,
}

/// Fields supplied by whoever reports an item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub location: String,
    pub datetime: DateTime<Utc>,
    pub status: ItemStatus,
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u64,
    pub sender_id: u64,
    pub receiver_id: u64,
    pub item_id: u64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: u64,
    pub receiver_id: u64,
    pub item_id: u64,
    pub content: String,
}

/// Latest activity between one user and one counterparty about one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub item: Option<Item>,
    pub other_user_id: u64,
    pub last_message: Message,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub lost: usize,
    pub found: usize,
    pub pending: usize,
    pub rejected: usize,
    pub resolved: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ItemStatus) {
        self.all += 1;
        match status {
            ItemStatus::Lost => self.lost += 1,
            ItemStatus::Found => self.found += 1,
            ItemStatus::Pending => self.pending += 1,
            ItemStatus::Rejected => self.rejected += 1,
            ItemStatus::Resolved => self.resolved += 1,
        }
    }

    pub fn get(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Lost => self.lost,
            ItemStatus::Found => self.found,
            ItemStatus::Pending => self.pending,
            ItemStatus::Rejected => self.rejected,
            ItemStatus::Resolved => self.resolved,
        }
    }
}
