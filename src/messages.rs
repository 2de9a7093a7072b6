use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{LoginOutcome, RegisterOutcome};
use crate::events::ChangeEvent;
use crate::models::{ConversationSummary, Item, ItemStatus, Message, Session, StatusCounts};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "login")]
    Login {
        email: String,
        password: String,
    },
    #[serde(rename = "logout")]
    Logout,
    #[serde(rename = "register")]
    Register {
        name: String,
        email: String,
        password: String,
    },
    #[serde(rename = "get_session")]
    GetSession,
    #[serde(rename = "list_items")]
    ListItems {
        #[serde(default)]
        status: Option<ItemStatus>,
        #[serde(default)]
        query: String,
    },
    #[serde(rename = "recent_items")]
    RecentItems {
        status: ItemStatus,
        #[serde(default)]
        limit: Option<usize>,
    },
    #[serde(rename = "get_item")]
    GetItem {
        item_id: u64,
    },
    #[serde(rename = "report_item")]
    ReportItem {
        title: String,
        description: String,
        #[serde(default)]
        image: Option<String>,
        location: String,
        datetime: DateTime<Utc>,
        status: ItemStatus,
    },
    #[serde(rename = "moderate_item")]
    ModerateItem {
        item_id: u64,
        status: ItemStatus,
    },
    #[serde(rename = "send_message")]
    SendMessage {
        item_id: u64,
        #[serde(default)]
        receiver_id: Option<u64>,
        content: String,
    },
    #[serde(rename = "get_conversations")]
    GetConversations,
    #[serde(rename = "get_thread")]
    GetThread {
        item_id: u64,
        #[serde(default)]
        other_user_id: Option<u64>,
    },
    #[serde(rename = "find_duplicates")]
    FindDuplicates {
        item_id: u64,
    },
    #[serde(rename = "status_counts")]
    StatusCounts,
    #[serde(rename = "dismiss_flash")]
    DismissFlash,
}

/// A client message as it arrives on the socket. Requests are handled
/// concurrently, so replies can come back out of order; a client that needs
/// to pair them sets `request_id` and gets it echoed on the reply.
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub request_id: Option<u64>,
    #[serde(flatten)]
    pub message: ClientMessage,
}

#[derive(Debug, Serialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    #[serde(flatten)]
    pub message: ServerMessage,
}

impl Reply {
    /// A frame nobody asked for, such as a change notification.
    pub fn unsolicited(message: ServerMessage) -> Self {
        Reply {
            request_id: None,
            message,
        }
    }
}

/// A conversation summary with the counterparty's display name filled in.
#[derive(Debug, Serialize, Clone)]
pub struct ConversationView {
    #[serde(flatten)]
    pub summary: ConversationSummary,
    pub other_user_name: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "login_result")]
    LoginResult {
        outcome: LoginOutcome,
    },
    #[serde(rename = "register_result")]
    RegisterResult {
        outcome: RegisterOutcome,
    },
    #[serde(rename = "session")]
    Session {
        session: Session,
    },
    #[serde(rename = "items")]
    Items {
        loading: bool,
        items: Vec<Item>,
    },
    #[serde(rename = "item")]
    Item {
        item: Option<Item>,
        owner_name: Option<String>,
    },
    #[serde(rename = "item_reported")]
    ItemReported {
        item: Item,
    },
    #[serde(rename = "conversations")]
    Conversations {
        conversations: Vec<ConversationView>,
    },
    #[serde(rename = "thread")]
    Thread {
        item_id: u64,
        other_user_id: u64,
        messages: Vec<Message>,
    },
    #[serde(rename = "duplicates")]
    Duplicates {
        item_id: u64,
        items: Vec<Item>,
    },
    #[serde(rename = "status_counts")]
    StatusCounts {
        counts: StatusCounts,
    },
    #[serde(rename = "flash")]
    Flash {
        message: Option<String>,
    },
    #[serde(rename = "changed")]
    Changed {
        #[serde(flatten)]
        event: ChangeEvent,
    },
    #[serde(rename = "error")]
    Error {
        message: String,
    },
}
