use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use uuid::Uuid;
use warp::ws::{Message, WebSocket, Ws};
use warp::Filter;

use crate::app::App;
use crate::config::StoreConfig;
use crate::messages::{ClientMessage, ConversationView, Reply, Request, ServerMessage};
use crate::models::{NewItem, NewMessage, User};

const DEFAULT_RECENT_LIMIT: usize = 3;

const LOGIN_REQUIRED_TO_REPORT: &str = "You must be logged in to report an item.";
const REPORT_SUCCEEDED: &str = "Item successfully reported!";

/// The `/ws` endpoint: upgrades and hands the socket to `server`.
pub fn ws_route(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("ws").and(warp::ws()).map(move |ws: Ws| {
        let server = server.clone();
        ws.on_upgrade(move |socket| async move {
            server.handle_connection(socket).await;
        })
    })
}

#[derive(Clone)]
pub struct Server {
    config: StoreConfig,
}

impl Server {
    pub fn new(config: StoreConfig) -> Self {
        Server { config }
    }

    /// Every connection gets a freshly seeded app that lives as long as the
    /// socket does.
    pub async fn handle_connection(&self, ws: WebSocket) {
        let connection_id = Uuid::new_v4().to_string();
        let (mut ws_tx, mut ws_rx) = ws.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Reply>();

        info!("Connection {} opened", connection_id);

        let app = App::new(self.config);
        let mut auth_events = app.auth.subscribe().await;
        let mut data_events = app.data.subscribe().await;

        let loader = app.clone();
        tokio::spawn(async move {
            loader.data.initialize().await;
        });

        let events_tx = tx.clone();
        let forwarder = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    Some(event) = auth_events.recv() => event,
                    Some(event) = data_events.recv() => event,
                    else => break,
                };
                if events_tx
                    .send(Reply::unsolicited(ServerMessage::Changed { event }))
                    .is_err()
                {
                    break;
                }
            }
        });

        let writer_id = connection_id.clone();
        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to encode message for {}: {}", writer_id, e);
                        continue;
                    }
                };
                if let Err(e) = ws_tx.send(Message::text(text)).await {
                    error!("Failed to send WebSocket message to {}: {}", writer_id, e);
                    break;
                }
            }
        });

        while let Some(result) = ws_rx.next().await {
            let msg = match result {
                Ok(msg) => msg,
                Err(e) => {
                    error!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };
            if msg.is_close() {
                break;
            }
            let Ok(text) = msg.to_str() else {
                continue;
            };

            debug!("Received from {}: {}", connection_id, text);
            match serde_json::from_str::<Request>(text) {
                Ok(request) => {
                    let app = app.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let message = Self::handle_client_message(&app, request.message).await;
                        let _ = tx.send(Reply {
                            request_id: request.request_id,
                            message,
                        });
                    });
                }
                Err(e) => {
                    warn!("Malformed message from {}: {}", connection_id, e);
                    let _ = tx.send(Reply::unsolicited(error_message(format!(
                        "Malformed message: {e}"
                    ))));
                }
            }
        }

        forwarder.abort();
        writer.abort();
        info!("Connection {} closed", connection_id);
    }

    pub async fn handle_client_message(app: &App, message: ClientMessage) -> ServerMessage {
        match message {
            ClientMessage::Login { email, password } => ServerMessage::LoginResult {
                outcome: app.auth.login(&email, &password).await,
            },

            ClientMessage::Logout => {
                app.auth.logout().await;
                ServerMessage::Session {
                    session: app.auth.session().await,
                }
            }

            ClientMessage::Register {
                name,
                email,
                password,
            } => ServerMessage::RegisterResult {
                outcome: app.auth.register(&name, &email, &password).await,
            },

            ClientMessage::GetSession => ServerMessage::Session {
                session: app.auth.session().await,
            },

            ClientMessage::ListItems { status, query } => ServerMessage::Items {
                loading: app.data.is_loading().await,
                items: app.data.search_items(status, &query).await,
            },

            ClientMessage::RecentItems { status, limit } => ServerMessage::Items {
                loading: app.data.is_loading().await,
                items: app
                    .data
                    .recent_items(status, limit.unwrap_or(DEFAULT_RECENT_LIMIT))
                    .await,
            },

            ClientMessage::GetItem { item_id } => Self::item_view(app, item_id).await,

            ClientMessage::ReportItem {
                title,
                description,
                image,
                location,
                datetime,
                status,
            } => {
                let Some(user) = app.auth.current_user().await else {
                    app.data
                        .set_flash_message(Some(LOGIN_REQUIRED_TO_REPORT.to_string()))
                        .await;
                    return error_message(LOGIN_REQUIRED_TO_REPORT);
                };

                let new_item = NewItem {
                    title,
                    description,
                    image,
                    location,
                    datetime,
                    status,
                    user_id: user.id,
                };
                match app.data.add_item(new_item).await {
                    Ok(item) => {
                        app.data
                            .set_flash_message(Some(REPORT_SUCCEEDED.to_string()))
                            .await;
                        ServerMessage::ItemReported { item }
                    }
                    Err(e) => {
                        warn!("Rejected report from user {}: {}", user.id, e);
                        error_message(e.to_string())
                    }
                }
            }

            ClientMessage::ModerateItem { item_id, status } => {
                if app.auth.current_admin().await.is_none() {
                    return error_message("Admin access required");
                }
                match app.data.update_item_status(item_id, status).await {
                    Some(_) => Self::item_view(app, item_id).await,
                    None => error_message("Item not found"),
                }
            }

            ClientMessage::SendMessage {
                item_id,
                receiver_id,
                content,
            } => {
                let user = match require_user(app).await {
                    Ok(user) => user,
                    Err(reply) => return reply,
                };
                if content.trim().is_empty() {
                    return error_message("Message cannot be empty");
                }
                let receiver_id = match counterparty(app, item_id, receiver_id).await {
                    Ok(id) => id,
                    Err(reply) => return reply,
                };
                if receiver_id == user.id {
                    return error_message("Cannot message yourself");
                }

                app.data
                    .send_message(NewMessage {
                        sender_id: user.id,
                        receiver_id,
                        item_id,
                        content,
                    })
                    .await;
                ServerMessage::Thread {
                    item_id,
                    other_user_id: receiver_id,
                    messages: app.data.thread(item_id, user.id, receiver_id).await,
                }
            }

            ClientMessage::GetConversations => {
                let user = match require_user(app).await {
                    Ok(user) => user,
                    Err(reply) => return reply,
                };
                let mut conversations = Vec::new();
                for summary in app.data.get_conversations(user.id).await {
                    let other_user_name = app.auth.user_name(summary.other_user_id).await;
                    conversations.push(ConversationView {
                        summary,
                        other_user_name,
                    });
                }
                ServerMessage::Conversations { conversations }
            }

            ClientMessage::GetThread {
                item_id,
                other_user_id,
            } => {
                let user = match require_user(app).await {
                    Ok(user) => user,
                    Err(reply) => return reply,
                };
                let other_user_id = match counterparty(app, item_id, other_user_id).await {
                    Ok(id) => id,
                    Err(reply) => return reply,
                };
                ServerMessage::Thread {
                    item_id,
                    other_user_id,
                    messages: app.data.thread(item_id, user.id, other_user_id).await,
                }
            }

            ClientMessage::FindDuplicates { item_id } => {
                if app.auth.current_admin().await.is_none() {
                    return error_message("Admin access required");
                }
                ServerMessage::Duplicates {
                    item_id,
                    items: app.data.find_duplicates(item_id).await,
                }
            }

            ClientMessage::StatusCounts => {
                if app.auth.current_admin().await.is_none() {
                    return error_message("Admin access required");
                }
                ServerMessage::StatusCounts {
                    counts: app.data.status_counts().await,
                }
            }

            ClientMessage::DismissFlash => {
                app.data.set_flash_message(None).await;
                ServerMessage::Flash { message: None }
            }
        }
    }

    async fn item_view(app: &App, item_id: u64) -> ServerMessage {
        let item = app.data.get_item_by_id(item_id).await;
        let owner_name = match &item {
            Some(item) => Some(app.auth.user_name(item.user_id).await),
            None => None,
        };
        ServerMessage::Item { item, owner_name }
    }
}

fn error_message(message: impl Into<String>) -> ServerMessage {
    ServerMessage::Error {
        message: message.into(),
    }
}

async fn require_user(app: &App) -> Result<User, ServerMessage> {
    app.auth
        .current_user()
        .await
        .ok_or_else(|| error_message("You must be logged in"))
}

/// The other party of a conversation: the explicit id when given, otherwise
/// whoever reported the item.
async fn counterparty(app: &App, item_id: u64, explicit: Option<u64>) -> Result<u64, ServerMessage> {
    if let Some(id) = explicit {
        return Ok(id);
    }
    app.data
        .get_item_by_id(item_id)
        .await
        .map(|item| item.user_id)
        .ok_or_else(|| error_message("Item not found"))
}
