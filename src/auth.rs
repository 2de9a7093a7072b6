use std::sync::Arc;

use log::info;
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};

use crate::config::Latency;
use crate::events::{ChangeEvent, Subscribers};
use crate::ids::IdSource;
use crate::models::{Admin, Session, User};
use crate::seed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginOutcome {
    User,
    Admin,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterOutcome {
    Success,
    Exists,
}

struct AuthState {
    session: Session,
    users: Vec<User>,
}

/// Session slot plus the roster of registered users.
#[derive(Clone)]
pub struct AuthStore {
    state: Arc<RwLock<AuthState>>,
    admin: Arc<Admin>,
    ids: Arc<IdSource>,
    latency: Latency,
    subscribers: Subscribers,
}

impl AuthStore {
    pub fn new(latency: Latency) -> Self {
        let users = seed::users();
        let ids = IdSource::new();
        for user in &users {
            ids.observe(user.id);
        }

        AuthStore {
            state: Arc::new(RwLock::new(AuthState {
                session: Session::None,
                users,
            })),
            admin: Arc::new(seed::admin()),
            ids: Arc::new(ids),
            latency,
            subscribers: Subscribers::new(),
        }
    }

    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        self.subscribers.subscribe().await
    }

    /// Admin credentials are checked before the roster. Passwords are
    /// compared as plain strings.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        tokio::time::sleep(self.latency.login).await;

        let outcome = {
            let mut state = self.state.write().await;
            if self.admin.email == email && self.admin.password == password {
                state.session = Session::Admin((*self.admin).clone());
                LoginOutcome::Admin
            } else {
                let matched = state
                    .users
                    .iter()
                    .find(|u| u.email == email && u.password == password)
                    .cloned();
                match matched {
                    Some(user) => {
                        state.session = Session::User(user);
                        LoginOutcome::User
                    }
                    None => return LoginOutcome::Error,
                }
            }
        };

        info!("Signed in {} as {:?}", email, outcome);
        self.subscribers.notify(ChangeEvent::Session).await;
        outcome
    }

    pub async fn logout(&self) {
        self.state.write().await.session = Session::None;
        self.subscribers.notify(ChangeEvent::Session).await;
    }

    /// Adds a user and signs them in. Email comparison is exact.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> RegisterOutcome {
        tokio::time::sleep(self.latency.register).await;

        {
            let mut state = self.state.write().await;
            if state.users.iter().any(|u| u.email == email) {
                return RegisterOutcome::Exists;
            }

            let user = User {
                id: self.ids.next(),
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            };
            info!("Registered user {} ({})", user.id, user.email);
            state.users.push(user.clone());
            state.session = Session::User(user);
        }

        self.subscribers.notify(ChangeEvent::Users).await;
        self.subscribers.notify(ChangeEvent::Session).await;
        RegisterOutcome::Success
    }

    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        match &self.state.read().await.session {
            Session::User(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub async fn current_admin(&self) -> Option<Admin> {
        match &self.state.read().await.session {
            Session::Admin(admin) => Some(admin.clone()),
            _ => None,
        }
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.read().await.users.clone()
    }

    pub async fn user_name(&self, user_id: u64) -> String {
        self.state
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map_or_else(|| "Unknown User".to_string(), |u| u.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AuthStore {
        AuthStore::new(Latency::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_admin_login_clears_user() {
        let auth = store();
        assert_eq!(auth.login("alice@example.com", "password123").await, LoginOutcome::User);
        assert_eq!(auth.login("admin@example.com", "adminpassword").await, LoginOutcome::Admin);

        assert!(auth.current_admin().await.is_some());
        assert!(auth.current_user().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_login_clears_admin() {
        let auth = store();
        auth.login("admin@example.com", "adminpassword").await;
        assert_eq!(auth.login("bob@example.com", "password123").await, LoginOutcome::User);

        assert!(auth.current_admin().await.is_none());
        assert_eq!(auth.current_user().await.map(|u| u.id), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_login_keeps_session() {
        let auth = store();
        auth.login("alice@example.com", "password123").await;

        assert_eq!(auth.login("alice@example.com", "wrong").await, LoginOutcome::Error);
        assert_eq!(auth.login("nobody@example.com", "password123").await, LoginOutcome::Error);
        assert_eq!(auth.current_user().await.map(|u| u.id), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_match_is_case_sensitive() {
        let auth = store();
        assert_eq!(auth.login("Alice@example.com", "password123").await, LoginOutcome::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_latency() {
        let auth = store();
        let start = tokio::time::Instant::now();
        auth.login("alice@example.com", "password123").await;
        assert!(start.elapsed() >= Latency::default().login);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_clears_everything() {
        let auth = store();
        auth.login("admin@example.com", "adminpassword").await;
        auth.logout().await;
        assert_eq!(auth.session().await, Session::None);

        // No session is fine too.
        auth.logout().await;
        assert_eq!(auth.session().await, Session::None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_existing_email_leaves_roster() {
        let auth = store();
        for user in auth.users().await {
            let before = auth.users().await;
            let outcome = auth.register("Impostor", &user.email, "x").await;
            assert_eq!(outcome, RegisterOutcome::Exists);
            assert_eq!(auth.users().await, before);
        }
        assert_eq!(auth.session().await, Session::None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_signs_in_new_user() {
        let auth = store();
        auth.login("admin@example.com", "adminpassword").await;

        let outcome = auth.register("Carol", "carol@example.com", "secret").await;
        assert_eq!(outcome, RegisterOutcome::Success);

        let user = auth.current_user().await.unwrap();
        assert_eq!(user.name, "Carol");
        assert!(user.id > 2);
        assert!(auth.current_admin().await.is_none());
        assert_eq!(auth.users().await.last(), Some(&user));
        assert_eq!(auth.user_name(user.id).await, "Carol");

        auth.logout().await;
        assert_eq!(auth.login("carol@example.com", "secret").await, LoginOutcome::User);
    }

    #[tokio::test(start_paused = true)]
    async fn test_registered_ids_are_distinct() {
        let auth = store();
        auth.register("A", "a@example.com", "pw").await;
        auth.register("B", "b@example.com", "pw").await;
        let users = auth.users().await;
        assert_ne!(users[2].id, users[3].id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_user_name() {
        let auth = store();
        assert_eq!(auth.user_name(1).await, "Alice");
        assert_eq!(auth.user_name(999).await, "Unknown User");
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_changes_are_published() {
        let auth = store();
        let mut events = auth.subscribe().await;

        auth.login("alice@example.com", "nope").await;
        auth.login("alice@example.com", "password123").await;

        assert_eq!(events.recv().await, Some(ChangeEvent::Session));
        assert!(events.try_recv().is_err());
    }
}
