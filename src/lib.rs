//! In-memory lost & found listings: a session/roster store, an item and
//! message store, and a WebSocket front end that gives every connection its
//! own freshly seeded copy of both.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod flash;
pub mod ids;
pub mod image;
pub mod messages;
pub mod models;
pub mod seed;
pub mod server;
pub mod store;
