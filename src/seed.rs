//! Fixed data every fresh store starts from.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Admin, Item, ItemStatus, Message, User};

/// Only ever called with literal, valid dates; `test_seed_dates_are_literal`
/// fails if one of them ever falls back to the epoch.
fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        },
        User {
            id: 2,
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "password123".to_string(),
        },
    ]
}

pub fn admin() -> Admin {
    Admin {
        id: 1,
        email: "admin@example.com".to_string(),
        password: "adminpassword".to_string(),
    }
}

pub fn items() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            title: "Black Leather Wallet".to_string(),
            description: "A standard black leather wallet containing various cards. Found near the library entrance.".to_string(),
            image: Some("https://picsum.photos/seed/wallet/400/300".to_string()),
            location: "Library Entrance".to_string(),
            datetime: at(2024, 7, 20, 14, 30),
            status: ItemStatus::Found,
            user_id: 2,
        },
        Item {
            id: 2,
            title: "iPhone 13 with Blue Case".to_string(),
            description: "Lost my iPhone 13, it has a cracked screen protector and a navy blue case.".to_string(),
            image: Some("https://picsum.photos/seed/iphone/400/300".to_string()),
            location: "Campus Cafeteria".to_string(),
            datetime: at(2024, 7, 21, 12, 0),
            status: ItemStatus::Lost,
            user_id: 1,
        },
        Item {
            id: 3,
            title: "University Keychain".to_string(),
            description: "A set of keys on a keychain with the university logo. Found on the main lawn.".to_string(),
            image: Some("https://picsum.photos/seed/keys/400/300".to_string()),
            location: "Main Lawn".to_string(),
            datetime: at(2024, 7, 22, 9, 0),
            status: ItemStatus::Resolved,
            user_id: 1,
        },
        Item {
            id: 4,
            title: "Red Water Bottle".to_string(),
            description: "A large red hydroflask-style water bottle, covered in stickers. Left it in the gym.".to_string(),
            image: Some("https://picsum.photos/seed/bottle/400/300".to_string()),
            location: "Gymnasium".to_string(),
            datetime: at(2024, 7, 22, 18, 0),
            status: ItemStatus::Rejected,
            user_id: 2,
        },
        Item {
            id: 5,
            title: "Calculus Textbook".to_string(),
            description: "A heavy calculus textbook, looks brand new. Submitted for review.".to_string(),
            image: Some("https://picsum.photos/seed/book/400/300".to_string()),
            location: "Lecture Hall 3".to_string(),
            datetime: at(2024, 7, 23, 11, 0),
            status: ItemStatus::Pending,
            user_id: 1,
        },
    ]
}

pub fn messages() -> Vec<Message> {
    vec![
        Message {
            id: 1,
            sender_id: 1,
            receiver_id: 2,
            item_id: 1,
            content: "Hi, I think that's my wallet you found!".to_string(),
            timestamp: at(2024, 7, 21, 10, 0),
        },
        Message {
            id: 2,
            sender_id: 2,
            receiver_id: 1,
            item_id: 1,
            content: "Great! Can you describe one of the cards inside to confirm?".to_string(),
            timestamp: at(2024, 7, 21, 10, 5),
        },
    ]
}
