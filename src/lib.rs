#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod hub;
pub mod message;
pub mod subscriber;
pub mod trie;

pub use error::FieldError;
pub use hub::{Hub, Subscription};
pub use message::{Fields, FieldValue, Message};
