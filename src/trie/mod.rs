//! The concurrent, lock-free dotted-topic matching trie (C-trie).

mod branch;
mod cnode;
mod matcher;
mod node;
mod subscriber_id;

pub use matcher::{join_topic, split_topic, Matcher, Subscription};
pub use subscriber_id::SubscriberId;
