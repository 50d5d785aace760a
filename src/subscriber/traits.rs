//! The adapter seam between the matcher (which only knows
//! [`crate::trie::SubscriberId`]) and the two concrete delivery strategies.

use crate::message::Message;

/// Receives published messages and forwards them to a subscriber in its own
/// way — blocking rendezvous, or a lossy bounded queue.
///
/// Mirrors `subscriber.go`'s `Subscriber` interface (`Set` + `Next`), minus
/// `Next`: here the receive half is a plain `crossbeam_channel::Receiver`
/// handed back from `Subscribe`, so callers use it directly instead of
/// going through a trait method.
pub trait Adapter: Send + Sync {
    /// Hands `message` to the subscriber. Never blocks indefinitely on a
    /// slow or absent reader for the non-blocking adapter; may block for
    /// the blocking adapter, per its own contract.
    fn deliver(&self, message: Message);

    /// Idempotent. Ends the receive stream; further `deliver` calls are
    /// silent no-ops (or, for the non-blocking adapter, alert-and-drop).
    fn close(&self);
}
