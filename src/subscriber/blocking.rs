//! Blocking buffered adapter: `Deliver` suspends the publishing thread
//! until the subscriber's receiver has room.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

use super::traits::Adapter;
use crate::message::Message;

/// A subscriber fed through a bounded `crossbeam_channel`.
///
/// `capacity == 0` makes the channel a rendezvous: `deliver` blocks until a
/// reader calls `recv`. Closing drops the sender, which turns a blocked or
/// future `recv` into a `Disconnected` error — the natural end-of-stream
/// signal, with no relay thread needed (unlike `subscriber.go`'s
/// close-channel-plus-goroutine, which exists only because Go's channel
/// close semantics differ).
pub struct BlockingSubscriber {
    sender: Mutex<Option<Sender<Message>>>,
}

impl BlockingSubscriber {
    /// Negative capacities are coerced to 0 per the blocking adapter's
    /// contract; 0 means rendezvous.
    pub fn new(capacity: i64) -> (Self, Receiver<Message>) {
        let capacity = capacity.max(0) as usize;
        let (tx, rx) = bounded(capacity);
        (
            Self {
                sender: Mutex::new(Some(tx)),
            },
            rx,
        )
    }
}

impl Adapter for BlockingSubscriber {
    fn deliver(&self, message: Message) {
        let guard = self.sender.lock();
        if let Some(tx) = guard.as_ref() {
            // A disconnected receiver (subscriber dropped without calling
            // `close`) just drops the message; nothing to alert on here.
            let _ = tx.send(message);
        }
    }

    fn close(&self) {
        self.sender.lock().take();
    }
}
