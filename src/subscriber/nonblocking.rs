//! Non-blocking lossy bounded adapter: `Deliver` never blocks, dropping the
//! incoming message and alerting when the buffer is full.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use super::traits::Adapter;
use crate::config::DEFAULT_NONBLOCKING_CAPACITY;
use crate::message::Message;

/// Called with the number of messages dropped by one `deliver` call (always
/// 1: this adapter drops the *incoming* message on overflow rather than
/// evicting a queued one, so no batching of the alert is possible).
pub type AlertFn = Arc<dyn Fn(u64) + Send + Sync>;

/// A subscriber fed through a bounded `crossbeam_channel` that drops rather
/// than blocks on overflow.
pub struct NonBlockingSubscriber {
    sender: Mutex<Option<Sender<Message>>>,
    alert: AlertFn,
}

impl NonBlockingSubscriber {
    /// Non-positive capacities are coerced to a default of 10.
    pub fn new(capacity: i64, alert: AlertFn) -> (Self, Receiver<Message>) {
        let capacity = if capacity <= 0 { DEFAULT_NONBLOCKING_CAPACITY as usize } else { capacity as usize };
        let (tx, rx) = bounded(capacity);
        (
            Self {
                sender: Mutex::new(Some(tx)),
                alert,
            },
            rx,
        )
    }
}

impl Adapter for NonBlockingSubscriber {
    fn deliver(&self, message: Message) {
        let guard = self.sender.lock();
        let Some(tx) = guard.as_ref() else {
            (self.alert)(1);
            return;
        };

        match tx.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => (self.alert)(1),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    fn close(&self) {
        self.sender.lock().take();
    }
}
