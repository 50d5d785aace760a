//! Subscriber delivery adapters: the blocking buffered channel and the
//! non-blocking lossy bounded queue.

mod blocking;
mod nonblocking;
mod traits;

pub use blocking::BlockingSubscriber;
pub use nonblocking::{AlertFn, NonBlockingSubscriber};
pub use traits::Adapter;
