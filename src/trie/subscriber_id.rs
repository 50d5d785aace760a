//! Opaque subscriber identity: reference equality via a minted counter.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying a subscriber inside the matcher.
///
/// The matcher never inspects a handle's contents, only hashes and compares
/// it, so identity is all that matters. Rather than tag a raw object address
/// (which requires the allocator to never reuse addresses while a handle is
/// live) this mints a monotonically increasing counter value, one per call
/// to [`SubscriberId::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn new() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_and_stable() {
        let a = SubscriberId::new();
        let b = SubscriberId::new();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }
}
