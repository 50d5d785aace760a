//! Immutable C-trie branch: a subscriber set plus an optional deeper path.

use std::collections::HashSet;
use std::sync::Arc;

use super::node::INode;
use super::subscriber_id::SubscriberId;

/// A single entry in a [`super::cnode::CNode`]'s branch map.
///
/// Per invariant I3, a live branch always has at least one subscriber, a
/// child I-node, or both — callers that would otherwise produce an empty
/// branch must drop it from the map instead.
pub(crate) struct Branch {
    pub(crate) subs: HashSet<SubscriberId>,
    pub(crate) child: Option<Arc<INode>>,
}

impl Branch {
    pub(crate) fn leaf(sub: SubscriberId) -> Self {
        let mut subs = HashSet::with_capacity(1);
        subs.insert(sub);
        Self { subs, child: None }
    }

    pub(crate) fn interior(child: Arc<INode>) -> Self {
        Self {
            subs: HashSet::new(),
            child: Some(child),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subs.is_empty() && self.child.is_none()
    }

    pub(crate) fn inserted(&self, sub: SubscriberId) -> Self {
        let mut subs = self.subs.clone();
        subs.insert(sub);
        Self {
            subs,
            child: self.child.clone(),
        }
    }

    pub(crate) fn removed(&self, sub: SubscriberId) -> Self {
        let mut subs = self.subs.clone();
        subs.remove(&sub);
        Self {
            subs,
            child: self.child.clone(),
        }
    }

    pub(crate) fn with_child(&self, child: Option<Arc<INode>>) -> Self {
        Self {
            subs: self.subs.clone(),
            child,
        }
    }
}
