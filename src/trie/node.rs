//! I-node and main-node states.
//!
//! An I-node is the C-trie's single mutation point: one atomic reference to
//! an immutable main node, swapped by CAS. This mirrors
//! `matching_cstrie.go`'s `iNode`/`mainNode` (`sync/atomic` +
//! `unsafe.Pointer`), with `arc_swap::ArcSwap` standing in for the raw
//! atomic pointer so no `unsafe` is needed to get the same "swap a pointer
//! to an immutable value, retry on lost race" primitive.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::cnode::CNode;

/// A main node is either a branching C-node or a tombstone.
pub(crate) enum MainNode {
    CNode(Arc<CNode>),
    TNode,
}

/// An indirection node: the only mutable point in the trie.
pub(crate) struct INode {
    main: ArcSwap<MainNode>,
}

impl INode {
    pub(crate) fn new(main: MainNode) -> Self {
        Self {
            main: ArcSwap::new(Arc::new(main)),
        }
    }

    pub(crate) fn new_cnode(cnode: CNode) -> Self {
        Self::new(MainNode::CNode(Arc::new(cnode)))
    }

    /// Linearization point for every read: the current main node.
    pub(crate) fn load(&self) -> Arc<MainNode> {
        self.main.load_full()
    }

    /// Linearization point for every write: CAS the main node.
    ///
    /// Returns `true` iff `current` was still installed (i.e. no concurrent
    /// writer raced ahead of us), in which case `new` is now installed.
    pub(crate) fn cas(&self, current: &Arc<MainNode>, new: Arc<MainNode>) -> bool {
        let prev = self.main.compare_and_swap(current, new);
        Arc::ptr_eq(&prev, current)
    }
}
