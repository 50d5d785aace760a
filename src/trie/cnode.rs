//! Immutable, copy-on-write branching node.

use std::collections::HashMap;
use std::sync::Arc;

use super::branch::Branch;
use super::node::INode;
use super::subscriber_id::SubscriberId;

pub(crate) const WILDCARD: &str = "*";

/// A finite mapping from topic segment to branch, rebuilt wholesale on every
/// write (mirrors `matching_cstrie.go`'s `cNode`, which does the same —
/// every `inserted`/`updated`/`removed` copies the full branch map).
pub(crate) struct CNode {
    pub(crate) branches: HashMap<Arc<str>, Arc<Branch>>,
}

impl CNode {
    pub(crate) fn empty() -> Self {
        Self {
            branches: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, segment: &str) -> Option<&Arc<Branch>> {
        self.branches.get(segment)
    }

    /// Exact-match and wildcard branches for a segment, the two edges
    /// `Lookup` always descends.
    pub(crate) fn get_branches(&self, segment: &str) -> (Option<&Arc<Branch>>, Option<&Arc<Branch>>) {
        (self.branches.get(segment), self.branches.get(WILDCARD))
    }

    /// A fresh chain of I-nodes/C-nodes terminating in a leaf branch holding
    /// `sub`, one C-node per remaining segment. Mirrors `newCNode`.
    fn chain(segments: &[Arc<str>], sub: SubscriberId) -> Self {
        let branch = if segments.len() == 1 {
            Arc::new(Branch::leaf(sub))
        } else {
            let child = Arc::new(INode::new_cnode(Self::chain(&segments[1..], sub)));
            Arc::new(Branch::interior(child))
        };

        let mut branches = HashMap::with_capacity(1);
        branches.insert(segments[0].clone(), branch);
        Self { branches }
    }

    /// A copy of this C-node with a brand new branch (and its downstream
    /// chain, if any) installed at `segments[0]`. Mirrors `cNode.inserted`.
    pub(crate) fn inserted(&self, segments: &[Arc<str>], sub: SubscriberId) -> Self {
        let mut branches = self.branches.clone();
        let chain = Self::chain(segments, sub);
        for (k, v) in chain.branches {
            branches.insert(k, v);
        }
        Self { branches }
    }

    /// A copy of this C-node with `segment`'s branch replaced. Mirrors
    /// `cNode.updatedBranch`.
    pub(crate) fn with_branch(&self, segment: Arc<str>, branch: Arc<Branch>) -> Self {
        let mut branches = self.branches.clone();
        branches.insert(segment, branch);
        Self { branches }
    }

    /// A copy of this C-node with `sub` removed from `segment`'s branch,
    /// dropping the branch entirely if that empties it (I3). Mirrors
    /// `cNode.removed`.
    pub(crate) fn removed(&self, segment: &str, sub: SubscriberId) -> Self {
        let mut branches = self.branches.clone();
        if let Some((key, br)) = self.branches.get_key_value(segment) {
            let updated = br.removed(sub);
            if updated.is_empty() {
                branches.remove(segment);
            } else {
                branches.insert(key.clone(), Arc::new(updated));
            }
        }
        Self { branches }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}
