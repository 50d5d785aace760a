//! The C-trie matcher: `Subscribe`, `Unsubscribe`, `Lookup`, `Subscriptions`.
//!
//! This is a line-for-line port of `leandro-lugaresi/hub`'s
//! `matching_cstrie.go` (kept at `examples/original_source/` in the
//! retrieval pack this crate was built from), which already implements the
//! exact trie spec describes: single-segment `*` wildcard only, no `#`,
//! CAS-driven I-node mutation, T-node tombing plus `cleanParent`/`contract`
//! two-level cleanup. The Go source's `unsafe.Pointer` +
//! `atomic.CompareAndSwapPointer` become `arc_swap::ArcSwap`; its
//! self-recursive "retry from the top" calls become `loop`s so the control
//! flow doesn't rely on tail-call elimination.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use super::branch::Branch;
use super::cnode::{CNode, WILDCARD};
use super::node::{INode, MainNode};
use super::subscriber_id::SubscriberId;

/// A single topic segment.
pub type Segment = Arc<str>;

/// Splits a dotted topic string into its segments.
pub fn split_topic(topic: &str) -> Vec<Segment> {
    topic.split('.').map(Arc::from).collect()
}

/// Joins segments back into a dotted topic string.
pub fn join_topic(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

/// The `(topic-patterns, subscriber-handle)` record returned by `Subscribe`
/// and by `Subscriptions`' snapshot (there, always a single-pattern record).
#[derive(Clone, Debug)]
pub struct Subscription {
    pub patterns: Vec<String>,
    pub sub: SubscriberId,
}

/// A concurrent, lock-free dotted-topic matching trie.
pub struct Matcher {
    root: Arc<INode>,
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            root: Arc::new(INode::new_cnode(CNode::empty())),
        }
    }

    /// Registers `sub` under every pattern in `patterns`. Idempotent per
    /// `(pattern, sub)` edge (I4): subscribing the same pair twice changes
    /// nothing the second time.
    pub fn subscribe(&self, patterns: &[String], sub: SubscriberId) -> Subscription {
        'outer: loop {
            for pattern in patterns {
                let segments = split_topic(pattern);
                if !self.iinsert(&self.root, None, &segments, sub) {
                    continue 'outer;
                }
            }
            break;
        }

        Subscription {
            patterns: patterns.to_vec(),
            sub,
        }
    }

    fn iinsert(&self, i: &Arc<INode>, parent: Option<&Arc<INode>>, segments: &[Segment], sub: SubscriberId) -> bool {
        let main = i.load();

        match main.as_ref() {
            MainNode::CNode(cn) => {
                match cn.get(&segments[0]) {
                    None => {
                        let new_cn = cn.inserted(segments, sub);
                        i.cas(&main, Arc::new(MainNode::CNode(Arc::new(new_cn))))
                    }
                    Some(br) => {
                        if segments.len() > 1 {
                            if let Some(child) = &br.child {
                                self.iinsert(child, Some(i), &segments[1..], sub)
                            } else {
                                let nin = Arc::new(INode::new_cnode(CNode::empty().inserted(&segments[1..], sub)));
                                let new_branch = Arc::new(br.with_child(Some(nin)));
                                let new_cn = cn.with_branch(segments[0].clone(), new_branch);
                                i.cas(&main, Arc::new(MainNode::CNode(Arc::new(new_cn))))
                            }
                        } else if br.subs.contains(&sub) {
                            true
                        } else {
                            let new_branch = Arc::new(br.inserted(sub));
                            let new_cn = cn.with_branch(segments[0].clone(), new_branch);
                            i.cas(&main, Arc::new(MainNode::CNode(Arc::new(new_cn))))
                        }
                    }
                }
            }
            MainNode::TNode => {
                if let Some(p) = parent {
                    self.clean(p);
                }
                false
            }
        }
    }

    /// Removes every `(pattern, sub)` edge recorded in `subscription`.
    /// Unknown patterns and an unknown subscriber are silent no-ops.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        'outer: loop {
            for pattern in &subscription.patterns {
                let segments = split_topic(pattern);
                if !self.iremove(&self.root, None, None, &segments, 0, subscription.sub) {
                    continue 'outer;
                }
            }
            break;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn iremove(
        &self,
        i: &Arc<INode>,
        parent: Option<&Arc<INode>>,
        parents_parent: Option<&Arc<INode>>,
        segments: &[Segment],
        idx: usize,
        sub: SubscriberId,
    ) -> bool {
        let main = i.load();

        match main.as_ref() {
            MainNode::CNode(cn) => {
                let word = &segments[idx];
                let br = match cn.get(word) {
                    Some(br) => br,
                    None => return true,
                };

                if idx + 1 < segments.len() {
                    return match &br.child {
                        Some(child) => self.iremove(child, Some(i), parent, segments, idx + 1, sub),
                        None => true,
                    };
                }

                if !br.subs.contains(&sub) {
                    return true;
                }

                let new_cn = cn.removed(word, sub);
                let contracted = self.to_contracted(Arc::new(new_cn), i);

                if !i.cas(&main, contracted) {
                    return false;
                }

                if let Some(p) = parent {
                    let after = i.load();
                    if matches!(after.as_ref(), MainNode::TNode) {
                        self.clean_parent(i, p, parents_parent, &segments[idx - 1]);
                    }
                }

                true
            }
            MainNode::TNode => {
                if let Some(p) = parent {
                    self.clean(p);
                }
                false
            }
        }
    }

    /// Returns the deduplicated set of subscribers whose patterns match
    /// `name`, descending both the literal and wildcard edge at each level.
    pub fn lookup(&self, name: &[Segment]) -> Vec<SubscriberId> {
        loop {
            if let Some(result) = self.ilookup(&self.root, None, name) {
                return result;
            }
        }
    }

    fn ilookup(&self, i: &Arc<INode>, parent: Option<&Arc<INode>>, segments: &[Segment]) -> Option<Vec<SubscriberId>> {
        let main = i.load();

        match main.as_ref() {
            MainNode::CNode(cn) => {
                let (exact, wildcard) = cn.get_branches(&segments[0]);
                let mut result = HashSet::new();

                if let Some(br) = exact {
                    result.extend(self.blookup(i, br, segments)?);
                }
                if let Some(br) = wildcard {
                    result.extend(self.blookup(i, br, segments)?);
                }

                Some(result.into_iter().collect())
            }
            MainNode::TNode => {
                if let Some(p) = parent {
                    self.clean(p);
                }
                None
            }
        }
    }

    fn blookup(&self, i: &Arc<INode>, br: &Arc<Branch>, segments: &[Segment]) -> Option<Vec<SubscriberId>> {
        if segments.len() > 1 {
            match &br.child {
                None => Some(Vec::new()),
                Some(child) => self.ilookup(child, Some(i), &segments[1..]),
            }
        } else {
            Some(br.subs.iter().copied().collect())
        }
    }

    /// A consistent snapshot of every `(pattern, sub)` edge currently live.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        loop {
            if let Some(result) = self.isubscriptions(&self.root, None, &[]) {
                return result;
            }
        }
    }

    fn isubscriptions(&self, i: &Arc<INode>, parent: Option<&Arc<INode>>, prefix: &[Segment]) -> Option<Vec<Subscription>> {
        let main = i.load();

        match main.as_ref() {
            MainNode::CNode(cn) => {
                let mut out = Vec::new();

                for (word, br) in cn.branches.iter() {
                    let mut path = prefix.to_vec();
                    path.push(word.clone());

                    if let Some(child) = &br.child {
                        out.extend(self.isubscriptions(child, Some(i), &path)?);
                    }

                    for sub in br.subs.iter() {
                        out.push(Subscription {
                            patterns: vec![join_topic(&path)],
                            sub: *sub,
                        });
                    }
                }

                Some(out)
            }
            MainNode::TNode => {
                if let Some(p) = parent {
                    self.clean(p);
                }
                None
            }
        }
    }

    /// Never tombs the root (I1): any other I-node whose C-node is now
    /// empty becomes a T-node instead.
    fn to_contracted(&self, cn: Arc<CNode>, parent: &Arc<INode>) -> Arc<MainNode> {
        if !Arc::ptr_eq(parent, &self.root) && cn.is_empty() {
            Arc::new(MainNode::TNode)
        } else {
            Arc::new(MainNode::CNode(cn))
        }
    }

    /// Best-effort: replace a C-node with its pruned (tombed-branch-free)
    /// copy. A lost race just leaves cleanup for a later operation.
    fn clean(&self, i: &Arc<INode>) {
        let main = i.load();
        if let MainNode::CNode(cn) = main.as_ref() {
            let compressed = Self::to_compressed(cn);
            let _ = i.cas(&main, compressed);
        }
    }

    fn to_compressed(cn: &CNode) -> Arc<MainNode> {
        let branches = cn
            .branches
            .iter()
            .filter(|(_, br)| !Self::prunable(br))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Arc::new(MainNode::CNode(Arc::new(CNode { branches })))
    }

    /// A branch is prunable if it has no subscribers and either points
    /// nowhere or points to a tombed I-node.
    fn prunable(br: &Arc<Branch>) -> bool {
        if !br.subs.is_empty() {
            return false;
        }
        match &br.child {
            None => true,
            Some(child) => matches!(child.load().as_ref(), MainNode::TNode),
        }
    }

    /// Checks whether the T-node installed below `i` is still reachable
    /// from `parent` and, if so, replaces `parent`'s C-node with its
    /// contraction (pruning `i`'s branch), cascading into `parents_parent`
    /// when that empties `parent` too.
    ///
    /// This is a best-effort single attempt rather than
    /// `matching_cstrie.go`'s self-recursive retry (which, ported literally,
    /// can re-enter with a `nil`/`None` `i` when `parent` is the root and
    /// its CAS loses a race — a latent crash in the source we chose not to
    /// reproduce). Structural compaction (I3) isn't required to complete
    /// synchronously with any one `Unsubscribe`; a later operation walking
    /// the same path retries it.
    fn clean_parent(&self, i: &Arc<INode>, parent: &Arc<INode>, parents_parent: Option<&Arc<INode>>, word: &Segment) {
        let pmain = parent.load();
        let pcn = match pmain.as_ref() {
            MainNode::CNode(cn) => cn.clone(),
            MainNode::TNode => return,
        };

        let br = match pcn.get(word) {
            Some(br) => br,
            None => return,
        };

        match &br.child {
            Some(child) if Arc::ptr_eq(child, i) => {}
            _ => return,
        }

        if !matches!(i.load().as_ref(), MainNode::TNode) {
            return;
        }

        if !self.contract(parents_parent, parent, &pmain, &pcn, word) {
            trace!("cleanParent: contract lost a race, deferring to a later pass");
        }
    }

    fn contract(
        &self,
        parents_parent: Option<&Arc<INode>>,
        parent: &Arc<INode>,
        pmain: &Arc<MainNode>,
        pcn: &Arc<CNode>,
        word: &Segment,
    ) -> bool {
        let compressed = match Self::to_compressed(pcn).as_ref() {
            MainNode::CNode(cn) => cn.clone(),
            MainNode::TNode => unreachable!("to_compressed always yields a CNode"),
        };

        if compressed.is_empty() {
            if let Some(pp) = parents_parent {
                return self.prune_from_grandparent(pp, parent);
            }
            // parent == root: fall through, to_contracted never tombs it.
        }

        let contracted = self.to_contracted(compressed, parent);
        parent.cas(pmain, contracted)
    }

    /// Two-level cleanup: `parent`'s own C-node is now empty, so prune the
    /// branch in `parents_parent` that points at `parent` entirely.
    fn prune_from_grandparent(&self, parents_parent: &Arc<INode>, parent: &Arc<INode>) -> bool {
        let ppmain = parents_parent.load();
        let ppcn = match ppmain.as_ref() {
            MainNode::CNode(cn) => cn,
            MainNode::TNode => return true,
        };

        for (key, branch) in ppcn.branches.iter() {
            let points_at_parent = matches!(&branch.child, Some(child) if Arc::ptr_eq(child, parent));
            if !points_at_parent {
                continue;
            }

            let updated_branch = branch.with_child(None);
            let mut branches = ppcn.branches.clone();
            if updated_branch.is_empty() {
                branches.remove(key);
            } else {
                branches.insert(key.clone(), Arc::new(updated_branch));
            }

            let compressed = Self::to_compressed(&CNode { branches });
            return parents_parent.cas(&ppmain, compressed);
        }

        true
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}
