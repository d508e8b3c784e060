//! Post-build compression of the node array.
//!
//! A single breadth-first pass over integer handles. Each dequeued node first
//! swallows single-child chains below it and below each of its children, then
//! fuses children that share a feature and sorts its child block by feature
//! id. Nodes are appended or rewritten in place, never removed; whatever
//! becomes unreachable simply stays in the array.

use std::collections::VecDeque;

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::feature_dict::{FeatureDict, FeatureId};
use super::node::{to_index, NodeIndex, TrieNode, ROOT};

pub(crate) struct Compressor<'t> {
    dict: &'t mut FeatureDict,
    nodes: &'t mut Vec<TrieNode>,
}

impl<'t> Compressor<'t> {
    pub(crate) fn new(dict: &'t mut FeatureDict, nodes: &'t mut Vec<TrieNode>) -> Self {
        Compressor { dict, nodes }
    }

    /// Compresses every node reachable from the root and returns the
    /// positions of the reachable leaves in array order.
    pub(crate) fn run(mut self) -> Vec<NodeIndex> {
        let mut queue = VecDeque::from([ROOT]);
        let mut leaves = Vec::new();

        while let Some(index) = queue.pop_front() {
            self.collapse(index);
            // Labels of the children must be final before they are grouped.
            let children = self.nodes[index as usize].children();
            for child in children {
                self.collapse(to_index(child));
            }
            self.merge_siblings(index);

            let node = self.nodes[index as usize];
            if node.leaf {
                leaves.push(index);
            }
            queue.extend(node.children().map(to_index));
        }

        leaves.sort_unstable();
        leaves
    }

    /// Absorbs the only child of a non-leaf node for as long as that child
    /// is itself not a leaf, concatenating the features on the way.
    fn collapse(&mut self, index: NodeIndex) {
        loop {
            let node = self.nodes[index as usize];
            if node.leaf || node.child_count != 1 {
                return;
            }
            let child = self.nodes[node.child_index as usize];
            if child.leaf {
                return;
            }

            let feature = self.concat(node.feature, child.feature);
            let node = &mut self.nodes[index as usize];
            node.feature = feature;
            node.child_index = child.child_index;
            node.child_count = child.child_count;
        }
    }

    fn concat(&mut self, head: FeatureId, tail: FeatureId) -> FeatureId {
        let head = self.dict.resolve(head);
        let tail = self.dict.resolve(tail);
        let mut joined = String::with_capacity(head.len() + tail.len());
        joined.push_str(head);
        joined.push_str(tail);
        self.dict.intern(&joined)
    }

    /// Fuses children sharing a feature and leaves the child block sorted
    /// ascending by feature id.
    fn merge_siblings(&mut self, index: NodeIndex) {
        let node = self.nodes[index as usize];
        if node.child_count < 2 {
            return;
        }

        let mut groups: HashMap<FeatureId, SmallVec<[NodeIndex; 2]>> =
            HashMap::with_capacity(node.child_count());
        for pos in node.children() {
            groups
                .entry(self.nodes[pos].feature)
                .or_default()
                .push(to_index(pos));
        }

        if groups.len() == node.child_count() {
            self.nodes[node.children()].sort_unstable_by_key(TrieNode::feature);
            return;
        }

        let mut survivors: Vec<TrieNode> = groups
            .into_values()
            .map(|members| self.fuse(&members))
            .collect();
        survivors.sort_unstable_by_key(TrieNode::feature);

        let child_count = to_index(survivors.len());
        let child_index = if let [survivor] = survivors.as_slice() {
            self.nodes[node.child_index as usize] = *survivor;
            node.child_index
        } else {
            let start = to_index(self.nodes.len());
            self.nodes.extend(survivors);
            start
        };

        let node = &mut self.nodes[index as usize];
        node.child_index = child_index;
        node.child_count = child_count;
    }

    /// Returns one node standing in for all `members`. With more than one
    /// member, the members' child blocks are copied, in order, into a fresh
    /// block at the array tail.
    fn fuse(&mut self, members: &[NodeIndex]) -> TrieNode {
        let mut survivor = self.nodes[members[0] as usize];
        if members.len() == 1 {
            return survivor;
        }

        let start = self.nodes.len();
        for &member in members {
            let member = self.nodes[member as usize];
            self.nodes.extend_from_within(member.children());
            survivor.leaf |= member.leaf;
        }
        survivor.child_index = to_index(start);
        survivor.child_count = to_index(self.nodes.len() - start);

        tracing::trace!(
            feature = %survivor.feature,
            members = members.len(),
            children = survivor.child_count,
            "fused siblings"
        );
        survivor
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn node(feature: FeatureId, leaf: bool, child_index: NodeIndex, child_count: u32) -> TrieNode {
        TrieNode {
            feature,
            leaf,
            child_count,
            child_index,
        }
    }

    /// Every string spelled by a root-to-leaf path, sorted.
    fn spelled(dict: &FeatureDict, nodes: &[TrieNode]) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![(ROOT, String::new())];
        while let Some((index, mut prefix)) = stack.pop() {
            let n = nodes[index as usize];
            prefix.push_str(dict.resolve(n.feature));
            if n.leaf {
                out.push(prefix.clone());
            }
            for child in n.children() {
                stack.push((to_index(child), prefix.clone()));
            }
        }
        out.sort();
        out
    }

    fn assert_sorted_siblings(nodes: &[TrieNode]) {
        let mut stack = vec![ROOT];
        while let Some(index) = stack.pop() {
            let n = nodes[index as usize];
            let block = &nodes[n.children()];
            assert!(
                block.windows(2).all(|w| w[0].feature < w[1].feature),
                "children of node {index} not strictly ascending"
            );
            stack.extend(n.children().map(to_index));
        }
    }

    #[test]
    fn fans_in_siblings_with_equal_feature() {
        let mut dict = FeatureDict::new();
        let [a, b, c, d] = ["a", "b", "c", "d"].map(|f| dict.intern(f));
        let mut nodes = vec![
            node(FeatureId::EMPTY, false, 1, 3),
            node(a, false, 4, 1),
            node(a, false, 5, 1),
            node(b, true, 0, 0),
            node(c, true, 0, 0),
            node(d, true, 0, 0),
        ];

        let leaves = Compressor::new(&mut dict, &mut nodes).run();

        let root = nodes[ROOT as usize];
        assert_eq!(root.child_count(), 2);
        let block = &nodes[root.children()];
        assert_eq!(block[0].feature, a);
        assert_eq!(block[1].feature, b);
        assert_eq!(block[0].child_count(), 2);
        assert!(!block[0].is_leaf());

        assert_eq!(spelled(&dict, &nodes), ["ac", "ad", "b"]);
        assert_eq!(leaves.len(), 3);
        assert!(leaves.windows(2).all(|w| w[0] < w[1]));
        assert!(leaves.iter().all(|&l| nodes[l as usize].is_leaf()));
        assert_sorted_siblings(&nodes);
    }

    #[test]
    fn single_group_is_written_in_place() {
        let mut dict = FeatureDict::new();
        let [a, x, y] = ["a", "x", "y"].map(|f| dict.intern(f));
        let mut nodes = vec![
            node(FeatureId::EMPTY, false, 1, 2),
            node(a, true, 3, 1),
            node(a, false, 4, 1),
            node(x, true, 0, 0),
            node(y, true, 0, 0),
        ];

        Compressor::new(&mut dict, &mut nodes).run();

        let root = nodes[ROOT as usize];
        assert_eq!(root.children(), 1..2);
        // Leaf flag survives the merge.
        assert!(nodes[1].is_leaf());
        assert_eq!(spelled(&dict, &nodes), ["a", "ax", "ay"]);
    }

    #[test]
    fn collapses_chains_transitively() {
        let mut dict = FeatureDict::new();
        let [a, b, c, d, e] = ["a", "b", "c", "d", "e"].map(|f| dict.intern(f));
        let mut nodes = vec![
            node(FeatureId::EMPTY, false, 1, 2),
            node(a, false, 3, 1),
            node(e, true, 0, 0),
            node(b, false, 4, 1),
            node(c, false, 5, 1),
            node(d, true, 0, 0),
        ];

        Compressor::new(&mut dict, &mut nodes).run();

        let abc = dict.get("abc").unwrap();
        let root = nodes[ROOT as usize];
        let block = &nodes[root.children()];
        assert_eq!(block.len(), 2);
        // "abc" was interned last, so it sorts after "e".
        assert_eq!(block[0].feature, e);
        assert_eq!(block[1].feature, abc);
        assert_eq!(nodes[block[1].children()][0].feature, d);
        assert_eq!(spelled(&dict, &nodes), ["abcd", "e"]);
    }

    #[test]
    fn leaf_children_stop_collapse() {
        let mut dict = FeatureDict::new();
        let [a, b, c] = ["a", "b", "c"].map(|f| dict.intern(f));
        // a -> b(leaf) -> c(leaf): "ab" and "abc" both stay reachable.
        let mut nodes = vec![
            node(FeatureId::EMPTY, false, 1, 1),
            node(a, false, 2, 1),
            node(b, true, 3, 1),
            node(c, true, 0, 0),
        ];

        Compressor::new(&mut dict, &mut nodes).run();

        assert_eq!(dict.resolve(nodes[ROOT as usize].feature), "a");
        assert_eq!(spelled(&dict, &nodes), ["ab", "abc"]);
        assert_eq!(dict.get("bc"), None);
    }

    #[test]
    fn collapse_can_expose_duplicate_siblings() {
        let mut dict = FeatureDict::new();
        let [ab, c, d, abc, e] = ["ab", "c", "d", "abc", "e"].map(|f| dict.intern(f));
        let mut nodes = vec![
            node(FeatureId::EMPTY, false, 1, 3),
            node(ab, false, 4, 1),
            node(abc, false, 6, 1),
            node(e, true, 0, 0),
            node(c, false, 5, 1),
            node(d, true, 0, 0),
            node(e, true, 0, 0),
        ];

        Compressor::new(&mut dict, &mut nodes).run();

        let root = nodes[ROOT as usize];
        assert_eq!(root.child_count(), 2);
        let block = &nodes[root.children()];
        assert_eq!(block[0].feature, abc);
        assert_eq!(block[1].feature, e);
        assert_eq!(spelled(&dict, &nodes), ["abcd", "abce", "e"]);
        assert_sorted_siblings(&nodes);
    }

    #[test]
    fn unmerged_block_is_sorted() {
        let mut dict = FeatureDict::new();
        let [z, y, x] = ["z", "y", "x"].map(|f| dict.intern(f));
        let mut nodes = vec![
            node(FeatureId::EMPTY, false, 1, 3),
            node(x, true, 0, 0),
            node(z, true, 0, 0),
            node(y, true, 0, 0),
        ];

        let leaves = Compressor::new(&mut dict, &mut nodes).run();

        assert_eq!(nodes.len(), 4);
        let features: Vec<_> = nodes[1..].iter().map(|n| n.feature).collect();
        assert_eq!(features, [z, y, x]);
        assert_eq!(leaves, [1, 2, 3]);
    }
}
