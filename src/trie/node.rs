use std::ops::Range;

use super::feature_dict::FeatureId;

/// Position of a node in a trie's node array. The root is always at 0.
pub type NodeIndex = u32;

/// Handle of the root node.
pub const ROOT: NodeIndex = 0;

/// A node in the flat trie array.
///
/// A node does not own its children. It names a contiguous block of
/// `child_count` entries starting at `child_index` in the same array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) feature: FeatureId,
    pub(crate) leaf: bool,
    pub(crate) child_count: u32,
    pub(crate) child_index: NodeIndex,
}

impl TrieNode {
    /// Creates a childless node labeled `feature`.
    pub(crate) fn new(feature: FeatureId) -> Self {
        TrieNode {
            feature,
            ..TrieNode::default()
        }
    }

    /// The feature labeling the edge into this node.
    #[inline]
    pub fn feature(&self) -> FeatureId {
        self.feature
    }

    /// True if the path to this node spells a complete key.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.child_count as usize
    }

    /// Array positions of this node's children.
    #[inline]
    pub fn children(&self) -> Range<usize> {
        let start = self.child_index as usize;
        start..start + self.child_count as usize
    }
}

/// Converts an array length into a [`NodeIndex`].
///
/// # Panics
///
/// Panics if the node array outgrows `u32`.
#[inline]
pub(crate) fn to_index(len: usize) -> NodeIndex {
    NodeIndex::try_from(len).expect("node array exceeds u32::MAX entries")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_children() {
        let n = TrieNode::new(FeatureId::EMPTY);
        assert_eq!(n.child_count(), 0);
        assert!(n.children().is_empty());
        assert!(!n.is_leaf());
    }

    #[test]
    fn children_range() {
        let n = TrieNode {
            feature: FeatureId(3),
            leaf: true,
            child_count: 4,
            child_index: 10,
        };
        assert_eq!(n.children(), 10..14);
        assert_eq!(n.feature().get(), 3);
    }
}
