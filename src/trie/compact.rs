use std::fmt;

use smallvec::{smallvec, SmallVec};

use super::builder::TrieBuilder;
use super::compress::Compressor;
use super::feature_dict::FeatureDict;
use super::matcher;
use super::node::{to_index, NodeIndex, TrieNode, ROOT};

/// A frozen, compressed feature trie answering exact membership queries.
///
/// Built once through [`TrieBuilder::build`] or [`build`](crate::build), after
/// which the node array and dictionary are never touched again: every method
/// takes `&self`, and lookups never intern into the dictionary. A
/// `CompactTrie` can therefore be shared freely between threads.
///
/// # Examples
///
/// ```
/// use feattrie::CompactTrie;
///
/// let trie: CompactTrie = ["BAKE", "BAKER", "CAKE"].into_iter().collect();
/// assert!(trie.contains("BAKER"));
/// assert!(!trie.contains("BAK"));
/// assert_eq!(trie.len(), 3);
/// ```
#[derive(Clone)]
pub struct CompactTrie {
    dict: FeatureDict,
    nodes: Vec<TrieNode>,
    leaves: Vec<NodeIndex>,
}

impl CompactTrie {
    /// Runs the compressor over a freshly built node array.
    pub(crate) fn compress(mut dict: FeatureDict, mut nodes: Vec<TrieNode>, keys: usize) -> Self {
        let _span = tracing::debug_span!("compress_trie", keys, nodes = nodes.len()).entered();
        let features_before = dict.len();

        let leaves = Compressor::new(&mut dict, &mut nodes).run();
        debug_assert_eq!(leaves.len(), keys, "leaf count differs from key count");

        let trie = CompactTrie {
            dict,
            nodes,
            leaves,
        };
        tracing::debug!(
            nodes = trie.node_count(),
            reachable = trie.reachable_node_count(),
            features = trie.dict.len(),
            merged_features = trie.dict.len() - features_before,
            "compressed trie"
        );
        trie
    }

    /// Returns `true` if `key` was one of the inserted keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let trie = feattrie::build(["hello", "hello world", "golang"]);
    /// assert!(trie.contains("hello"));
    /// assert!(!trie.contains("hello world!"));
    /// assert!(!trie.contains("go"));
    /// ```
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.find(key).is_some()
    }

    /// Returns the position of the leaf spelling `key`, if there is one.
    ///
    /// The returned index is one of the entries of [`leaf_index`](Self::leaf_index).
    pub fn find(&self, key: impl AsRef<str>) -> Option<NodeIndex> {
        let key = key.as_ref();
        let rest = key.strip_prefix(self.label(self.root()))?;

        // Children are tried for every interned prefix of the remaining
        // input. Shorter prefixes are pushed first so the longest match is
        // followed first and the others serve as fallbacks.
        let mut pending: SmallVec<[(NodeIndex, usize); 16]> =
            smallvec![(ROOT, key.len() - rest.len())];
        while let Some((index, pos)) = pending.pop() {
            let node = &self.nodes[index as usize];
            if pos == key.len() {
                if node.leaf {
                    return Some(index);
                }
                continue;
            }

            let siblings = &self.nodes[node.children()];
            for (feature, len) in matcher::prefixes(&self.dict, &key[pos..]) {
                if let Ok(offset) = siblings.binary_search_by_key(&feature, TrieNode::feature) {
                    pending.push((node.child_index + to_index(offset), pos + len));
                }
            }
        }
        None
    }

    /// Number of keys in the trie.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// True if the trie holds no keys.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Positions of all reachable leaf nodes, ascending.
    pub fn leaf_index(&self) -> &[NodeIndex] {
        &self.leaves
    }

    /// Length of the node array, including entries left unreachable by
    /// building and compression.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes reachable from the root.
    pub fn reachable_node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![ROOT];
        while let Some(index) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[index as usize].children().map(to_index));
        }
        count
    }

    /// The root node.
    pub fn root(&self) -> &TrieNode {
        &self.nodes[ROOT as usize]
    }

    /// The whole node array. Unreachable entries are included.
    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    /// The children of `node`, sorted ascending by feature id.
    pub fn children(&self, node: &TrieNode) -> &[TrieNode] {
        &self.nodes[node.children()]
    }

    /// The feature string labeling `node`.
    pub fn label(&self, node: &TrieNode) -> &str {
        self.dict.resolve(node.feature)
    }

    /// The feature dictionary, merged features included.
    pub fn dictionary(&self) -> &FeatureDict {
        &self.dict
    }

    /// Iterates over every key, reassembled from the features on its path.
    ///
    /// Keys come out depth first with siblings in feature id order, which is
    /// not lexicographic order.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            trie: self,
            stack: vec![(ROOT, 0)],
            prefix: String::new(),
        }
    }
}

impl fmt::Debug for CompactTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactTrie")
            .field("keys", &self.len())
            .field("node_count", &self.node_count())
            .field("features", &self.dict.len())
            .finish()
    }
}

impl<K: AsRef<str>> FromIterator<K> for CompactTrie {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut builder = TrieBuilder::new();
        builder.extend(keys);
        builder.build()
    }
}

/// Iterator over the keys of a [`CompactTrie`], see [`CompactTrie::keys`].
#[derive(Clone)]
pub struct Keys<'t> {
    trie: &'t CompactTrie,
    /// Nodes still to visit with the prefix length at their parent.
    stack: Vec<(NodeIndex, usize)>,
    prefix: String,
}

impl Iterator for Keys<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let trie = self.trie;
        while let Some((index, depth)) = self.stack.pop() {
            let node = &trie.nodes[index as usize];
            self.prefix.truncate(depth);
            self.prefix.push_str(trie.label(node));

            let depth = self.prefix.len();
            self.stack
                .extend(node.children().rev().map(|child| (to_index(child), depth)));
            if node.leaf {
                return Some(self.prefix.clone());
            }
        }
        None
    }
}
