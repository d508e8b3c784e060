#[cfg(feature = "file")]
use std::fs::File;
#[cfg(feature = "file")]
use std::io::{BufRead, BufReader};
#[cfg(feature = "file")]
use std::path::Path;

#[cfg(feature = "file")]
use super::error::{BuildError, Result};

use hashbrown::HashMap;

use super::compact::CompactTrie;
use super::feature_dict::{FeatureDict, FeatureId};
use super::matcher::{self, Seeding};
use super::node::{to_index, NodeIndex, TrieNode, ROOT};

/// Incrementally collects keys into an uncompressed feature trie.
///
/// Keys may be inserted in any order. Each key is cut into features by
/// longest match against the dictionary as it stands at insertion time, and
/// the dictionary grows as keys introduce unseen text (see [`Seeding`]).
/// [`build`](TrieBuilder::build) consumes the builder, compresses the trie
/// and returns the frozen [`CompactTrie`].
#[derive(Clone, Debug)]
pub struct TrieBuilder {
    dict: FeatureDict,
    nodes: Vec<TrieNode>,
    seeding: Seeding,
    keys: usize,
    /// Reserved length of relocated child blocks, keyed by block start.
    capacity: HashMap<NodeIndex, u32>,
}

/// Smallest block a relocation reserves.
const MIN_RELOCATED_CAPACITY: usize = 4;

impl TrieBuilder {
    /// Creates an empty builder using [`Seeding::Char`].
    pub fn new() -> Self {
        Self::with_seeding(Seeding::default())
    }

    /// Creates an empty builder with the given seeding rule.
    pub fn with_seeding(seeding: Seeding) -> Self {
        TrieBuilder {
            dict: FeatureDict::new(),
            nodes: vec![TrieNode::new(FeatureId::EMPTY)],
            seeding,
            keys: 0,
            capacity: HashMap::new(),
        }
    }

    /// The seeding rule this builder tokenizes with.
    pub fn seeding(&self) -> Seeding {
        self.seeding
    }

    /// Inserts a key.
    ///
    /// Returns `true` if the key was not present before. Inserting a key a
    /// second time only re-walks its path.
    pub fn insert(&mut self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        let mut cursor = ROOT;
        let mut pos = 0;
        while pos < key.len() {
            let (feature, len) = matcher::next_token(&mut self.dict, &key[pos..], self.seeding);
            cursor = self.child_or_insert(cursor, feature);
            pos += len;
        }

        let node = &mut self.nodes[cursor as usize];
        let added = !node.leaf;
        node.leaf = true;
        self.keys += usize::from(added);
        added
    }

    /// Returns the child of `parent` labeled `feature`, appending one if
    /// there is none.
    ///
    /// A full child block that no longer ends at the array tail is copied
    /// there first, with room for twice as many children, so every block
    /// stays contiguous and later appends land in the spare slots. The stale
    /// copy and any unused spare slots are left behind unreachable.
    fn child_or_insert(&mut self, parent: NodeIndex, feature: FeatureId) -> NodeIndex {
        let node = self.nodes[parent as usize];
        if let Some(offset) = self.nodes[node.children()]
            .iter()
            .position(|child| child.feature == feature)
        {
            return node.child_index + to_index(offset);
        }

        let count = node.child_count();
        let tail = self.nodes.len();
        let child_index = if count == 0 {
            self.nodes.push(TrieNode::default());
            tail
        } else if count < self.block_capacity(&node) {
            node.child_index as usize
        } else if node.children().end == tail {
            self.nodes.push(TrieNode::default());
            if let Some(capacity) = self.capacity.get_mut(&node.child_index) {
                *capacity += 1;
            }
            node.child_index as usize
        } else {
            let grown = (count * 2).max(MIN_RELOCATED_CAPACITY);
            self.nodes.extend_from_within(node.children());
            self.nodes.resize(tail + grown, TrieNode::default());
            self.capacity.remove(&node.child_index);
            self.capacity.insert(to_index(tail), to_index(grown));
            tail
        };

        let slot = child_index + count;
        self.nodes[slot] = TrieNode::new(feature);
        let parent = &mut self.nodes[parent as usize];
        parent.child_index = to_index(child_index);
        parent.child_count += 1;
        to_index(slot)
    }

    /// Number of slots reserved for the child block of `node`.
    fn block_capacity(&self, node: &TrieNode) -> usize {
        self.capacity
            .get(&node.child_index)
            .map_or(node.child_count(), |&capacity| capacity as usize)
    }

    /// Reads keys from a text file, one per line, and inserts them.
    ///
    /// Trailing whitespace is trimmed. Empty lines and lines whose first
    /// non-blank character is `#` are skipped. Returns the number of keys
    /// that were new.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Io`] if the file cannot be opened or read.
    #[cfg(feature = "file")]
    pub fn insert_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BuildError::io(path, source))?;
        let mut reader = BufReader::new(file);

        // Reuse one line buffer instead of allocating a String per line.
        let mut buf = String::with_capacity(80);
        let mut added = 0;
        loop {
            buf.clear();
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(source) => return Err(BuildError::io(path, source)),
            }
            let key = buf.trim_end();
            if !key.is_empty() && !is_comment(key) {
                added += usize::from(self.insert(key));
            }
        }
        tracing::debug!(path = %path.display(), added, "loaded keys from file");
        Ok(added)
    }

    /// Number of distinct keys inserted so far.
    pub fn len(&self) -> usize {
        self.keys
    }

    /// True if no key has been inserted.
    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }

    /// Length of the uncompressed node array, unreachable entries included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The dictionary as built so far.
    pub fn dictionary(&self) -> &FeatureDict {
        &self.dict
    }

    /// Compresses the trie and freezes it for lookup.
    pub fn build(self) -> CompactTrie {
        CompactTrie::compress(self.dict, self.nodes, self.keys)
    }
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<str>> Extend<K> for TrieBuilder {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

/// Returns true if this line is a comment.
#[cfg(feature = "file")]
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Builds a compact trie from an iterator of keys.
///
/// # Examples
///
/// ```
/// let trie = feattrie::build(["hello", "hello world", "golang"]);
/// assert!(trie.contains("hello world"));
/// assert!(!trie.contains("hello w"));
/// ```
pub fn build<I>(keys: I) -> CompactTrie
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut builder = TrieBuilder::new();
    builder.extend(keys);
    builder.build()
}

/// Builds a compact trie from a key file (see [`TrieBuilder::insert_file`]).
///
/// # Examples
///
/// ```no_run
/// let trie = feattrie::build_from_file("keys.txt").unwrap();
/// ```
#[cfg(feature = "file")]
pub fn build_from_file(path: impl AsRef<Path>) -> Result<CompactTrie> {
    let mut builder = TrieBuilder::new();
    builder.insert_file(path)?;
    Ok(builder.build())
}
