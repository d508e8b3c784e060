/// Builder that collects keys into an uncompressed feature trie.
pub mod builder;
/// The frozen, compressed trie and its lookup.
pub mod compact;
/// Breadth-first path compression and sibling fan-in.
pub(crate) mod compress;
/// Errors raised while loading keys from a file.
#[cfg(feature = "file")]
pub mod error;
/// Interning of feature strings to dense ids.
pub mod feature_dict;
/// Longest-prefix tokenization against the feature dictionary.
pub mod matcher;
/// Flat node representation shared by builder and compact trie.
pub mod node;

#[cfg(feature = "file")]
pub use builder::build_from_file;
pub use builder::{build, TrieBuilder};
pub use compact::{CompactTrie, Keys};
#[cfg(feature = "file")]
pub use error::{BuildError, Result};
pub use feature_dict::{FeatureDict, FeatureId};
pub use matcher::Seeding;
pub use node::{NodeIndex, TrieNode};
