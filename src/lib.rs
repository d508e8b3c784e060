//! # feattrie
//!
//! A compact trie for exact membership lookup over a fixed set of strings.
//!
//! Edges are not single characters but variable-length *features*: strings
//! interned into a dictionary while keys are inserted. Once all keys are in,
//! a breadth-first compression pass collapses single-child chains into
//! concatenated features and fuses siblings that share a feature. The result
//! is a flat, read-only node array searched by binary search over sorted
//! sibling blocks.
//!
//! ## Features
//!
//! - **Flat**: nodes live in one `Vec` and refer to children by index, so the
//!   structure holds no pointers
//! - **Frozen after build**: [`CompactTrie`] exposes only `&self` methods and is
//!   `Send + Sync`
//! - **Configurable tokenization**: [`Seeding`] picks what the builder interns
//!   when no known feature matches
//!
//! ## Quick Start
//!
//! ```
//! let trie = feattrie::build(["hello", "hello world", "hello go", "golang"]);
//!
//! assert!(trie.contains("hello go"));
//! assert!(!trie.contains("hello g"));
//! assert!(!trie.contains("go"));
//! ```
//!
//! For control over tokenization, use a [`TrieBuilder`]:
//!
//! ```
//! use feattrie::{Seeding, TrieBuilder};
//!
//! let mut builder = TrieBuilder::with_seeding(Seeding::Remainder);
//! builder.insert("data structures");
//! builder.insert("algorithms");
//! let trie = builder.build();
//!
//! assert!(trie.contains("algorithms"));
//! assert_eq!(trie.len(), 2);
//! ```

#![warn(missing_docs)]

/// Feature trie: dictionary, tokenizer, builder, compressor and lookup.
pub mod trie;

#[cfg(feature = "file")]
pub use trie::{build_from_file, BuildError, Result};
pub use trie::{
    build, CompactTrie, FeatureDict, FeatureId, Keys, NodeIndex, Seeding, TrieBuilder, TrieNode,
};
