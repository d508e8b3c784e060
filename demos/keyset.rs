//! Example: building a keyword set on top of a compact feature trie.
//!
//! Shows how the compressed structure looks next to the keys it was built
//! from: the features the compressor produced, and how lookups behave for
//! keys, extensions and prefixes.
//!
//! Run with: cargo run --example keyset

use feattrie::{CompactTrie, Seeding, TrieBuilder};

/// A keyword set that also reports why a candidate was rejected.
struct Keywords {
    trie: CompactTrie,
}

impl Keywords {
    fn new(seeding: Seeding, words: &[&str]) -> Self {
        let mut builder = TrieBuilder::with_seeding(seeding);
        builder.extend(words);
        Keywords {
            trie: builder.build(),
        }
    }

    fn describe(&self, candidate: &str) -> &'static str {
        if self.trie.contains(candidate) {
            "keyword"
        } else if self.trie.keys().any(|k| k.starts_with(candidate)) {
            "prefix of a keyword"
        } else {
            "unknown"
        }
    }

    /// Labels of the root's children, in the order lookups search them.
    fn top_level_features(&self) -> Vec<&str> {
        let root = self.trie.root();
        self.trie
            .children(root)
            .iter()
            .map(|child| self.trie.label(child))
            .collect()
    }
}

fn main() {
    let words = [
        "hello",
        "world",
        "hello world",
        "hello go",
        "golang",
        "go programming",
        "programming in go",
        "data structures",
        "algorithms",
    ];

    for seeding in [Seeding::Char, Seeding::Remainder] {
        let keywords = Keywords::new(seeding, &words);
        println!("{seeding:?} seeding: {:?}", keywords.trie);
        println!("  root label: {:?}", keywords.trie.label(keywords.trie.root()));
        println!("  top-level features: {:?}", keywords.top_level_features());
        println!(
            "  reachable nodes: {} of {}",
            keywords.trie.reachable_node_count(),
            keywords.trie.node_count()
        );

        for candidate in ["hello", "hello world!", "go", "algorithm", "data", "golang"] {
            println!("  {candidate:?}: {}", keywords.describe(candidate));
        }
        println!();
    }
}
