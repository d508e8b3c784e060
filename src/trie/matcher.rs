//! Longest-prefix tokenization of keys against a [`FeatureDict`].
//!
//! Prefixes are only ever cut on `char` boundaries, and never past the
//! dictionary's longest feature.

use std::iter;

use super::feature_dict::{FeatureDict, FeatureId};

/// What the build-time tokenizer interns when no prefix of the unconsumed
/// input is in the dictionary yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Seeding {
    /// Intern the next single `char`. Builds a character trie that the
    /// compressor then folds into multi-character features.
    #[default]
    Char,
    /// Intern the whole unconsumed suffix, so the first key through a
    /// region of the trie lays down one long feature.
    Remainder,
}

/// Byte offsets at which a nonempty prefix of `suffix` may end.
fn prefix_ends(suffix: &str, limit: usize) -> impl Iterator<Item = usize> + '_ {
    suffix
        .char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(iter::once(suffix.len()))
        .filter(|&end| end > 0)
        .take_while(move |&end| end <= limit)
}

/// Every interned prefix of `suffix` as `(id, byte length)`, shortest first.
pub fn prefixes<'a>(
    dict: &'a FeatureDict,
    suffix: &'a str,
) -> impl Iterator<Item = (FeatureId, usize)> + 'a {
    prefix_ends(suffix, dict.max_len())
        .filter_map(move |end| dict.get(&suffix[..end]).map(|id| (id, end)))
}

/// The longest interned prefix of `suffix`, or `None` if no prefix is interned.
pub fn longest_match(dict: &FeatureDict, suffix: &str) -> Option<(FeatureId, usize)> {
    prefixes(dict, suffix).last()
}

/// Build-time tokenizer: the longest interned prefix of `suffix`, falling
/// back to seeding the dictionary so every call consumes at least one `char`.
///
/// `suffix` must not be empty.
pub fn next_token(dict: &mut FeatureDict, suffix: &str, seeding: Seeding) -> (FeatureId, usize) {
    debug_assert!(!suffix.is_empty(), "next_token called on exhausted input");
    if let Some(token) = longest_match(dict, suffix) {
        return token;
    }
    let len = match seeding {
        Seeding::Char => suffix.chars().next().map_or(0, char::len_utf8),
        Seeding::Remainder => suffix.len(),
    };
    (dict.intern(&suffix[..len]), len)
}
