use std::fmt;

use hashbrown::HashMap;

/// Dense identifier of an interned feature.
///
/// Ids are handed out in first-seen order starting at zero, so they can be
/// used directly as indices into the dictionary's reverse table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub(crate) u32);

impl FeatureId {
    /// The empty feature. It is interned when a dictionary is created and
    /// labels the root of every trie.
    pub const EMPTY: FeatureId = FeatureId(0);

    /// Returns the id as a plain integer.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional interner between feature strings and [`FeatureId`]s.
///
/// The forward map answers `intern`/`get`, and an explicit id-indexed table
/// answers `resolve` in constant time.
#[derive(Clone)]
pub struct FeatureDict {
    ids: HashMap<Box<str>, FeatureId>,
    features: Vec<Box<str>>,
    max_len: usize,
}

impl FeatureDict {
    /// Creates a dictionary holding only the empty feature.
    pub fn new() -> Self {
        let mut dict = FeatureDict {
            ids: HashMap::new(),
            features: Vec::new(),
            max_len: 0,
        };
        let empty = dict.intern("");
        debug_assert_eq!(empty, FeatureId::EMPTY);
        dict
    }

    /// Returns the id of `feature`, assigning the next free id if it has not
    /// been seen before.
    pub fn intern(&mut self, feature: &str) -> FeatureId {
        if let Some(&id) = self.ids.get(feature) {
            return id;
        }
        let id = u32::try_from(self.features.len())
            .map(FeatureId)
            .expect("feature dictionary exceeds u32::MAX entries");
        let boxed: Box<str> = feature.into();
        self.max_len = self.max_len.max(boxed.len());
        self.features.push(boxed.clone());
        self.ids.insert(boxed, id);
        id
    }

    /// Returns the id of `feature` without interning it.
    #[inline]
    pub fn get(&self, feature: &str) -> Option<FeatureId> {
        self.ids.get(feature).copied()
    }

    /// Returns the feature string behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never handed out by this dictionary. Such an id can
    /// only come from a corrupted node array.
    #[inline]
    pub fn resolve(&self, id: FeatureId) -> &str {
        match self.features.get(id.index()) {
            Some(feature) => feature,
            None => panic!(
                "feature id {id} was never interned (dictionary holds {} features)",
                self.features.len()
            ),
        }
    }

    /// Number of interned features, the empty feature included.
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if nothing besides the empty feature has been interned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.len() <= 1
    }

    /// Byte length of the longest interned feature.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Iterates over `(id, feature)` pairs in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (FeatureId, &str)> + '_ {
        self.features
            .iter()
            .enumerate()
            .map(|(i, f)| (FeatureId(i as u32), &**f))
    }
}

impl Default for FeatureDict {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FeatureDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureDict")
            .field("len", &self.len())
            .field("max_len", &self.max_len)
            .finish()
    }
}
