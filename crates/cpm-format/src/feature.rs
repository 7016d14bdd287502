//! Feature name sets
//!
//! A feature is a named capability (usually a token name) that first became
//! valid at some format version. Names compare case-insensitively.

use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter};

/// Case-insensitive set of feature names
///
/// Keeps the first spelling inserted for each name and iterates in insertion
/// order, so error messages and listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    names: IndexMap<String, String>,
}

impl FeatureSet {
    /// Create an empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: IndexMap::new(),
        }
    }

    /// Insert a name, returning whether it was not already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let key = fold(&name);
        if self.names.contains_key(&key) {
            return false;
        }
        self.names.insert(key, name);
        true
    }

    /// Check membership, ignoring case
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&fold(name))
    }

    /// Number of names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate names in their original spelling
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }

    /// Union of two sets; spellings from `self` win
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(other.iter().map(str::to_string));
        merged
    }

    /// Names present in both sets, in `self`'s order and spelling
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter().filter(|name| other.contains(name)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for FeatureSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

impl Display for FeatureSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

#[inline]
fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}
