use fnv::FnvHashSet;
use std::{hash::Hash, iter::FusedIterator, mem::take};

use crate::MultiMapError;

/// Ordered key and value pairs, duplicate keys allowed.
///
/// Every map in this crate owns exactly one [`Entries`]. Lookup functions take a predicate
/// instead of a key, so the caller decides how a query is compared against stored keys; the
/// case-insensitive maps fold the query once and compare folded keys only.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Entries<K, V> {
    pairs: Vec<(K, V)>,
}

impl<K, V> Entries<K, V> {
    pub(crate) const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { pairs: Vec::with_capacity(capacity) }
    }

    pub(crate) const fn from_vec(pairs: Vec<(K, V)>) -> Self {
        Self { pairs }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[(K, V)] {
        &self.pairs
    }

    pub(crate) fn into_vec(self) -> Vec<(K, V)> {
        self.pairs
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.pairs.reserve(additional);
    }

    #[inline]
    pub(crate) fn push(&mut self, key: K, value: V) {
        self.pairs.push((key, value));
    }

    pub(crate) fn clear(&mut self) {
        self.pairs.clear();
    }

    pub(crate) fn position<F: FnMut(&K) -> bool>(&self, mut matches: F) -> Option<usize> {
        self.pairs.iter().position(|(k, _)| matches(k))
    }

    pub(crate) fn first<F: FnMut(&K) -> bool>(&self, matches: F) -> Option<&V> {
        self.position(matches).map(|i| &self.pairs[i].1)
    }

    pub(crate) fn get_all<F: FnMut(&K) -> bool>(&self, matches: F) -> Option<GetAll<'_, K, V>> {
        self.position(matches).map(|i| GetAll::new(&self.pairs[i..]))
    }

    /// Removes every matching pair, preserving the order of the rest.
    ///
    /// Returns `None` without touching the storage if nothing matched.
    pub(crate) fn remove_all<F: FnMut(&K) -> bool>(&mut self, mut matches: F) -> Option<Vec<V>> {
        let start = self.position(&mut matches)?;

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.pairs.len() - 1);

        for (i, (key, value)) in take(&mut self.pairs).into_iter().enumerate() {
            // everything before `start` is already known not to match
            if i >= start && matches(&key) {
                removed.push(value);
            } else {
                kept.push((key, value));
            }
        }

        self.pairs = kept;
        Some(removed)
    }
}

impl<K: Eq, V> Entries<K, V> {
    /// Removes every pair with equal key, then appends a single pair at the end.
    pub(crate) fn replace(&mut self, key: K, value: V) {
        self.pairs.retain(|(k, _)| k != &key);
        self.pairs.push((key, value));
    }

    /// Returns the first value with equal key, appending the pair if there is none.
    pub(crate) fn get_or_push(&mut self, key: K, value: V) -> &V {
        let index = match self.position(|k| k == &key) {
            Some(index) => index,
            None => {
                self.pairs.push((key, value));
                self.pairs.len() - 1
            }
        };
        &self.pairs[index].1
    }
}

impl<K, V> Default for Entries<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Filter pairs to only the first occurrence of each key, in first-occurrence order.
pub(crate) fn first_per_key<K: Hash + Eq, V>(
    pairs: &[(K, V)],
) -> impl Iterator<Item = &(K, V)> {
    let mut seen = FnvHashSet::default();
    pairs.iter().filter_map(move |pair| seen.insert(&pair.0).then_some(pair))
}

/// Normalize an untyped row into a key and value pair.
///
/// A row must yield exactly two items.
pub(crate) fn pair_from_row<T, R: IntoIterator<Item = T>>(row: R) -> Result<(T, T), MultiMapError> {
    let mut row = row.into_iter();
    match (row.next(), row.next(), row.next()) {
        (Some(key), Some(value), None) => Ok((key, value)),
        _ => Err(MultiMapError::InvalidArgument),
    }
}

// ===== Iterator =====

/// Iterator over every value of one key, returned from `getall`.
///
/// Values are yielded in their original relative order.
pub struct GetAll<'a, K, V> {
    key: Option<&'a K>,
    iter: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> GetAll<'a, K, V> {
    /// `pairs` must start with the first match, its key is used to match the rest
    fn new(pairs: &'a [(K, V)]) -> Self {
        Self {
            key: pairs.first().map(|(k, _)| k),
            iter: pairs.iter(),
        }
    }

    /// Returns an iterator that yields nothing.
    #[inline]
    pub fn empty() -> Self {
        Self {
            key: None,
            iter: Default::default(),
        }
    }
}

impl<'a, K: Eq, V> Iterator for GetAll<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.key?;
        self.iter.find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.key {
            Some(_) => (0, Some(self.iter.len())),
            None => (0, Some(0)),
        }
    }
}

impl<K: Eq, V> FusedIterator for GetAll<'_, K, V> { }

impl<K, V> Default for GetAll<'_, K, V> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> Clone for GetAll<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            iter: self.iter.clone(),
        }
    }
}

impl<K: Eq, V: std::fmt::Debug> std::fmt::Debug for GetAll<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
