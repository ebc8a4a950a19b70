//! Snapshot views over multimap entries.
//!
//! A view is materialized when it is requested and owns a filtered copy of the entries. Mutating
//! the map afterwards does not change a view that already exists.
use std::{borrow::Borrow, hash::Hash};

use crate::storage::first_per_key;

/// Copy the projection of every pair, or of only the first pair of each key.
fn snapshot<'a, K, V, T, F>(pairs: &'a [(K, V)], getall: bool, project: F) -> Vec<T>
where
    K: Hash + Eq,
    F: FnMut(&'a (K, V)) -> T,
{
    if getall {
        pairs.iter().map(project).collect()
    } else {
        first_per_key(pairs).map(project).collect()
    }
}

// ===== Keys =====

/// Snapshot of multimap keys, returned from `keys`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeysView<K> {
    keys: Vec<K>,
}

impl<K: Hash + Eq + Clone> KeysView<K> {
    pub(crate) fn new<V>(pairs: &[(K, V)], getall: bool) -> Self {
        Self {
            keys: snapshot(pairs, getall, |(k, _)| k.clone()),
        }
    }
}

impl<K> KeysView<K> {
    /// Returns the number of keys in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the view contains no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if the view contains given key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.keys.iter().any(|k| key == k.borrow())
    }

    /// Returns an iterator over the keys.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    /// Returns the keys as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }
}

impl<K> IntoIterator for KeysView<K> {
    type Item = K;

    type IntoIter = std::vec::IntoIter<K>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a KeysView<K> {
    type Item = &'a K;

    type IntoIter = std::slice::Iter<'a, K>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

// ===== Items =====

/// Snapshot of multimap key and value pairs, returned from `items`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemsView<K, V> {
    items: Vec<(K, V)>,
}

impl<K: Hash + Eq + Clone, V: Clone> ItemsView<K, V> {
    pub(crate) fn new(pairs: &[(K, V)], getall: bool) -> Self {
        Self {
            items: snapshot(pairs, getall, Clone::clone),
        }
    }
}

impl<K, V> ItemsView<K, V> {
    /// Returns the number of pairs in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the view contains no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the view contains exactly given key and value pair.
    pub fn contains(&self, item: &(K, V)) -> bool
    where
        K: PartialEq,
        V: PartialEq,
    {
        self.items.contains(item)
    }

    /// Returns an iterator over the pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> {
        self.items.iter().map(|(k, v)| (k, v))
    }

    /// Returns the pairs as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[(K, V)] {
        &self.items
    }
}

impl<K, V> IntoIterator for ItemsView<K, V> {
    type Item = (K, V);

    type IntoIter = std::vec::IntoIter<(K, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a ItemsView<K, V> {
    type Item = &'a (K, V);

    type IntoIter = std::slice::Iter<'a, (K, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ===== Values =====

/// Snapshot of multimap values, returned from `values`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValuesView<V> {
    values: Vec<V>,
}

impl<V: Clone> ValuesView<V> {
    pub(crate) fn new<K: Hash + Eq>(pairs: &[(K, V)], getall: bool) -> Self {
        Self {
            values: snapshot(pairs, getall, |(_, v)| v.clone()),
        }
    }
}

impl<V> ValuesView<V> {
    /// Returns the number of values in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the view contains no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if the view contains given value.
    ///
    /// This is a linear scan.
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values.contains(value)
    }

    /// Returns an iterator over the values.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.values.iter()
    }

    /// Returns the values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }
}

impl<V> IntoIterator for ValuesView<V> {
    type Item = V;

    type IntoIter = std::vec::IntoIter<V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a ValuesView<V> {
    type Item = &'a V;

    type IntoIter = std::slice::Iter<'a, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PAIRS: [(&str, i32); 4] = [("a", 1), ("b", 2), ("a", 3), ("c", 2)];

    #[test]
    fn all_occurrences() {
        let keys = KeysView::new(&PAIRS, true);
        let items = ItemsView::new(&PAIRS, true);
        let values = ValuesView::new(&PAIRS, true);

        assert_eq!(keys.as_slice(), ["a", "b", "a", "c"]);
        assert_eq!(items.as_slice(), PAIRS);
        assert_eq!(values.as_slice(), [1, 2, 3, 2]);
        assert_eq!(keys.len(), 4);
        assert_eq!(items.len(), 4);
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn first_occurrence_only() {
        let keys = KeysView::new(&PAIRS, false);
        let items = ItemsView::new(&PAIRS, false);
        let values = ValuesView::new(&PAIRS, false);

        assert_eq!(keys.as_slice(), ["a", "b", "c"]);
        assert_eq!(items.as_slice(), [("a", 1), ("b", 2), ("c", 2)]);
        assert_eq!(values.as_slice(), [1, 2, 2]);
        assert_eq!(keys.len(), items.len());
        assert_eq!(items.len(), values.len());
    }

    #[test]
    fn containment() {
        let keys = KeysView::new(&PAIRS, false);
        assert!(keys.contains("a"));
        assert!(!keys.contains("z"));

        let items = ItemsView::new(&PAIRS, false);
        assert!(items.contains(&("a", 1)));
        // suppressed duplicate
        assert!(!items.contains(&("a", 3)));

        let values = ValuesView::new(&PAIRS, true);
        assert!(values.contains(&3));
        assert!(!values.contains(&4));

        let empty = ItemsView::<&str, i32>::new(&[], true);
        assert!(empty.is_empty());
    }
}
