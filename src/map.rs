use std::{borrow::Borrow, hash::Hash, ops::Index};

use crate::{
    MultiMapError,
    iter::{Iter, Keys},
    storage::{Entries, GetAll, pair_from_row},
    view::{ItemsView, KeysView, ValuesView},
};

/// Read-only ordered multimap.
///
/// A map that can hold multiple values for the same key, preserving insertion order of every
/// pair. Useful for data that legitimately repeats keys, such as query strings or form fields.
///
/// Once constructed, a [`MultiMap`] cannot be mutated. Use [`MutableMultiMap`] for a map that
/// can be changed, and [`CiMultiMap`] for case-insensitive string keys.
///
/// ```rust
/// use multidict::MultiMap;
///
/// let map = MultiMap::from([("a", 1), ("b", 2), ("a", 3)]);
///
/// assert_eq!(map.getone("a"), Ok(&1));
/// assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), [&1, &3]);
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.items(false).into_iter().collect::<Vec<_>>(), [("a", 1), ("b", 2)]);
/// ```
///
/// # Equality
///
/// Two multimaps are equal when their pairs are equal, including order and duplicates.
///
/// Comparing against any other [`Mapping`], such as [`HashMap`], is asymmetric: the maps are equal
/// when, for the first value of every key in this map, looking up that key in the other mapping
/// returns an equal value. Keys that only exist in the other mapping are ignored.
///
/// ```rust
/// use std::collections::HashMap;
/// use multidict::MultiMap;
///
/// let map = MultiMap::from([("a", 1), ("a", 3)]);
///
/// assert!(map == HashMap::from([("a", 1), ("z", 0)]));
/// assert!(map != MultiMap::from([("a", 1)]));
/// ```
///
/// [`MutableMultiMap`]: crate::MutableMultiMap
/// [`CiMultiMap`]: crate::CiMultiMap
/// [`Mapping`]: crate::Mapping
/// [`HashMap`]: std::collections::HashMap
#[derive(Clone, PartialEq, Eq)]
pub struct MultiMap<K, V> {
    pub(crate) entries: Entries<K, V>,
}

impl<K, V> MultiMap<K, V> {
    /// Create new empty [`MultiMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Entries::new(),
        }
    }

    /// Create new empty [`MultiMap`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Entries::with_capacity(capacity),
        }
    }

    /// Create [`MultiMap`] from a source of pairs followed by extra pairs.
    ///
    /// `positional` may be another multimap, any map, or a sequence of pairs. Pairs of `keyword`
    /// are appended after it, in order.
    ///
    /// ```rust
    /// use multidict::MultiMap;
    ///
    /// let map = MultiMap::with_pairs([("a", 1)], [("b", 2), ("a", 3)]);
    /// assert_eq!(map, MultiMap::from([("a", 1), ("b", 2), ("a", 3)]));
    /// ```
    pub fn with_pairs<P, W>(positional: P, keyword: W) -> Self
    where
        P: IntoIterator<Item = (K, V)>,
        W: IntoIterator<Item = (K, V)>,
    {
        positional.into_iter().chain(keyword).collect()
    }

    pub(crate) const fn from_entries(entries: Entries<K, V>) -> Self {
        Self { entries }
    }

    /// Returns the number of pairs, including duplicate keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map contains no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over every pair, in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.entries.as_slice())
    }

    /// Returns every pair as a slice, in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[(K, V)] {
        self.entries.as_slice()
    }
}

impl<T> MultiMap<T, T> {
    /// Create [`MultiMap`] from untyped rows, each row must contains exactly key and value.
    ///
    /// ```rust
    /// use multidict::{MultiMap, MultiMapError};
    ///
    /// let map = MultiMap::try_from_rows([vec!["a", "1"], vec!["b", "2"]]).unwrap();
    /// assert_eq!(map.getone("b"), Ok(&"2"));
    ///
    /// let err = MultiMap::try_from_rows([vec!["a", "1"], vec!["b"]]).unwrap_err();
    /// assert_eq!(err, MultiMapError::InvalidArgument);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`MultiMapError::InvalidArgument`] if any row is not a pair.
    pub fn try_from_rows<I, R>(rows: I) -> Result<Self, MultiMapError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
    {
        rows.into_iter().map(pair_from_row).collect()
    }
}

// ===== Lookup =====

impl<K: Eq, V> MultiMap<K, V> {
    /// Returns an iterator over every value of given key, in insertion order.
    ///
    /// For a default value instead of an error, use [`unwrap_or_default`][Result::unwrap_or_default]
    /// which yields nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MultiMapError::KeyNotFound`] if the map does not contain the key.
    pub fn getall<Q>(&self, key: &Q) -> Result<GetAll<'_, K, V>, MultiMapError>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .get_all(|k| key == k.borrow())
            .ok_or(MultiMapError::KeyNotFound)
    }

    /// Returns the first value of given key.
    ///
    /// # Errors
    ///
    /// Returns [`MultiMapError::KeyNotFound`] if the map does not contain the key.
    pub fn getone<Q>(&self, key: &Q) -> Result<&V, MultiMapError>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.get(key).ok_or(MultiMapError::KeyNotFound)
    }

    /// Returns the first value of given key, if any.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.first(|k| key == k.borrow())
    }

    /// Returns `true` if the map contains a value for given key.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.position(|k| key == k.borrow()).is_some()
    }
}

// ===== Views =====

impl<K: Hash + Eq, V> MultiMap<K, V> {
    /// Returns an iterator over unique keys, in first-occurrence order.
    #[inline]
    pub fn unique_keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.entries.as_slice())
    }

    /// Returns a snapshot of keys.
    ///
    /// If `getall` is `false`, only the first occurrence of each key is included.
    pub fn keys(&self, getall: bool) -> KeysView<K>
    where
        K: Clone,
    {
        KeysView::new(self.entries.as_slice(), getall)
    }

    /// Returns a snapshot of key and value pairs.
    ///
    /// If `getall` is `false`, only the first pair of each key is included.
    pub fn items(&self, getall: bool) -> ItemsView<K, V>
    where
        K: Clone,
        V: Clone,
    {
        ItemsView::new(self.entries.as_slice(), getall)
    }

    /// Returns a snapshot of values.
    ///
    /// If `getall` is `false`, only the value of the first pair of each key is included.
    pub fn values(&self, getall: bool) -> ValuesView<V>
    where
        V: Clone,
    {
        ValuesView::new(self.entries.as_slice(), getall)
    }
}

// ===== Traits =====

impl<K, V> Default for MultiMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for MultiMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, Q, V> Index<&Q> for MultiMap<K, V>
where
    K: Eq + Borrow<Q>,
    Q: Eq + ?Sized,
{
    type Output = V;

    /// Returns the first value of given key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map, use [`getone`][MultiMap::getone] for fallible
    /// lookup.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", MultiMapError::KeyNotFound),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for MultiMap<K, V> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(Entries::from_vec(iter.into_iter().collect()))
    }
}

impl<K, V> From<Vec<(K, V)>> for MultiMap<K, V> {
    #[inline]
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::from_entries(Entries::from_vec(pairs))
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for MultiMap<K, V> {
    #[inline]
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_entries(Entries::from_vec(Vec::from(pairs)))
    }
}

impl<K, V> IntoIterator for MultiMap<K, V> {
    type Item = (K, V);

    type IntoIter = std::vec::IntoIter<(K, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_vec().into_iter()
    }
}

impl<'a, K: Hash + Eq, V> IntoIterator for &'a MultiMap<K, V> {
    type Item = &'a K;

    type IntoIter = Keys<'a, K, V>;

    /// Iterate unique keys, in first-occurrence order.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.unique_keys()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn map() -> MultiMap<String, i32> {
        MultiMap::from([
            ("a".to_owned(), 1),
            ("b".to_owned(), 2),
            ("a".to_owned(), 3),
        ])
    }

    #[test]
    fn lookup() {
        let map = map();

        assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), [&1, &3]);
        assert_eq!(map.getone("a"), Ok(&1));
        assert_eq!(map.get("b"), Some(&2));
        assert_eq!(map["a"], 1);

        assert_eq!(map.getall("z").unwrap_err(), MultiMapError::KeyNotFound);
        assert_eq!(map.getall("z").unwrap_or_default().count(), 0);
        assert_eq!(map.getone("z"), Err(MultiMapError::KeyNotFound));
        assert_eq!(map.get("z"), None);
        assert_eq!(map.get("z").unwrap_or(&7), &7);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_absent_key() {
        let _value = map()["z"];
    }

    #[test]
    fn mapping_contract() {
        let map = map();

        assert_eq!(map.len(), 3);
        assert!(!map.is_empty());
        assert!(map.contains_key("a"));
        assert!(!map.contains_key("z"));

        let keys = (&map).into_iter().collect::<Vec<_>>();
        assert_eq!(keys, ["a", "b"]);

        let pairs = map.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>();
        assert_eq!(pairs, [("a", 1), ("b", 2), ("a", 3)]);
    }

    #[test]
    fn construct() {
        let map = MultiMap::with_pairs(vec![("a", 1)], [("b", 2), ("a", 3)]);
        assert_eq!(map.as_slice(), [("a", 1), ("b", 2), ("a", 3)]);

        let from_other = MultiMap::with_pairs(map.clone(), []);
        assert_eq!(from_other, map);

        assert!(MultiMap::<&str, i32>::new().is_empty());
        assert!(MultiMap::<&str, i32>::default().is_empty());
    }

    #[test]
    fn rows() {
        let map = MultiMap::try_from_rows([["a", "1"], ["a", "2"]]).unwrap();
        assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), [&"1", &"2"]);

        let err = MultiMap::try_from_rows([vec!["a", "1", "2"]]).unwrap_err();
        assert_eq!(err, MultiMapError::InvalidArgument);
    }

    #[test]
    fn items_round_trip() {
        let map = map();
        assert_eq!(MultiMap::from_iter(map.items(true)), map);
        assert_eq!(map.clone(), map);
    }

    #[test]
    fn view_is_snapshot() {
        let map = map();
        let items = map.items(false);
        let keys = map.keys(true);
        drop(map);
        assert_eq!(items.len(), 2);
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn debug_as_map() {
        let map = MultiMap::from([("a", 1), ("a", 2)]);
        assert_eq!(format!("{map:?}"), r#"{"a": 1, "a": 2}"#);
    }
}
