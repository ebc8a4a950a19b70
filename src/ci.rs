use std::ops::Index;

use crate::{
    CiStr, MultiMap, MultiMapError,
    fold::{AsFoldedKey, IntoFoldedKey, fold, into_folded},
    iter::{Iter, Keys},
    storage::{Entries, GetAll},
    view::{ItemsView, KeysView, ValuesView},
};

/// Read-only case-insensitive ordered multimap.
///
/// Same as [`MultiMap`], but keys are folded into [`CiStr`] on construction and every lookup key
/// is folded before comparison. Stored keys are always in their folded form.
///
/// ```rust
/// use multidict::CiMultiMap;
///
/// let map = CiMultiMap::from([("Content-Type", "text/html")]);
///
/// assert_eq!(map["content-type"], "text/html");
/// assert_eq!(map.getone("CONTENT-TYPE"), Ok(&"text/html"));
/// assert_eq!(map.keys(true).as_slice()[0].as_str(), "CONTENT-TYPE");
/// ```
pub struct CiMultiMap<V> {
    pub(crate) map: MultiMap<CiStr, V>,
}

impl<V> CiMultiMap<V> {
    /// Create new empty [`CiMultiMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self {
            map: MultiMap::new(),
        }
    }

    /// Create new empty [`CiMultiMap`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: MultiMap::with_capacity(capacity),
        }
    }

    /// Create [`CiMultiMap`] from a source of pairs followed by extra pairs, folding every key.
    pub fn with_pairs<K, P, W>(positional: P, keyword: W) -> Self
    where
        K: IntoFoldedKey,
        P: IntoIterator<Item = (K, V)>,
        W: IntoIterator<Item = (K, V)>,
    {
        positional.into_iter().chain(keyword).collect()
    }

    /// Wrap entries whose keys are already folded.
    ///
    /// No folding pass is performed. Used when deriving one case-insensitive map from another,
    /// whose entries are known to be canonical.
    pub(crate) const fn from_folded(entries: Entries<CiStr, V>) -> Self {
        Self {
            map: MultiMap::from_entries(entries),
        }
    }

    pub(crate) fn entries(&self) -> &Entries<CiStr, V> {
        &self.map.entries
    }

    /// Returns the number of pairs, including duplicate keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map contains no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns an iterator over every pair, in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, CiStr, V> {
        self.map.iter()
    }

    /// Returns every pair as a slice, in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[(CiStr, V)] {
        self.map.as_slice()
    }

    /// Consume into [`MultiMap`] with folded keys.
    #[inline]
    pub fn into_inner(self) -> MultiMap<CiStr, V> {
        self.map
    }
}

// ===== Lookup =====

impl<V> CiMultiMap<V> {
    /// Returns an iterator over every value of given key, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`MultiMapError::KeyNotFound`] if the map does not contain the key.
    pub fn getall<K: AsFoldedKey>(&self, key: K) -> Result<GetAll<'_, CiStr, V>, MultiMapError> {
        let key = fold(&key);
        self.map.getall(&*key)
    }

    /// Returns the first value of given key.
    ///
    /// # Errors
    ///
    /// Returns [`MultiMapError::KeyNotFound`] if the map does not contain the key.
    #[inline]
    pub fn getone<K: AsFoldedKey>(&self, key: K) -> Result<&V, MultiMapError> {
        self.get(key).ok_or(MultiMapError::KeyNotFound)
    }

    /// Returns the first value of given key, if any.
    pub fn get<K: AsFoldedKey>(&self, key: K) -> Option<&V> {
        let key = fold(&key);
        self.map.get(&*key)
    }

    /// Returns `true` if the map contains a value for given key.
    pub fn contains_key<K: AsFoldedKey>(&self, key: K) -> bool {
        let key = fold(&key);
        self.map.contains_key(&*key)
    }
}

// ===== Views =====

impl<V> CiMultiMap<V> {
    /// Returns an iterator over unique folded keys, in first-occurrence order.
    #[inline]
    pub fn unique_keys(&self) -> Keys<'_, CiStr, V> {
        self.map.unique_keys()
    }

    /// Returns a snapshot of folded keys.
    ///
    /// If `getall` is `false`, only the first occurrence of each key is included.
    #[inline]
    pub fn keys(&self, getall: bool) -> KeysView<CiStr> {
        self.map.keys(getall)
    }

    /// Returns a snapshot of key and value pairs.
    ///
    /// If `getall` is `false`, only the first pair of each key is included.
    #[inline]
    pub fn items(&self, getall: bool) -> ItemsView<CiStr, V>
    where
        V: Clone,
    {
        self.map.items(getall)
    }

    /// Returns a snapshot of values.
    ///
    /// If `getall` is `false`, only the value of the first pair of each key is included.
    #[inline]
    pub fn values(&self, getall: bool) -> ValuesView<V>
    where
        V: Clone,
    {
        self.map.values(getall)
    }
}

// ===== Traits =====

impl<V: Clone> Clone for CiMultiMap<V> {
    fn clone(&self) -> Self {
        Self::from_folded(self.entries().clone())
    }
}

impl<V> Default for CiMultiMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for CiMultiMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for CiMultiMap<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl<V: Eq> Eq for CiMultiMap<V> { }

impl<K: AsFoldedKey, V> Index<K> for CiMultiMap<V> {
    type Output = V;

    /// Returns the first value of given key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map, use [`getone`][CiMultiMap::getone] for
    /// fallible lookup.
    #[inline]
    fn index(&self, key: K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", MultiMapError::KeyNotFound),
        }
    }
}

impl<K: IntoFoldedKey, V> FromIterator<(K, V)> for CiMultiMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let pairs = iter
            .into_iter()
            .map(|(key, value)| (into_folded(key), value))
            .collect();
        Self::from_folded(Entries::from_vec(pairs))
    }
}

impl<K: IntoFoldedKey, V, const N: usize> From<[(K, V); N]> for CiMultiMap<V> {
    #[inline]
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: IntoFoldedKey, V> From<Vec<(K, V)>> for CiMultiMap<V> {
    #[inline]
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: IntoFoldedKey, V> From<MultiMap<K, V>> for CiMultiMap<V> {
    #[inline]
    fn from(map: MultiMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<V> IntoIterator for CiMultiMap<V> {
    type Item = (CiStr, V);

    type IntoIter = std::vec::IntoIter<(CiStr, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a CiMultiMap<V> {
    type Item = &'a CiStr;

    type IntoIter = Keys<'a, CiStr, V>;

    /// Iterate unique folded keys, in first-occurrence order.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.unique_keys()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn map() -> CiMultiMap<i32> {
        CiMultiMap::from([("Accept", 1), ("host", 2), ("ACCEPT", 3)])
    }

    #[test]
    fn folds_on_construction() {
        let map = map();
        let keys = map.keys(true);
        assert_eq!(keys.as_slice(), [CiStr::new("ACCEPT"), CiStr::new("HOST"), CiStr::new("ACCEPT")]);
        assert!(map.iter().all(|(k, _)| k.chars().all(|c| !c.is_lowercase())));
    }

    #[test]
    fn lookup_folds() {
        let map = map();

        for key in ["accept", "Accept", "ACCEPT", "aCcEpT"] {
            assert_eq!(map.getall(key).unwrap().collect::<Vec<_>>(), [&1, &3]);
            assert_eq!(map.getone(key), Ok(&1));
            assert_eq!(map.get(key), Some(&1));
            assert_eq!(map[key], 1);
            assert!(map.contains_key(key));
        }

        assert!(map.contains_key(String::from("Host")));
        assert!(map.contains_key(&CiStr::new("host")));
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.getone("missing"), Err(MultiMapError::KeyNotFound));
        assert!(map.getall("missing").is_err());
    }

    #[test]
    fn views_and_iteration() {
        let map = map();
        assert_eq!(map.len(), 3);
        assert_eq!(map.items(false).len(), 2);
        assert_eq!(map.values(false).as_slice(), [1, 2]);

        let keys = (&map).into_iter().map(CiStr::as_str).collect::<Vec<_>>();
        assert_eq!(keys, ["ACCEPT", "HOST"]);
    }

    #[test]
    fn clone_and_eq() {
        let map = map();
        let copy = map.clone();
        assert_eq!(copy, map);
        assert_ne!(copy, CiMultiMap::from([("accept", 1)]));
        assert_eq!(CiMultiMap::from([("a", 1)]), CiMultiMap::from([("A", 1)]));
    }

    #[test]
    fn from_plain_map() {
        let plain = MultiMap::from([("x-id", 1), ("X-Id", 2)]);
        let map = CiMultiMap::from(plain);
        assert_eq!(map.getall("X-ID").unwrap().count(), 2);
        assert_eq!(map.into_inner().as_slice()[1].0.as_str(), "X-ID");
    }
}
