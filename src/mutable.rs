//! Mutable multimaps.
//!
//! [`MutableMultiMap`] and [`CiMutableMultiMap`] own their read-only counterpart and dereference
//! to it for every lookup and view, so reading behaves exactly the same for both.
use std::{borrow::Borrow, hash::Hash, ops::Deref};

use crate::{
    CiMultiMap, CiStr, MultiMap, MultiMapError, Unsupported,
    fold::{AsFoldedKey, IntoFoldedKey, fold, into_folded},
    iter::Keys,
    log::{debug, trace, warning},
    storage::Entries,
};

/// Mutable ordered multimap.
///
/// All read operations are provided by [`MultiMap`], which this type dereferences to.
///
/// ```rust
/// use multidict::MutableMultiMap;
///
/// let mut map = MutableMultiMap::from([("a", 1), ("b", 2), ("a", 3)]);
/// assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), [&1, &3]);
///
/// map.insert("a", 9);
/// assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), [&9]);
/// assert_eq!(map.as_slice(), [("b", 2), ("a", 9)]);
/// ```
///
/// [`pop`][MutableMultiMap::pop], [`popitem`][MutableMultiMap::popitem] and
/// [`update`][MutableMultiMap::update] are ambiguous for a multimap and always fail.
#[derive(Clone, PartialEq, Eq)]
pub struct MutableMultiMap<K, V> {
    map: MultiMap<K, V>,
}

impl<K, V> MutableMultiMap<K, V> {
    /// Create new empty [`MutableMultiMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self {
            map: MultiMap::new(),
        }
    }

    /// Create new empty [`MutableMultiMap`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: MultiMap::with_capacity(capacity),
        }
    }

    /// Create [`MutableMultiMap`] from a source of pairs followed by extra pairs.
    #[inline]
    pub fn with_pairs<P, W>(positional: P, keyword: W) -> Self
    where
        P: IntoIterator<Item = (K, V)>,
        W: IntoIterator<Item = (K, V)>,
    {
        Self {
            map: MultiMap::with_pairs(positional, keyword),
        }
    }

    const fn entries_mut(&mut self) -> &mut Entries<K, V> {
        &mut self.map.entries
    }

    /// Reserves capacity for at least `additional` more pairs.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.entries_mut().reserve(additional);
    }

    /// Append a key and value, keeping any previous value of the key.
    #[inline]
    pub fn add(&mut self, key: K, value: V) {
        self.entries_mut().push(key, value);
    }

    /// Removes every pair.
    #[inline]
    pub fn clear(&mut self) {
        self.entries_mut().clear();
    }

    /// Convert into read-only [`MultiMap`].
    #[inline]
    pub fn freeze(self) -> MultiMap<K, V> {
        self.map
    }

    /// Not supported, which value of a duplicated key to pop is ambiguous.
    ///
    /// # Errors
    ///
    /// Always returns [`MultiMapError::NotSupported`].
    pub fn pop<Q: ?Sized>(&mut self, _key: &Q) -> Result<V, MultiMapError> {
        debug!("pop is not supported");
        Err(MultiMapError::NotSupported(Unsupported::Pop))
    }

    /// Not supported, use [`remove`][MutableMultiMap::remove] instead.
    ///
    /// # Errors
    ///
    /// Always returns [`MultiMapError::NotSupported`].
    pub fn popitem(&mut self) -> Result<(K, V), MultiMapError> {
        debug!("popitem is not supported");
        Err(MultiMapError::NotSupported(Unsupported::PopItem))
    }

    /// Not supported, use [`extend`][Extend::extend] instead.
    ///
    /// # Errors
    ///
    /// Always returns [`MultiMapError::NotSupported`], the map is left untouched.
    pub fn update<I: IntoIterator<Item = (K, V)>>(&mut self, _pairs: I) -> Result<(), MultiMapError> {
        warning!("update is not supported on multimap, use extend instead");
        Err(MultiMapError::NotSupported(Unsupported::Update))
    }
}

impl<K: Eq, V> MutableMultiMap<K, V> {
    /// Replace every value of given key with a single value.
    ///
    /// Previous pairs of the key are removed, and the new pair is appended at the end.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.entries_mut().replace(key, value);
    }

    /// Removes every pair of given key, returning the removed values in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`MultiMapError::KeyNotFound`] if the map does not contain the key, the map is left
    /// untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Vec<V>, MultiMapError>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self.entries_mut().remove_all(|k| key == k.borrow()) {
            Some(values) => Ok(values),
            None => {
                debug!("remove: key not found");
                Err(MultiMapError::KeyNotFound)
            }
        }
    }

    /// Returns the first value of given key, inserting `default` if the key is not present.
    #[inline]
    pub fn setdefault(&mut self, key: K, default: V) -> &V {
        self.entries_mut().get_or_push(key, default)
    }
}

impl<K, V> Deref for MutableMultiMap<K, V> {
    type Target = MultiMap<K, V>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<K, V> Default for MutableMultiMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for MutableMultiMap<K, V> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.map, f)
    }
}

impl<K, V> Extend<(K, V)> for MutableMultiMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (additional, _) = iter.size_hint();
        trace!("extend with at least {additional} pairs");
        self.reserve(additional);
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<'a, K: Clone, V: Clone> Extend<(&'a K, &'a V)> for MutableMultiMap<K, V> {
    #[inline]
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl<K, V> FromIterator<(K, V)> for MutableMultiMap<K, V> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: MultiMap::from_iter(iter),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for MutableMultiMap<K, V> {
    #[inline]
    fn from(pairs: [(K, V); N]) -> Self {
        Self {
            map: MultiMap::from(pairs),
        }
    }
}

impl<K, V> From<Vec<(K, V)>> for MutableMultiMap<K, V> {
    #[inline]
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self {
            map: MultiMap::from(pairs),
        }
    }
}

impl<K, V> From<MultiMap<K, V>> for MutableMultiMap<K, V> {
    #[inline]
    fn from(map: MultiMap<K, V>) -> Self {
        Self { map }
    }
}

impl<K, V> IntoIterator for MutableMultiMap<K, V> {
    type Item = (K, V);

    type IntoIter = std::vec::IntoIter<(K, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a, K: Hash + Eq, V> IntoIterator for &'a MutableMultiMap<K, V> {
    type Item = &'a K;

    type IntoIter = Keys<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.map.unique_keys()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq<MultiMap<K, V>> for MutableMultiMap<K, V> {
    #[inline]
    fn eq(&self, other: &MultiMap<K, V>) -> bool {
        self.map == *other
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq<MutableMultiMap<K, V>> for MultiMap<K, V> {
    #[inline]
    fn eq(&self, other: &MutableMultiMap<K, V>) -> bool {
        *self == other.map
    }
}

// ===== Case Insensitive =====

/// Mutable case-insensitive ordered multimap.
///
/// All read operations are provided by [`CiMultiMap`], which this type dereferences to. Every
/// key passed to a mutation is folded first.
///
/// ```rust
/// use multidict::CiMutableMultiMap;
///
/// let mut map = CiMutableMultiMap::new();
/// map.add("Set-Cookie", "a=1");
/// map.add("set-cookie", "b=2");
/// assert_eq!(map.getall("SET-COOKIE").unwrap().count(), 2);
///
/// map.remove("Set-Cookie").unwrap();
/// assert!(map.is_empty());
/// ```
pub struct CiMutableMultiMap<V> {
    map: CiMultiMap<V>,
}

impl<V> CiMutableMultiMap<V> {
    /// Create new empty [`CiMutableMultiMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self {
            map: CiMultiMap::new(),
        }
    }

    /// Create new empty [`CiMutableMultiMap`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: CiMultiMap::with_capacity(capacity),
        }
    }

    /// Create [`CiMutableMultiMap`] from a source of pairs followed by extra pairs, folding every
    /// key.
    #[inline]
    pub fn with_pairs<K, P, W>(positional: P, keyword: W) -> Self
    where
        K: IntoFoldedKey,
        P: IntoIterator<Item = (K, V)>,
        W: IntoIterator<Item = (K, V)>,
    {
        Self {
            map: CiMultiMap::with_pairs(positional, keyword),
        }
    }

    const fn entries_mut(&mut self) -> &mut Entries<CiStr, V> {
        &mut self.map.map.entries
    }

    /// Reserves capacity for at least `additional` more pairs.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.entries_mut().reserve(additional);
    }

    /// Append a key and value, keeping any previous value of the key.
    #[inline]
    pub fn add<K: IntoFoldedKey>(&mut self, key: K, value: V) {
        self.entries_mut().push(into_folded(key), value);
    }

    /// Removes every pair.
    #[inline]
    pub fn clear(&mut self) {
        self.entries_mut().clear();
    }

    /// Replace every value of given key with a single value.
    ///
    /// Previous pairs of the key are removed, and the new pair is appended at the end.
    #[inline]
    pub fn insert<K: IntoFoldedKey>(&mut self, key: K, value: V) {
        self.entries_mut().replace(into_folded(key), value);
    }

    /// Removes every pair of given key, returning the removed values in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`MultiMapError::KeyNotFound`] if the map does not contain the key, the map is left
    /// untouched.
    pub fn remove<K: AsFoldedKey>(&mut self, key: K) -> Result<Vec<V>, MultiMapError> {
        let key = fold(&key);
        match self.entries_mut().remove_all(|k| k == &*key) {
            Some(values) => Ok(values),
            None => {
                debug!("remove: key not found");
                Err(MultiMapError::KeyNotFound)
            }
        }
    }

    /// Returns the first value of given key, inserting `default` if the key is not present.
    #[inline]
    pub fn setdefault<K: IntoFoldedKey>(&mut self, key: K, default: V) -> &V {
        self.entries_mut().get_or_push(into_folded(key), default)
    }

    /// Convert into read-only [`CiMultiMap`].
    #[inline]
    pub fn freeze(self) -> CiMultiMap<V> {
        self.map
    }

    /// Not supported, which value of a duplicated key to pop is ambiguous.
    ///
    /// # Errors
    ///
    /// Always returns [`MultiMapError::NotSupported`].
    pub fn pop<K: AsFoldedKey>(&mut self, _key: K) -> Result<V, MultiMapError> {
        debug!("pop is not supported");
        Err(MultiMapError::NotSupported(Unsupported::Pop))
    }

    /// Not supported, use [`remove`][CiMutableMultiMap::remove] instead.
    ///
    /// # Errors
    ///
    /// Always returns [`MultiMapError::NotSupported`].
    pub fn popitem(&mut self) -> Result<(CiStr, V), MultiMapError> {
        debug!("popitem is not supported");
        Err(MultiMapError::NotSupported(Unsupported::PopItem))
    }

    /// Not supported, use [`extend`][Extend::extend] instead.
    ///
    /// # Errors
    ///
    /// Always returns [`MultiMapError::NotSupported`], the map is left untouched.
    pub fn update<K, I>(&mut self, _pairs: I) -> Result<(), MultiMapError>
    where
        K: IntoFoldedKey,
        I: IntoIterator<Item = (K, V)>,
    {
        warning!("update is not supported on multimap, use extend instead");
        Err(MultiMapError::NotSupported(Unsupported::Update))
    }
}

impl<V> Deref for CiMutableMultiMap<V> {
    type Target = CiMultiMap<V>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<V: Clone> Clone for CiMutableMultiMap<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<V> Default for CiMutableMultiMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for CiMutableMultiMap<V> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.map, f)
    }
}

impl<K: IntoFoldedKey, V> Extend<(K, V)> for CiMutableMultiMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (additional, _) = iter.size_hint();
        trace!("extend with at least {additional} pairs");
        self.reserve(additional);
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K: IntoFoldedKey, V> FromIterator<(K, V)> for CiMutableMultiMap<V> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: CiMultiMap::from_iter(iter),
        }
    }
}

impl<K: IntoFoldedKey, V, const N: usize> From<[(K, V); N]> for CiMutableMultiMap<V> {
    #[inline]
    fn from(pairs: [(K, V); N]) -> Self {
        Self {
            map: CiMultiMap::from(pairs),
        }
    }
}

impl<K: IntoFoldedKey, V> From<Vec<(K, V)>> for CiMutableMultiMap<V> {
    #[inline]
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self {
            map: CiMultiMap::from(pairs),
        }
    }
}

impl<V> From<CiMultiMap<V>> for CiMutableMultiMap<V> {
    #[inline]
    fn from(map: CiMultiMap<V>) -> Self {
        Self { map }
    }
}

impl<V> IntoIterator for CiMutableMultiMap<V> {
    type Item = (CiStr, V);

    type IntoIter = std::vec::IntoIter<(CiStr, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a CiMutableMultiMap<V> {
    type Item = &'a CiStr;

    type IntoIter = Keys<'a, CiStr, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.map.unique_keys()
    }
}

impl<V: PartialEq> PartialEq for CiMutableMultiMap<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<V: Eq> Eq for CiMutableMultiMap<V> { }

impl<V: PartialEq> PartialEq<CiMultiMap<V>> for CiMutableMultiMap<V> {
    #[inline]
    fn eq(&self, other: &CiMultiMap<V>) -> bool {
        self.map == *other
    }
}

impl<V: PartialEq> PartialEq<CiMutableMultiMap<V>> for CiMultiMap<V> {
    #[inline]
    fn eq(&self, other: &CiMutableMultiMap<V>) -> bool {
        *self == other.map
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_appends() {
        let mut map = MutableMultiMap::from([("a", 1)]);
        map.add("a", 2);
        map.add("b", 3);

        assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), [&1, &2]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn insert_replaces_and_moves_to_end() {
        let mut map = MutableMultiMap::from([("a", 1), ("b", 2), ("a", 3)]);
        map.insert("a", 9);

        assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), [&9]);
        assert_eq!(map.items(true).as_slice(), [("b", 2), ("a", 9)]);

        map.insert("c", 4);
        assert_eq!(map.as_slice().last(), Some(&("c", 4)));
    }

    #[test]
    fn remove() {
        let mut map = MutableMultiMap::from([("a", 1), ("b", 2), ("a", 3)]);

        assert_eq!(map.remove("a"), Ok(vec![1, 3]));
        assert_eq!(map.as_slice(), [("b", 2)]);

        assert_eq!(map.remove("a"), Err(MultiMapError::KeyNotFound));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn setdefault() {
        let mut map = MutableMultiMap::from([("a", 1)]);
        assert_eq!(*map.setdefault("a", 5), 1);
        assert_eq!(map.len(), 1);
        assert_eq!(*map.setdefault("b", 5), 5);
        assert_eq!(map.as_slice(), [("a", 1), ("b", 5)]);
    }

    #[test]
    fn extend_and_clear() {
        let mut map = MutableMultiMap::new();
        map.extend([("a", 1), ("b", 2)]);
        map.extend(MultiMap::from([("a", 3)]));

        let other = MutableMultiMap::from([("c", 4)]);
        map.extend(other.iter());
        assert_eq!(map.as_slice(), [("a", 1), ("b", 2), ("a", 3), ("c", 4)]);

        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn unsupported() {
        let mut map = MutableMultiMap::from([("a", 1)]);

        assert_eq!(map.pop("a"), Err(MultiMapError::NotSupported(Unsupported::Pop)));
        assert_eq!(map.popitem(), Err(MultiMapError::NotSupported(Unsupported::PopItem)));
        assert_eq!(
            map.update([("a", 2)]),
            Err(MultiMapError::NotSupported(Unsupported::Update))
        );
        assert_eq!(map.as_slice(), [("a", 1)]);
    }

    #[test]
    fn equality_across_mutability() {
        let map = MutableMultiMap::from([("a", 1), ("a", 2)]);
        let frozen = MultiMap::from([("a", 1), ("a", 2)]);
        assert!(map == frozen);
        assert!(frozen == map);
        assert_eq!(map.clone().freeze(), frozen);
        assert_eq!(MutableMultiMap::from(frozen), map);
    }

    #[test]
    fn iterate_unique_keys() {
        let map = MutableMultiMap::from([("a", 1), ("b", 2), ("a", 3)]);
        let mut keys = Vec::new();
        for key in &map {
            keys.push(*key);
        }
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn case_insensitive_mutation_folds() {
        let mut map = CiMutableMultiMap::new();
        map.add("Accept", 1);
        map.add("accept", 2);
        map.add(String::from("Host"), 3);

        assert_eq!(map.getall("ACCEPT").unwrap().collect::<Vec<_>>(), [&1, &2]);

        map.insert("aCCept", 9);
        assert_eq!(map.getall("accept").unwrap().collect::<Vec<_>>(), [&9]);
        assert_eq!(map.keys(true).as_slice(), [CiStr::new("host"), CiStr::new("accept")]);

        assert_eq!(*map.setdefault("host", 0), 3);
        assert_eq!(*map.setdefault("Date", 0), 0);
        assert!(map.contains_key("DATE"));

        assert_eq!(map.remove("HOST"), Ok(vec![3]));
        assert_eq!(map.remove("host"), Err(MultiMapError::KeyNotFound));
        assert_eq!(map.len(), 2);

        map.extend([("x-a", 1), ("X-A", 2)]);
        assert_eq!(map.getall("x-a").unwrap().count(), 2);
        assert!(map.iter().all(|(k, _)| k.chars().all(|c| !c.is_lowercase())));
    }

    #[test]
    fn case_insensitive_unsupported_and_freeze() {
        let mut map = CiMutableMultiMap::from([("a", 1)]);
        assert!(map.pop("a").is_err());
        assert!(map.popitem().is_err());
        assert!(map.update([("a", 2)]).is_err());

        let frozen = map.clone().freeze();
        assert!(map == frozen);
        assert!(frozen == map);
        assert_eq!(frozen["A"], 1);
    }
}
