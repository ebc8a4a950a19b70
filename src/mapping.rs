//! Comparison against arbitrary mappings.
use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
};

use crate::{CiMultiMap, CiMutableMultiMap, CiStr, MultiMap, MutableMultiMap, storage::first_per_key};

/// Key to single value lookup, the right hand side of asymmetric multimap equality.
///
/// Multimaps implement this by returning the first value of a key.
pub trait Mapping<K, V> {
    /// Returns the value of given key, if any.
    fn lookup(&self, key: &K) -> Option<&V>;
}

impl<K: Hash + Eq, V, S: BuildHasher> Mapping<K, V> for HashMap<K, V, S> {
    #[inline]
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Ord, V> Mapping<K, V> for BTreeMap<K, V> {
    #[inline]
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Eq, V> Mapping<K, V> for MultiMap<K, V> {
    #[inline]
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Eq, V> Mapping<K, V> for MutableMultiMap<K, V> {
    #[inline]
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<V> Mapping<CiStr, V> for CiMultiMap<V> {
    #[inline]
    fn lookup(&self, key: &CiStr) -> Option<&V> {
        self.get(key)
    }
}

impl<V> Mapping<CiStr, V> for CiMutableMultiMap<V> {
    #[inline]
    fn lookup(&self, key: &CiStr) -> Option<&V> {
        self.get(key)
    }
}

fn eq_first_values<K, V, M>(pairs: &[(K, V)], other: &M) -> bool
where
    K: Hash + Eq,
    V: PartialEq,
    M: Mapping<K, V> + ?Sized,
{
    first_per_key(pairs).all(|(key, value)| other.lookup(key).is_some_and(|v| value == v))
}

impl<K: Hash + Eq, V: PartialEq> MultiMap<K, V> {
    /// Returns `true` if the first value of every key equals the value `other` holds for it.
    ///
    /// Keys only present in `other` are not considered.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use multidict::MultiMap;
    ///
    /// let map = MultiMap::from([("a", 1), ("a", 2)]);
    /// assert!(map.eq_mapping(&BTreeMap::from([("a", 1), ("b", 0)])));
    /// assert!(!map.eq_mapping(&BTreeMap::from([("a", 2)])));
    /// ```
    pub fn eq_mapping<M: Mapping<K, V> + ?Sized>(&self, other: &M) -> bool {
        eq_first_values(self.as_slice(), other)
    }
}

impl<V: PartialEq> CiMultiMap<V> {
    /// Returns `true` if the first value of every folded key equals the value `other` holds for
    /// it.
    ///
    /// Keys only present in `other` are not considered.
    pub fn eq_mapping<M: Mapping<CiStr, V> + ?Sized>(&self, other: &M) -> bool {
        eq_first_values(self.as_slice(), other)
    }
}

macro_rules! mapping_eq {
    ($($ty:ident),*) => {$(
        impl<K: Hash + Eq, V: PartialEq, S: BuildHasher> PartialEq<HashMap<K, V, S>> for $ty<K, V> {
            #[inline]
            fn eq(&self, other: &HashMap<K, V, S>) -> bool {
                self.eq_mapping(other)
            }
        }

        impl<K: Hash + Ord, V: PartialEq> PartialEq<BTreeMap<K, V>> for $ty<K, V> {
            #[inline]
            fn eq(&self, other: &BTreeMap<K, V>) -> bool {
                self.eq_mapping(other)
            }
        }
    )*};
}

macro_rules! ci_mapping_eq {
    ($($ty:ident),*) => {$(
        impl<V: PartialEq, S: BuildHasher> PartialEq<HashMap<CiStr, V, S>> for $ty<V> {
            #[inline]
            fn eq(&self, other: &HashMap<CiStr, V, S>) -> bool {
                self.eq_mapping(other)
            }
        }

        impl<V: PartialEq> PartialEq<BTreeMap<CiStr, V>> for $ty<V> {
            #[inline]
            fn eq(&self, other: &BTreeMap<CiStr, V>) -> bool {
                self.eq_mapping(other)
            }
        }
    )*};
}

mapping_eq!(MultiMap, MutableMultiMap);
ci_mapping_eq!(CiMultiMap, CiMutableMultiMap);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_value_decides() {
        let map = MultiMap::from([("a", 1), ("b", 2), ("a", 3)]);

        assert!(map == HashMap::from([("a", 1), ("b", 2)]));
        assert!(map != HashMap::from([("a", 3), ("b", 2)]));
        assert!(map != HashMap::from([("a", 1)]));
        assert!(map == BTreeMap::from([("a", 1), ("b", 2)]));
    }

    #[test]
    fn asymmetric() {
        let map = MultiMap::from([("a", 1)]);
        let other = HashMap::from([("a", 1), ("z", 26)]);
        assert!(map == other);
        assert!(MultiMap::<&str, i32>::new() == other);
    }

    #[test]
    fn against_multimap() {
        let map = MutableMultiMap::from([("a", 1), ("a", 2)]);
        let other = MultiMap::from([("a", 1), ("b", 5)]);

        assert!(map.eq_mapping(&other));
        // element-wise
        assert!(map != other);
        assert!(map == HashMap::from([("a", 1)]));
    }

    #[test]
    fn case_insensitive() {
        let map = CiMultiMap::from([("Accept", 1), ("accept", 2)]);

        assert!(map == HashMap::from([(CiStr::new("accept"), 1)]));
        assert!(map != BTreeMap::from([(CiStr::new("ACCEPT"), 2)]));

        let mutable = CiMutableMultiMap::from([("Host", "a")]);
        assert!(mutable == BTreeMap::from([(CiStr::new("host"), "a")]));
        assert!(mutable.eq_mapping(&CiMultiMap::from([("HOST", "a")])));
    }
}
