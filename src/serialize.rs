//! `serde` support.
//!
//! Multimaps serialize as a map that may repeat keys, in insertion order. Deserializing accepts
//! either a map, keeping duplicate keys, or a sequence of key and value pairs.
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess, Visitor},
};
use std::marker::PhantomData;

use crate::{
    CiMultiMap, CiMutableMultiMap, CiStr, MultiMap, MultiMapError, MutableMultiMap,
    log::trace,
    storage::Entries,
};

// limit preallocation from untrusted size hints
const MAX_PREALLOC: usize = 4096;

// ===== Serialize =====

impl<K: Serialize, V: Serialize> Serialize for MultiMap<K, V> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<K: Serialize, V: Serialize> Serialize for MutableMultiMap<K, V> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (**self).serialize(serializer)
    }
}

impl<V: Serialize> Serialize for CiMultiMap<V> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<V: Serialize> Serialize for CiMutableMultiMap<V> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (**self).serialize(serializer)
    }
}

impl Serialize for CiStr {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ===== Deserialize =====

struct PairsVisitor<K, V> {
    _p: PhantomData<fn() -> (K, V)>,
}

impl<K, V> PairsVisitor<K, V> {
    const fn new() -> Self {
        Self { _p: PhantomData }
    }
}

impl<'de, K, V> Visitor<'de> for PairsVisitor<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = Vec<(K, V)>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(MultiMapError::InvalidArgument.message())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(pair) = access.next_entry()? {
            pairs.push(pair);
        }
        trace!("deserialized {} pairs from map", pairs.len());
        Ok(pairs)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(pair) = access.next_element::<(K, V)>()? {
            pairs.push(pair);
        }
        trace!("deserialized {} pairs from sequence", pairs.len());
        Ok(pairs)
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Deserialize<'de> for MultiMap<K, V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = deserializer.deserialize_any(PairsVisitor::new())?;
        Ok(MultiMap::from(pairs))
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Deserialize<'de> for MutableMultiMap<K, V> {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        MultiMap::deserialize(deserializer).map(MutableMultiMap::from)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CiMultiMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `CiStr` folds while deserializing
        let pairs = deserializer.deserialize_any(PairsVisitor::<CiStr, V>::new())?;
        Ok(CiMultiMap::from_folded(Entries::from_vec(pairs)))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CiMutableMultiMap<V> {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        CiMultiMap::deserialize(deserializer).map(CiMutableMultiMap::from)
    }
}

struct CiStrVisitor;

impl Visitor<'_> for CiStrVisitor {
    type Value = CiStr;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(CiStr::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(CiStr::from(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        match std::str::from_utf8(v) {
            Ok(s) => Ok(CiStr::new(s)),
            Err(_) => Err(E::invalid_value(de::Unexpected::Bytes(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for CiStr {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(CiStrVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn json_keeps_duplicates() {
        let map = MultiMap::from([("a", 1), ("b", 2), ("a", 3)]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":1,"b":2,"a":3}"#);

        let back = serde_json::from_str::<MultiMap<String, i32>>(&json).unwrap();
        assert_eq!(back.getall("a").unwrap().collect::<Vec<_>>(), [&1, &3]);
        assert_eq!(back.len(), 3);
    }

    #[test]
    fn json_sequence_of_pairs() {
        let map = serde_json::from_str::<MutableMultiMap<String, i32>>(r#"[["a",1],["b",2],["a",3]]"#)
            .unwrap();
        assert_eq!(map.items(false).len(), 2);
        assert_eq!(map.getone("a"), Ok(&1));
    }

    #[test]
    fn json_rejects_malformed() {
        assert!(serde_json::from_str::<MultiMap<String, i32>>(r#"[["a",1,2]]"#).is_err());
        assert!(serde_json::from_str::<MultiMap<String, i32>>(r#"[["a"]]"#).is_err());

        let err = serde_json::from_str::<MultiMap<String, i32>>("1").unwrap_err();
        assert!(err.to_string().contains(MultiMapError::InvalidArgument.message()));
    }

    #[test]
    fn json_case_insensitive() {
        let map = serde_json::from_str::<CiMultiMap<String>>(r#"{"Content-Type":"a","content-type":"b"}"#)
            .unwrap();
        assert_eq!(map.getall("CONTENT-TYPE").unwrap().count(), 2);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"CONTENT-TYPE":"a","CONTENT-TYPE":"b"}"#
        );

        let key = serde_json::from_str::<CiStr>(r#""x-id""#).unwrap();
        assert_eq!(key.as_str(), "X-ID");
    }

    #[test]
    fn urlencoded_query() {
        let map = serde_urlencoded::from_str::<MutableMultiMap<String, String>>("a=1&b=2&a=3").unwrap();
        assert_eq!(map.getall("a").unwrap().collect::<Vec<_>>(), ["1", "3"]);

        assert_eq!(serde_urlencoded::to_string(&map).unwrap(), "a=1&b=2&a=3");

        let map = serde_urlencoded::from_str::<CiMutableMultiMap<String>>("Tag=x&tag=y").unwrap();
        assert_eq!(map.getall("TAG").unwrap().count(), 2);
    }
}
