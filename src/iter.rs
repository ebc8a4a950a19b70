use fnv::FnvHashSet;
use std::{hash::Hash, iter::FusedIterator};

/// Iterator over every key and value pair of a multimap, in insertion order.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    iter: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(pairs: &'a [(K, V)]) -> Self {
        Self { iter: pairs.iter() }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> { }
impl<K, V> FusedIterator for Iter<'_, K, V> { }

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

/// Iterator over unique keys of a multimap, in first-occurrence order.
///
/// This is what iterating a borrowed multimap yields.
#[derive(Debug)]
pub struct Keys<'a, K, V> {
    iter: std::slice::Iter<'a, (K, V)>,
    seen: FnvHashSet<&'a K>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(pairs: &'a [(K, V)]) -> Self {
        Self {
            iter: pairs.iter(),
            seen: FnvHashSet::default(),
        }
    }
}

impl<'a, K: Hash + Eq, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, _) = self.iter.next()?;
            if self.seen.insert(key) {
                return Some(key);
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.iter.len()))
    }
}

impl<K: Hash + Eq, V> FusedIterator for Keys<'_, K, V> { }

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unique_keys_in_first_occurrence_order() {
        let pairs = [("b", 1), ("a", 2), ("b", 3), ("c", 4), ("a", 5)];
        let keys = Keys::new(&pairs).collect::<Vec<_>>();
        assert_eq!(keys, [&"b", &"a", &"c"]);
    }

    #[test]
    fn every_pair() {
        let pairs = [("b", 1), ("b", 3)];
        let mut iter = Iter::new(&pairs);
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some((&"b", &1)));
        assert_eq!(iter.next_back(), Some((&"b", &3)));
        assert!(iter.next().is_none());
    }
}
