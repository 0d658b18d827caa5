//! Pluggable equality and ordering policies.
//!
//! Set, relational, and grouping operators hash keys through an
//! `EqualityComparer` and confirm candidates with `equals`; ordering compares
//! keys through a `Comparer`. Implementations must keep `hash_key` consistent
//! with `equals`.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub trait EqualityComparer<K: ?Sized> {
    fn equals(&self, a: &K, b: &K) -> bool;
    fn hash_key(&self, key: &K) -> u64;
}

pub trait Comparer<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Structural equality (`Eq + Hash`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquality;

impl<K: Eq + Hash + ?Sized> EqualityComparer<K> for DefaultEquality {
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn hash_key(&self, key: &K) -> u64 {
        let mut h = DefaultHasher::new();
        key.hash(&mut h);
        h.finish()
    }
}

/// Natural ordering (`Ord`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparer<K> for NaturalOrder {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// ASCII case-insensitive equality and ordering for string-like keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAsciiCase;

impl<K: AsRef<str> + ?Sized> EqualityComparer<K> for IgnoreAsciiCase {
    fn equals(&self, a: &K, b: &K) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }

    fn hash_key(&self, key: &K) -> u64 {
        let mut h = DefaultHasher::new();
        for byte in key.as_ref().bytes() {
            h.write_u8(byte.to_ascii_lowercase());
        }
        h.finish()
    }
}

impl<K: AsRef<str> + ?Sized> Comparer<K> for IgnoreAsciiCase {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        let a = a.as_ref().bytes().map(|c| c.to_ascii_lowercase());
        let b = b.as_ref().bytes().map(|c| c.to_ascii_lowercase());
        a.cmp(b)
    }
}

/// Ordering from a plain comparison function, e.g. `f64::total_cmp`.
#[derive(Debug, Clone, Copy)]
pub struct FnComparer<F>(pub F);

impl<K: ?Sized, F> Comparer<K> for FnComparer<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

pub fn compare_by<K: ?Sized, F>(f: F) -> FnComparer<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    FnComparer(f)
}

/// Hash set of keys under a custom equality. Buckets by `hash_key`, then
/// confirms with `equals`.
pub(crate) struct KeySet<K, C> {
    buckets: HashMap<u64, Vec<K>>,
    comparer: Rc<C>,
}

impl<K, C: EqualityComparer<K>> KeySet<K, C> {
    pub(crate) fn new(comparer: Rc<C>) -> Self {
        Self {
            buckets: HashMap::new(),
            comparer,
        }
    }

    /// Returns `true` if `key` was not present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let comparer = &self.comparer;
        let bucket = self.buckets.entry(comparer.hash_key(&key)).or_default();
        if bucket.iter().any(|k| comparer.equals(k, &key)) {
            return false;
        }
        bucket.push(key);
        true
    }

    /// Returns `true` if `key` was present.
    pub(crate) fn remove(&mut self, key: &K) -> bool {
        let comparer = &self.comparer;
        if let Some(bucket) = self.buckets.get_mut(&comparer.hash_key(key)) {
            if let Some(pos) = bucket.iter().position(|k| comparer.equals(k, key)) {
                bucket.swap_remove(pos);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_set_deduplicates_under_the_policy() {
        let mut set = KeySet::new(Rc::new(IgnoreAsciiCase));
        assert!(set.insert("Tom".to_string()));
        assert!(!set.insert("TOM".to_string()));
        assert!(set.remove(&"tOm".to_string()));
        assert!(!set.remove(&"tom".to_string()));
        assert!(set.insert("tom".to_string()));
    }

    #[test]
    fn comparers() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(IgnoreAsciiCase.compare("abc", "ABD"), Ordering::Less);
        let floats = compare_by(|a: &f64, b: &f64| a.total_cmp(b));
        assert_eq!(floats.compare(&2.5, &1.0), Ordering::Greater);
    }
}
