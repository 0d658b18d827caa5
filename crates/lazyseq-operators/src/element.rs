//! Terminal element accessors, quantifiers, and materializers.
//!
//! Accessors without a predicate report `EmptySequence`; with a predicate
//! they report `NoMatch`. The `_or_default` / `_or` forms return a fallback
//! instead, except that `single*` still fails when more than one element
//! qualifies.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use lazyseq_core::error::{Error, Result};
use lazyseq_core::index::Index;

use crate::equality::EqualityComparer;
use crate::sequence::Sequence;
use crate::traits::drain;

impl<T: 'static> Sequence<T> {
    /// Realize every element.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        drain(&mut self.cursor())
    }

    fn first_matching<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<Option<T>> {
        let mut cursor = self.cursor();
        while let Some(item) = cursor.try_next()? {
            if predicate(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn last_matching<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<Option<T>> {
        let mut cursor = self.cursor();
        let mut last = None;
        while let Some(item) = cursor.try_next()? {
            if predicate(&item) {
                last = Some(item);
            }
        }
        Ok(last)
    }

    /// Stops pulling at the second qualifying element.
    fn single_matching<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<Option<T>> {
        let mut cursor = self.cursor();
        let mut found = None;
        while let Some(item) = cursor.try_next()? {
            if predicate(&item) {
                if found.is_some() {
                    return Err(Error::MultipleElementsMatch);
                }
                found = Some(item);
            }
        }
        Ok(found)
    }

    /// The element at `index`, or the sequence length when `index` points
    /// outside it.
    fn locate(&self, index: Index) -> Result<std::result::Result<T, usize>> {
        match index {
            Index::FromStart(i) => {
                let mut cursor = self.cursor();
                let mut seen = 0;
                while let Some(item) = cursor.try_next()? {
                    if seen == i {
                        return Ok(Ok(item));
                    }
                    seen += 1;
                }
                Ok(Err(seen))
            }
            Index::FromEnd(_) => {
                let items = self.to_vec()?;
                let len = items.len();
                Ok(index
                    .offset(len)
                    .and_then(|i| items.into_iter().nth(i))
                    .ok_or(len))
            }
        }
    }

    /// Element at `index`; `^k` counts from the end and realizes the input.
    pub fn element_at(&self, index: impl Into<Index>) -> Result<T> {
        let index = index.into();
        self.locate(index)?.map_err(|len| Error::IndexOutOfRange {
            index: index.to_string(),
            len,
        })
    }

    pub fn element_at_or(&self, index: impl Into<Index>, default: T) -> Result<T> {
        Ok(self.locate(index.into())?.unwrap_or(default))
    }

    pub fn first(&self) -> Result<T> {
        self.first_matching(|_| true)?.ok_or(Error::EmptySequence)
    }

    pub fn first_where<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<T> {
        self.first_matching(predicate)?.ok_or(Error::NoMatch)
    }

    pub fn first_or(&self, default: T) -> Result<T> {
        Ok(self.first_matching(|_| true)?.unwrap_or(default))
    }

    pub fn first_where_or<P: Fn(&T) -> bool>(&self, predicate: P, default: T) -> Result<T> {
        Ok(self.first_matching(predicate)?.unwrap_or(default))
    }

    pub fn last(&self) -> Result<T> {
        self.last_matching(|_| true)?.ok_or(Error::EmptySequence)
    }

    pub fn last_where<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<T> {
        self.last_matching(predicate)?.ok_or(Error::NoMatch)
    }

    pub fn last_or(&self, default: T) -> Result<T> {
        Ok(self.last_matching(|_| true)?.unwrap_or(default))
    }

    pub fn last_where_or<P: Fn(&T) -> bool>(&self, predicate: P, default: T) -> Result<T> {
        Ok(self.last_matching(predicate)?.unwrap_or(default))
    }

    /// The only element. Fails on an empty sequence and on more than one.
    pub fn single(&self) -> Result<T> {
        self.single_matching(|_| true)?.ok_or(Error::EmptySequence)
    }

    pub fn single_where<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<T> {
        self.single_matching(predicate)?.ok_or(Error::NoMatch)
    }

    /// `default` for an empty sequence; still `MultipleElementsMatch` for more
    /// than one element.
    pub fn single_or(&self, default: T) -> Result<T> {
        Ok(self.single_matching(|_| true)?.unwrap_or(default))
    }

    pub fn single_where_or<P: Fn(&T) -> bool>(&self, predicate: P, default: T) -> Result<T> {
        Ok(self.single_matching(predicate)?.unwrap_or(default))
    }

    /// Whether the sequence has any element. Pulls at most one.
    pub fn any(&self) -> Result<bool> {
        Ok(self.cursor().try_next()?.is_some())
    }

    pub fn any_where<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<bool> {
        Ok(self.first_matching(predicate)?.is_some())
    }

    /// Stops at the first element that fails `predicate`. True when empty.
    pub fn all<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<bool> {
        Ok(self.first_matching(|item| !predicate(item))?.is_none())
    }

    pub fn contains_with<C: EqualityComparer<T>>(&self, value: &T, comparer: C) -> Result<bool> {
        self.any_where(|item| comparer.equals(item, value))
    }

    /// Key each element into a map. A repeated key fails with `DuplicateKey`.
    pub fn to_dictionary<K, F>(&self, key: F) -> Result<HashMap<K, T>>
    where
        K: Eq + Hash + Debug,
        F: Fn(&T) -> K,
    {
        self.to_dictionary_with(key, |item| item)
    }

    pub fn to_dictionary_with<K, V, F, G>(&self, key: F, value: G) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash + Debug,
        F: Fn(&T) -> K,
        G: Fn(T) -> V,
    {
        let mut cursor = self.cursor();
        let mut map = HashMap::new();
        while let Some(item) = cursor.try_next()? {
            let k = key(&item);
            if map.contains_key(&k) {
                return Err(Error::DuplicateKey(format!("{k:?}")));
            }
            map.insert(k, value(item));
        }
        Ok(map)
    }
}

impl<T: Default + 'static> Sequence<T> {
    pub fn element_at_or_default(&self, index: impl Into<Index>) -> Result<T> {
        Ok(self.locate(index.into())?.unwrap_or_default())
    }

    pub fn first_or_default(&self) -> Result<T> {
        Ok(self.first_matching(|_| true)?.unwrap_or_default())
    }

    pub fn first_where_or_default<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<T> {
        Ok(self.first_matching(predicate)?.unwrap_or_default())
    }

    pub fn last_or_default(&self) -> Result<T> {
        Ok(self.last_matching(|_| true)?.unwrap_or_default())
    }

    pub fn last_where_or_default<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<T> {
        Ok(self.last_matching(predicate)?.unwrap_or_default())
    }

    pub fn single_or_default(&self) -> Result<T> {
        Ok(self.single_matching(|_| true)?.unwrap_or_default())
    }

    pub fn single_where_or_default<P: Fn(&T) -> bool>(&self, predicate: P) -> Result<T> {
        Ok(self.single_matching(predicate)?.unwrap_or_default())
    }
}

impl<T: PartialEq + 'static> Sequence<T> {
    pub fn contains(&self, value: &T) -> Result<bool> {
        self.any_where(|item| item == value)
    }

    /// Same length and pairwise-equal elements. Stops at the first mismatch.
    pub fn sequence_equal(&self, other: &Sequence<T>) -> Result<bool> {
        let mut a = self.cursor();
        let mut b = other.cursor();
        loop {
            match (a.try_next()?, b.try_next()?) {
                (Some(x), Some(y)) if x == y => continue,
                (None, None) => return Ok(true),
                _ => return Ok(false),
            }
        }
    }
}
