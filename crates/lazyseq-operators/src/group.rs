//! Grouping: `group_by` and the key table shared with the join operators.
//!
//! Groups come out in the order their keys were first seen; elements inside a
//! group keep source order. The whole input is consumed in one pass on the
//! first pull.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use lazyseq_core::dag::{OpDescriptor, QueryPlan, SourceKind};

use crate::equality::{DefaultEquality, EqualityComparer};
use crate::sequence::Sequence;
use crate::traits::{buffered_cursor, drain};

/// Keys in first-seen order, each with its group `G`. Keys are bucketed by
/// `hash_key` and confirmed with `equals`.
pub(crate) struct GroupTable<K, G, C> {
    comparer: Rc<C>,
    index: HashMap<u64, Vec<usize>>,
    keys: Vec<K>,
    groups: Vec<G>,
}

impl<K, G, C: EqualityComparer<K>> GroupTable<K, G, C> {
    pub(crate) fn new(comparer: Rc<C>) -> Self {
        Self {
            comparer,
            index: HashMap::new(),
            keys: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub(crate) fn position(&self, key: &K) -> Option<usize> {
        self.index
            .get(&self.comparer.hash_key(key))?
            .iter()
            .copied()
            .find(|&i| self.comparer.equals(&self.keys[i], key))
    }

    pub(crate) fn group(&self, position: usize) -> &G {
        &self.groups[position]
    }

    pub(crate) fn get(&self, key: &K) -> Option<&G> {
        self.position(key).map(|i| &self.groups[i])
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn map_groups<H>(self, f: impl FnMut(G) -> H) -> GroupTable<K, H, C> {
        GroupTable {
            comparer: self.comparer,
            index: self.index,
            keys: self.keys,
            groups: self.groups.into_iter().map(f).collect(),
        }
    }

    pub(crate) fn into_pairs(self) -> impl Iterator<Item = (K, G)> {
        self.keys.into_iter().zip(self.groups)
    }
}

impl<K, E, C: EqualityComparer<K>> GroupTable<K, Vec<E>, C> {
    /// Append `element` to the group for `key`, opening the group if the key
    /// is new.
    pub(crate) fn push(&mut self, key: K, element: E) {
        if let Some(i) = self.position(&key) {
            self.groups[i].push(element);
            return;
        }
        let i = self.keys.len();
        self.index.entry(self.comparer.hash_key(&key)).or_default().push(i);
        self.keys.push(key);
        self.groups.push(vec![element]);
    }
}

/// A key and the elements that share it. Re-iterable; cloning shares the
/// buffered elements.
pub struct Grouping<K, E> {
    key: K,
    elements: Rc<Vec<E>>,
}

impl<K, E> Grouping<K, E> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }
}

impl<K, E: Clone + 'static> Grouping<K, E> {
    /// The group's elements as a sequence, ready for further operators.
    pub fn elements(&self) -> Sequence<E> {
        Sequence::buffered(
            QueryPlan::source("grouping", SourceKind::Local),
            Rc::clone(&self.elements),
        )
    }
}

impl<K: Clone, E> Clone for Grouping<K, E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            elements: Rc::clone(&self.elements),
        }
    }
}

impl<K: PartialEq, E: PartialEq> PartialEq for Grouping<K, E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.elements == other.elements
    }
}

impl<K: fmt::Debug, E: fmt::Debug> fmt::Debug for Grouping<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grouping")
            .field("key", &self.key)
            .field("elements", &self.elements)
            .finish()
    }
}

impl<'a, K, E> IntoIterator for &'a Grouping<K, E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: 'static> Sequence<T> {
    pub fn group_by<K, F>(&self, key: F) -> Sequence<Grouping<K, T>>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.grouped(false, key, |item| item, DefaultEquality)
    }

    /// Groups by `key`, storing `element(item)` instead of the item itself.
    pub fn group_by_with<K, E, F, G>(&self, key: F, element: G) -> Sequence<Grouping<K, E>>
    where
        K: Eq + Hash + 'static,
        E: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(T) -> E + 'static,
    {
        self.grouped(true, key, element, DefaultEquality)
    }

    /// `group_by_with` under a custom key equality. Each group keeps the first
    /// key seen for it.
    pub fn group_by_using<K, E, F, G, C>(&self, key: F, element: G, comparer: C) -> Sequence<Grouping<K, E>>
    where
        K: 'static,
        E: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(T) -> E + 'static,
        C: EqualityComparer<K> + 'static,
    {
        self.grouped(true, key, element, comparer)
    }

    fn grouped<K, E, F, G, C>(&self, projected: bool, key: F, element: G, comparer: C) -> Sequence<Grouping<K, E>>
    where
        K: 'static,
        E: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(T) -> E + 'static,
        C: EqualityComparer<K> + 'static,
    {
        let upstream = self.clone();
        let key = Rc::new(key);
        let element = Rc::new(element);
        let comparer = Rc::new(comparer);
        self.unary(OpDescriptor::GroupBy { projected }, move || {
            let mut input = upstream.cursor();
            let key = Rc::clone(&key);
            let element = Rc::clone(&element);
            let comparer = Rc::clone(&comparer);
            buffered_cursor(move || {
                let mut table = GroupTable::new(comparer);
                for item in drain(&mut input)? {
                    let k = key(&item);
                    table.push(k, element(item));
                }
                #[cfg(feature = "tracing")]
                tracing::trace!(groups = table.len(), "grouped upstream");
                Ok(table
                    .into_pairs()
                    .map(|(key, elements)| Grouping {
                        key,
                        elements: Rc::new(elements),
                    })
                    .collect())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::IgnoreAsciiCase;

    #[test]
    fn groups_follow_first_seen_key_order() {
        let words = Sequence::from_vec(vec!["apple", "bob", "avocado", "cat", "banana"]);
        let groups = words.group_by(|w| w.chars().next()).to_vec().unwrap();
        let keys: Vec<_> = groups.iter().map(|g| *g.key()).collect();
        assert_eq!(keys, vec![Some('a'), Some('b'), Some('c')]);
        assert_eq!(groups[0].as_slice(), &["apple", "avocado"]);
        assert_eq!(groups[1].elements().to_vec().unwrap(), vec!["bob", "banana"]);
    }

    #[test]
    fn element_selector_and_custom_equality() {
        let votes = Sequence::from_vec(vec![("Tom", 1), ("TOM", 2), ("Dick", 3)]);
        let groups = votes
            .group_by_using(|v| v.0.to_string(), |v| v.1, IgnoreAsciiCase)
            .to_vec()
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key(), "Tom");
        assert_eq!(groups[0].as_slice(), &[1, 2]);
    }

    #[test]
    fn grouping_is_deferred() {
        let calls = crate::shared::Shared::new(0);
        let counter = calls.clone();
        let groups = Sequence::from_vec(vec![1, 2, 3]).group_by(move |x| {
            counter.update(|c| *c += 1);
            x % 2
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(groups.count().unwrap(), 2);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn table_lookup() {
        let mut table: GroupTable<&str, Vec<i32>, _> = GroupTable::new(Rc::new(DefaultEquality));
        table.push("a", 1);
        table.push("b", 2);
        table.push("a", 3);
        assert_eq!(table.get(&"a"), Some(&vec![1, 3]));
        assert_eq!(table.get(&"z"), None);
        assert_eq!(table.len(), 2);
    }
}
