//! Ordering: `order_by` starts a chain, `then_by` refines it.
//!
//! On the first pull the input is realized, every key column is computed
//! once, and a stable sort compares key tuples lexicographically with each
//! key's own direction. Elements with equal keys keep their source order.

mod keys;

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use lazyseq_core::dag::{OpDescriptor, SortDirection};

use crate::equality::{Comparer, NaturalOrder};
use crate::sequence::{IntoSequence, Sequence};
use crate::traits::{buffered_cursor, drain};

use keys::{sort_items, KeySelector, SortKey};

/// A sequence with an ordering chain attached. Derefs to the sorted
/// `Sequence`, so every operator is available on it.
pub struct OrderedSequence<T> {
    source: Sequence<T>,
    keys: Vec<Rc<dyn SortKey<T>>>,
    sorted: Sequence<T>,
}

impl<T> Clone for OrderedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            keys: self.keys.clone(),
            sorted: self.sorted.clone(),
        }
    }
}

impl<T> fmt::Debug for OrderedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSequence")
            .field("keys", &self.keys.len())
            .field("sorted", &self.sorted)
            .finish()
    }
}

impl<T> Deref for OrderedSequence<T> {
    type Target = Sequence<T>;

    fn deref(&self) -> &Sequence<T> {
        &self.sorted
    }
}

impl<T: 'static> OrderedSequence<T> {
    fn build(source: &Sequence<T>, keys: Vec<Rc<dyn SortKey<T>>>) -> Self {
        let directions: Vec<SortDirection> = keys.iter().map(|k| k.direction()).collect();
        let upstream = source.clone();
        let columns = Rc::new(keys.clone());
        let sorted = source.unary(OpDescriptor::OrderBy { keys: directions }, move || {
            let mut input = upstream.cursor();
            let columns = Rc::clone(&columns);
            buffered_cursor(move || {
                let items = drain(&mut input)?;
                Ok(sort_items(items, &columns))
            })
        });
        Self {
            sorted: source.count_into(sorted),
            source: source.clone(),
            keys,
        }
    }

    fn refine(&self, key: Rc<dyn SortKey<T>>) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key);
        Self::build(&self.source, keys)
    }

    /// Ties under the existing keys are broken by `key`, ascending.
    pub fn then_by<K, F>(&self, key: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.then_by_with(key, NaturalOrder)
    }

    pub fn then_by_descending<K, F>(&self, key: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.then_by_descending_with(key, NaturalOrder)
    }

    pub fn then_by_with<K, F, C>(&self, key: F, comparer: C) -> Self
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Comparer<K> + 'static,
    {
        self.refine(Rc::new(KeySelector::<K, F, C>::new(key, comparer, SortDirection::Ascending)))
    }

    pub fn then_by_descending_with<K, F, C>(&self, key: F, comparer: C) -> Self
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Comparer<K> + 'static,
    {
        self.refine(Rc::new(KeySelector::<K, F, C>::new(key, comparer, SortDirection::Descending)))
    }

    pub fn into_sequence(self) -> Sequence<T> {
        self.sorted
    }
}

impl<T: 'static> IntoSequence<T> for OrderedSequence<T> {
    fn into_sequence(self) -> Sequence<T> {
        self.sorted
    }
}

impl<T: 'static> Sequence<T> {
    pub fn order_by<K, F>(&self, key: F) -> OrderedSequence<T>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.order_by_with(key, NaturalOrder)
    }

    pub fn order_by_descending<K, F>(&self, key: F) -> OrderedSequence<T>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.order_by_descending_with(key, NaturalOrder)
    }

    pub fn order_by_with<K, F, C>(&self, key: F, comparer: C) -> OrderedSequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Comparer<K> + 'static,
    {
        let key: Rc<dyn SortKey<T>> = Rc::new(KeySelector::<K, F, C>::new(key, comparer, SortDirection::Ascending));
        OrderedSequence::build(self, vec![key])
    }

    pub fn order_by_descending_with<K, F, C>(&self, key: F, comparer: C) -> OrderedSequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Comparer<K> + 'static,
    {
        let key: Rc<dyn SortKey<T>> = Rc::new(KeySelector::<K, F, C>::new(key, comparer, SortDirection::Descending));
        OrderedSequence::build(self, vec![key])
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;
    use crate::equality::{compare_by, IgnoreAsciiCase};
    use crate::shared::Shared;

    fn names() -> Sequence<&'static str> {
        Sequence::from_vec(vec!["Tom", "Dick", "Harry", "Mary", "Jay"])
    }

    #[test]
    fn order_by_is_stable() {
        let q = names().order_by(|s| s.len());
        assert_eq!(q.to_vec().unwrap(), vec!["Tom", "Jay", "Dick", "Mary", "Harry"]);
    }

    #[test]
    fn then_by_breaks_ties() {
        let q = names()
            .order_by(|s| s.len())
            .then_by(|s| s.chars().next());
        assert_eq!(q.to_vec().unwrap(), vec!["Jay", "Tom", "Dick", "Mary", "Harry"]);
    }

    #[test]
    fn descending_and_mixed_directions() {
        let q = names().order_by_descending(|s| s.len()).then_by_descending(|s| *s);
        assert_eq!(q.to_vec().unwrap(), vec!["Harry", "Mary", "Dick", "Tom", "Jay"]);
    }

    #[test]
    fn custom_comparers() {
        let words = Sequence::from_vec(vec!["b", "A", "a", "C"]);
        let q = words.order_by_with(|s| *s, IgnoreAsciiCase);
        assert_eq!(q.to_vec().unwrap(), vec!["A", "a", "b", "C"]);
        let floats = Sequence::from_vec(vec![2.5, -1.0, 0.5]);
        let q = floats.order_by_with(|x| *x, compare_by(|a: &f64, b: &f64| a.total_cmp(b)));
        assert_eq!(q.to_vec().unwrap(), vec![-1.0, 0.5, 2.5]);
        assert_eq!(IgnoreAsciiCase.compare("a", "A"), Ordering::Equal);
    }

    #[test]
    fn keys_are_computed_once_per_element() {
        let calls = Shared::new(0usize);
        let counter = calls.clone();
        let q = names().order_by(move |s| {
            counter.update(|c| *c += 1);
            s.len()
        });
        assert_eq!(calls.get(), 0);
        q.to_vec().unwrap();
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn ordering_records_every_direction() {
        let q = names().order_by(|s| s.len()).then_by_descending(|s| *s);
        assert_eq!(
            q.plan().op(),
            Some(&OpDescriptor::OrderBy {
                keys: vec![SortDirection::Ascending, SortDirection::Descending]
            })
        );
        assert_eq!(q.non_enumerated_count(), Some(5));
    }
}
