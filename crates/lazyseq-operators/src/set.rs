//! Set operations: `distinct`, `union`, `intersect`, `except`.
//!
//! Every variant deduplicates its output and keeps left order (left then
//! right for `union`). The `_by` forms compare a projected key but always
//! emit the original element. `intersect` and `except` realize the right-hand
//! side into a key set on the first pull and stream the left.

use std::hash::Hash;
use std::rc::Rc;

use lazyseq_core::dag::OpDescriptor;

use crate::equality::{DefaultEquality, EqualityComparer, KeySet};
use crate::sequence::Sequence;
use crate::traits::{cursor_fn, BoxCursor};

impl<T: 'static> Sequence<T> {
    fn distinct_keyed<K, F, C>(&self, keyed: bool, key: F, comparer: C) -> Sequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: EqualityComparer<K> + 'static,
    {
        let upstream = self.clone();
        let key = Rc::new(key);
        let comparer = Rc::new(comparer);
        self.unary(OpDescriptor::Distinct { keyed }, move || {
            let mut input = upstream.cursor();
            let key = Rc::clone(&key);
            let mut seen = KeySet::new(Rc::clone(&comparer));
            cursor_fn(move || {
                while let Some(item) = input.try_next()? {
                    if seen.insert(key(&item)) {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }

    fn union_keyed<K, F, C>(&self, other: &Sequence<T>, keyed: bool, key: F, comparer: C) -> Sequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: EqualityComparer<K> + 'static,
    {
        let (left, right) = (self.clone(), other.clone());
        let key = Rc::new(key);
        let comparer = Rc::new(comparer);
        self.binary(other, OpDescriptor::Union { keyed }, move || {
            let mut inputs: [BoxCursor<T>; 2] = [left.cursor(), right.cursor()];
            let mut current = 0;
            let key = Rc::clone(&key);
            let mut seen = KeySet::new(Rc::clone(&comparer));
            cursor_fn(move || {
                while current < inputs.len() {
                    match inputs[current].try_next()? {
                        Some(item) => {
                            if seen.insert(key(&item)) {
                                return Ok(Some(item));
                            }
                        }
                        None => current += 1,
                    }
                }
                Ok(None)
            })
        })
    }

    /// Shared driver for `intersect` (`keep_present`) and `except`.
    fn filter_against<K, F, C>(
        &self,
        right_keys: &Sequence<K>,
        op: OpDescriptor,
        keep_present: bool,
        key: F,
        comparer: C,
    ) -> Sequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: EqualityComparer<K> + 'static,
    {
        let (left, right) = (self.clone(), right_keys.clone());
        let key = Rc::new(key);
        let comparer = Rc::new(comparer);
        self.binary(right_keys, op, move || {
            let mut input = left.cursor();
            let mut right = Some(right.cursor());
            let key = Rc::clone(&key);
            let comparer = Rc::clone(&comparer);
            let mut set: Option<KeySet<K, C>> = None;
            cursor_fn(move || {
                if let Some(mut keys) = right.take() {
                    let mut built = KeySet::new(Rc::clone(&comparer));
                    while let Some(k) = keys.try_next()? {
                        built.insert(k);
                    }
                    set = Some(built);
                }
                let Some(set) = set.as_mut() else {
                    return Ok(None);
                };
                while let Some(item) = input.try_next()? {
                    let k = key(&item);
                    // intersect: each right key matches once; except: each
                    // emitted key joins the set so it cannot repeat.
                    let emit = if keep_present { set.remove(&k) } else { set.insert(k) };
                    if emit {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }
}

impl<T: Clone + Eq + Hash + 'static> Sequence<T> {
    pub fn distinct(&self) -> Sequence<T> {
        self.distinct_keyed(false, T::clone, DefaultEquality)
    }

    /// Elements of either side, left first, without duplicates.
    pub fn union(&self, other: &Sequence<T>) -> Sequence<T> {
        self.union_keyed(other, false, T::clone, DefaultEquality)
    }

    /// Left elements also present on the right, without duplicates.
    pub fn intersect(&self, other: &Sequence<T>) -> Sequence<T> {
        self.intersect_with(other, DefaultEquality)
    }

    /// Left elements absent from the right, without duplicates.
    pub fn except(&self, other: &Sequence<T>) -> Sequence<T> {
        self.except_with(other, DefaultEquality)
    }
}

impl<T: Clone + 'static> Sequence<T> {
    pub fn distinct_with<C>(&self, comparer: C) -> Sequence<T>
    where
        C: EqualityComparer<T> + 'static,
    {
        self.distinct_keyed(false, T::clone, comparer)
    }

    pub fn union_with<C>(&self, other: &Sequence<T>, comparer: C) -> Sequence<T>
    where
        C: EqualityComparer<T> + 'static,
    {
        self.union_keyed(other, false, T::clone, comparer)
    }

    pub fn intersect_with<C>(&self, other: &Sequence<T>, comparer: C) -> Sequence<T>
    where
        C: EqualityComparer<T> + 'static,
    {
        self.filter_against(other, OpDescriptor::Intersect { keyed: false }, true, T::clone, comparer)
    }

    pub fn except_with<C>(&self, other: &Sequence<T>, comparer: C) -> Sequence<T>
    where
        C: EqualityComparer<T> + 'static,
    {
        self.filter_against(other, OpDescriptor::Except { keyed: false }, false, T::clone, comparer)
    }
}

impl<T: 'static> Sequence<T> {
    /// First element per distinct key.
    pub fn distinct_by<K, F>(&self, key: F) -> Sequence<T>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.distinct_keyed(true, key, DefaultEquality)
    }

    pub fn distinct_by_with<K, F, C>(&self, key: F, comparer: C) -> Sequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: EqualityComparer<K> + 'static,
    {
        self.distinct_keyed(true, key, comparer)
    }

    pub fn union_by<K, F>(&self, other: &Sequence<T>, key: F) -> Sequence<T>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.union_keyed(other, true, key, DefaultEquality)
    }

    pub fn union_by_with<K, F, C>(&self, other: &Sequence<T>, key: F, comparer: C) -> Sequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: EqualityComparer<K> + 'static,
    {
        self.union_keyed(other, true, key, comparer)
    }

    /// Left elements whose key appears in `keys`. The right side is given as
    /// already-projected keys.
    pub fn intersect_by<K, F>(&self, keys: &Sequence<K>, key: F) -> Sequence<T>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.intersect_by_with(keys, key, DefaultEquality)
    }

    pub fn intersect_by_with<K, F, C>(&self, keys: &Sequence<K>, key: F, comparer: C) -> Sequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: EqualityComparer<K> + 'static,
    {
        self.filter_against(keys, OpDescriptor::Intersect { keyed: true }, true, key, comparer)
    }

    /// Left elements whose key does not appear in `keys`.
    pub fn except_by<K, F>(&self, keys: &Sequence<K>, key: F) -> Sequence<T>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.except_by_with(keys, key, DefaultEquality)
    }

    pub fn except_by_with<K, F, C>(&self, keys: &Sequence<K>, key: F, comparer: C) -> Sequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: EqualityComparer<K> + 'static,
    {
        self.filter_against(keys, OpDescriptor::Except { keyed: true }, false, key, comparer)
    }
}

#[cfg(test)]
mod tests {
    use crate::equality::IgnoreAsciiCase;
    use crate::sequence::Sequence;

    #[test]
    fn distinct_keeps_first_occurrence() {
        let seq = Sequence::from_vec(vec![3, 1, 3, 2, 1]);
        assert_eq!(seq.distinct().to_vec().unwrap(), vec![3, 1, 2]);
        let words = Sequence::from_vec(vec!["a", "A", "b"]);
        assert_eq!(words.distinct_with(IgnoreAsciiCase).to_vec().unwrap(), vec!["a", "b"]);
        assert_eq!(
            Sequence::from_vec(vec!["Tom", "Tim", "Dick"]).distinct_by(|s| s.len()).to_vec().unwrap(),
            vec!["Tom", "Dick"]
        );
    }

    #[test]
    fn union_deduplicates_left_then_right() {
        let a = Sequence::from_vec(vec![1, 2, 3, 3]);
        let b = Sequence::from_vec(vec![3, 4, 5, 1]);
        assert_eq!(a.union(&b).to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn intersect_and_except_follow_left_order() {
        let a = Sequence::from_vec(vec![5, 1, 2, 1, 3]);
        let b = Sequence::from_vec(vec![3, 1, 9]);
        assert_eq!(a.intersect(&b).to_vec().unwrap(), vec![1, 3]);
        assert_eq!(a.except(&b).to_vec().unwrap(), vec![5, 2]);
    }

    #[test]
    fn keyed_forms_emit_elements_not_keys() {
        let people = Sequence::from_vec(vec![("Tom", 30), ("Dick", 40), ("Harry", 30)]);
        let ages = Sequence::from_vec(vec![30]);
        assert_eq!(people.intersect_by(&ages, |p| p.1).to_vec().unwrap(), vec![("Tom", 30)]);
        assert_eq!(people.except_by(&ages, |p| p.1).to_vec().unwrap(), vec![("Dick", 40)]);
    }

    #[test]
    fn custom_equality_in_set_ops() {
        let a = Sequence::from_vec(vec!["Tom".to_string(), "dick".to_string()]);
        let b = Sequence::from_vec(vec!["TOM".to_string()]);
        assert_eq!(a.intersect_with(&b, IgnoreAsciiCase).to_vec().unwrap(), vec!["Tom"]);
        assert_eq!(a.except_with(&b, IgnoreAsciiCase).to_vec().unwrap(), vec!["dick"]);
        assert_eq!(a.union_with(&b, IgnoreAsciiCase).to_vec().unwrap(), vec!["Tom", "dick"]);
    }
}
