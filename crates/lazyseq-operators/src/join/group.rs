//! Group join: every left element paired with its (possibly empty) matches.

use std::hash::Hash;
use std::rc::Rc;

use lazyseq_core::dag::{OpDescriptor, QueryPlan, SourceKind};

use crate::equality::{DefaultEquality, EqualityComparer};
use crate::group::GroupTable;
use crate::sequence::Sequence;
use crate::traits::cursor_fn;

impl<T: 'static> Sequence<T> {
    /// One `result(left, matches)` row per left element, in left order.
    /// `matches` holds the right elements with an equal key, in right order,
    /// and is empty when there are none.
    pub fn group_join<U, K, R, FL, FR, S>(
        &self,
        right: &Sequence<U>,
        left_key: FL,
        right_key: FR,
        result: S,
    ) -> Sequence<R>
    where
        U: Clone + 'static,
        K: Eq + Hash + 'static,
        R: 'static,
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&U) -> K + 'static,
        S: Fn(T, Sequence<U>) -> R + 'static,
    {
        self.group_join_with(right, left_key, right_key, result, DefaultEquality)
    }

    pub fn group_join_with<U, K, R, FL, FR, S, C>(
        &self,
        right: &Sequence<U>,
        left_key: FL,
        right_key: FR,
        result: S,
        comparer: C,
    ) -> Sequence<R>
    where
        U: Clone + 'static,
        K: 'static,
        R: 'static,
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&U) -> K + 'static,
        S: Fn(T, Sequence<U>) -> R + 'static,
        C: EqualityComparer<K> + 'static,
    {
        let (outer, inner) = (self.clone(), right.clone());
        let left_key = Rc::new(left_key);
        let right_key = Rc::new(right_key);
        let result = Rc::new(result);
        let comparer = Rc::new(comparer);
        let seq = self.binary(right, OpDescriptor::GroupJoin, move || {
            let mut input = outer.cursor();
            let mut pending = Some(inner.cursor());
            let left_key = Rc::clone(&left_key);
            let right_key = Rc::clone(&right_key);
            let result = Rc::clone(&result);
            let comparer = Rc::clone(&comparer);
            let mut table: Option<GroupTable<K, Rc<Vec<U>>, C>> = None;
            let none: Rc<Vec<U>> = Rc::new(Vec::new());
            cursor_fn(move || {
                if let Some(mut rows) = pending.take() {
                    let mut built = GroupTable::new(Rc::clone(&comparer));
                    while let Some(row) = rows.try_next()? {
                        built.push(right_key(&row), row);
                    }
                    table = Some(built.map_groups(Rc::new));
                }
                let Some(table) = table.as_ref() else {
                    return Ok(None);
                };
                let Some(left) = input.try_next()? else {
                    return Ok(None);
                };
                let matches = table.get(&left_key(&left)).unwrap_or(&none);
                let matches = Sequence::buffered(
                    QueryPlan::source("group_join", SourceKind::Local),
                    Rc::clone(matches),
                );
                Ok(Some(result(left, matches)))
            })
        });
        self.count_into(seq)
    }
}

#[cfg(test)]
mod tests {
    use crate::sequence::Sequence;

    #[test]
    fn one_row_per_left_element() {
        let customers = Sequence::from_vec(vec![(1, "Tom"), (2, "Dick"), (3, "Harry")]);
        let purchases = Sequence::from_vec(vec![(1, "Bike"), (1, "Holiday"), (3, "Car")]);
        let rows = customers.group_join(&purchases, |c| c.0, |p| p.0, |c, ps| {
            (c.1, ps.select(|p| p.1).to_vec().unwrap_or_default())
        });
        assert_eq!(
            rows.to_vec().unwrap(),
            vec![
                ("Tom", vec!["Bike", "Holiday"]),
                ("Dick", vec![]),
                ("Harry", vec!["Car"]),
            ]
        );
        assert_eq!(rows.non_enumerated_count(), Some(3));
    }
}
