//! Inner equi-join.

use std::hash::Hash;
use std::rc::Rc;

use lazyseq_core::dag::OpDescriptor;

use crate::equality::{DefaultEquality, EqualityComparer};
use crate::group::GroupTable;
use crate::sequence::Sequence;
use crate::traits::cursor_fn;

impl<T: 'static> Sequence<T> {
    /// One `result(left, right)` row per pair whose keys are equal, in left
    /// order and, within one left element, right encounter order. Left
    /// elements without a match produce nothing.
    pub fn join<U, K, R, FL, FR, S>(&self, right: &Sequence<U>, left_key: FL, right_key: FR, result: S) -> Sequence<R>
    where
        U: 'static,
        K: Eq + Hash + 'static,
        R: 'static,
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&U) -> K + 'static,
        S: Fn(&T, &U) -> R + 'static,
    {
        self.join_with(right, left_key, right_key, result, DefaultEquality)
    }

    pub fn join_with<U, K, R, FL, FR, S, C>(
        &self,
        right: &Sequence<U>,
        left_key: FL,
        right_key: FR,
        result: S,
        comparer: C,
    ) -> Sequence<R>
    where
        U: 'static,
        K: 'static,
        R: 'static,
        FL: Fn(&T) -> K + 'static,
        FR: Fn(&U) -> K + 'static,
        S: Fn(&T, &U) -> R + 'static,
        C: EqualityComparer<K> + 'static,
    {
        let (outer, inner) = (self.clone(), right.clone());
        let left_key = Rc::new(left_key);
        let right_key = Rc::new(right_key);
        let result = Rc::new(result);
        let comparer = Rc::new(comparer);
        self.binary(right, OpDescriptor::Join, move || {
            let mut input = outer.cursor();
            let mut pending = Some(inner.cursor());
            let left_key = Rc::clone(&left_key);
            let right_key = Rc::clone(&right_key);
            let result = Rc::clone(&result);
            let comparer = Rc::clone(&comparer);
            let mut table: Option<GroupTable<K, Vec<U>, C>> = None;
            let mut current: Option<(T, usize, usize)> = None;
            cursor_fn(move || {
                if let Some(mut rows) = pending.take() {
                    let mut built = GroupTable::new(Rc::clone(&comparer));
                    while let Some(row) = rows.try_next()? {
                        built.push(right_key(&row), row);
                    }
                    #[cfg(feature = "tracing")]
                    tracing::trace!(keys = built.len(), "join lookup built");
                    table = Some(built);
                }
                let Some(table) = table.as_ref() else {
                    return Ok(None);
                };
                loop {
                    if let Some((left, group, pos)) = current.as_mut() {
                        if let Some(row) = table.group(*group).get(*pos) {
                            *pos += 1;
                            return Ok(Some(result(left, row)));
                        }
                        current = None;
                    }
                    let Some(left) = input.try_next()? else {
                        return Ok(None);
                    };
                    if let Some(group) = table.position(&left_key(&left)) {
                        current = Some((left, group, 0));
                    }
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::equality::IgnoreAsciiCase;
    use crate::sequence::Sequence;

    #[test]
    fn one_row_per_matching_pair() {
        let customers = Sequence::from_vec(vec![(1, "Tom"), (2, "Dick"), (3, "Harry")]);
        let purchases = Sequence::from_vec(vec![(1, "Bike"), (1, "Holiday"), (3, "Car"), (9, "Orphan")]);
        let rows = customers.join(&purchases, |c| c.0, |p| p.0, |c, p| format!("{} bought a {}", c.1, p.1));
        assert_eq!(
            rows.to_vec().unwrap(),
            vec!["Tom bought a Bike", "Tom bought a Holiday", "Harry bought a Car"]
        );
    }

    #[test]
    fn join_under_custom_equality() {
        let left = Sequence::from_vec(vec!["tom"]);
        let right = Sequence::from_vec(vec!["TOM", "Tom", "dick"]);
        let rows = left.join_with(&right, |l| l.to_string(), |r| r.to_string(), |l, r| (*l, *r), IgnoreAsciiCase);
        assert_eq!(rows.to_vec().unwrap(), vec![("tom", "TOM"), ("tom", "Tom")]);
    }
}
