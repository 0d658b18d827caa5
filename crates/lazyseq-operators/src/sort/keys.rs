//! Sort keys: one per `order_by`/`then_by` in a chain.
//!
//! A key selector turns the realized input into a column of keys, computed
//! once per element, which is then compared by position.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::rc::Rc;

use lazyseq_core::dag::SortDirection;

use crate::equality::Comparer;

pub(crate) trait KeyColumn {
    fn compare(&self, a: usize, b: usize) -> Ordering;
}

pub(crate) trait SortKey<T> {
    fn direction(&self) -> SortDirection;
    fn column(&self, items: &[T]) -> Box<dyn KeyColumn>;
}

struct Column<K, C> {
    keys: Vec<K>,
    comparer: Rc<C>,
    direction: SortDirection,
}

impl<K, C: Comparer<K>> KeyColumn for Column<K, C> {
    fn compare(&self, a: usize, b: usize) -> Ordering {
        let ord = self.comparer.compare(&self.keys[a], &self.keys[b]);
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

pub(crate) struct KeySelector<K, F, C> {
    key: F,
    comparer: Rc<C>,
    direction: SortDirection,
    _key: PhantomData<fn() -> K>,
}

impl<K, F, C> KeySelector<K, F, C> {
    pub(crate) fn new(key: F, comparer: C, direction: SortDirection) -> Self {
        Self {
            key,
            comparer: Rc::new(comparer),
            direction,
            _key: PhantomData,
        }
    }
}

impl<T, K, F, C> SortKey<T> for KeySelector<K, F, C>
where
    K: 'static,
    F: Fn(&T) -> K,
    C: Comparer<K> + 'static,
{
    fn direction(&self) -> SortDirection {
        self.direction
    }

    fn column(&self, items: &[T]) -> Box<dyn KeyColumn> {
        Box::new(Column {
            keys: items.iter().map(&self.key).collect(),
            comparer: Rc::clone(&self.comparer),
            direction: self.direction,
        })
    }
}

/// Stable sort of `items` by the key columns, first key most significant.
pub(crate) fn sort_items<T>(items: Vec<T>, keys: &[Rc<dyn SortKey<T>>]) -> Vec<T> {
    let columns: Vec<Box<dyn KeyColumn>> = keys.iter().map(|k| k.column(&items)).collect();
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        columns
            .iter()
            .map(|column| column.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}
