//! `Sequence<T>`: a cheaply clonable handle to a lazy, re-openable producer.
//!
//! A sequence holds a cursor factory and its recorded plan. Building an
//! operator chain only nests factories; nothing is pulled until a terminal
//! call opens a cursor. Every `iter()` opens a fresh enumeration, so chains
//! over re-iterable sources re-run against whatever state their closures see
//! at that moment.

use std::fmt;
use std::rc::Rc;

use lazyseq_core::dag::{OpDescriptor, QueryPlan};

use crate::traits::{BoxCursor, Enumerator};

type OpenFn<T> = dyn Fn() -> BoxCursor<T>;
type CountFn = dyn Fn() -> usize;

pub struct Sequence<T> {
    open: Rc<OpenFn<T>>,
    plan: Rc<QueryPlan>,
    count: Option<Rc<CountFn>>,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            open: Rc::clone(&self.open),
            plan: Rc::clone(&self.plan),
            count: self.count.clone(),
        }
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Sequence<T> {
    pub(crate) fn from_parts<F>(plan: Rc<QueryPlan>, open: F) -> Self
    where
        F: Fn() -> BoxCursor<T> + 'static,
    {
        Self {
            open: Rc::new(open),
            plan,
            count: None,
        }
    }

    /// Attach a way to learn the length without enumerating.
    pub(crate) fn with_count<F>(mut self, count: F) -> Self
    where
        F: Fn() -> usize + 'static,
    {
        self.count = Some(Rc::new(count));
        self
    }

    /// Carry this sequence's known length over to `other` (count-preserving stages).
    pub(crate) fn count_into<U>(&self, mut other: Sequence<U>) -> Sequence<U> {
        other.count = self.count.clone();
        other
    }

    /// Like `count_into`, for stages whose length follows from the input's.
    pub(crate) fn map_count_into<U, F>(&self, mut other: Sequence<U>, f: F) -> Sequence<U>
    where
        F: Fn(usize) -> usize + 'static,
    {
        other.count = self.count.clone().map(|count| {
            let mapped: Rc<CountFn> = Rc::new(move || f(count()));
            mapped
        });
        other
    }

    /// Wrap this sequence in a one-input operator node.
    pub(crate) fn unary<U, F>(&self, op: OpDescriptor, open: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn() -> BoxCursor<U> + 'static,
    {
        Sequence::from_parts(QueryPlan::unary(&self.plan, op), open)
    }

    /// Wrap this sequence and `other` in a two-input operator node.
    pub(crate) fn binary<U, V, F>(&self, other: &Sequence<U>, op: OpDescriptor, open: F) -> Sequence<V>
    where
        V: 'static,
        F: Fn() -> BoxCursor<V> + 'static,
    {
        Sequence::from_parts(QueryPlan::binary(&self.plan, &other.plan, op), open)
    }

    pub(crate) fn cursor(&self) -> BoxCursor<T> {
        (self.open)()
    }

    /// Open a new enumeration. Nothing is pulled until the first `next`.
    pub fn iter(&self) -> Enumerator<T> {
        Enumerator::new(self.cursor())
    }

    /// The recorded operator chain that built this sequence.
    pub fn plan(&self) -> &Rc<QueryPlan> {
        &self.plan
    }

    /// Attach a human-readable label (e.g. the predicate's source text) to the
    /// topmost recorded node. Evaluation is unaffected.
    pub fn describe(&self, label: impl Into<String>) -> Self {
        Self {
            open: Rc::clone(&self.open),
            plan: self.plan.with_label(label),
            count: self.count.clone(),
        }
    }

    /// The length, if it is known without pulling anything.
    pub fn non_enumerated_count(&self) -> Option<usize> {
        self.count.as_ref().map(|count| count())
    }
}

impl<'a, T: 'static> IntoIterator for &'a Sequence<T> {
    type Item = lazyseq_core::error::Result<T>;
    type IntoIter = Enumerator<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Anything that can stand in as a sub-sequence (for `select_many`, `concat`,
/// and friends).
pub trait IntoSequence<T> {
    fn into_sequence(self) -> Sequence<T>;
}

impl<T> IntoSequence<T> for Sequence<T> {
    fn into_sequence(self) -> Sequence<T> {
        self
    }
}

impl<T: 'static> IntoSequence<T> for &Sequence<T> {
    fn into_sequence(self) -> Sequence<T> {
        self.clone()
    }
}

impl<T: Clone + 'static> IntoSequence<T> for Vec<T> {
    fn into_sequence(self) -> Sequence<T> {
        Sequence::from_vec(self)
    }
}

impl<T: Clone + 'static, const N: usize> IntoSequence<T> for [T; N] {
    fn into_sequence(self) -> Sequence<T> {
        Sequence::from_vec(Vec::from(self))
    }
}
