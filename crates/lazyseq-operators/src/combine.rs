//! Two-input streaming stages: `concat` and the `zip` family.

use lazyseq_core::dag::OpDescriptor;

use crate::sequence::{IntoSequence, Sequence};
use crate::traits::cursor_fn;

impl<T: 'static> Sequence<T> {
    /// This sequence followed by `other`.
    pub fn concat(&self, other: impl IntoSequence<T>) -> Sequence<T> {
        let other = other.into_sequence();
        let (first, second) = (self.clone(), other.clone());
        let seq = self.binary(&other, OpDescriptor::Concat, move || {
            let mut head = Some(first.cursor());
            let mut tail = second.cursor();
            cursor_fn(move || {
                if let Some(cursor) = head.as_mut() {
                    match cursor.try_next()? {
                        Some(item) => return Ok(Some(item)),
                        None => head = None,
                    }
                }
                tail.try_next()
            })
        });
        match other.non_enumerated_count() {
            Some(_) => self.map_count_into(seq, move |a| a + other.non_enumerated_count().unwrap_or(0)),
            None => seq,
        }
    }

    /// Pairs elements positionally; stops as soon as either side runs out.
    pub fn zip<U: 'static>(&self, other: &Sequence<U>) -> Sequence<(T, U)> {
        let (left, right) = (self.clone(), other.clone());
        let seq = self.binary(other, OpDescriptor::Zip, move || {
            let mut a = left.cursor();
            let mut b = right.cursor();
            let mut done = false;
            cursor_fn(move || {
                if done {
                    return Ok(None);
                }
                let pair = match a.try_next()? {
                    Some(x) => b.try_next()?.map(|y| (x, y)),
                    None => None,
                };
                done = pair.is_none();
                Ok(pair)
            })
        });
        match other.non_enumerated_count() {
            Some(_) => {
                let right = other.clone();
                self.map_count_into(seq, move |a| a.min(right.non_enumerated_count().unwrap_or(0)))
            }
            None => seq,
        }
    }

    /// Three-way `zip`; the result is as long as the shortest input.
    pub fn zip3<U: 'static, V: 'static>(
        &self,
        second: &Sequence<U>,
        third: &Sequence<V>,
    ) -> Sequence<(T, U, V)> {
        self.zip(second)
            .zip(third)
            .select(|((a, b), c)| (a, b, c))
    }
}
