//! Literal sources: where every operator chain starts.
//!
//! Re-iterable sources (`from_vec`, `from_shared`, `range`, `repeat`,
//! `iterate`, `remote`) start a fresh pull cycle for each enumeration.
//! `single_pass` wraps a one-shot iterator: enumerations share it, and opening
//! a new one after it completed fails with `ExhaustedSequence`.

use std::cell::RefCell;
use std::iter::Fuse;
use std::rc::Rc;

use lazyseq_core::dag::{QueryPlan, SourceKind};
use lazyseq_core::error::Error;

use crate::sequence::Sequence;
use crate::shared::Shared;
use crate::traits::{cursor_fn, BoxCursor, IterState};

impl<T: Clone + 'static> Sequence<T> {
    /// Re-iterable sequence over an owned buffer.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::buffered(QueryPlan::source("values", SourceKind::Local), Rc::new(items))
    }

    /// A remote-backed source. `items` is the in-memory stand-in used when
    /// the host chooses local evaluation; translation only sees `name`.
    pub fn remote(name: impl Into<String>, items: Vec<T>) -> Self {
        Self::buffered(QueryPlan::source(name, SourceKind::Remote), Rc::new(items))
    }

    pub(crate) fn buffered(plan: Rc<QueryPlan>, items: Rc<Vec<T>>) -> Self {
        let len = items.len();
        let source = Rc::clone(&items);
        Sequence::from_parts(plan, move || {
            let items = Rc::clone(&source);
            let mut pos = 0;
            cursor_fn(move || {
                let item = items.get(pos).cloned();
                if item.is_some() {
                    pos += 1;
                }
                Ok(item)
            })
        })
        .with_count(move || len)
    }

    /// Live view over a shared list: every pull reads the list as it is at
    /// that moment, so elements appended after construction are produced.
    pub fn from_shared(list: &Shared<Vec<T>>) -> Self {
        let source = list.clone();
        let counted = list.clone();
        Sequence::from_parts(QueryPlan::source("shared", SourceKind::Local), move || {
            let list = source.clone();
            let mut pos = 0;
            cursor_fn(move || {
                let item = list.with(|items| items.get(pos).cloned());
                if item.is_some() {
                    pos += 1;
                }
                Ok(item)
            })
        })
        .with_count(move || counted.len())
    }

    /// `value`, `count` times.
    pub fn repeat(value: T, count: usize) -> Self {
        Sequence::from_parts(QueryPlan::source("repeat", SourceKind::Local), move || {
            let value = value.clone();
            let mut left = count;
            cursor_fn(move || {
                if left == 0 {
                    return Ok(None);
                }
                left -= 1;
                Ok(Some(value.clone()))
            })
        })
        .with_count(move || count)
    }

    /// Unbounded: `seed, f(seed), f(f(seed)), ...`. Bound it with `take`
    /// or `take_while` before any terminal that needs the whole input.
    pub fn iterate<F>(seed: T, f: F) -> Self
    where
        F: Fn(&T) -> T + 'static,
    {
        let f = Rc::new(f);
        Sequence::from_parts(QueryPlan::source("iterate", SourceKind::Local), move || {
            let f = Rc::clone(&f);
            let mut next = Some(seed.clone());
            cursor_fn(move || {
                let current = next.take();
                if let Some(value) = &current {
                    next = Some(f(value));
                }
                Ok(current)
            })
        })
    }
}

impl<T: 'static> Sequence<T> {
    pub fn empty() -> Self {
        Sequence::from_parts(QueryPlan::source("empty", SourceKind::Local), || {
            cursor_fn(|| Ok(None))
        })
        .with_count(|| 0)
    }

    /// Wrap a one-shot iterator. All enumerations pull from the same
    /// underlying iterator; once it has completed, a newly opened
    /// enumeration fails on its first pull.
    pub fn single_pass<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let shared = Rc::new(RefCell::new(SinglePass {
            iter: items.into_iter().fuse(),
            state: IterState::NotStarted,
        }));
        Sequence::from_parts(QueryPlan::source("single_pass", SourceKind::Local), move || {
            let shared = Rc::clone(&shared);
            let stale = shared.borrow().state == IterState::Completed;
            let cursor: BoxCursor<T> = cursor_fn(move || {
                if stale {
                    return Err(Error::ExhaustedSequence);
                }
                let mut source = shared.borrow_mut();
                match source.iter.next() {
                    Some(item) => {
                        source.state = IterState::InProgress;
                        Ok(Some(item))
                    }
                    None => {
                        source.state = IterState::Completed;
                        Ok(None)
                    }
                }
            });
            cursor
        })
    }
}

struct SinglePass<I> {
    iter: Fuse<I>,
    state: IterState,
}

impl Sequence<i32> {
    /// `start, start + 1, ..., start + count - 1`. A range that would pass
    /// `i32::MAX` fails with `InvalidArgument` on the first pull.
    pub fn range(start: i32, count: usize) -> Self {
        let fits = i64::try_from(count)
            .ok()
            .and_then(|c| i64::from(start).checked_add(c - 1))
            .is_some_and(|last| last <= i64::from(i32::MAX));
        let overflow = move || {
            Error::InvalidArgument(format!("range of {count} elements starting at {start} overflows i32"))
        };
        let seq = Sequence::from_parts(QueryPlan::source("range", SourceKind::Local), move || {
            let mut next = start;
            let mut left = count;
            cursor_fn(move || {
                if !fits {
                    return Err(overflow());
                }
                if left == 0 {
                    return Ok(None);
                }
                let current = next;
                left -= 1;
                if left > 0 {
                    next = next.checked_add(1).ok_or_else(overflow)?;
                }
                Ok(Some(current))
            })
        });
        // An invalid range reports its error through a pull, never a shortcut count.
        if fits {
            seq.with_count(move || count)
        } else {
            seq
        }
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Sequence::from_vec(items)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Sequence::from_vec(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_source_is_reiterable() {
        let seq = Sequence::from_vec(vec![1, 2, 3]);
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn shared_source_sees_appends() {
        let list = Shared::new(vec![1]);
        let seq = Sequence::from_shared(&list);
        list.push(2);
        assert_eq!(seq.non_enumerated_count(), Some(2));
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2]);
    }

    #[test]
    fn single_pass_fails_once_completed() {
        let seq = Sequence::single_pass(vec![1, 2]);
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2]);
        assert_eq!(seq.to_vec(), Err(Error::ExhaustedSequence));
    }

    #[test]
    fn single_pass_resumes_an_abandoned_enumeration() {
        let seq = Sequence::single_pass(vec![1, 2, 3]);
        let mut first = seq.iter();
        assert_eq!(first.try_next().unwrap(), Some(1));
        drop(first);
        assert_eq!(seq.to_vec().unwrap(), vec![2, 3]);
    }

    #[test]
    fn range_repeat_and_empty() {
        assert_eq!(Sequence::range(1, 5).to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(Sequence::range(i32::MAX, 1).to_vec().unwrap(), vec![i32::MAX]);
        assert!(matches!(
            Sequence::range(i32::MAX, 2).to_vec(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(Sequence::range(5, 0).non_enumerated_count(), Some(0));
        assert_eq!(Sequence::repeat(1, 5).to_vec().unwrap(), vec![1, 1, 1, 1, 1]);
        assert_eq!(
            Sequence::repeat("bananas", 3).to_vec().unwrap(),
            vec!["bananas", "bananas", "bananas"]
        );
        assert!(Sequence::<i32>::empty().to_vec().unwrap().is_empty());
    }

    #[test]
    fn oversized_range_reports_invalid_argument() {
        assert!(matches!(
            Sequence::range(i32::MAX, usize::MAX).take(2).to_vec(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Sequence::range(0, usize::MAX).first(),
            Err(Error::InvalidArgument(_))
        ));
        let too_long = Sequence::range(i32::MAX, 2);
        assert_eq!(too_long.non_enumerated_count(), None);
        assert!(matches!(too_long.count(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn iterate_is_unbounded_but_lazy() {
        let powers = Sequence::iterate(1u64, |x| x * 2);
        assert_eq!(powers.take(5).to_vec().unwrap(), vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn remote_source_is_recorded_as_remote() {
        let seq = Sequence::remote("people", vec!["Tom"]);
        assert!(seq.plan().is_remote());
        assert_eq!(seq.to_vec().unwrap(), vec!["Tom"]);
    }
}
