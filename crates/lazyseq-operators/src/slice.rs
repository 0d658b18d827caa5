//! Positional stages: `skip`, `take`, `take_range`, `reverse`, `chunk`, and
//! the empty-input fallbacks.

use lazyseq_core::dag::OpDescriptor;
use lazyseq_core::error::Error;
use lazyseq_core::index::{Index, IndexRange};

use crate::sequence::Sequence;
use crate::traits::{buffered_cursor, cursor_fn, drain, BoxCursor};

/// Drop `skip` elements, then yield at most `limit` (all when `None`).
fn window<T: 'static>(mut input: BoxCursor<T>, mut skip: usize, limit: Option<usize>) -> BoxCursor<T> {
    let mut left = limit;
    cursor_fn(move || {
        if left == Some(0) {
            return Ok(None);
        }
        while skip > 0 {
            skip -= 1;
            if input.try_next()?.is_none() {
                left = Some(0);
                return Ok(None);
            }
        }
        let item = input.try_next()?;
        if let Some(n) = left.as_mut() {
            *n = if item.is_some() { *n - 1 } else { 0 };
        }
        Ok(item)
    })
}

impl<T: 'static> Sequence<T> {
    pub fn skip(&self, count: usize) -> Sequence<T> {
        let upstream = self.clone();
        let seq = self.unary(OpDescriptor::Skip { count }, move || {
            window(upstream.cursor(), count, None)
        });
        self.map_count_into(seq, move |len| len.saturating_sub(count))
    }

    /// At most `count` elements. Stops pulling once `count` is reached, so it
    /// bounds unbounded sources.
    pub fn take(&self, count: usize) -> Sequence<T> {
        let upstream = self.clone();
        let seq = self.unary(OpDescriptor::Take { count }, move || {
            window(upstream.cursor(), 0, Some(count))
        });
        self.map_count_into(seq, move |len| len.min(count))
    }

    /// Elements in `range`. Bounds clamp to the sequence; an inverted range
    /// yields nothing. Streams for from-start ranges; a bound written from
    /// the end (`^k`) realizes the input to learn its length.
    pub fn take_range(&self, range: impl Into<IndexRange>) -> Sequence<T> {
        let range = range.into();
        let upstream = self.clone();
        let op = OpDescriptor::TakeRange { range };
        let seq = if range.needs_length() {
            self.unary(op, move || {
                let mut input = upstream.cursor();
                buffered_cursor(move || {
                    let mut items = drain(&mut input)?;
                    let keep = range.resolve(items.len());
                    items.truncate(keep.end);
                    Ok(items.split_off(keep.start))
                })
            })
        } else {
            let start = match range.start {
                Index::FromStart(i) => i,
                Index::FromEnd(_) => 0,
            };
            let limit = match range.end {
                Index::FromStart(end) => Some(end.saturating_sub(start)),
                Index::FromEnd(_) => None,
            };
            self.unary(op, move || window(upstream.cursor(), start, limit))
        };
        self.map_count_into(seq, move |len| range.resolve(len).len())
    }

    /// Same elements, last first. Realizes the input on the first pull.
    pub fn reverse(&self) -> Sequence<T> {
        let upstream = self.clone();
        let seq = self.unary(OpDescriptor::Reverse, move || {
            let mut input = upstream.cursor();
            buffered_cursor(move || {
                let mut items = drain(&mut input)?;
                items.reverse();
                Ok(items)
            })
        });
        self.count_into(seq)
    }

    /// Consecutive groups of `size`; the last one may be shorter. A `size` of
    /// zero fails with `InvalidArgument` on the first pull.
    pub fn chunk(&self, size: usize) -> Sequence<Vec<T>> {
        let upstream = self.clone();
        let seq = self.unary(OpDescriptor::Chunk { size }, move || {
            let mut input = upstream.cursor();
            cursor_fn(move || {
                if size == 0 {
                    return Err(Error::InvalidArgument("chunk size must be positive".into()));
                }
                let mut chunk = Vec::with_capacity(size);
                while chunk.len() < size {
                    match input.try_next()? {
                        Some(item) => chunk.push(item),
                        None => break,
                    }
                }
                Ok((!chunk.is_empty()).then_some(chunk))
            })
        });
        if size == 0 {
            return seq;
        }
        self.map_count_into(seq, move |len| len.div_ceil(size))
    }
}

impl<T: Clone + 'static> Sequence<T> {
    /// The input, or a single `value` when the input is empty.
    pub fn default_if_empty_with(&self, value: T) -> Sequence<T> {
        let upstream = self.clone();
        let seq = self.unary(OpDescriptor::DefaultIfEmpty, move || {
            let mut input = upstream.cursor();
            let value = value.clone();
            let mut seen_any = false;
            cursor_fn(move || match input.try_next()? {
                Some(item) => {
                    seen_any = true;
                    Ok(Some(item))
                }
                None if !seen_any => {
                    seen_any = true;
                    Ok(Some(value.clone()))
                }
                None => Ok(None),
            })
        });
        self.map_count_into(seq, |len| len.max(1))
    }
}

impl<T: Clone + Default + 'static> Sequence<T> {
    /// The input, or a single `T::default()` when the input is empty.
    pub fn default_if_empty(&self) -> Sequence<T> {
        self.default_if_empty_with(T::default())
    }
}
