//! Pull protocol shared by every sequence and operator.
//!
//! A `Cursor` is one in-flight enumeration: each `try_next` does exactly as
//! much upstream work as needed to produce one element or to decide that
//! none remain. Operators are cursors that own their upstream cursor.

use lazyseq_core::error::Result;

/// The single pull primitive.
///
/// Invariants:
/// - After returning `Ok(None)` once, implementations keep returning it.
/// - An `Err` is reported by the pull that detected it; the enumeration is
///   finished afterwards.
pub trait Cursor<T> {
    fn try_next(&mut self) -> Result<Option<T>>;
}

pub type BoxCursor<T> = Box<dyn Cursor<T>>;

/// Adapter turning a `FnMut` pull closure into a `Cursor`.
pub struct FromFn<F>(F);

impl<T, F> Cursor<T> for FromFn<F>
where
    F: FnMut() -> Result<Option<T>>,
{
    fn try_next(&mut self) -> Result<Option<T>> {
        (self.0)()
    }
}

/// Box a pull closure as a cursor.
pub fn cursor_fn<T, F>(pull: F) -> BoxCursor<T>
where
    T: 'static,
    F: FnMut() -> Result<Option<T>> + 'static,
{
    Box::new(FromFn(pull))
}

/// A cursor that realizes its whole output on the first pull and streams it
/// afterwards. Used by ordering, reverse, grouping, and from-end slicing.
pub(crate) fn buffered_cursor<T, F>(build: F) -> BoxCursor<T>
where
    T: 'static,
    F: FnOnce() -> Result<Vec<T>> + 'static,
{
    let mut build = Some(build);
    let mut out: Option<std::vec::IntoIter<T>> = None;
    cursor_fn(move || {
        if let Some(build) = build.take() {
            out = Some(build()?.into_iter());
        }
        Ok(out.as_mut().and_then(Iterator::next))
    })
}

/// Pull everything left in `input`.
pub(crate) fn drain<T>(input: &mut BoxCursor<T>) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while let Some(item) = input.try_next()? {
        items.push(item);
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(rows = items.len(), "materialized upstream");
    Ok(items)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
    NotStarted,
    InProgress,
    Completed,
}

/// One enumeration of a sequence, tracking its lifecycle.
///
/// `InProgress -> Completed` is one-way; once completed every further pull
/// yields end-of-sequence without touching the upstream again.
pub struct Enumerator<T> {
    cursor: BoxCursor<T>,
    state: IterState,
}

impl<T> Enumerator<T> {
    pub(crate) fn new(cursor: BoxCursor<T>) -> Self {
        Self {
            cursor,
            state: IterState::NotStarted,
        }
    }

    pub fn state(&self) -> IterState {
        self.state
    }

    pub fn try_next(&mut self) -> Result<Option<T>> {
        if self.state == IterState::Completed {
            return Ok(None);
        }
        self.state = IterState::InProgress;
        match self.cursor.try_next() {
            Ok(Some(item)) => Ok(Some(item)),
            Ok(None) => {
                self.state = IterState::Completed;
                Ok(None)
            }
            Err(e) => {
                self.state = IterState::Completed;
                Err(e)
            }
        }
    }
}

impl<T> Iterator for Enumerator<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}
