//! Positions counted from either end of a sequence, and ranges built from them.
//!
//! `Index::FromEnd(k)` is the `^k` form: `^1` is the last element, `^0` is one
//! past the end. Resolving a from-end index needs the total length, so any
//! operator that receives one must realize its source first.

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Index {
    FromStart(usize),
    FromEnd(usize),
}

impl Index {
    pub const fn start(i: usize) -> Self {
        Index::FromStart(i)
    }

    /// `^k`
    pub const fn from_end(k: usize) -> Self {
        Index::FromEnd(k)
    }

    pub const fn is_from_end(self) -> bool {
        matches!(self, Index::FromEnd(_))
    }

    /// Absolute offset for a sequence of `len` elements. May point past the
    /// end; a from-end index larger than `len` resolves to `None`.
    pub fn offset(self, len: usize) -> Option<usize> {
        match self {
            Index::FromStart(i) => Some(i),
            Index::FromEnd(k) => len.checked_sub(k),
        }
    }
}

impl From<usize> for Index {
    fn from(i: usize) -> Self {
        Index::FromStart(i)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::FromStart(i) => write!(f, "{i}"),
            Index::FromEnd(k) => write!(f, "^{k}"),
        }
    }
}

/// Half-open `start..end` range whose bounds may count from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: Index,
    pub end: Index,
}

impl IndexRange {
    pub const fn new(start: Index, end: Index) -> Self {
        Self { start, end }
    }

    /// `start..`
    pub const fn starting_at(start: Index) -> Self {
        Self {
            start,
            end: Index::FromEnd(0),
        }
    }

    /// `..end`
    pub const fn ending_at(end: Index) -> Self {
        Self {
            start: Index::FromStart(0),
            end,
        }
    }

    /// True when resolving the range requires the total length. An open end
    /// (`^0`) with a from-start beginning can still stream.
    pub const fn needs_length(&self) -> bool {
        self.start.is_from_end() || matches!(self.end, Index::FromEnd(k) if k > 0)
    }

    /// Clamp both bounds into `0..=len`; an inverted range resolves to empty.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let clamp = |ix: Index| ix.offset(len).unwrap_or(0).min(len);
        let start = clamp(self.start);
        let end = clamp(self.end).max(start);
        start..end
    }
}

impl From<Range<usize>> for IndexRange {
    fn from(r: Range<usize>) -> Self {
        IndexRange::new(Index::FromStart(r.start), Index::FromStart(r.end))
    }
}

impl From<RangeFrom<usize>> for IndexRange {
    fn from(r: RangeFrom<usize>) -> Self {
        IndexRange::starting_at(Index::FromStart(r.start))
    }
}

impl From<RangeTo<usize>> for IndexRange {
    fn from(r: RangeTo<usize>) -> Self {
        IndexRange::ending_at(Index::FromStart(r.end))
    }
}

impl From<RangeFull> for IndexRange {
    fn from(_: RangeFull) -> Self {
        IndexRange::starting_at(Index::FromStart(0))
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
