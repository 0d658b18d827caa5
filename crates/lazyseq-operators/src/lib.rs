#![forbid(unsafe_code)]
//! lazyseq-operators: lazy, pull-based sequences and their query operators.
//!
//! A `Sequence<T>` is built from a source and a chain of operators. Building
//! the chain runs nothing; each terminal call (`to_vec`, `first`, `sum`, ...)
//! opens a fresh enumeration and pulls through the chain on demand. Closures
//! are kept, not evaluated, so state they read through a [`Shared`] cell is
//! observed as it is at pull time.
//!
//! Most operators stream. `order_by`,
//! `reverse`, `group_by`, from-end `take_range`, and the right side of joins
//! and `intersect`/`except` realize their input on the first pull.
//!
//! Sequences are `!Send`; evaluation is single-threaded.

pub mod aggregate;
mod combine;
mod element;
pub mod equality;
mod filter;
pub mod group;
mod join;
mod map;
pub mod sequence;
mod set;
pub mod shared;
mod slice;
pub mod sort;
mod source;
pub mod traits;

pub use aggregate::Numeric;
pub use equality::{compare_by, Comparer, DefaultEquality, EqualityComparer, FnComparer, IgnoreAsciiCase, NaturalOrder};
pub use group::Grouping;
pub use sequence::{IntoSequence, Sequence};
pub use shared::Shared;
pub use sort::OrderedSequence;
pub use traits::{Cursor, Enumerator, IterState};
