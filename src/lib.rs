#![forbid(unsafe_code)]
//! lazyseq: lazy, composable queries over in-memory sequences.
//!
//! ```
//! use lazyseq::prelude::*;
//!
//! let names = Sequence::from_vec(vec!["Tom", "Dick", "Harry", "Mary", "Jay"]);
//! let query = names
//!     .filter(|n| n.contains('a'))
//!     .order_by(|n| n.len())
//!     .select(|n| n.to_uppercase());
//! assert_eq!(query.to_vec().unwrap(), vec!["JAY", "MARY", "HARRY"]);
//! ```
//!
//! The member crates:
//! - `lazyseq-core`: errors, config, recorded plans, index types, hashing.
//! - `lazyseq-operators`: `Sequence` and every operator.
//! - `lazyseq-planner`: lowering recorded plans for remote providers.
//! - `lazyseq-exec`: the `Engine` and its execution targets.

pub use lazyseq_core;
pub use lazyseq_exec;
pub use lazyseq_operators;
pub use lazyseq_planner;

pub mod prelude {
    pub use lazyseq_core::prelude::*;
    pub use lazyseq_exec::{Engine, ExecError, ExecutionTarget, LocalEvaluator, RemoteTranslator, TranslatedQuery};
    pub use lazyseq_operators::{
        compare_by, Comparer, DefaultEquality, EqualityComparer, Grouping, IgnoreAsciiCase, IntoSequence,
        NaturalOrder, OrderedSequence, Sequence, Shared,
    };
}
