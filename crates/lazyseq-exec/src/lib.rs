#![forbid(unsafe_code)]
//! lazyseq-exec: where a sequence runs.
//!
//! `Engine::evaluate_locally` pulls a sequence to completion in process.
//! `Engine::translate_for_remote` lowers its recorded plan into a
//! `TranslatedQuery` for a remote provider instead. Both stamp a
//! `RunManifest` so runs of the same chain can be matched by plan hash.

pub mod metrics;
pub mod replay;
pub mod runtime;
pub mod target;

pub use runtime::{Engine, ExecError, TranslatedQuery};
pub use target::{ExecutionTarget, LocalEvaluator, RemoteTranslator};
