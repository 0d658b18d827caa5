#![forbid(unsafe_code)]
//! lazyseq-planner: recorded `QueryPlan` → `TranslatedProgram`.
//!
//! Lowering walks the plan inputs-first, assigns each operator an `OpId` and
//! each source a `SourceId`, and binds every operator to a key (its name) plus
//! a JSON payload with its parameters. A remote provider interprets the
//! program; nothing here evaluates elements.

pub mod lower;
pub mod physical;

pub use lower::{lower, PlanError};
pub use physical::{OperatorBinding, SourceBinding, StepInput, TranslatedProgram, TranslatedStep};
