#![forbid(unsafe_code)]
//! lazyseq-core: shared vocabulary for the lazyseq engine.
//!
//! - `error`: the engine's error taxonomy (every terminal call reports through it).
//! - `config`: `EngineConfig`, serializable and overridable from the environment.
//! - `dag`: the recorded operator chain (`QueryPlan`) used for remote translation.
//! - `index`: from-start / from-end positions and ranges.
//! - `hash`, `id`, `manifest`: stable fingerprints, typed ids, and run provenance.
//!
//! Nothing in here evaluates a sequence; that lives in `lazyseq-operators`.

pub mod config;
pub mod dag;
pub mod error;
pub mod hash;
pub mod id;
pub mod index;
pub mod manifest;
pub mod prelude;

/// Engine version stamped into manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
