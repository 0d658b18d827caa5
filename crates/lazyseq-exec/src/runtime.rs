//! Runtime: evaluate a sequence locally or translate it for a remote
//! provider, and emit a `RunManifest` either way.
//!
//! - Local evaluation pulls through the sequence's own cursors and honors
//!   `EngineConfig::result_limit`.
//! - Translation never pulls an element. It lowers the recorded plan and,
//!   when `require_remote_source` is set, refuses chains with no remote source.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lazyseq_core::config::EngineConfig;
use lazyseq_core::dag::SourceKind;
use lazyseq_core::error::Error;
use lazyseq_core::hash::Hash256;
use lazyseq_core::manifest::{RunManifest, RunTarget};

use lazyseq_operators::Sequence;

use lazyseq_planner::lower::{lower, PlanError};
use lazyseq_planner::physical::TranslatedProgram;

use crate::metrics::emit_span;
use crate::replay::{hash_plan, hash_program};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Query(#[from] Error),
    #[error("result exceeds the configured limit of {limit} elements")]
    ResultLimit { limit: usize },
    #[error("sequence has no remote-backed source to translate against")]
    NotRemote,
    #[error("plan lowering: {0}")]
    Plan(#[from] PlanError),
}

/// A sequence's recorded operator chain, ready for a remote provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedQuery {
    pub dialect: String,
    /// The first remote-backed source, or the first source when none is remote.
    pub source: String,
    pub program: TranslatedProgram,
    pub plan_hash: Hash256,
    pub manifest: RunManifest,
}

impl TranslatedQuery {
    pub fn to_json(&self) -> Result<String, ExecError> {
        serde_json::to_string(self).map_err(|e| ExecError::Query(e.into()))
    }

    /// Operator keys in the order the provider applies them.
    pub fn operators(&self) -> Vec<&str> {
        self.program.operator_keys()
    }
}

/// Engine owns the validated configuration; it holds no per-run state.
#[derive(Debug, Clone)]
pub struct Engine {
    cfg: EngineConfig,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Result<Self, ExecError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Engine configured from `LAZYSEQ_*` environment variables.
    pub fn from_env() -> Result<Self, ExecError> {
        Engine::new(EngineConfig::from_env())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Pull `sequence` to completion in process.
    pub fn evaluate_locally<T: 'static>(&self, sequence: &Sequence<T>) -> Result<Vec<T>, ExecError> {
        let mut out = Vec::new();
        for item in sequence.iter() {
            if let Some(limit) = self.cfg.result_limit {
                if out.len() == limit {
                    return Err(ExecError::ResultLimit { limit });
                }
            }
            out.push(item?);
        }
        emit_span(
            "evaluate_locally",
            &[
                ("operators", sequence.plan().operator_names().join(",")),
                ("rows", out.len().to_string()),
            ],
        );
        Ok(out)
    }

    /// `evaluate_locally` plus a manifest recording the plan hash and the
    /// number of elements produced.
    pub fn run_local<T: 'static>(&self, sequence: &Sequence<T>) -> Result<(Vec<T>, RunManifest), ExecError> {
        let plan_hash = hash_plan(sequence.plan())?;
        let manifest = RunManifest::new(RunTarget::Local, plan_hash, now_millis());
        let rows = self.evaluate_locally(sequence)?;
        let manifest = manifest.finish(now_millis(), Some(rows.len() as u64));
        Ok((rows, manifest))
    }

    /// Lower `sequence`'s recorded chain for a remote provider. Nothing is
    /// pulled and no captured closure runs.
    pub fn translate_for_remote<T: 'static>(&self, sequence: &Sequence<T>) -> Result<TranslatedQuery, ExecError> {
        let plan = sequence.plan();
        if self.cfg.require_remote_source && !plan.is_remote() {
            return Err(ExecError::NotRemote);
        }
        let started = now_millis();
        let program = lower(plan)?;
        let plan_hash = hash_program(&program)?;
        let source = program
            .sources
            .values()
            .find(|s| s.kind == SourceKind::Remote)
            .or_else(|| program.sources.values().next())
            .map(|s| s.name.clone())
            .unwrap_or_default();
        let manifest = RunManifest::new(RunTarget::Remote, plan_hash, started).finish(now_millis(), None);

        emit_span(
            "translate_for_remote",
            &[
                ("source", source.clone()),
                ("steps", program.steps.len().to_string()),
                ("plan_hash", plan_hash.to_hex()),
            ],
        );

        Ok(TranslatedQuery {
            dialect: self.cfg.dialect.clone(),
            source,
            program,
            plan_hash,
            manifest,
        })
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn local_evaluation_matches_to_vec() {
        let seq = Sequence::from_vec(vec![1, 2, 3]).filter(|x| x % 2 == 1);
        assert_eq!(engine().evaluate_locally(&seq).unwrap(), vec![1, 3]);
    }

    #[test]
    fn result_limit_guards_unbounded_sequences() {
        let engine = Engine::new(EngineConfig::default().with_result_limit(5)).unwrap();
        let naturals = Sequence::iterate(0u64, |x| x + 1);
        assert!(matches!(
            engine.evaluate_locally(&naturals),
            Err(ExecError::ResultLimit { limit: 5 })
        ));
        assert_eq!(engine.evaluate_locally(&naturals.take(5)).unwrap().len(), 5);
    }

    #[test]
    fn query_errors_pass_through() {
        let seq = Sequence::range(1, 3).chunk(0);
        assert!(matches!(
            engine().evaluate_locally(&seq),
            Err(ExecError::Query(Error::InvalidArgument(_)))
        ));
    }

    #[test]
    fn run_local_stamps_a_manifest() {
        let seq = Sequence::from_vec(vec!["a", "b"]);
        let (rows, manifest) = engine().run_local(&seq).unwrap();
        assert_eq!(rows, vec!["a", "b"]);
        assert_eq!(manifest.rows_out, Some(2));
        assert_eq!(manifest.target, RunTarget::Local);
    }

    #[test]
    fn translation_requires_a_remote_source_by_default() {
        let local = Sequence::from_vec(vec![1]).take(1);
        assert!(matches!(engine().translate_for_remote(&local), Err(ExecError::NotRemote)));

        let lenient = Engine::new(EngineConfig {
            require_remote_source: false,
            ..EngineConfig::default()
        })
        .unwrap();
        let query = lenient.translate_for_remote(&local).unwrap();
        assert_eq!(query.operators(), vec!["take"]);
        assert_eq!(query.source, "values");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = EngineConfig {
            dialect: " ".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(Engine::new(cfg), Err(ExecError::Query(Error::Config(_)))));
    }
}
