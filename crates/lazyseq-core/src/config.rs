//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of elements `evaluate_locally` will materialize.
    /// `None` means unlimited; set it when sequences may be unbounded.
    pub result_limit: Option<usize>,

    /// Refuse to translate a sequence that has no remote-backed source.
    pub require_remote_source: bool,

    /// Label stamped on every translated query so the host can route it.
    pub dialect: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            result_limit: None,
            require_remote_source: true,
            dialect: "lazyseq-plan-v1".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYSEQ_RESULT_LIMIT`: max elements materialized by local evaluation
    /// - `LAZYSEQ_REQUIRE_REMOTE_SOURCE`: `true`/`false`
    /// - `LAZYSEQ_DIALECT`: label for translated queries
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("LAZYSEQ_RESULT_LIMIT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.result_limit = Some(v);
            }
        }

        if let Ok(s) = std::env::var("LAZYSEQ_REQUIRE_REMOTE_SOURCE") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.require_remote_source = v;
            }
        }

        if let Ok(s) = std::env::var("LAZYSEQ_DIALECT") {
            if !s.trim().is_empty() {
                cfg.dialect = s.trim().to_string();
            }
        }

        cfg
    }

    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.result_limit == Some(0) {
            return Err(Error::Config("result_limit must be at least 1".into()));
        }
        if self.dialect.trim().is_empty() {
            return Err(Error::Config("dialect must not be empty".into()));
        }
        Ok(())
    }
}
