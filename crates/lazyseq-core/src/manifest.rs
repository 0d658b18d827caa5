//! Run manifest for audit/replay.
//!
//! The engine emits a manifest for every local evaluation and every
//! translation; the plan hash identifies the recorded operator chain, so two
//! runs of the same chain can be matched up.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTarget {
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    pub target: RunTarget,

    /// Stable hash of the recorded plan.
    pub plan_hash: Hash256,

    /// Engine version string for provenance.
    pub engine_version: String,

    /// Elements produced; `None` for translations (nothing ran locally).
    pub rows_out: Option<u64>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(target: RunTarget, plan_hash: Hash256, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            target,
            plan_hash,
            engine_version: crate::VERSION.to_string(),
            rows_out: None,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(mut self, finished_ms: u64, rows_out: Option<u64>) -> Self {
        self.finished_ms = finished_ms;
        self.rows_out = rows_out;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_str;

    #[test]
    fn finish_records_rows_and_time() {
        let m = RunManifest::new(RunTarget::Local, hash_str("plan"), 10).finish(15, Some(3));
        assert_eq!(m.rows_out, Some(3));
        assert!(m.started_ms <= m.finished_ms);
        assert_eq!(m.engine_version, crate::VERSION);
    }
}
