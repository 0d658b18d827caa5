//! Translated program: ordered steps plus operator and source bindings.
//!
//! A remote provider walks `steps` in order; each step's inputs are either a
//! source or an earlier step, so a single forward pass suffices.

use std::collections::BTreeMap;

use lazyseq_core::dag::SourceKind;
use lazyseq_core::id::{OpId, SourceId};
use serde::{Deserialize, Serialize};

/// What a provider needs to instantiate one operator: a key (e.g. "where",
/// "order_by"), the optional label attached with `describe`, and the
/// operator's parameters as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorBinding {
    pub key: String,
    pub label: Option<String>,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBinding {
    pub name: String,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepInput {
    Source(SourceId),
    Op(OpId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedStep {
    pub id: OpId,
    pub inputs: Vec<StepInput>,
}

/// Steps in chain order + stable maps of bindings. BTreeMaps keep the
/// serialized form deterministic for hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedProgram {
    pub steps: Vec<TranslatedStep>,
    pub bindings: BTreeMap<OpId, OperatorBinding>,
    pub sources: BTreeMap<SourceId, SourceBinding>,
    /// Where the final result comes from.
    pub root: StepInput,
}

impl TranslatedProgram {
    /// Operator keys in step order.
    pub fn operator_keys(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| self.bindings.get(&step.id))
            .map(|binding| binding.key.as_str())
            .collect()
    }

    /// Names of the remote-backed sources.
    pub fn remote_sources(&self) -> Vec<&str> {
        self.sources
            .values()
            .filter(|s| s.kind == SourceKind::Remote)
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn binding(&self, id: OpId) -> Option<&OperatorBinding> {
        self.bindings.get(&id)
    }
}
