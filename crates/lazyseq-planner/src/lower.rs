//! Lowering: recorded plan → `TranslatedProgram`.

use std::collections::BTreeMap;

use lazyseq_core::dag::QueryPlan;
use lazyseq_core::id::{OpId, SourceId};
use thiserror::Error;

use crate::physical::{OperatorBinding, SourceBinding, StepInput, TranslatedProgram, TranslatedStep};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("operator binding: {0}")]
    Binding(#[from] serde_json::Error),
}

#[derive(Default)]
struct Lowering {
    steps: Vec<TranslatedStep>,
    bindings: BTreeMap<OpId, OperatorBinding>,
    sources: BTreeMap<SourceId, SourceBinding>,
}

impl Lowering {
    fn visit(&mut self, node: &QueryPlan) -> Result<StepInput, PlanError> {
        let (op, label, inputs) = match node {
            QueryPlan::Source { name, kind } => {
                let id = SourceId::new(self.sources.len() as u64);
                self.sources.insert(
                    id,
                    SourceBinding {
                        name: name.clone(),
                        kind: *kind,
                    },
                );
                return Ok(StepInput::Source(id));
            }
            QueryPlan::Unary { op, label, input } => (op, label, vec![self.visit(input)?]),
            QueryPlan::Binary {
                op,
                label,
                left,
                right,
            } => (op, label, vec![self.visit(left)?, self.visit(right)?]),
        };
        let id = OpId::new(self.steps.len() as u64);
        self.bindings.insert(
            id,
            OperatorBinding {
                key: op.name().to_string(),
                label: label.clone(),
                config: serde_json::to_value(op)?,
            },
        );
        self.steps.push(TranslatedStep { id, inputs });
        Ok(StepInput::Op(id))
    }
}

/// Lower `plan`, inputs before the operators that consume them. Ids are
/// assigned in visit order, so the same chain always lowers to the same
/// program.
pub fn lower(plan: &QueryPlan) -> Result<TranslatedProgram, PlanError> {
    let mut lowering = Lowering::default();
    let root = lowering.visit(plan)?;
    Ok(TranslatedProgram {
        steps: lowering.steps,
        bindings: lowering.bindings,
        sources: lowering.sources,
        root,
    })
}
