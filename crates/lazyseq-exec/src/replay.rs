//! Provenance hashes.
//!
//! A plan hash is computed from the serialized recorded chain (labels
//! included), so identical chains hash identically across runs. Translated
//! programs fold their steps, bindings, and sources into one digest.

use lazyseq_core::dag::QueryPlan;
use lazyseq_core::hash::{hash_serde, Hash256};
use lazyseq_planner::physical::TranslatedProgram;

use crate::ExecError;

pub fn hash_plan(plan: &QueryPlan) -> Result<Hash256, ExecError> {
    Ok(hash_serde(plan)?)
}

/// Hash steps, bindings, and sources into one stable digest.
pub fn hash_program(program: &TranslatedProgram) -> Result<Hash256, ExecError> {
    let steps = hash_serde(&program.steps)?;
    let bindings = hash_serde(&program.bindings)?;
    let sources = hash_serde(&program.sources)?;
    Ok(steps.xor(bindings).xor(sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyseq_core::dag::{OpDescriptor, SourceKind};
    use lazyseq_planner::lower;

    #[test]
    fn identical_chains_hash_identically() {
        let build = |count| {
            let src = QueryPlan::source("people", SourceKind::Remote);
            QueryPlan::unary(&src, OpDescriptor::Take { count })
        };
        let a = hash_program(&lower(&build(3)).unwrap()).unwrap();
        let b = hash_program(&lower(&build(3)).unwrap()).unwrap();
        let c = hash_program(&lower(&build(4)).unwrap()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(hash_plan(&build(3)).unwrap(), hash_plan(&build(3)).unwrap());
    }
}
