//! Execution targets: the host picks one and hands it sequences.
//!
//! The same sequence value can go to either target; only the output differs.

use lazyseq_operators::Sequence;

use crate::runtime::{Engine, ExecError, TranslatedQuery};

pub trait ExecutionTarget<T> {
    type Output;

    fn execute(&self, sequence: &Sequence<T>) -> Result<Self::Output, ExecError>;
}

/// Pulls the sequence in process.
#[derive(Debug, Clone)]
pub struct LocalEvaluator {
    engine: Engine,
}

impl LocalEvaluator {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }
}

impl<T: 'static> ExecutionTarget<T> for LocalEvaluator {
    type Output = Vec<T>;

    fn execute(&self, sequence: &Sequence<T>) -> Result<Vec<T>, ExecError> {
        self.engine.evaluate_locally(sequence)
    }
}

/// Records the sequence for a remote provider.
#[derive(Debug, Clone)]
pub struct RemoteTranslator {
    engine: Engine,
}

impl RemoteTranslator {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }
}

impl<T: 'static> ExecutionTarget<T> for RemoteTranslator {
    type Output = TranslatedQuery;

    fn execute(&self, sequence: &Sequence<T>) -> Result<TranslatedQuery, ExecError> {
        self.engine.translate_for_remote(sequence)
    }
}

impl Engine {
    pub fn local(&self) -> LocalEvaluator {
        LocalEvaluator::new(self.clone())
    }

    pub fn remote(&self) -> RemoteTranslator {
        RemoteTranslator::new(self.clone())
    }
}
