//! Recorded operator chains.
//!
//! Every sequence carries a `QueryPlan` describing how it was built: which
//! source it reads, which operators wrap it, and in what order. Local
//! evaluation never looks at it; remote translation consumes nothing else.
//! Closures cannot be serialized, so operators record only their data
//! parameters plus an optional caller-supplied label.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::index::IndexRange;

/// Where a source's elements live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Pulled in-process.
    Local,
    /// Declares an external evaluator; translation is allowed.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One chained operator as recorded for translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpDescriptor {
    Where,
    Select,
    SelectIndexed,
    SelectMany { projected: bool },
    Skip { count: usize },
    Take { count: usize },
    TakeRange { range: IndexRange },
    SkipWhile,
    TakeWhile,
    Distinct { keyed: bool },
    Reverse,
    Chunk { size: usize },
    DefaultIfEmpty,
    OrderBy { keys: Vec<SortDirection> },
    Concat,
    Zip,
    Union { keyed: bool },
    Intersect { keyed: bool },
    Except { keyed: bool },
    Join,
    GroupJoin,
    GroupBy { projected: bool },
}

impl OpDescriptor {
    /// Stable operator name, used as the binding key after lowering.
    pub fn name(&self) -> &'static str {
        use OpDescriptor::*;
        match self {
            Where => "where",
            Select => "select",
            SelectIndexed => "select_indexed",
            SelectMany { .. } => "select_many",
            Skip { .. } => "skip",
            Take { .. } => "take",
            TakeRange { .. } => "take_range",
            SkipWhile => "skip_while",
            TakeWhile => "take_while",
            Distinct { .. } => "distinct",
            Reverse => "reverse",
            Chunk { .. } => "chunk",
            DefaultIfEmpty => "default_if_empty",
            OrderBy { .. } => "order_by",
            Concat => "concat",
            Zip => "zip",
            Union { .. } => "union",
            Intersect { .. } => "intersect",
            Except { .. } => "except",
            Join => "join",
            GroupJoin => "group_join",
            GroupBy { .. } => "group_by",
        }
    }

    /// True for operators that drain their whole input before yielding.
    pub fn materializes(&self) -> bool {
        use OpDescriptor::*;
        match self {
            Reverse | OrderBy { .. } | GroupBy { .. } => true,
            TakeRange { range } => range.needs_length(),
            _ => false,
        }
    }
}

/// High-level recorded nodes (source → stages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryPlan {
    Source {
        name: String,
        kind: SourceKind,
    },
    Unary {
        op: OpDescriptor,
        label: Option<String>,
        input: Rc<QueryPlan>,
    },
    Binary {
        op: OpDescriptor,
        label: Option<String>,
        left: Rc<QueryPlan>,
        right: Rc<QueryPlan>,
    },
}

impl QueryPlan {
    pub fn source(name: impl Into<String>, kind: SourceKind) -> Rc<Self> {
        Rc::new(QueryPlan::Source {
            name: name.into(),
            kind,
        })
    }

    pub fn unary(input: &Rc<QueryPlan>, op: OpDescriptor) -> Rc<Self> {
        Rc::new(QueryPlan::Unary {
            op,
            label: None,
            input: Rc::clone(input),
        })
    }

    pub fn binary(left: &Rc<QueryPlan>, right: &Rc<QueryPlan>, op: OpDescriptor) -> Rc<Self> {
        Rc::new(QueryPlan::Binary {
            op,
            label: None,
            left: Rc::clone(left),
            right: Rc::clone(right),
        })
    }

    /// Copy of this node with `label` attached. On a source the label
    /// replaces the source name.
    pub fn with_label(&self, text: impl Into<String>) -> Rc<Self> {
        let text = text.into();
        let node = match self {
            QueryPlan::Source { kind, .. } => QueryPlan::Source {
                name: text,
                kind: *kind,
            },
            QueryPlan::Unary { op, input, .. } => QueryPlan::Unary {
                op: op.clone(),
                label: Some(text),
                input: Rc::clone(input),
            },
            QueryPlan::Binary {
                op, left, right, ..
            } => QueryPlan::Binary {
                op: op.clone(),
                label: Some(text),
                left: Rc::clone(left),
                right: Rc::clone(right),
            },
        };
        Rc::new(node)
    }

    /// Returns the number of inputs for this node.
    pub fn inputs(&self) -> usize {
        match self {
            QueryPlan::Source { .. } => 0,
            QueryPlan::Unary { .. } => 1,
            QueryPlan::Binary { .. } => 2,
        }
    }

    /// Returns true if this is a unary operator.
    pub fn is_unary(&self) -> bool {
        self.inputs() == 1
    }

    /// Returns true if this is a binary operator.
    pub fn is_binary(&self) -> bool {
        self.inputs() == 2
    }

    pub fn op(&self) -> Option<&OpDescriptor> {
        match self {
            QueryPlan::Source { .. } => None,
            QueryPlan::Unary { op, .. } | QueryPlan::Binary { op, .. } => Some(op),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            QueryPlan::Source { name, .. } => Some(name.as_str()),
            QueryPlan::Unary { label, .. } | QueryPlan::Binary { label, .. } => label.as_deref(),
        }
    }

    /// True if any source feeding this plan is remote-backed.
    pub fn is_remote(&self) -> bool {
        match self {
            QueryPlan::Source { kind, .. } => *kind == SourceKind::Remote,
            QueryPlan::Unary { input, .. } => input.is_remote(),
            QueryPlan::Binary { left, right, .. } => left.is_remote() || right.is_remote(),
        }
    }

    /// Operator names in chain order (inputs before the operators that wrap them).
    pub fn operator_names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names(&self, out: &mut Vec<&'static str>) {
        match self {
            QueryPlan::Source { .. } => {}
            QueryPlan::Unary { op, input, .. } => {
                input.collect_names(out);
                out.push(op.name());
            }
            QueryPlan::Binary {
                op, left, right, ..
            } => {
                left.collect_names(out);
                right.collect_names(out);
                out.push(op.name());
            }
        }
    }
}
