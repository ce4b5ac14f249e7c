//! CFG nodes with dominance data.

use crate::ir::expr::{CallExpression, Expression};
use crate::ir::ssa::SsaOp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Closed set of CFG vertex tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Entry,
    Expression,
    If,
    /// Loop header: the conditional test governing the loop body.
    IfLoop,
    /// Join vertex closing a loop body.
    EndLoop,
    Return,
    Break,
    Continue,
    Other,
}

/// Location of a source element, serialized with the field names the
/// reporting collaborator consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapping {
    pub lines: Vec<usize>,
    pub filename_short: String,
}

impl SourceMapping {
    pub fn new(filename_short: impl Into<String>, line: usize) -> Self {
        Self {
            lines: vec![line],
            filename_short: filename_short.into(),
        }
    }

    pub fn first_line(&self) -> Option<usize> {
        self.lines.first().copied()
    }
}

/// One CFG vertex. Dominance data is computed once by the host framework at
/// load time; rules are read-only observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub expression: Option<Expression>,
    /// Successor node ids ("sons").
    pub sons: Vec<NodeId>,
    pub immediate_dominator: Option<NodeId>,
    pub dominance_frontier: BTreeSet<NodeId>,
    /// SSA instruction stream of this vertex.
    pub ssa: Vec<SsaOp>,
    /// Outward calls rooted at this vertex, derived by the host framework.
    pub external_calls: Vec<CallExpression>,
    /// Names of state variables this vertex writes, derived and cached.
    pub state_variables_written: Vec<String>,
    pub location: SourceMapping,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            expression: None,
            sons: Vec::new(),
            immediate_dominator: None,
            dominance_frontier: BTreeSet::new(),
            ssa: Vec::new(),
            external_calls: Vec::new(),
            state_variables_written: Vec::new(),
            location: SourceMapping::default(),
        }
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn with_sons(mut self, sons: Vec<NodeId>) -> Self {
        self.sons = sons;
        self
    }

    pub fn with_immediate_dominator(mut self, idom: NodeId) -> Self {
        self.immediate_dominator = Some(idom);
        self
    }

    pub fn with_dominance_frontier(mut self, frontier: impl IntoIterator<Item = NodeId>) -> Self {
        self.dominance_frontier = frontier.into_iter().collect();
        self
    }

    pub fn with_ssa(mut self, ssa: Vec<SsaOp>) -> Self {
        self.ssa = ssa;
        self
    }

    pub fn with_location(mut self, location: SourceMapping) -> Self {
        self.location = location;
        self
    }

    pub fn with_state_written(mut self, names: Vec<String>) -> Self {
        self.state_variables_written = names;
        self
    }

    pub fn with_external_calls(mut self, calls: Vec<CallExpression>) -> Self {
        self.external_calls = calls;
        self
    }
}
