//! Read-only view over a function's CFG plus loop-body tracking.
//!
//! Loop membership is decided two ways, used together by the loop rules:
//! a program-order walk with a tracker yields the currently active loop
//! header, and the dominance frontier of a node decides whether a specific
//! header governs it (`in_loop_headed_by`). The frontier test is what
//! attributes a statement to the right header when the walk alone is
//! ambiguous.

use crate::ir::{Function, Node, NodeId, NodeKind};

/// Borrowing wrapper exposing the graph relations of one function.
pub struct FunctionGraph<'f> {
    function: &'f Function,
}

impl<'f> FunctionGraph<'f> {
    pub fn new(function: &'f Function) -> Self {
        Self { function }
    }

    pub fn function(&self) -> &'f Function {
        self.function
    }

    /// Successor nodes of `id`.
    pub fn sons(&self, id: NodeId) -> Vec<&'f Node> {
        match self.function.node(id) {
            Some(node) => node
                .sons
                .iter()
                .filter_map(|s| self.function.node(*s))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Nearest strict dominator, none for the entry node.
    pub fn immediate_dominator(&self, id: NodeId) -> Option<&'f Node> {
        self.function
            .node(id)?
            .immediate_dominator
            .and_then(|d| self.function.node(d))
    }

    pub fn dominance_frontier(&self, id: NodeId) -> Vec<&'f Node> {
        match self.function.node(id) {
            Some(node) => node
                .dominance_frontier
                .iter()
                .filter_map(|d| self.function.node(*d))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_loop_header(&self, node: &Node) -> bool {
        node.kind == NodeKind::IfLoop
    }

    /// A node placed just past a loop: its immediate dominator is the
    /// END_LOOP join vertex.
    pub fn is_loop_exit(&self, node: &Node) -> bool {
        matches!(
            self.immediate_dominator(node.id),
            Some(idom) if idom.kind == NodeKind::EndLoop
        )
    }

    /// True when `header` governs `node`: the header shows up in the node's
    /// dominance frontier.
    pub fn in_loop_headed_by(&self, node: &Node, header: NodeId) -> bool {
        node.dominance_frontier.contains(&header)
    }
}

/// How loop bodies are delimited during a program-order walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopTracking {
    /// Stack of active headers; push on a loop header, pop when the walked
    /// node's immediate dominator is an END_LOOP. Handles nesting.
    #[default]
    Nested,
    /// The original single boolean flag. Loses track after the first inner
    /// loop closes, kept for parity with legacy findings.
    Flat,
}

/// Program-order loop tracker. Feed every node of a function, in order, to
/// `observe`; the return value is the loop header governing that node, if
/// any. Not reentrant across functions; build one per walk.
pub struct LoopTracker {
    mode: LoopTracking,
    stack: Vec<NodeId>,
    flat_active: Option<NodeId>,
}

impl LoopTracker {
    pub fn new(mode: LoopTracking) -> Self {
        Self {
            mode,
            stack: Vec::new(),
            flat_active: None,
        }
    }

    pub fn observe(&mut self, graph: &FunctionGraph<'_>, node: &Node) -> Option<NodeId> {
        let exits_loop = graph.is_loop_exit(node);
        match self.mode {
            LoopTracking::Nested => {
                if exits_loop {
                    self.stack.pop();
                }
                if graph.is_loop_header(node) {
                    self.stack.push(node.id);
                }
                self.stack.last().copied()
            }
            LoopTracking::Flat => {
                if graph.is_loop_header(node) {
                    self.flat_active = Some(node.id);
                }
                if exits_loop {
                    self.flat_active = None;
                }
                self.flat_active
            }
        }
    }
}
