//! Functions and modifiers. A modifier is itself a `Function` with
//! `FunctionKind::Modifier`, attached to the functions it guards.

use crate::ir::node::{Node, NodeId, SourceMapping};
use crate::ir::ssa::{CallTarget, SsaOp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Constructor,
    Function,
    Modifier,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    pub is_view: bool,
    pub is_pure: bool,
    pub is_payable: bool,
    pub is_implemented: bool,
    /// Host-framework access-control verdict (modifier-based protection it
    /// already recognized).
    pub is_protected: bool,
    /// CFG vertices in program order.
    pub nodes: Vec<Node>,
    pub entry: NodeId,
    pub modifiers: Vec<Function>,
    pub parameters: Vec<Parameter>,
    /// Derived, cached: state variables read/written anywhere in this
    /// function or the internal functions it reaches.
    pub state_variables_read: Vec<String>,
    pub state_variables_written: Vec<String>,
    /// Derived, cached: state variables read inside conditional statements
    /// (guard conditions), including reachable internal calls.
    pub conditional_state_variables_read: Vec<String>,
    pub location: SourceMapping,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Function,
            visibility: Visibility::Public,
            is_view: false,
            is_pure: false,
            is_payable: false,
            is_implemented: true,
            is_protected: false,
            nodes: Vec::new(),
            entry: NodeId(0),
            modifiers: Vec::new(),
            parameters: Vec::new(),
            state_variables_read: Vec::new(),
            state_variables_written: Vec::new(),
            conditional_state_variables_read: Vec::new(),
            location: SourceMapping::default(),
        }
    }

    pub fn modifier(name: impl Into<String>) -> Self {
        let mut f = Self::new(name);
        f.kind = FunctionKind::Modifier;
        f.visibility = Visibility::Internal;
        f
    }

    pub fn with_kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Function>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_location(mut self, location: SourceMapping) -> Self {
        self.location = location;
        self
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Signature in the canonical `name(type,type)` form.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.parameters.iter().map(|p| p.type_name.as_str()).collect();
        format!("{}({})", self.name, params.join(","))
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    /// Callable from outside the contract.
    pub fn is_entry_point(&self) -> bool {
        self.kind == FunctionKind::Function
            && matches!(self.visibility, Visibility::Public | Visibility::External)
    }

    /// All SSA instructions of this function, in node order.
    pub fn ssa_ops(&self) -> impl Iterator<Item = (&Node, &SsaOp)> {
        self.nodes
            .iter()
            .flat_map(|n| n.ssa.iter().map(move |op| (n, op)))
    }

    /// Names of functions this one calls through internal jumps.
    pub fn internal_callees(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for (_, op) in self.ssa_ops() {
            if let SsaOp::Call {
                target: CallTarget::Internal(name),
                ..
            } = op
            {
                out.push(name.as_str());
            }
        }
        out
    }

    /// Count of high-level external calls in the SSA stream.
    pub fn high_level_call_count(&self) -> usize {
        self.ssa_ops()
            .filter(|(_, op)| {
                matches!(
                    op,
                    SsaOp::Call { target, .. } if target.is_external()
                )
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::node::NodeKind;
    use crate::ir::ssa::{Operand, ValueId};

    #[test]
    fn test_signature() {
        let f = Function::new("approve").with_parameters(vec![
            Parameter::new("spender", "address"),
            Parameter::new("amount", "uint256"),
        ]);
        assert_eq!(f.signature(), "approve(address,uint256)");
    }

    #[test]
    fn test_entry_point_excludes_internal_and_modifiers() {
        let public = Function::new("deposit");
        assert!(public.is_entry_point());

        let internal = Function::new("_helper").with_visibility(Visibility::Internal);
        assert!(!internal.is_entry_point());

        assert!(!Function::modifier("onlyOwner").is_entry_point());
    }

    #[test]
    fn test_internal_callees_from_ssa() {
        let node = Node::new(NodeId(0), NodeKind::Expression).with_ssa(vec![SsaOp::Call {
            result: Some(ValueId(0)),
            target: CallTarget::Internal("_transfer".to_string()),
            arguments: vec![Operand::Value(ValueId(1))],
        }]);
        let f = Function::new("transfer").with_nodes(vec![node]);
        assert_eq!(f.internal_callees(), vec!["_transfer"]);
    }
}
