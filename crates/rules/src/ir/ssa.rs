//! SSA instruction stream consumed by the taint engine.
//!
//! Each value is produced by exactly one definition site. Values carry no
//! forward use lists; traversal is backward, from a use to its defining
//! instruction, through the def index built per scope by the taint engine.

use crate::ir::expr::BinaryOp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A versioned SSA variable. Ids are dense per function and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Environment reads that act as taint origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinValue {
    BlockTimestamp,
    BlockNumber,
    /// Legacy alias of `block.timestamp`.
    Now,
    Sender,
    Origin,
    MsgValue,
    SelfBalance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Value(ValueId),
    Builtin(BuiltinValue),
    Literal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolidityBuiltin {
    Require,
    Assert,
    Revert,
    /// `balance(address)`: reads an account balance.
    Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallTarget {
    Builtin(SolidityBuiltin),
    /// High-level call through a member, e.g. `token.balanceOf(...)`.
    Member { receiver: String, member: String },
    Internal(String),
    /// Call through an arbitrary expression; target unknown statically.
    Expression,
}

impl CallTarget {
    pub fn is_external(&self) -> bool {
        matches!(self, CallTarget::Member { .. } | CallTarget::Expression)
    }

    pub fn member_name(&self) -> Option<&str> {
        match self {
            CallTarget::Member { member, .. } => Some(member),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SsaOp {
    Assign {
        result: ValueId,
        source: Operand,
    },
    Binary {
        result: ValueId,
        op: BinaryOp,
        lhs: Operand,
        rhs: Operand,
    },
    Call {
        result: Option<ValueId>,
        target: CallTarget,
        arguments: Vec<Operand>,
    },
    EmitEvent {
        name: String,
        arguments: Vec<Operand>,
    },
    Phi {
        result: ValueId,
        inputs: Vec<Operand>,
    },
}

impl SsaOp {
    /// The value this instruction defines, if any.
    pub fn result(&self) -> Option<ValueId> {
        match self {
            SsaOp::Assign { result, .. }
            | SsaOp::Binary { result, .. }
            | SsaOp::Phi { result, .. } => Some(*result),
            SsaOp::Call { result, .. } => *result,
            SsaOp::EmitEvent { .. } => None,
        }
    }

    /// Operands read by this instruction, in order.
    pub fn operands(&self) -> Vec<&Operand> {
        match self {
            SsaOp::Assign { source, .. } => vec![source],
            SsaOp::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            SsaOp::Call { arguments, .. } => arguments.iter().collect(),
            SsaOp::EmitEvent { arguments, .. } => arguments.iter().collect(),
            SsaOp::Phi { inputs, .. } => inputs.iter().collect(),
        }
    }
}
