//! Expression trees attached to CFG nodes.
//!
//! Expressions are a closed tagged union; optional structure is expressed as
//! enum payloads and narrowed with exhaustive `match`, never probed for.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_strict_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", s)
    }
}

/// Where a local binding lives. Only `Memory` bindings of array type are
/// interesting to the memory-array rule; everything else defaults to `Storage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataLocation {
    Storage,
    Memory,
    Calldata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    /// Declared location of the referenced binding, when the host framework
    /// resolved one (locals and parameters; state variables have none).
    pub data_location: Option<DataLocation>,
    pub is_array: bool,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_location: None,
            is_array: false,
        }
    }

    pub fn memory_array(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_location: Some(DataLocation::Memory),
            is_array: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    Identifier(Identifier),
    Literal(String),
    /// The contract's own address used as a call receiver (`this` in source).
    SelfReference,
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Call(CallExpression),
    TypeConversion {
        target_type: String,
        operand: Box<Expression>,
    },
    Assignment {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    MemberAccess {
        receiver: Box<Expression>,
        member: String,
    },
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn member(receiver: Expression, member: impl Into<String>) -> Self {
        Expression::MemberAccess {
            receiver: Box::new(receiver),
            member: member.into(),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn assign(lhs: Expression, rhs: Expression) -> Self {
        Expression::Assignment {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `msg.sender`, the caller-identity primitive.
    pub fn msg_sender() -> Self {
        Expression::member(Expression::identifier("msg"), "sender")
    }

    /// Immediate sub-expressions, in source order.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Identifier(_) | Expression::Literal(_) | Expression::SelfReference => {
                Vec::new()
            }
            Expression::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Expression::Call(call) => {
                let mut out: Vec<&Expression> = vec![&call.callee];
                out.extend(call.arguments.iter());
                out
            }
            Expression::TypeConversion { operand, .. } => vec![operand],
            Expression::Assignment { lhs, rhs } => vec![lhs, rhs],
            Expression::MemberAccess { receiver, .. } => vec![receiver],
        }
    }

    /// Depth-first walk over the whole tree, including `self`.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expression)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// True if any sub-expression satisfies the predicate.
    pub fn any(&self, pred: &dyn Fn(&Expression) -> bool) -> bool {
        let mut found = false;
        self.walk(&mut |e| {
            if pred(e) {
                found = true;
            }
        });
        found
    }

    pub fn as_call(&self) -> Option<&CallExpression> {
        match self {
            Expression::Call(call) => Some(call),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(id) => write!(f, "{}", id.name),
            Expression::Literal(text) => write!(f, "{}", text),
            Expression::SelfReference => write!(f, "this"),
            Expression::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Expression::Call(call) => {
                write!(f, "{}(", call.callee)?;
                for (i, arg) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expression::TypeConversion {
                target_type,
                operand,
            } => write!(f, "{}({})", target_type, operand),
            Expression::Assignment { lhs, rhs } => write!(f, "{} = {}", lhs, rhs),
            Expression::MemberAccess { receiver, member } => {
                write!(f, "{}.{}", receiver, member)
            }
        }
    }
}
