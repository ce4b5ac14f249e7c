//! Immutable IR snapshot consumed from the host analysis framework.
//!
//! The framework parses source, builds the CFG, computes dominators and
//! dominance frontiers, and converts to SSA; this module only defines the
//! shape of what it hands over. Rules never mutate anything here.

pub mod contract;
pub mod expr;
pub mod function;
pub mod node;
pub mod ssa;

pub use contract::{AnalysisUnit, Contract, Erc, PragmaDirective, StateVariable};
pub use expr::{BinaryOp, CallExpression, DataLocation, Expression, Identifier};
pub use function::{Function, FunctionKind, Parameter, Visibility};
pub use node::{Node, NodeId, NodeKind, SourceMapping};
pub use ssa::{BuiltinValue, CallTarget, Operand, SolidityBuiltin, SsaOp, ValueId};
