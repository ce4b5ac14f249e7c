//! Shared analysis capabilities beneath the rule set.
//!
//! The graph model wraps a function's CFG with its dominance data, the
//! taint engine answers dependency queries over SSA def-use chains, and the
//! structural matcher provides the predicates rules compose. Version and
//! standard-signature helpers back the compiler and token rules.

pub mod cfg;
pub mod erc;
pub mod matcher;
pub mod taint;
pub mod version;

pub use cfg::{FunctionGraph, LoopTracker, LoopTracking};
pub use erc::{guess_standard, StandardGuess, StandardMatch};
pub use taint::{
    collect_equality_comparisons, is_dependent, operand_is_dependent, seed_taint,
    DependencyScope, TaintSet,
};
pub use version::{
    check_compiler_version, check_constraint, floating_marker, parse_constraint, SolcVersion,
};
