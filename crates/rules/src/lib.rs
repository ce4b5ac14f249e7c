//! Tenken Rules - pattern-matching rule engine over contract CFG/SSA
//!
//! This crate takes the intermediate representation a host analysis
//! framework materializes (contracts, functions, CFG nodes with dominance
//! data, SSA instruction streams) and runs an ordered set of read-only
//! rules over it, producing findings in a uniform serialized shape plus
//! the summary-table and checklist renderings the external reporter
//! consumes.

pub mod analysis;
pub mod core;
pub mod ir;
pub mod report;
pub mod rules;
pub mod runner;

pub use crate::core::{Confidence, EngineError, Finding, Impact, Rule, RuleConfig, SourceElement};

pub use crate::ir::{AnalysisUnit, Contract, Expression, Function, Node, NodeId, NodeKind};

pub use crate::analysis::{DependencyScope, FunctionGraph, LoopTracker, LoopTracking, TaintSet};

pub use crate::runner::{CancelToken, RuleEngine, RuleRegistry, RunReport};

pub use crate::report::{render_checklist, render_checklist_csv, render_table, summary_table};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_is_complete() {
        let registry = RuleRegistry::with_defaults();
        assert_eq!(registry.len(), 20);
    }
}
