//! Loop iterators assigned from more than one place.
//!
//! The header's own increment is one site; any extra assignment inside the
//! body makes the iteration count depend on data and usually signals a
//! logic error.

use crate::analysis::cfg::{FunctionGraph, LoopTracker};
use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Function, Node, NodeKind};
use anyhow::Result;

pub struct DirtyIterators;

impl DirtyIterators {
    /// Per function: iterators of its loops mapped to the nodes assigning
    /// them inside the loop body.
    fn iterator_assignments<'f>(
        function: &'f Function,
        config: &RuleConfig,
    ) -> Vec<(String, Vec<&'f Node>)> {
        let graph = FunctionGraph::new(function);
        let mut tracker = LoopTracker::new(config.loop_tracking);
        let mut iterators: Vec<(String, Vec<&'f Node>)> = Vec::new();

        for node in &function.nodes {
            let in_loop = tracker.observe(&graph, node).is_some();
            if graph.is_loop_header(node) {
                if let Some(expression) = &node.expression {
                    for name in matcher::header_iterators(expression) {
                        if !iterators.iter().any(|(n, _)| n == &name) {
                            iterators.push((name, Vec::new()));
                        }
                    }
                }
            }
            if !in_loop || node.kind != NodeKind::Expression {
                continue;
            }
            let Some(expression) = &node.expression else {
                continue;
            };
            if let Some(target) = matcher::assignment_target(expression) {
                if let Some((_, sites)) = iterators.iter_mut().find(|(n, _)| n == &target.name) {
                    sites.push(node);
                }
            }
        }
        iterators
    }

    fn detect_in_contract(&self, contract: &Contract, config: &RuleConfig) -> Option<Finding> {
        let mut finding: Option<Finding> = None;
        for function in &contract.functions {
            for (_, sites) in Self::iterator_assignments(function, config) {
                if sites.len() < 2 {
                    continue;
                }
                let mut f = finding.take().unwrap_or_else(|| self.new_finding());
                f = f
                    .with_element(SourceElement::from_function(function, contract))
                    .with_text("\n");
                for node in sites {
                    f = f
                        .with_text("\t")
                        .with_element(SourceElement::from_node(node, contract))
                        .with_text("\n");
                }
                finding = Some(f);
            }
        }
        finding
    }

    fn detect_impl(&self, unit: &AnalysisUnit, config: &RuleConfig) -> Result<Vec<Finding>> {
        Ok(unit
            .contracts
            .iter()
            .filter_map(|c| self.detect_in_contract(c, config))
            .collect())
    }
}

impl_rule!(
    DirtyIterators,
    id: "dirty-iterators",
    help: "Find loops that modifying its iterator",
    impact: Impact::Medium,
    confidence: Confidence::Low
);
