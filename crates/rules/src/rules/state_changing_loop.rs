//! State writes inside loops bounded by a dynamic `.length`; gas grows
//! with the data structure until the function can no longer fit in a block.

use crate::analysis::cfg::{FunctionGraph, LoopTracker};
use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Function, Node, NodeId};
use anyhow::Result;
use std::collections::HashSet;

pub struct StateChangingLoop;

/// Program-order walk collecting nodes inside `.length`-bounded loops that
/// satisfy `select`. The dominance frontier attributes each node to the
/// header that actually governs it.
pub(crate) fn nodes_in_unbounded_loops<'f>(
    function: &'f Function,
    config: &RuleConfig,
    select: impl Fn(&Node) -> bool,
) -> Vec<&'f Node> {
    let graph = FunctionGraph::new(function);
    let mut tracker = LoopTracker::new(config.loop_tracking);
    let mut length_headers: HashSet<NodeId> = HashSet::new();
    let mut matches = Vec::new();

    for node in &function.nodes {
        let active = tracker.observe(&graph, node);
        if graph.is_loop_header(node) {
            if let Some(expression) = &node.expression {
                if matcher::is_length_bounded(expression) {
                    length_headers.insert(node.id);
                }
            }
        }
        let Some(header) = active else {
            continue;
        };
        if !length_headers.contains(&header) {
            continue;
        }
        if node.id != header && !graph.in_loop_headed_by(node, header) {
            continue;
        }
        if select(node) {
            matches.push(node);
        }
    }
    matches
}

impl StateChangingLoop {
    fn detect_in_contract(&self, contract: &Contract, config: &RuleConfig) -> Option<Finding> {
        let mut per_function: Vec<(&Function, Vec<&Node>)> = Vec::new();
        for function in &contract.functions {
            if function.is_view || function.is_pure {
                continue;
            }
            if !function.is_implemented || function.is_constructor() {
                continue;
            }
            let writes = nodes_in_unbounded_loops(function, config, |node| {
                !node.state_variables_written.is_empty()
            });
            if !writes.is_empty() {
                per_function.push((function, writes));
            }
        }
        if per_function.is_empty() {
            return None;
        }

        let mut finding = self.new_finding().with_text(format!(
            "{} contract has function(s) that change the state variables expression(s) inside an unbound loop:\n",
            contract.name
        ));
        for (function, nodes) in per_function {
            finding = finding
                .with_text("\t- ")
                .with_element(SourceElement::from_function(function, contract))
                .with_text("\n");
            for node in nodes {
                finding = finding
                    .with_text("\t\t- ")
                    .with_element(SourceElement::from_node(node, contract))
                    .with_text("\n");
            }
        }
        Some(finding)
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
    StateChangingLoop,
    id: "state-changing-loop",
    help: "A loop contains a state changing expression",
    impact: Impact::Low,
    confidence: Confidence::Low,
    table: TableSpec::file_contract_function()
);
