//! Flow-control statements inside loop bodies.
//!
//! A `return` inside a loop terminates the whole function, not the current
//! iteration; `break`/`continue` silently skip the rest of the body. All
//! three are worth a second look when the skipped code is critical.

use crate::analysis::cfg::{FunctionGraph, LoopTracker};
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Node, NodeKind};
use anyhow::Result;

pub struct LoopSkip;

impl LoopSkip {
    fn detect_in_contract(&self, contract: &Contract, config: &RuleConfig) -> Option<Finding> {
        let mut offenders: Vec<&Node> = Vec::new();
        for function in &contract.functions {
            let graph = FunctionGraph::new(function);
            let mut tracker = LoopTracker::new(config.loop_tracking);
            for node in &function.nodes {
                let in_loop = tracker.observe(&graph, node).is_some();
                if in_loop
                    && matches!(
                        node.kind,
                        NodeKind::Return | NodeKind::Break | NodeKind::Continue
                    )
                {
                    offenders.push(node);
                }
            }
        }
        if offenders.is_empty() {
            return None;
        }

        let mut finding = self.new_finding();
        for node in offenders {
            finding = finding
                .with_text("\t- ")
                .with_element(SourceElement::from_node(node, contract))
                .with_text("\n");
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
    LoopSkip,
    id: "loop-skip",
    help: "Find a potentially flow control breaking in loops",
    impact: Impact::Medium,
    confidence: Confidence::Medium
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Function, NodeId};

    #[test]
    fn test_return_inside_loop_reported() {
        let function = Function::new("registerToken").with_nodes(vec![
            Node::new(NodeId(0), NodeKind::Entry),
            Node::new(NodeId(1), NodeKind::IfLoop),
            Node::new(NodeId(2), NodeKind::Return).with_dominance_frontier([NodeId(1)]),
            Node::new(NodeId(3), NodeKind::EndLoop),
        ]);
        let unit = AnalysisUnit::new(vec![Contract::new("C").with_functions(vec![function])]);

        let findings = LoopSkip.detect(&unit, &RuleConfig::default()).unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_return_after_loop_passes() {
        let function = Function::new("f").with_nodes(vec![
            Node::new(NodeId(0), NodeKind::IfLoop),
            Node::new(NodeId(1), NodeKind::EndLoop),
            Node::new(NodeId(2), NodeKind::Return).with_immediate_dominator(NodeId(1)),
        ]);
        let unit = AnalysisUnit::new(vec![Contract::new("C").with_functions(vec![function])]);

        assert!(LoopSkip
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
