//! Reverts reachable inside `.length`-bounded loops: one failing element
//! makes the whole batch unusable, and possibly the contract with it.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Function, Node};
use crate::rules::state_changing_loop::nodes_in_unbounded_loops;
use anyhow::Result;

pub struct LoopReverted;

impl LoopReverted {
    fn detect_in_contract(&self, contract: &Contract, config: &RuleConfig) -> Option<Finding> {
        let mut per_function: Vec<(&Function, Vec<&Node>)> = Vec::new();
        for function in &contract.functions {
            if !function.is_implemented || function.is_constructor() {
                continue;
            }
            let reverts = nodes_in_unbounded_loops(function, config, |node| {
                node.expression
                    .as_ref()
                    .is_some_and(|e| matcher::is_validator_call(e, &["require", "assert", "revert"]))
            });
            if !reverts.is_empty() {
                per_function.push((function, reverts));
            }
        }
        if per_function.is_empty() {
            return None;
        }

        let mut finding = self.new_finding().with_text(format!(
            "{} contract has function(s) that could revert inside a loop:\n",
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
    LoopReverted,
    id: "loop-reverted",
    help: "A loop of multiple element that could be reverted",
    impact: Impact::Low,
    confidence: Confidence::Low,
    table: TableSpec::file_contract_function()
);
