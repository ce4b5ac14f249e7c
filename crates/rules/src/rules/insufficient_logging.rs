//! Privileged state-changing entry points must emit an event.
//!
//! A privileged function (modifier-guarded, non-view, externally callable)
//! whose execution can complete without a single event emission cannot be
//! monitored by users; every such function is reported.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Function};
use anyhow::Result;
use std::collections::HashSet;

pub struct InsufficientLogging;

impl InsufficientLogging {
    fn is_privileged(function: &Function) -> bool {
        function.is_entry_point()
            && function.is_implemented
            && !function.is_view
            && !function.is_pure
            && !function.is_constructor()
            && !function.modifiers.is_empty()
    }

    fn detect_in_contract(&self, contract: &Contract) -> Vec<Finding> {
        let mut findings = Vec::new();
        for function in &contract.functions {
            if !Self::is_privileged(function) {
                continue;
            }
            let mut visited = HashSet::new();
            let emits =
                matcher::count_reachable_event_emits(function, function.entry, &mut visited);
            if emits == 0 {
                findings.push(
                    self.new_finding()
                        .with_element(SourceElement::from_function(function, contract))
                        .with_text(" no emit event:\n"),
                );
            }
        }
        findings
    }

    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        Ok(unit
            .contracts
            .iter()
            .flat_map(|c| self.detect_in_contract(c))
            .collect())
    }
}

impl_rule!(
    InsufficientLogging,
    id: "insufficient-logging",
    help: "Insufficient Logging",
    impact: Impact::Low,
    confidence: Confidence::Low,
    table: TableSpec::file_contract_function()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Node, NodeId, NodeKind, Operand, SsaOp, ValueId};

    fn privileged(name: &str, emits: bool) -> Function {
        let mut ssa = Vec::new();
        if emits {
            ssa.push(SsaOp::EmitEvent {
                name: "Changed".to_string(),
                arguments: vec![Operand::Value(ValueId(0))],
            });
        }
        Function::new(name)
            .with_modifiers(vec![Function::modifier("onlyOwner")])
            .with_nodes(vec![Node::new(NodeId(0), NodeKind::Entry).with_ssa(ssa)])
    }

    #[test]
    fn test_silent_privileged_function_reported() {
        let contract = Contract::new("Lock")
            .with_functions(vec![privileged("bad", false), privileged("good", true)]);
        let unit = AnalysisUnit::new(vec![contract]);

        let findings = InsufficientLogging
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].first_element().unwrap().name, "bad");
    }

    #[test]
    fn test_unguarded_function_not_privileged() {
        let plain = Function::new("open")
            .with_nodes(vec![Node::new(NodeId(0), NodeKind::Entry)]);
        let unit = AnalysisUnit::new(vec![Contract::new("C").with_functions(vec![plain])]);

        let findings = InsufficientLogging
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert!(findings.is_empty());
    }
}
