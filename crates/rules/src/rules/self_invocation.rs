//! Internal logic invoked through the contract's own address.
//!
//! `this.f()` is an external call: it resets `msg.sender` to the contract
//! itself and pays the external-call gas premium. The match is structural:
//! a call whose receiver is the self-reference, so look-alike calls on
//! other contracts never trip it.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Node, NodeKind};
use anyhow::Result;

pub struct SelfInvocationRule;

impl SelfInvocationRule {
    fn detect_in_contract(&self, contract: &Contract) -> Option<Finding> {
        let mut offenders: Vec<&Node> = Vec::new();
        for function in &contract.functions {
            for node in &function.nodes {
                if node.kind != NodeKind::Expression {
                    continue;
                }
                let Some(expression) = &node.expression else {
                    continue;
                };
                if matcher::self_invocation(expression).is_some() {
                    offenders.push(node);
                }
            }
        }
        if offenders.is_empty() {
            return None;
        }

        let mut finding = self
            .new_finding()
            .with_text("Found this usage in ")
            .with_element(SourceElement::from_contract(contract))
            .with_text(":\n");
        for node in offenders {
            finding = finding
                .with_text("\t- ")
                .with_element(SourceElement::from_node(node, contract))
                .with_text("\n");
        }
        Some(finding)
    }

    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        Ok(unit
            .contracts
            .iter()
            .filter_map(|c| self.detect_in_contract(c))
            .collect())
    }
}

impl_rule!(
    SelfInvocationRule,
    id: "this-usage",
    help: "Using this to invoke internal function instead of jump",
    impact: Impact::Medium,
    confidence: Confidence::Low
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Expression, Function, NodeId};

    #[test]
    fn test_this_call_reported() {
        let node = Node::new(NodeId(0), NodeKind::Expression).with_expression(Expression::call(
            Expression::member(Expression::SelfReference, "buy"),
            vec![Expression::identifier("offerId")],
        ));
        let unit = AnalysisUnit::new(vec![Contract::new("Marketplace")
            .with_functions(vec![Function::new("bulkBuy").with_nodes(vec![node])])]);

        let findings = SelfInvocationRule
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].first_element().unwrap().name, "Marketplace");
    }

    #[test]
    fn test_plain_member_call_passes() {
        let node = Node::new(NodeId(0), NodeKind::Expression).with_expression(Expression::call(
            Expression::member(Expression::identifier("token"), "transfer"),
            vec![],
        ));
        let unit = AnalysisUnit::new(vec![Contract::new("C")
            .with_functions(vec![Function::new("f").with_nodes(vec![node])])]);

        assert!(SelfInvocationRule
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
