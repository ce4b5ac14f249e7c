//! `assert()` used to validate common conditions.
//!
//! A failing `assert` drains all remaining gas; `require` is the validator
//! for conditions that can legitimately fail at runtime.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract};
use anyhow::Result;

pub struct AssertStatement;

impl AssertStatement {
    fn find_asserts(&self, contract: &Contract) -> Option<Finding> {
        let mut finding: Option<Finding> = None;
        for function in &contract.functions {
            for node in &function.nodes {
                let Some(expression) = &node.expression else {
                    continue;
                };
                if !matcher::is_validator_call(expression, &["assert"]) {
                    continue;
                }
                let f = finding.take().unwrap_or_else(|| {
                    self.new_finding()
                        .with_text("Found assert statement in ")
                        .with_element(SourceElement::from_function(function, contract))
                        .with_text(":\n")
                });
                finding = Some(
                    f.with_text("\t- ")
                        .with_element(SourceElement::from_node(node, contract))
                        .with_text("\n"),
                );
            }
        }
        finding
    }

    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        Ok(unit
            .contracts
            .iter()
            .filter_map(|c| self.find_asserts(c))
            .collect())
    }
}

impl_rule!(
    AssertStatement,
    id: "assert-statement",
    help: "Using of Improper Statement Validator",
    impact: Impact::Optimization,
    confidence: Confidence::High,
    table: TableSpec::file_contract()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOp, Expression, Function, Node, NodeId, NodeKind, SourceMapping};

    #[test]
    fn test_one_finding_per_contract_with_location() {
        // assert(balances[sender] >= amount)
        let assert_node = Node::new(NodeId(1), NodeKind::Expression)
            .with_expression(Expression::call(
                Expression::identifier("assert"),
                vec![Expression::binary(
                    BinaryOp::Ge,
                    Expression::identifier("balance"),
                    Expression::identifier("amount"),
                )],
            ))
            .with_location(SourceMapping::new("Vault.sol", 12));
        let withdraw = Function::new("withdraw").with_nodes(vec![
            Node::new(NodeId(0), NodeKind::Entry),
            assert_node,
        ]);
        let unit = AnalysisUnit::new(vec![
            Contract::new("Vault").with_functions(vec![withdraw])
        ]);

        let findings = AssertStatement.detect(&unit, &RuleConfig::default()).unwrap();
        assert_eq!(findings.len(), 1);

        let elements: Vec<_> = findings[0].elements().collect();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].name, "withdraw");
        assert_eq!(elements[1].source_mapping.first_line(), Some(12));
    }

    #[test]
    fn test_require_is_not_flagged() {
        let node = Node::new(NodeId(0), NodeKind::Expression).with_expression(Expression::call(
            Expression::identifier("require"),
            vec![Expression::identifier("ok")],
        ));
        let unit = AnalysisUnit::new(vec![Contract::new("C")
            .with_functions(vec![Function::new("f").with_nodes(vec![node])])]);

        assert!(AssertStatement
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
