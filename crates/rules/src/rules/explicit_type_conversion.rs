//! Explicit type conversions that can truncate or pad. Address casts are
//! exempt; they are the idiomatic way to talk to other contracts.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Node};
use anyhow::Result;

pub struct ExplicitTypeConversion;

impl ExplicitTypeConversion {
    fn detect_in_contract(&self, contract: &Contract) -> Option<Finding> {
        let mut offenders: Vec<&Node> = Vec::new();
        for function in &contract.functions {
            for node in &function.nodes {
                let Some(expression) = &node.expression else {
                    continue;
                };
                if !matcher::narrowing_conversions(expression).is_empty() {
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

    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        let per_contract: Vec<Finding> = unit
            .contracts
            .iter()
            .filter_map(|c| self.detect_in_contract(c))
            .collect();
        if per_contract.is_empty() {
            return Ok(Vec::new());
        }

        let mut findings = vec![self
            .new_finding()
            .with_text("Please verify the type conversion at the following items:\n")];
        findings.extend(per_contract);
        Ok(findings)
    }
}

impl_rule!(
    ExplicitTypeConversion,
    id: "explicit-type-conversion",
    help: "Incorrect Type Conversion or Cast",
    impact: Impact::Optimization,
    confidence: Confidence::Medium,
    table: TableSpec::file_contract()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Expression, Function, NodeId, NodeKind};

    fn conversion_node(target: &str) -> Node {
        Node::new(NodeId(0), NodeKind::Expression).with_expression(Expression::assign(
            Expression::identifier("price"),
            Expression::TypeConversion {
                target_type: target.to_string(),
                operand: Box::new(Expression::identifier("total")),
            },
        ))
    }

    #[test]
    fn test_narrowing_cast_reported_with_title() {
        let unit = AnalysisUnit::new(vec![Contract::new("Cast")
            .with_functions(vec![Function::new("buy").with_nodes(vec![conversion_node("uint128")])])]);

        let findings = ExplicitTypeConversion
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 2);
        assert!(findings[0].description().contains("Please verify"));
    }

    #[test]
    fn test_address_cast_exempt() {
        let unit = AnalysisUnit::new(vec![Contract::new("Cast")
            .with_functions(vec![Function::new("buy").with_nodes(vec![conversion_node("address")])])]);

        assert!(ExplicitTypeConversion
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
