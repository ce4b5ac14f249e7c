//! Array state passed by value (`memory`) and then written: the write
//! never reaches storage.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Node};
use anyhow::Result;

pub struct AssignMemoryArray;

impl AssignMemoryArray {
    fn detect_in_contract(&self, contract: &Contract) -> Option<Finding> {
        let mut offenders: Vec<&Node> = Vec::new();
        for function in &contract.functions {
            if function.is_view || function.is_pure {
                continue;
            }
            for node in &function.nodes {
                let Some(expression) = &node.expression else {
                    continue;
                };
                if !matcher::memory_array_writes(expression).is_empty() {
                    offenders.push(node);
                }
            }
        }
        if offenders.is_empty() {
            return None;
        }

        let mut finding = self.new_finding().with_text(format!(
            "{} contract has expression(s) that assigns a value into a memory of array:\n",
            contract.name
        ));
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
    AssignMemoryArray,
    id: "assign-memory-array",
    help: "Assign the value to the memory of array",
    impact: Impact::High,
    confidence: Confidence::Low,
    table: TableSpec::file_contract()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Expression, Function, Identifier, NodeId, NodeKind};

    #[test]
    fn test_memory_array_write_flagged() {
        let write = Expression::assign(
            Expression::Identifier(Identifier::memory_array("arr")),
            Expression::Literal("200".to_string()),
        );
        let node = Node::new(NodeId(0), NodeKind::Expression).with_expression(write);
        let unit = AnalysisUnit::new(vec![Contract::new("Memory")
            .with_functions(vec![Function::new("setMemory").with_nodes(vec![node])])]);

        let findings = AssignMemoryArray
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_storage_array_write_passes() {
        let write = Expression::assign(
            Expression::identifier("arr"),
            Expression::Literal("100".to_string()),
        );
        let node = Node::new(NodeId(0), NodeKind::Expression).with_expression(write);
        let unit = AnalysisUnit::new(vec![Contract::new("Memory")
            .with_functions(vec![Function::new("setStorage").with_nodes(vec![node])])]);

        assert!(AssignMemoryArray
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
