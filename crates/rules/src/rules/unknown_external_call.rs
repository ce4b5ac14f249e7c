//! External calls routed straight through a caller-supplied parameter:
//! the callee contract is whatever the caller says it is.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Node};
use anyhow::Result;

pub struct InvokeUnknownExternalFunctions;

impl InvokeUnknownExternalFunctions {
    fn detect_in_contract(&self, contract: &Contract) -> Option<Finding> {
        let mut offenders: Vec<&Node> = Vec::new();
        for function in &contract.functions {
            if function.is_view || function.is_pure {
                continue;
            }
            if !function.is_implemented || function.is_constructor() {
                continue;
            }
            for node in &function.nodes {
                let Some(call) = matcher::external_call(node) else {
                    continue;
                };
                if matcher::callee_is_parameter(call, &function.parameters) {
                    offenders.push(node);
                }
            }
        }
        if offenders.is_empty() {
            return None;
        }

        let mut finding = self.new_finding().with_text(format!(
            "{} contract has function(s) that make external call(s) to unsafe address(es):\n",
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
    InvokeUnknownExternalFunctions,
    id: "unknown-external-functions",
    help: "Invoke unknown external function",
    impact: Impact::Low,
    confidence: Confidence::Low,
    table: TableSpec::file_contract_function()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CallExpression, Expression, Function, NodeId, NodeKind, Parameter};

    fn swap_call(receiver: &str) -> CallExpression {
        CallExpression {
            callee: Box::new(Expression::member(
                Expression::identifier(receiver),
                "swapExactTokensForTokens",
            )),
            arguments: vec![Expression::identifier("amount")],
        }
    }

    #[test]
    fn test_parameter_callee_reported() {
        let node = Node::new(NodeId(0), NodeKind::Expression)
            .with_external_calls(vec![swap_call("router")]);
        let function = Function::new("swapAndDeposit")
            .with_parameters(vec![Parameter::new("router", "IRouter")])
            .with_nodes(vec![node]);
        let unit =
            AnalysisUnit::new(vec![Contract::new("Vault").with_functions(vec![function])]);

        let findings = InvokeUnknownExternalFunctions
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_state_held_callee_passes() {
        let node = Node::new(NodeId(0), NodeKind::Expression)
            .with_external_calls(vec![swap_call("trustedRouter")]);
        let function = Function::new("swapAndDeposit")
            .with_parameters(vec![Parameter::new("amount", "uint256")])
            .with_nodes(vec![node]);
        let unit =
            AnalysisUnit::new(vec![Contract::new("Vault").with_functions(vec![function])]);

        assert!(InvokeUnknownExternalFunctions
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
