//! Strict equality on values an external actor can push around.
//!
//! Balances can be changed by direct transfers and timestamps by miners;
//! a `==` comparison against either can brick the guarded function. The
//! taint engine seeds from balance reads and time builtins and every
//! strict-equality comparison with a dependent operand is reported.

use crate::analysis::taint::{self, DependencyScope, TaintSet};
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{
    AnalysisUnit, BuiltinValue, CallTarget, Contract, Operand, SolidityBuiltin, SsaOp,
};
use anyhow::Result;

pub struct StrictEqualities;

impl StrictEqualities {
    /// Seed taint with every balance read and environment-time assignment
    /// in the contract, plus the time builtins themselves.
    fn balance_taints(contract: &Contract) -> TaintSet {
        let mut taints = TaintSet::new();
        for function in &contract.functions {
            for (_, op) in function.ssa_ops() {
                match op {
                    SsaOp::Call {
                        result: Some(result),
                        target: CallTarget::Builtin(SolidityBuiltin::Balance),
                        ..
                    } => taints.insert_value(*result),
                    SsaOp::Call {
                        result: Some(result),
                        target: CallTarget::Member { member, .. },
                        ..
                    } if member == "balanceOf" => taints.insert_value(*result),
                    SsaOp::Assign {
                        result,
                        source: Operand::Builtin(builtin),
                    } if matches!(
                        builtin,
                        BuiltinValue::Now | BuiltinValue::BlockNumber | BuiltinValue::BlockTimestamp
                    ) =>
                    {
                        taints.insert_value(*result)
                    }
                    _ => {}
                }
            }
        }
        taints.insert_builtin(BuiltinValue::Now);
        taints.insert_builtin(BuiltinValue::BlockNumber);
        taints.insert_builtin(BuiltinValue::BlockTimestamp);
        taints
    }

    fn detect_in_contract(&self, contract: &Contract) -> Vec<Finding> {
        let taints = Self::balance_taints(contract);
        let scope = DependencyScope::new(contract);
        let tainted = taint::collect_equality_comparisons(&scope, &contract.functions, &taints);

        let mut findings = Vec::new();
        for (function_name, node_ids) in tainted {
            let Some(function) = contract.functions.iter().find(|f| f.name == function_name)
            else {
                continue;
            };
            for node_id in node_ids {
                let Some(node) = function.node(node_id) else {
                    continue;
                };
                findings.push(
                    self.new_finding()
                        .with_element(SourceElement::from_function(function, contract))
                        .with_text(" uses a dangerous strict equality:\n")
                        .with_text("\t- ")
                        .with_element(SourceElement::from_node(node, contract))
                        .with_text("\n"),
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
    StrictEqualities,
    id: "strict-equalities",
    help: "Using of Improper Strict Equalities",
    impact: Impact::Optimization,
    confidence: Confidence::Low,
    table: TableSpec::file_contract_function()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOp, Function, Node, NodeId, NodeKind, ValueId};

    /// return this.balance == 5 ether
    fn goal_reached() -> Function {
        let node = Node::new(NodeId(0), NodeKind::Expression).with_ssa(vec![
            SsaOp::Call {
                result: Some(ValueId(0)),
                target: CallTarget::Builtin(SolidityBuiltin::Balance),
                arguments: vec![Operand::Literal("this".to_string())],
            },
            SsaOp::Binary {
                result: ValueId(1),
                op: BinaryOp::Eq,
                lhs: Operand::Value(ValueId(0)),
                rhs: Operand::Literal("5000000000000000000".to_string()),
            },
        ]);
        Function::new("goalReached").with_nodes(vec![node])
    }

    #[test]
    fn test_balance_equality_reported() {
        let unit = AnalysisUnit::new(vec![
            Contract::new("Crowdsale").with_functions(vec![goal_reached()])
        ]);

        let findings = StrictEqualities
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].description().contains("dangerous strict equality"));
        assert_eq!(findings[0].first_element().unwrap().name, "goalReached");
    }

    #[test]
    fn test_untainted_equality_passes() {
        let node = Node::new(NodeId(0), NodeKind::Expression).with_ssa(vec![SsaOp::Binary {
            result: ValueId(0),
            op: BinaryOp::Eq,
            lhs: Operand::Value(ValueId(7)),
            rhs: Operand::Literal("1".to_string()),
        }]);
        let unit = AnalysisUnit::new(vec![Contract::new("C")
            .with_functions(vec![Function::new("f").with_nodes(vec![node])])]);

        assert!(StrictEqualities
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_inequality_on_tainted_value_passes() {
        let node = Node::new(NodeId(0), NodeKind::Expression).with_ssa(vec![
            SsaOp::Call {
                result: Some(ValueId(0)),
                target: CallTarget::Builtin(SolidityBuiltin::Balance),
                arguments: vec![],
            },
            SsaOp::Binary {
                result: ValueId(1),
                op: BinaryOp::Ge,
                lhs: Operand::Value(ValueId(0)),
                rhs: Operand::Literal("5".to_string()),
            },
        ]);
        let unit = AnalysisUnit::new(vec![Contract::new("C")
            .with_functions(vec![Function::new("f").with_nodes(vec![node])])]);

        assert!(StrictEqualities
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
