//! State variables controlled by privileged accounts.
//!
//! A state-changing entry point counts as centralized when a modifier
//! compares the caller identity against state (or its name is on the
//! operator-supplied privilege allow-list), or when the body itself guards
//! on the sender. The matched modifiers are reported as a structured
//! additional field.

use crate::analysis::matcher;
use crate::core::rule::TableColumn;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Function};
use anyhow::Result;
use serde_json::Value;

pub struct CentralizedState;

impl CentralizedState {
    fn changes_state(function: &Function) -> bool {
        !function.state_variables_written.is_empty() || function.high_level_call_count() > 0
    }

    /// Modifiers making this function privileged, per allow-list when one
    /// is configured, per sender-guard inference otherwise.
    fn privileged_modifiers<'f>(function: &'f Function, config: &RuleConfig) -> Vec<&'f Function> {
        function
            .modifiers
            .iter()
            .filter(|m| match &config.privileged_modifiers {
                Some(allowed) => allowed.iter().any(|a| a == &m.name),
                None => matcher::is_centralized_modifier(m),
            })
            .collect()
    }

    fn body_guards_on_sender(function: &Function) -> bool {
        function
            .nodes
            .iter()
            .filter_map(|n| n.expression.as_ref())
            .any(matcher::is_sender_guard_call)
    }

    fn report(
        &self,
        contract: &Contract,
        function: &Function,
        modifiers: Vec<&Function>,
    ) -> Finding {
        let mut finding = self
            .new_finding()
            .with_element(SourceElement::from_function(function, contract))
            .with_text(" changes state under centralized control:\n");
        for written in &function.state_variables_written {
            finding = finding.with_text(format!("\t- {}\n", written));
        }
        let names: Vec<Value> = modifiers
            .iter()
            .map(|m| Value::String(m.name.clone()))
            .collect();
        finding.with_field("modifiers", Value::Array(names))
    }

    fn detect_impl(&self, unit: &AnalysisUnit, config: &RuleConfig) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for contract in &unit.contracts {
            for function in contract.entry_points() {
                if function.is_view || function.is_pure {
                    continue;
                }
                if !Self::changes_state(function) {
                    continue;
                }
                if !function.modifiers.is_empty() {
                    let matched = Self::privileged_modifiers(function, config);
                    if !matched.is_empty() {
                        findings.push(self.report(contract, function, matched));
                    }
                } else if Self::body_guards_on_sender(function) {
                    findings.push(self.report(contract, function, Vec::new()));
                }
            }
        }
        Ok(findings)
    }
}

impl_rule!(
    CentralizedState,
    id: "centralized-state",
    help: "Centralized Control of State Variable",
    impact: Impact::High,
    confidence: Confidence::Medium,
    table: TableSpec::new(vec![
        TableColumn::File,
        TableColumn::Contract,
        TableColumn::Function,
        TableColumn::Modifiers,
    ])
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOp, Expression, Node, NodeId, NodeKind};

    fn only_owner() -> Function {
        let guard = Node::new(NodeId(0), NodeKind::Expression).with_expression(Expression::call(
            Expression::identifier("require"),
            vec![Expression::binary(
                BinaryOp::Eq,
                Expression::msg_sender(),
                Expression::identifier("owner"),
            )],
        ));
        Function::modifier("isOwner").with_nodes(vec![guard])
    }

    fn set_fee(modifiers: Vec<Function>) -> Function {
        let mut f = Function::new("setFee").with_modifiers(modifiers);
        f.state_variables_written = vec!["fee".to_string()];
        f
    }

    #[test]
    fn test_sender_guarded_modifier_reported() {
        let unit = AnalysisUnit::new(vec![
            Contract::new("Owner").with_functions(vec![set_fee(vec![only_owner()])])
        ]);

        let findings = CentralizedState
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].additional_fields["modifiers"],
            serde_json::json!(["isOwner"])
        );
    }

    #[test]
    fn test_allow_list_overrides_inference() {
        // A modifier with no sender guard, trusted only via the allow-list.
        let unchecked = Function::modifier("onlyAdmin");
        let unit = AnalysisUnit::new(vec![
            Contract::new("Owner").with_functions(vec![set_fee(vec![unchecked])])
        ]);

        let inferred = CentralizedState
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert!(inferred.is_empty());

        let config = RuleConfig::default().with_privileged_modifiers(vec!["onlyAdmin".to_string()]);
        let listed = CentralizedState.detect(&unit, &config).unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_bodyless_unguarded_function_passes() {
        let unit = AnalysisUnit::new(vec![
            Contract::new("Owner").with_functions(vec![set_fee(Vec::new())])
        ]);
        assert!(CentralizedState
            .detect(&unit, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
