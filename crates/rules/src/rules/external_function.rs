//! Public functions never called internally could be declared external
//! and save the memory-copy of their arguments.

use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, FunctionKind, Visibility};
use anyhow::Result;

pub struct PublicCouldBeExternal;

impl PublicCouldBeExternal {
    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for contract in &unit.contracts {
            let called = contract.internally_called_names();
            for function in &contract.functions {
                if function.kind != FunctionKind::Function
                    || function.visibility != Visibility::Public
                    || !function.is_implemented
                {
                    continue;
                }
                if called.contains(function.name.as_str()) {
                    continue;
                }
                findings.push(
                    self.new_finding()
                        .with_element(SourceElement::from_function(function, contract))
                        .with_text(" should be declared external\n"),
                );
            }
        }
        Ok(findings)
    }
}

impl_rule!(
    PublicCouldBeExternal,
    id: "external-function",
    help: "Public function that could be declared external",
    impact: Impact::Optimization,
    confidence: Confidence::High,
    table: TableSpec::file_contract_function()
);
