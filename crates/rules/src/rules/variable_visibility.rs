//! State variables left at the default (internal) visibility.

use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Visibility};
use anyhow::Result;

pub struct InexplicitVariableVisibility;

impl InexplicitVariableVisibility {
    fn detect_in_contract(&self, contract: &Contract) -> Option<Finding> {
        let unlabelled: Vec<_> = contract
            .state_variables
            .iter()
            .filter(|sv| sv.visibility == Visibility::Internal)
            .collect();
        if unlabelled.is_empty() {
            return None;
        }

        let mut finding = self.new_finding().with_text(format!(
            "{} contract has state variable(s) that inexplicitly defined visibility:\n",
            contract.name
        ));
        for variable in unlabelled {
            finding = finding
                .with_text("\t- ")
                .with_element(SourceElement::from_variable(variable, contract))
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
    InexplicitVariableVisibility,
    id: "inexplicit-variable-visibility",
    help: "State variable should have explicit visibility",
    impact: Impact::Low,
    confidence: Confidence::Low,
    table: TableSpec::file_contract()
);
