//! Ownership-bearing state written by externally callable functions.

use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Function};
use anyhow::Result;

pub struct ModifiableOwnership;

impl ModifiableOwnership {
    fn writes_ownership(function: &Function) -> bool {
        function
            .state_variables_written
            .iter()
            .any(|name| name.contains("owner"))
    }

    fn detect_in_contract(&self, contract: &Contract) -> Option<Finding> {
        let offenders: Vec<&Function> = contract
            .entry_points()
            .filter(|f| !f.is_view && !f.is_pure && !f.is_constructor())
            .filter(|f| Self::writes_ownership(f))
            .collect();
        if offenders.is_empty() {
            return None;
        }

        let mut finding = self.new_finding().with_text(format!(
            "{} contract has function(s) that modifies the ownership:\n",
            contract.name
        ));
        for function in offenders {
            finding = finding
                .with_text("\t- ")
                .with_element(SourceElement::from_function(function, contract))
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
    ModifiableOwnership,
    id: "modifiable-ownership",
    help: "Unauthorized Modifiable Ownership",
    impact: Impact::High,
    confidence: Confidence::Low,
    table: TableSpec::file_contract_function()
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_write_reported() {
        let mut change_owner = Function::new("changeOwner");
        change_owner.state_variables_written = vec!["owner".to_string()];
        let mut set_fee = Function::new("setFee");
        set_fee.state_variables_written = vec!["fee".to_string()];

        let unit = AnalysisUnit::new(vec![
            Contract::new("Owned").with_functions(vec![change_owner, set_fee])
        ]);

        let findings = ModifiableOwnership
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].first_element().unwrap().name, "changeOwner");
    }
}
