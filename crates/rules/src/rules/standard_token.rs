//! Report which token standard each contract implements, exactly or by
//! signature approximation.

use crate::analysis::erc::{guess_standard, StandardGuess};
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement};
use crate::impl_rule;
use crate::ir::AnalysisUnit;
use anyhow::Result;

pub struct StandardTokenCheck;

impl StandardTokenCheck {
    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for contract in &unit.contracts {
            let text = match guess_standard(contract) {
                StandardGuess::Detected(ercs) => {
                    let names: Vec<&str> = ercs.iter().map(|e| e.name()).collect();
                    format!(" contract is detected as {}\n", names.join(","))
                }
                StandardGuess::Approximate(m) => format!(
                    " contract matches {} in {} of the {} required functions\n",
                    m.matched,
                    m.total,
                    m.erc.name()
                ),
                StandardGuess::NoMatch(checked) => {
                    let names: Vec<&str> = checked.iter().map(|e| e.name()).collect();
                    format!(
                        " contract does not match the following standards: {}\n",
                        names.join(",")
                    )
                }
            };
            findings.push(
                self.new_finding()
                    .with_text("- ")
                    .with_element(SourceElement::from_contract(contract))
                    .with_text(text),
            );
        }
        Ok(findings)
    }
}

impl_rule!(
    StandardTokenCheck,
    id: "common-standard-token",
    help: "Assume the standard of the contract",
    impact: Impact::Medium,
    confidence: Confidence::High
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Contract, Erc};

    #[test]
    fn test_detected_standard_named() {
        let unit = AnalysisUnit::new(vec![
            Contract::new("Token").with_ercs(vec![Erc::Erc20, Erc::Erc2612])
        ]);

        let findings = StandardTokenCheck
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0]
            .description()
            .contains("detected as ERC20,ERC2612"));
    }

    #[test]
    fn test_plain_contract_reports_no_match() {
        let unit = AnalysisUnit::new(vec![Contract::new("Vault")]);

        let findings = StandardTokenCheck
            .detect(&unit, &RuleConfig::default())
            .unwrap();
        assert!(findings[0].description().contains("does not match"));
    }
}
