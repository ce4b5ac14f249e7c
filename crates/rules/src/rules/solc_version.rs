//! Pragmas and compiler versions with known problems or too much slack.

use crate::analysis::version;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::AnalysisUnit;
use anyhow::Result;

pub struct IncorrectSolcVersion;

impl IncorrectSolcVersion {
    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for pragma in &unit.pragma_directives {
            if !pragma.is_version_pragma() {
                continue;
            }
            if let Some(reason) = version::check_constraint(&pragma.version_constraint) {
                findings.push(
                    self.new_finding()
                        .with_text("Pragma version ")
                        .with_element(SourceElement::from_pragma(pragma))
                        .with_text(format!(" {}\n", reason)),
                );
            }
        }

        if let Some(solc) = &unit.solc_version {
            if let Some(reason) = version::check_compiler_version(solc) {
                findings.push(
                    self.new_finding()
                        .with_text(format!("solc-{} {}\n", solc, reason)),
                );
            }
        }

        Ok(findings)
    }
}

impl_rule!(
    IncorrectSolcVersion,
    id: "solc-version",
    help: "Incorrect versions of Solidity",
    impact: Impact::Informational,
    confidence: Confidence::High,
    table: TableSpec::file_version()
);
