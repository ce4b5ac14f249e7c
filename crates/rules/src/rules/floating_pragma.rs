//! Floating pragma versions allow compiling with compilers the authors
//! never tested against.

use crate::analysis::version;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::AnalysisUnit;
use anyhow::Result;

pub struct FloatingPragmaVersion;

impl FloatingPragmaVersion {
    fn detect_impl(&self, unit: &AnalysisUnit, _config: &RuleConfig) -> Result<Vec<Finding>> {
        let mut finding: Option<Finding> = None;
        for pragma in &unit.pragma_directives {
            if !pragma.is_version_pragma() {
                continue;
            }
            let Some(marker) = version::floating_marker(&pragma.version_constraint) else {
                continue;
            };
            let f = finding
                .take()
                .unwrap_or_else(|| self.new_finding().with_text("Floating pragma version:\n"));
            finding = Some(
                f.with_text("\t- ")
                    .with_element(SourceElement::from_pragma(pragma))
                    .with_text(format!(" (floating marker `{}`)\n", marker)),
            );
        }
        Ok(finding.into_iter().collect())
    }
}

impl_rule!(
    FloatingPragmaVersion,
    id: "floating-pragma-version",
    help: "Using of Improper Pragma Version",
    impact: Impact::Optimization,
    confidence: Confidence::High,
    table: TableSpec::file_version()
);
