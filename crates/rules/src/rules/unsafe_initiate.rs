//! Initialization functions callable by anyone, any number of times.
//!
//! An `initialize`-style function is safe when it carries an access-control
//! guard, or when it re-reads a state variable it writes (a hand-rolled
//! "already initialized" check). Everything else overwrites contract state
//! on every call.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Function};
use anyhow::Result;

pub struct UnsafeInitiate;

impl UnsafeInitiate {
    fn is_safe(function: &Function, config: &RuleConfig) -> bool {
        if matcher::has_access_control_guard(function, config) {
            return true;
        }
        if matcher::conditional_reads_written_state(function) {
            return true;
        }
        function
            .modifiers
            .iter()
            .any(matcher::conditional_reads_written_state)
    }

    fn detect_in_contract(&self, contract: &Contract, config: &RuleConfig) -> Option<Finding> {
        let unsafe_inits: Vec<&Function> = contract
            .functions
            .iter()
            // Loose name matching catches initialize/init/initiate variants.
            .filter(|f| f.name.to_lowercase().contains("initial"))
            .filter(|f| !Self::is_safe(f, config))
            .collect();
        if unsafe_inits.is_empty() {
            return None;
        }

        let mut finding = self.new_finding();
        for function in unsafe_inits {
            finding = finding
                .with_text("\t")
                .with_element(SourceElement::from_function(function, contract))
                .with_text("\n");
        }
        Some(finding)
    }

    fn detect_impl(&self, unit: &AnalysisUnit, config: &RuleConfig) -> Result<Vec<Finding>> {
        Ok(unit
            .contracts
            .iter()
            .filter_map(|c| self.detect_in_contract(c, config))
            .collect())
    }
}

impl_rule!(
    UnsafeInitiate,
    id: "unsafe-initiate",
    help: "Find the initialize() function without any access control",
    impact: Impact::High,
    confidence: Confidence::Medium
);
