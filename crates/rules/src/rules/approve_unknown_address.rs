//! Approvals or transfers whose destination derives from a function
//! parameter: the target account is caller-controlled.

use crate::analysis::matcher;
use crate::core::{Confidence, Finding, Impact, Rule, RuleConfig, SourceElement, TableSpec};
use crate::impl_rule;
use crate::ir::{AnalysisUnit, Contract, Node};
use anyhow::Result;

const FUND_MOVING_MEMBERS: [&str; 2] = ["approve", "transfer"];

pub struct ApproveUnknownAddress;

impl ApproveUnknownAddress {
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
                let is_fund_moving = FUND_MOVING_MEMBERS
                    .iter()
                    .any(|m| matcher::call_member_is(call, m));
                if is_fund_moving
                    && matcher::argument_mentions_parameter(call, &function.parameters)
                {
                    offenders.push(node);
                }
            }
        }
        if offenders.is_empty() {
            return None;
        }

        let mut finding = self.new_finding().with_text(format!(
            "{} contract has function(s) that approve address(es):\n",
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
    ApproveUnknownAddress,
    id: "approve-unknown-address",
    help: "Approve or Transfer to unknown address",
    impact: Impact::Low,
    confidence: Confidence::Low,
    table: TableSpec::file_contract_function()
);
