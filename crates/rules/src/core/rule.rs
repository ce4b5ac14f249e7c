//! Rule trait and the optional capabilities a rule can carry.
//!
//! Rules are read-only observers: `detect` takes the immutable analysis
//! unit plus an explicit configuration value and returns its own private
//! finding list. Capabilities (summary table rendering) are plain data a
//! rule exposes, composed by the report layer; there is no capability
//! base class.

use crate::core::config::RuleConfig;
use crate::core::finding::Finding;
use crate::core::severity::{Confidence, Impact};
use crate::ir::AnalysisUnit;
use anyhow::Result;

pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;

    /// One-line summary shown in rule listings.
    fn help(&self) -> &'static str {
        ""
    }

    fn impact(&self) -> Impact;

    fn confidence(&self) -> Confidence;

    /// Summary-table capability, if this rule renders one.
    fn table_spec(&self) -> Option<TableSpec> {
        None
    }

    /// Run once over the whole unit; iterate contracts internally. Must not
    /// mutate any shared state. Malformed pieces of the unit are treated as
    /// "no match", never as a failure.
    fn detect(&self, unit: &AnalysisUnit, config: &RuleConfig) -> Result<Vec<Finding>>;

    /// Empty finding stamped with this rule's identity.
    fn new_finding(&self) -> Finding {
        Finding::new(self.id(), self.impact(), self.confidence())
    }
}

#[macro_export]
macro_rules! impl_rule {
    (
        $rule:ty,
        id: $id:expr,
        help: $help:expr,
        impact: $impact:expr,
        confidence: $confidence:expr
        $(, table: $table:expr)?
    ) => {
        impl $crate::core::Rule for $rule {
            fn id(&self) -> &'static str {
                $id
            }

            fn help(&self) -> &'static str {
                $help
            }

            fn impact(&self) -> $crate::core::Impact {
                $impact
            }

            fn confidence(&self) -> $crate::core::Confidence {
                $confidence
            }

            $(
                fn table_spec(&self) -> Option<$crate::core::TableSpec> {
                    Some($table)
                }
            )?

            fn detect(
                &self,
                unit: &$crate::ir::AnalysisUnit,
                config: &$crate::core::RuleConfig,
            ) -> anyhow::Result<Vec<$crate::core::Finding>> {
                self.detect_impl(unit, config)
            }
        }
    };
}

/// Columns a rule's summary table is built from. Cell values are extracted
/// from each finding's first source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    /// `file.sol (L:<line>)` of the element.
    File,
    /// Parent contract name.
    Contract,
    /// Element name rendered as a call, `name()`.
    Function,
    /// Element name verbatim (pragma constraints).
    Version,
    /// The `modifiers` additional field, comma-joined.
    Modifiers,
}

impl TableColumn {
    pub fn header(&self) -> &'static str {
        match self {
            TableColumn::File => "File",
            TableColumn::Contract => "Contract",
            TableColumn::Function => "Function",
            TableColumn::Version => "Version",
            TableColumn::Modifiers => "Modifier",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableSpec {
    pub columns: Vec<TableColumn>,
    /// Index of the column rows are sorted by.
    pub sort_by: usize,
}

impl TableSpec {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            sort_by: 0,
        }
    }

    pub fn file_contract_function() -> Self {
        Self::new(vec![
            TableColumn::File,
            TableColumn::Contract,
            TableColumn::Function,
        ])
    }

    pub fn file_contract() -> Self {
        Self::new(vec![TableColumn::File, TableColumn::Contract])
    }

    pub fn file_version() -> Self {
        Self::new(vec![TableColumn::File, TableColumn::Version])
    }
}
