//! Core abstractions of the rule engine: the rule trait, findings with
//! their serialized shape, severity classification, run configuration, and
//! the error taxonomy.

pub mod config;
pub mod error;
pub mod finding;
pub mod rule;
pub mod severity;

pub use config::RuleConfig;
pub use error::EngineError;
pub use finding::{ElementKind, Finding, Fragment, SourceElement};
pub use rule::{Rule, TableColumn, TableSpec};
pub use severity::{Confidence, Impact};
