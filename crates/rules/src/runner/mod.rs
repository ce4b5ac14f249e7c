//! Rule registry and executor.

pub mod engine;
pub mod registry;

pub use engine::{CancelToken, RuleEngine, RuleFailure, RuleFindings, RunReport};
pub use registry::RuleRegistry;
