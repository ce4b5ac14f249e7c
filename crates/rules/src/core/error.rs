//! Engine error taxonomy.
//!
//! Malformed input never surfaces here: a rule treats a missing piece of
//! the unit as "no match for this node" and moves on. What remains is the
//! per-rule execution failure (contained at the rule boundary) and the
//! one unrecoverable case, an unusable analysis unit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The host framework produced no contracts; nothing can be analyzed.
    #[error("analysis unit contains no contracts")]
    EmptyAnalysisUnit,

    /// A rule failed mid-detection. Recorded as a run warning; the rule's
    /// findings for this unit are dropped and the run continues.
    #[error("rule `{rule}` failed: {message}")]
    RuleExecution { rule: String, message: String },

    /// A formatter could not render a finding; the section degrades to a
    /// placeholder.
    #[error("rendering failed: {0}")]
    Rendering(String),
}
