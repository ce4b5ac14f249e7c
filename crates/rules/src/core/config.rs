//! Per-run configuration, passed explicitly into every `detect` call.

use crate::analysis::LoopTracking;

#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Modifier names the operator declares privileged. When set, the
    /// access-control rules trust this allow-list instead of inferring
    /// sender guards from modifier bodies.
    pub privileged_modifiers: Option<Vec<String>>,
    /// Loop-body delimitation mode; `Flat` reproduces legacy findings.
    pub loop_tracking: LoopTracking,
    /// Fan rules out across a worker pool. Safe because rules are read-only
    /// over the shared unit and write only their own finding lists.
    pub parallel_execution: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            privileged_modifiers: None,
            loop_tracking: LoopTracking::Nested,
            parallel_execution: true,
        }
    }
}

impl RuleConfig {
    pub fn with_privileged_modifiers(mut self, modifiers: Vec<String>) -> Self {
        self.privileged_modifiers = Some(modifiers);
        self
    }

    pub fn with_loop_tracking(mut self, mode: LoopTracking) -> Self {
        self.loop_tracking = mode;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel_execution = false;
        self
    }
}
