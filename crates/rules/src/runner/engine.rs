//! Rule executor.
//!
//! Rules run independently over the immutable unit, in parallel when
//! configured, since each writes only its own finding list. A rule failure
//! is contained at the rule boundary: logged, recorded as a run warning,
//! and the remaining rules keep going. The merge step restores registration
//! order, so output ordering never depends on scheduling.

use crate::core::{EngineError, Finding, RuleConfig};
use crate::ir::AnalysisUnit;
use crate::runner::registry::RuleRegistry;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Cooperative cancellation, checked between rules. A cancelled run keeps
/// every finding already produced.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

enum RuleOutcome {
    Findings(Vec<Finding>),
    Failed(String),
    Skipped,
}

pub struct RuleEngine {
    registry: RuleRegistry,
    config: RuleConfig,
    cancel: CancelToken,
}

impl RuleEngine {
    pub fn new(registry: RuleRegistry, config: RuleConfig) -> Self {
        Self {
            registry,
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_defaults(config: RuleConfig) -> Self {
        Self::new(RuleRegistry::with_defaults(), config)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run(&self, unit: &AnalysisUnit) -> Result<RunReport, EngineError> {
        if unit.contracts.is_empty() {
            return Err(EngineError::EmptyAnalysisUnit);
        }

        let rules: Vec<_> = self.registry.iter().collect();

        let evaluate = |rule: &Arc<dyn crate::core::Rule>| -> RuleOutcome {
            if self.cancel.is_cancelled() {
                return RuleOutcome::Skipped;
            }
            match rule.detect(unit, &self.config) {
                Ok(findings) => RuleOutcome::Findings(findings),
                Err(e) => {
                    warn!(rule = rule.id(), error = %e, "rule failed, dropping its findings");
                    RuleOutcome::Failed(e.to_string())
                }
            }
        };

        // Indexed collect keeps registration order regardless of scheduling.
        let outcomes: Vec<RuleOutcome> = if self.config.parallel_execution {
            rules.par_iter().map(|r| evaluate(r)).collect()
        } else {
            rules.iter().map(|r| evaluate(r)).collect()
        };

        let mut entries = Vec::with_capacity(rules.len());
        let mut failures = Vec::new();
        let mut cancelled = false;
        for (rule, outcome) in rules.iter().zip(outcomes) {
            match outcome {
                RuleOutcome::Findings(findings) => entries.push(RuleFindings {
                    rule_id: rule.id().to_string(),
                    findings,
                }),
                RuleOutcome::Failed(message) => failures.push(RuleFailure {
                    rule_id: rule.id().to_string(),
                    message,
                }),
                RuleOutcome::Skipped => cancelled = true,
            }
        }

        Ok(RunReport {
            entries,
            failures,
            cancelled,
        })
    }
}

/// Findings of one rule, in the order the rule produced them.
#[derive(Debug)]
pub struct RuleFindings {
    pub rule_id: String,
    pub findings: Vec<Finding>,
}

/// A contained rule failure, surfaced as a run-level warning.
#[derive(Debug, Clone)]
pub struct RuleFailure {
    pub rule_id: String,
    pub message: String,
}

/// Collected run output: findings keyed by rule, registration order
/// preserved, plus any contained failures.
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<RuleFindings>,
    failures: Vec<RuleFailure>,
    cancelled: bool,
}

impl RunReport {
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.entries.iter().flat_map(|e| e.findings.iter())
    }

    pub fn by_rule(&self, rule_id: &str) -> &[Finding] {
        self.entries
            .iter()
            .find(|e| e.rule_id == rule_id)
            .map(|e| e.findings.as_slice())
            .unwrap_or(&[])
    }

    pub fn entries(&self) -> &[RuleFindings] {
        &self.entries
    }

    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn total_findings(&self) -> usize {
        self.entries.iter().map(|e| e.findings.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_findings() == 0
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let all: Vec<&Finding> = self.findings().collect();
        Ok(serde_json::to_string_pretty(&all)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Confidence, Finding, Impact, Rule};
    use crate::ir::Contract;
    use anyhow::anyhow;

    struct Fixed(&'static str);

    impl Rule for Fixed {
        fn id(&self) -> &'static str {
            self.0
        }
        fn impact(&self) -> Impact {
            Impact::Low
        }
        fn confidence(&self) -> Confidence {
            Confidence::Low
        }
        fn detect(&self, _: &AnalysisUnit, _: &RuleConfig) -> anyhow::Result<Vec<Finding>> {
            Ok(vec![
                Finding::new(self.0, Impact::Low, Confidence::Low).with_text("hit")
            ])
        }
    }

    struct Failing;

    impl Rule for Failing {
        fn id(&self) -> &'static str {
            "failing"
        }
        fn impact(&self) -> Impact {
            Impact::Low
        }
        fn confidence(&self) -> Confidence {
            Confidence::Low
        }
        fn detect(&self, _: &AnalysisUnit, _: &RuleConfig) -> anyhow::Result<Vec<Finding>> {
            Err(anyhow!("boom"))
        }
    }

    fn unit() -> AnalysisUnit {
        AnalysisUnit::new(vec![Contract::new("C")])
    }

    #[test]
    fn test_failure_is_contained() {
        let mut registry = RuleRegistry::new();
        registry.register(Fixed("a"));
        registry.register(Failing);
        registry.register(Fixed("b"));

        let engine = RuleEngine::new(registry, RuleConfig::default().sequential());
        let report = engine.run(&unit()).unwrap();

        assert_eq!(report.total_findings(), 2);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].rule_id, "failing");
        assert_eq!(report.by_rule("a").len(), 1);
        assert!(report.by_rule("failing").is_empty());
    }

    #[test]
    fn test_merge_preserves_registration_order() {
        let mut registry = RuleRegistry::new();
        registry.register(Fixed("z"));
        registry.register(Fixed("a"));

        let engine = RuleEngine::new(registry, RuleConfig::default());
        let report = engine.run(&unit()).unwrap();

        let order: Vec<&str> = report.entries().iter().map(|e| e.rule_id.as_str()).collect();
        assert_eq!(order, vec!["z", "a"]);
    }

    #[test]
    fn test_empty_unit_is_fatal() {
        let engine = RuleEngine::new(RuleRegistry::new(), RuleConfig::default());
        let err = engine.run(&AnalysisUnit::new(Vec::new())).unwrap_err();
        assert!(matches!(err, EngineError::EmptyAnalysisUnit));
    }

    #[test]
    fn test_cancellation_skips_remaining_rules() {
        let mut registry = RuleRegistry::new();
        registry.register(Fixed("a"));
        let engine = RuleEngine::new(registry, RuleConfig::default().sequential());
        engine.cancel_token().cancel();

        let report = engine.run(&unit()).unwrap();
        assert!(report.was_cancelled());
        assert!(report.is_empty());
    }
}
