//! Ordered collection of registered rules.
//!
//! Registration order is part of the output contract: the executor merges
//! findings by registration order first, so the registry keeps a vector
//! rather than a map.

use crate::core::Rule;
use crate::rules;
use std::sync::Arc;

pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register<R: Rule + 'static>(&mut self, rule: R) {
        self.rules.push(Arc::new(rule));
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.id() == id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn list_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The full rule set, in its canonical registration order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(rules::InsufficientLogging);
        registry.register(rules::AssertStatement);
        registry.register(rules::FloatingPragmaVersion);
        registry.register(rules::ModifiableOwnership);
        registry.register(rules::AssignMemoryArray);
        registry.register(rules::InvokeUnknownExternalFunctions);
        registry.register(rules::ApproveUnknownAddress);
        registry.register(rules::StateChangingLoop);
        registry.register(rules::LoopReverted);
        registry.register(rules::ExplicitTypeConversion);
        registry.register(rules::CentralizedState);
        registry.register(rules::InexplicitVariableVisibility);
        registry.register(rules::StrictEqualities);
        registry.register(rules::PublicCouldBeExternal);
        registry.register(rules::IncorrectSolcVersion);
        registry.register(rules::SelfInvocationRule);
        registry.register(rules::LoopSkip);
        registry.register(rules::DirtyIterators);
        registry.register(rules::UnsafeInitiate);
        registry.register(rules::StandardTokenCheck);
        registry
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_order_and_ids() {
        let registry = RuleRegistry::with_defaults();
        let ids = registry.list_ids();
        assert_eq!(ids.len(), 20);
        assert_eq!(ids[0], "insufficient-logging");
        assert_eq!(ids[1], "assert-statement");
        assert_eq!(*ids.last().unwrap(), "common-standard-token");
        assert!(registry.get("strict-equalities").is_some());
        assert!(registry.get("no-such-rule").is_none());
    }
}
