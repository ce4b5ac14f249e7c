//! Backward taint propagation over SSA def-use chains.
//!
//! Propagation is per query, from a use back through the defining
//! instruction's operands, bounded to one contract scope, with no persistent
//! forward dataflow solver. Transitive dependency sets are memoized per
//! scope so repeated rule queries stay cheap; the memo is independent of
//! any particular taint set, which keeps queries monotone: enlarging the
//! taint set can only turn answers from false to true.

use crate::ir::{BinaryOp, BuiltinValue, Contract, Function, NodeId, Operand, SsaOp, ValueId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Values considered untrusted origins. Grows monotonically while a rule
/// seeds it; never shared across rule invocations.
#[derive(Debug, Clone, Default)]
pub struct TaintSet {
    values: HashSet<ValueId>,
    builtins: HashSet<BuiltinValue>,
}

impl TaintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_value(&mut self, value: ValueId) {
        self.values.insert(value);
    }

    pub fn insert_builtin(&mut self, builtin: BuiltinValue) {
        self.builtins.insert(builtin);
    }

    pub fn contains_value(&self, value: ValueId) -> bool {
        self.values.contains(&value)
    }

    pub fn contains_builtin(&self, builtin: BuiltinValue) -> bool {
        self.builtins.contains(&builtin)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.builtins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len() + self.builtins.len()
    }
}

/// Initialize a taint set from caller-supplied origin values.
pub fn seed_taint(sources: impl IntoIterator<Item = ValueId>) -> TaintSet {
    let mut set = TaintSet::new();
    for v in sources {
        set.insert_value(v);
    }
    set
}

/// Everything reachable backward from one value.
#[derive(Debug, Default)]
struct Reachable {
    values: HashSet<ValueId>,
    builtins: HashSet<BuiltinValue>,
}

/// Def-use index over one contract. Built once per rule invocation; queries
/// are read-only and safe to issue from parallel rule executions since each
/// rule owns its own scope.
pub struct DependencyScope<'c> {
    defs: HashMap<ValueId, &'c SsaOp>,
    memo: RwLock<HashMap<ValueId, Arc<Reachable>>>,
}

impl<'c> DependencyScope<'c> {
    pub fn new(contract: &'c Contract) -> Self {
        let mut defs = HashMap::new();
        for function in &contract.functions {
            Self::index_function(function, &mut defs);
        }
        Self {
            defs,
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// Scope over an explicit function list (e.g. functions plus the
    /// modifiers attached to them).
    pub fn over_functions(functions: impl IntoIterator<Item = &'c Function>) -> Self {
        let mut defs = HashMap::new();
        for function in functions {
            Self::index_function(function, &mut defs);
        }
        Self {
            defs,
            memo: RwLock::new(HashMap::new()),
        }
    }

    fn index_function(function: &'c Function, defs: &mut HashMap<ValueId, &'c SsaOp>) {
        for (_, op) in function.ssa_ops() {
            if let Some(result) = op.result() {
                defs.insert(result, op);
            }
        }
        for modifier in &function.modifiers {
            Self::index_function(modifier, defs);
        }
    }

    fn reachable(&self, value: ValueId) -> Arc<Reachable> {
        if let Some(hit) = self.memo.read().get(&value) {
            return hit.clone();
        }

        let mut out = Reachable::default();
        let mut worklist = vec![value];
        while let Some(current) = worklist.pop() {
            if !out.values.insert(current) {
                continue;
            }
            let Some(op) = self.defs.get(&current) else {
                continue;
            };
            for operand in op.operands() {
                match operand {
                    Operand::Value(v) => worklist.push(*v),
                    Operand::Builtin(b) => {
                        out.builtins.insert(*b);
                    }
                    Operand::Literal(_) => {}
                }
            }
        }

        let out = Arc::new(out);
        self.memo.write().insert(value, out.clone());
        out
    }
}

/// True iff `value` depends on any member of `taints`, following the
/// def-use chain backward transitively within the scope.
pub fn is_dependent(scope: &DependencyScope<'_>, value: ValueId, taints: &TaintSet) -> bool {
    if taints.is_empty() {
        return false;
    }
    let reachable = scope.reachable(value);
    reachable.values.iter().any(|v| taints.contains_value(*v))
        || reachable
            .builtins
            .iter()
            .any(|b| taints.contains_builtin(*b))
}

/// Operand-level variant: builtins are tainted directly, values through
/// their dependency set.
pub fn operand_is_dependent(
    scope: &DependencyScope<'_>,
    operand: &Operand,
    taints: &TaintSet,
) -> bool {
    match operand {
        Operand::Value(v) => is_dependent(scope, *v, taints),
        Operand::Builtin(b) => taints.contains_builtin(*b),
        Operand::Literal(_) => false,
    }
}

/// Scan every SSA instruction of every function for strict-equality
/// comparisons with a taint-dependent operand. Matches are grouped per
/// function in encounter order, then sorted by node id for stable output.
pub fn collect_equality_comparisons<'f>(
    scope: &DependencyScope<'_>,
    functions: impl IntoIterator<Item = &'f Function>,
    taints: &TaintSet,
) -> BTreeMap<String, Vec<NodeId>> {
    let mut results: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();

    for function in functions {
        for (node, op) in function.ssa_ops() {
            let SsaOp::Binary {
                op: BinaryOp::Eq,
                lhs,
                rhs,
                ..
            } = op
            else {
                continue;
            };
            if operand_is_dependent(scope, lhs, taints)
                || operand_is_dependent(scope, rhs, taints)
            {
                results
                    .entry(function.name.clone())
                    .or_default()
                    .push(node.id);
            }
        }
    }

    for nodes in results.values_mut() {
        nodes.sort();
        nodes.dedup();
    }
    results
}
