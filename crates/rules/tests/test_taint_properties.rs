//! Taint-engine properties over the public API: monotonicity and scope
//! isolation.

use tenken_rules::analysis::{
    collect_equality_comparisons, is_dependent, seed_taint, DependencyScope,
};
use tenken_rules::ir::{
    AnalysisUnit, BinaryOp, BuiltinValue, CallTarget, Contract, Function, Node, NodeId, NodeKind,
    Operand, SsaOp, ValueId,
};

/// v0 = balanceOf(user); v1 = v0 / 2; v2 = (v1 == goal); v10 = now
fn contract_with_chain() -> Contract {
    let node = Node::new(NodeId(0), NodeKind::Expression).with_ssa(vec![
        SsaOp::Call {
            result: Some(ValueId(0)),
            target: CallTarget::Member {
                receiver: "token".to_string(),
                member: "balanceOf".to_string(),
            },
            arguments: vec![Operand::Value(ValueId(9))],
        },
        SsaOp::Binary {
            result: ValueId(1),
            op: BinaryOp::Div,
            lhs: Operand::Value(ValueId(0)),
            rhs: Operand::Literal("2".to_string()),
        },
        SsaOp::Binary {
            result: ValueId(2),
            op: BinaryOp::Eq,
            lhs: Operand::Value(ValueId(1)),
            rhs: Operand::Value(ValueId(8)),
        },
        SsaOp::Assign {
            result: ValueId(10),
            source: Operand::Builtin(BuiltinValue::Now),
        },
    ]);
    Contract::new("Pool").with_functions(vec![Function::new("goalReached").with_nodes(vec![node])])
}

#[test]
fn test_monotonicity_of_is_dependent() {
    let contract = contract_with_chain();
    let scope = DependencyScope::new(&contract);

    let t1 = seed_taint([ValueId(0)]);
    let mut t2 = seed_taint([ValueId(0)]);
    t2.insert_value(ValueId(8));
    t2.insert_builtin(BuiltinValue::Now);

    for v in (0..11).map(ValueId) {
        if is_dependent(&scope, v, &t1) {
            assert!(
                is_dependent(&scope, v, &t2),
                "{} dependent under T1 but not under T2 ⊇ T1",
                v
            );
        }
    }
    // T2 strictly grows the answer set here.
    assert!(!is_dependent(&scope, ValueId(10), &t1));
    assert!(is_dependent(&scope, ValueId(10), &t2));
}

#[test]
fn test_equality_collection_is_ordered_and_scoped() {
    let contract = contract_with_chain();
    let scope = DependencyScope::new(&contract);
    let taints = seed_taint([ValueId(0)]);

    let hits = collect_equality_comparisons(&scope, &contract.functions, &taints);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits["goalReached"], vec![NodeId(0)]);

    // A different contract's scope knows nothing about these values.
    let other = Contract::new("Other").with_functions(vec![Function::new("f")]);
    let other_scope = DependencyScope::new(&other);
    assert!(!is_dependent(&other_scope, ValueId(1), &taints));
}

#[test]
fn test_fresh_taint_sets_per_invocation() {
    // Two runs with independently seeded sets must not observe each other.
    let contract = contract_with_chain();
    let unit = AnalysisUnit::new(vec![contract]);
    let scope = DependencyScope::new(&unit.contracts[0]);

    let empty = seed_taint([]);
    assert!(!is_dependent(&scope, ValueId(1), &empty));

    let seeded = seed_taint([ValueId(0)]);
    assert!(is_dependent(&scope, ValueId(1), &seeded));

    // The earlier empty set is still empty, no cross-query leakage.
    assert!(empty.is_empty());
    assert!(!is_dependent(&scope, ValueId(1), &empty));
}
