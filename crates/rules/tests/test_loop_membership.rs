//! Loop-membership soundness for the single-loop case, in both tracking
//! modes, exercised through the loop rules.

use tenken_rules::analysis::{FunctionGraph, LoopTracker, LoopTracking};
use tenken_rules::ir::{
    AnalysisUnit, BinaryOp, Contract, Expression, Function, Node, NodeId, NodeKind,
};
use tenken_rules::{Rule, RuleConfig};
use tenken_rules::rules::StateChangingLoop;

/// entry(0) → header(1) → two body statements(2,3) → END_LOOP(4) → after(5).
fn single_loop_function() -> Function {
    let header = Node::new(NodeId(1), NodeKind::IfLoop).with_expression(Expression::binary(
        BinaryOp::Lt,
        Expression::identifier("i"),
        Expression::member(Expression::identifier("users"), "length"),
    ));
    let body_a = Node::new(NodeId(2), NodeKind::Expression)
        .with_dominance_frontier([NodeId(1)])
        .with_state_written(vec!["interests".to_string()]);
    let body_b = Node::new(NodeId(3), NodeKind::Expression)
        .with_dominance_frontier([NodeId(1)])
        .with_state_written(vec!["depositTimes".to_string()]);
    let join = Node::new(NodeId(4), NodeKind::EndLoop);
    let after = Node::new(NodeId(5), NodeKind::Expression)
        .with_immediate_dominator(NodeId(4))
        .with_state_written(vec!["done".to_string()]);

    Function::new("calculateInterests").with_nodes(vec![
        Node::new(NodeId(0), NodeKind::Entry),
        header,
        body_a,
        body_b,
        join,
        after,
    ])
}

#[test]
fn test_every_node_between_header_and_join_is_inside() {
    let function = single_loop_function();
    let graph = FunctionGraph::new(&function);

    for mode in [LoopTracking::Nested, LoopTracking::Flat] {
        let mut tracker = LoopTracker::new(mode);
        let headers: Vec<Option<NodeId>> = function
            .nodes
            .iter()
            .map(|n| tracker.observe(&graph, n))
            .collect();

        assert_eq!(headers[0], None, "entry is outside ({:?})", mode);
        for idx in 1..=4 {
            assert_eq!(
                headers[idx],
                Some(NodeId(1)),
                "node {} should be inside ({:?})",
                idx,
                mode
            );
        }
        assert_eq!(headers[5], None, "first node past join is outside ({:?})", mode);
    }
}

#[test]
fn test_state_changing_loop_reports_only_body_writes() {
    let unit = AnalysisUnit::new(vec![
        Contract::new("Pool").with_functions(vec![single_loop_function()])
    ]);

    for mode in [LoopTracking::Nested, LoopTracking::Flat] {
        let config = RuleConfig::default().with_loop_tracking(mode);
        let findings = StateChangingLoop.detect(&unit, &config).unwrap();
        assert_eq!(findings.len(), 1);

        // Function element plus the two body writes; the write after the
        // loop must not appear.
        let elements: Vec<_> = findings[0].elements().collect();
        assert_eq!(elements.len(), 3, "mode {:?}", mode);
    }
}
