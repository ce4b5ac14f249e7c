//! Structural predicates over expressions, nodes, and functions.
//!
//! Small boolean building blocks the rules compose. Everything here is
//! stateless and read-only; matching is over the expression tree, never
//! over stringified nodes.

use crate::core::RuleConfig;
use crate::ir::{
    CallExpression, DataLocation, Expression, Function, Identifier, Node, NodeId, Parameter,
    SsaOp,
};
use std::collections::HashSet;

/// The lone outward call of a node, if its target satisfies `matcher`.
pub fn external_call_to<'n>(
    node: &'n Node,
    matcher: impl Fn(&CallExpression) -> bool,
) -> Option<&'n CallExpression> {
    match node.external_calls.as_slice() {
        [call] if matcher(call) => Some(call),
        _ => None,
    }
}

/// First outward call of a node regardless of target.
pub fn external_call(node: &Node) -> Option<&CallExpression> {
    node.external_calls.first()
}

/// The callee resolves to `<member>` on some receiver, e.g. `.approve(...)`.
pub fn call_member_is(call: &CallExpression, member: &str) -> bool {
    matches!(&*call.callee, Expression::MemberAccess { member: m, .. } if m == member)
}

/// The call goes straight through one of the enclosing function's
/// parameters (`router.swap(...)` where `router` is a parameter).
pub fn callee_is_parameter(call: &CallExpression, params: &[Parameter]) -> bool {
    let receiver: &Expression = match &*call.callee {
        Expression::MemberAccess { receiver, .. } => receiver,
        other => other,
    };
    matches!(
        receiver,
        Expression::Identifier(id) if params.iter().any(|p| p.name == id.name)
    )
}

/// Some call argument structurally references one of `params`.
pub fn argument_mentions_parameter(call: &CallExpression, params: &[Parameter]) -> bool {
    call.arguments.iter().any(|arg| {
        arg.any(&|e| {
            matches!(e, Expression::Identifier(id) if params.iter().any(|p| p.name == id.name))
        })
    })
}

/// `msg.sender` anywhere in the tree.
pub fn mentions_sender(expr: &Expression) -> bool {
    expr.any(&|e| {
        matches!(
            e,
            Expression::MemberAccess { receiver, member }
                if member == "sender"
                    && matches!(&**receiver, Expression::Identifier(id) if id.name == "msg")
        )
    })
}

/// `require(... msg.sender ...)` / `assert(... msg.sender ...)` with the
/// caller identity compared inside the first argument.
pub fn is_sender_guard_call(expr: &Expression) -> bool {
    let Some(call) = expr.as_call() else {
        return false;
    };
    let Expression::Identifier(callee) = &*call.callee else {
        return false;
    };
    if callee.name != "require" && callee.name != "assert" {
        return false;
    }
    match call.arguments.first() {
        Some(Expression::Binary { lhs, rhs, .. }) => mentions_sender(lhs) || mentions_sender(rhs),
        _ => false,
    }
}

/// A modifier is centralized when any of its statements is a sender guard.
pub fn is_centralized_modifier(modifier: &Function) -> bool {
    modifier
        .nodes
        .iter()
        .filter_map(|n| n.expression.as_ref())
        .any(is_sender_guard_call)
}

/// Access-control verdict for a function: the host framework already marked
/// it protected, a modifier (or the body itself) compares state against the
/// caller identity, or a modifier name is on the configured privilege
/// allow-list.
pub fn has_access_control_guard(function: &Function, config: &RuleConfig) -> bool {
    if function.is_protected {
        return true;
    }
    if let Some(allowed) = &config.privileged_modifiers {
        if function
            .modifiers
            .iter()
            .any(|m| allowed.iter().any(|a| a == &m.name))
        {
            return true;
        }
    }
    if function.modifiers.iter().any(is_centralized_modifier) {
        return true;
    }
    function
        .nodes
        .iter()
        .filter_map(|n| n.expression.as_ref())
        .any(is_sender_guard_call)
}

/// A function re-reads state it wrote: some state variable appears both in
/// a guard condition and the write set. Used to recognize initialization
/// guards built by hand.
pub fn conditional_reads_written_state(function: &Function) -> bool {
    function
        .conditional_state_variables_read
        .iter()
        .any(|read| function.state_variables_written.contains(read))
}

/// Count event emissions reachable from `start` through successor edges,
/// guarding against cycles with `visited`.
pub fn count_reachable_event_emits(
    function: &Function,
    start: NodeId,
    visited: &mut HashSet<NodeId>,
) -> usize {
    if !visited.insert(start) {
        return 0;
    }
    let Some(node) = function.node(start) else {
        return 0;
    };
    let mut emits = node
        .ssa
        .iter()
        .filter(|op| matches!(op, SsaOp::EmitEvent { .. }))
        .count();
    for son in &node.sons {
        emits += count_reachable_event_emits(function, *son, visited);
    }
    emits
}

/// A call whose receiver is the contract's own address (`this.f(...)`),
/// which re-enters through the external call path.
pub fn self_invocation(expr: &Expression) -> Option<&Expression> {
    let mut found = None;
    expr.walk(&mut |e| {
        if found.is_some() {
            return;
        }
        if let Expression::Call(call) = e {
            if matches!(
                &*call.callee,
                Expression::MemberAccess { receiver, .. }
                    if matches!(&**receiver, Expression::SelfReference)
            ) {
                found = Some(e);
            }
        }
    });
    found
}

/// Call to one of the named builtin validators.
pub fn is_validator_call(expr: &Expression, names: &[&str]) -> bool {
    expr.any(&|e| {
        matches!(
            e,
            Expression::Call(call)
                if matches!(&*call.callee, Expression::Identifier(id) if names.contains(&id.name.as_str()))
        )
    })
}

/// Loop header test bounded by a dynamic `.length` member.
pub fn is_length_bounded(expr: &Expression) -> bool {
    expr.any(&|e| matches!(e, Expression::MemberAccess { member, .. } if member == "length"))
}

/// Identifier operands of a loop-header comparison, the iterator
/// candidates of `i < xs.length`.
pub fn header_iterators(expr: &Expression) -> Vec<String> {
    match expr {
        Expression::Binary { lhs, rhs, .. } => [lhs, rhs]
            .iter()
            .filter_map(|side| match &***side {
                Expression::Identifier(id) => Some(id.name.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// The identifier a statement assigns to, when the left side is a plain
/// identifier.
pub fn assignment_target(expr: &Expression) -> Option<&Identifier> {
    match expr {
        Expression::Assignment { lhs, .. } => match &**lhs {
            Expression::Identifier(id) => Some(id),
            _ => None,
        },
        _ => None,
    }
}

/// Writes into memory-located array bindings anywhere in the tree.
pub fn memory_array_writes(expr: &Expression) -> Vec<&Identifier> {
    let mut out = Vec::new();
    expr.walk(&mut |e| {
        if let Expression::Assignment { lhs, .. } = e {
            if let Expression::Identifier(id) = &**lhs {
                if id.data_location == Some(DataLocation::Memory) && id.is_array {
                    out.push(id);
                }
            }
        }
    });
    out
}

/// Explicit type conversions with a non-address target anywhere in the
/// tree. Address casts are the overwhelmingly common benign case.
pub fn narrowing_conversions(expr: &Expression) -> Vec<&str> {
    let mut out = Vec::new();
    expr.walk(&mut |e| {
        if let Expression::TypeConversion { target_type, .. } = e {
            if target_type != "address" {
                out.push(target_type.as_str());
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOp, NodeKind};

    #[test]
    fn test_sender_guard_recognized() {
        // require(msg.sender == owner)
        let guard = Expression::call(
            Expression::identifier("require"),
            vec![Expression::binary(
                BinaryOp::Eq,
                Expression::msg_sender(),
                Expression::identifier("owner"),
            )],
        );
        assert!(is_sender_guard_call(&guard));

        // require(paused == false) is not an access guard
        let unrelated = Expression::call(
            Expression::identifier("require"),
            vec![Expression::binary(
                BinaryOp::Eq,
                Expression::identifier("paused"),
                Expression::Literal("false".to_string()),
            )],
        );
        assert!(!is_sender_guard_call(&unrelated));
    }

    #[test]
    fn test_self_invocation_is_structural() {
        let this_call = Expression::call(
            Expression::member(Expression::SelfReference, "buy"),
            vec![Expression::identifier("id")],
        );
        assert!(self_invocation(&this_call).is_some());

        // `other.buy(id)` does not match even though it looks similar in text.
        let other_call = Expression::call(
            Expression::member(Expression::identifier("other"), "buy"),
            vec![Expression::identifier("id")],
        );
        assert!(self_invocation(&other_call).is_none());
    }

    #[test]
    fn test_event_emit_count_with_cycle() {
        use crate::ir::{Node, NodeId, Operand, ValueId};
        // 0 → 1 → 0 cycle, with one emit on node 1.
        let n0 = Node::new(NodeId(0), NodeKind::Entry).with_sons(vec![NodeId(1)]);
        let n1 = Node::new(NodeId(1), NodeKind::Expression)
            .with_sons(vec![NodeId(0)])
            .with_ssa(vec![SsaOp::EmitEvent {
                name: "Ping".to_string(),
                arguments: vec![Operand::Value(ValueId(0))],
            }]);
        let f = Function::new("loop").with_nodes(vec![n0, n1]);

        let mut visited = HashSet::new();
        assert_eq!(count_reachable_event_emits(&f, NodeId(0), &mut visited), 1);
    }

    #[test]
    fn test_callee_is_parameter() {
        let params = vec![Parameter::new("router", "IRouter")];
        let call = CallExpression {
            callee: Box::new(Expression::member(
                Expression::identifier("router"),
                "swapExactTokensForTokens",
            )),
            arguments: vec![],
        };
        assert!(callee_is_parameter(&call, &params));
        assert!(!callee_is_parameter(&call, &[Parameter::new("token", "IERC20")]));
    }
}
