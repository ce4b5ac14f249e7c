//! The rule set: declarative instances of the engine, one module per rule.
//!
//! Every rule composes the structural matcher, the graph model, or the
//! taint engine; none of them keeps state across `detect` calls. Rules are
//! registered in `RuleRegistry::with_defaults` in the canonical order.

pub mod approve_unknown_address;
pub mod assert_statement;
pub mod assign_memory_array;
pub mod centralized_state;
pub mod dirty_iterators;
pub mod explicit_type_conversion;
pub mod external_function;
pub mod floating_pragma;
pub mod insufficient_logging;
pub mod loop_reverted;
pub mod loop_skip;
pub mod modifiable_ownership;
pub mod self_invocation;
pub mod solc_version;
pub mod standard_token;
pub mod state_changing_loop;
pub mod strict_equalities;
pub mod unknown_external_call;
pub mod unsafe_initiate;
pub mod variable_visibility;

pub use approve_unknown_address::ApproveUnknownAddress;
pub use assert_statement::AssertStatement;
pub use assign_memory_array::AssignMemoryArray;
pub use centralized_state::CentralizedState;
pub use dirty_iterators::DirtyIterators;
pub use explicit_type_conversion::ExplicitTypeConversion;
pub use external_function::PublicCouldBeExternal;
pub use floating_pragma::FloatingPragmaVersion;
pub use insufficient_logging::InsufficientLogging;
pub use loop_reverted::LoopReverted;
pub use loop_skip::LoopSkip;
pub use modifiable_ownership::ModifiableOwnership;
pub use self_invocation::SelfInvocationRule;
pub use solc_version::IncorrectSolcVersion;
pub use standard_token::StandardTokenCheck;
pub use state_changing_loop::StateChangingLoop;
pub use strict_equalities::StrictEqualities;
pub use unknown_external_call::InvokeUnknownExternalFunctions;
pub use unsafe_initiate::UnsafeInitiate;
pub use variable_visibility::InexplicitVariableVisibility;
