// crates/daikoku-authz-core/src/runtime/mod.rs
// ============================================================================
// Module: Daikoku Authz Runtime
// Description: Evaluator, render guard, and audit sinks.
// Purpose: Turn core types into authorization decisions.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime hosts the pure [`evaluator`], the session-aware [`guard`], and
//! the JSON-line [`audit`] sinks used by the guard.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod evaluator;
pub mod guard;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuthzAuditEvent;
pub use audit::AuthzAuditEventParams;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use evaluator::AccessRequest;
pub use evaluator::AuthzDecision;
pub use evaluator::AuthzReason;
pub use evaluator::Grant;
pub use evaluator::PermissionEvaluator;
pub use evaluator::can_i_do_action;
pub use evaluator::can_i_do_action_for_one_of_teams;
pub use evaluator::resolve_grant;
pub use guard::Guard;
pub use guard::GuardRequest;
pub use guard::GuardTarget;
pub use guard::SessionContext;
