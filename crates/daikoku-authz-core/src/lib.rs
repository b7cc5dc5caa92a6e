// crates/daikoku-authz-core/src/lib.rs
// ============================================================================
// Module: Daikoku Authz Core Library
// Description: Public API surface for Daikoku permission evaluation.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Daikoku authz core decides whether a portal user may read or manage a
//! resource (API, API key, asset, team, stats, back-office, tenant). Decisions
//! are pure functions of a user, a team or tenant context, and a per-role
//! permission table. Hosts observe decisions through explicit interfaces
//! rather than the evaluator performing I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::AuditSink;
pub use interfaces::ErrorDispatcher;
pub use interfaces::ErrorEnvelope;
pub use interfaces::NoopErrorDispatcher;
pub use interfaces::UnauthorizedError;
pub use runtime::AccessRequest;
pub use runtime::AuthzAuditEvent;
pub use runtime::AuthzDecision;
pub use runtime::AuthzReason;
pub use runtime::FileAuditSink;
pub use runtime::Guard;
pub use runtime::GuardRequest;
pub use runtime::GuardTarget;
pub use runtime::NoopAuditSink;
pub use runtime::PermissionEvaluator;
pub use runtime::SessionContext;
pub use runtime::StderrAuditSink;
