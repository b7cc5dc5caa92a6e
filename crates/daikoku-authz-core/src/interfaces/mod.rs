// crates/daikoku-authz-core/src/interfaces/mod.rs
// ============================================================================
// Module: Daikoku Authz Interfaces
// Description: Seams for audit logging and unauthorized-error delivery.
// Purpose: Keep the evaluator pure while letting hosts observe decisions.
// Dependencies: crate::runtime::audit, serde, thiserror
// ============================================================================

//! ## Overview
//! The evaluator never performs I/O. Hosts that render guarded content plug
//! in an [`AuditSink`] to record decisions and an [`ErrorDispatcher`] to
//! surface an [`UnauthorizedError`] (the portal shows it as a toast).
//! Implementations must not influence decisions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::runtime::audit::AuthzAuditEvent;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// HTTP-style status carried by unauthorized errors.
pub const UNAUTHORIZED_STATUS: u16 = 401;
/// Message carried by unauthorized errors.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";
/// Origin label carried by unauthorized errors raised by the guard.
pub const GUARD_ERROR_ORIGIN: &str = "CAN component";

// ============================================================================
// SECTION: Unauthorized Errors
// ============================================================================

/// Error surfaced to the user when a guarded action is denied.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{status} {message} (from {from})")]
pub struct UnauthorizedError {
    /// Status code.
    pub status: u16,
    /// Message label.
    pub message: String,
    /// Component that raised the error.
    pub from: String,
}

impl UnauthorizedError {
    /// Builds the error raised by the render guard.
    #[must_use]
    pub fn from_guard() -> Self {
        Self {
            status: UNAUTHORIZED_STATUS,
            message: UNAUTHORIZED_MESSAGE.to_string(),
            from: GUARD_ERROR_ORIGIN.to_string(),
        }
    }
}

/// Wire envelope `{ "error": { ... } }` used when dispatching errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Wrapped error.
    pub error: UnauthorizedError,
}

/// Receiver for unauthorized errors raised by the guard.
pub trait ErrorDispatcher: Send + Sync {
    /// Delivers the error to the user-facing error channel.
    fn dispatch(&self, error: &UnauthorizedError);
}

/// Dispatcher that drops errors.
pub struct NoopErrorDispatcher;

impl ErrorDispatcher for NoopErrorDispatcher {
    fn dispatch(&self, _error: &UnauthorizedError) {}
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink for authorization decisions.
pub trait AuditSink: Send + Sync {
    /// Records a decision event.
    fn record(&self, event: &AuthzAuditEvent);
}
