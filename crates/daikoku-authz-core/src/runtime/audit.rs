// crates/daikoku-authz-core/src/runtime/audit.rs
// ============================================================================
// Module: Authz Audit Logging
// Description: Structured audit events for authorization decisions.
// Purpose: Emit JSON-line decision logs without hard dependencies.
// Dependencies: crate::core, crate::interfaces, serde, serde_json
// ============================================================================

//! ## Overview
//! Every guarded decision becomes an [`AuthzAuditEvent`]. Sinks serialize
//! events as JSON lines; serialization and write failures are dropped so
//! logging can never change a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::Action;
use crate::core::Subject;
use crate::core::TeamId;
use crate::core::UserId;
use crate::interfaces::AuditSink;
use crate::runtime::evaluator::AuthzDecision;
use crate::runtime::evaluator::AuthzReason;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Authorization decision audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthzAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Connected user.
    pub user_id: UserId,
    /// Requested action.
    pub action: Action,
    /// Targeted subject.
    pub subject: Subject,
    /// Team context for single-team checks.
    pub team_id: Option<TeamId>,
    /// Number of candidate teams for any-team checks.
    pub team_count: Option<usize>,
    /// Whether access was allowed.
    pub allowed: bool,
    /// Decision reason label.
    pub reason: AuthzReason,
}

/// Inputs required to construct an audit event.
pub struct AuthzAuditEventParams {
    /// Connected user.
    pub user_id: UserId,
    /// Requested action.
    pub action: Action,
    /// Targeted subject.
    pub subject: Subject,
    /// Team context for single-team checks.
    pub team_id: Option<TeamId>,
    /// Number of candidate teams for any-team checks.
    pub team_count: Option<usize>,
    /// Decision being recorded.
    pub decision: AuthzDecision,
}

impl AuthzAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: AuthzAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "authz_decision",
            timestamp_ms,
            user_id: params.user_id,
            action: params.action,
            subject: params.subject,
            team_id: params.team_id,
            team_count: params.team_count,
            allowed: params.decision.allowed,
            reason: params.decision.reason,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &AuthzAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuthzAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuthzAuditEvent) {}
}
