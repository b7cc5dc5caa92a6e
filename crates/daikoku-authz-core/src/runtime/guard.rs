// crates/daikoku-authz-core/src/runtime/guard.rs
// ============================================================================
// Module: Render Guard
// Description: Session-aware wrapper that evaluates, audits, and reports denials.
// Purpose: Decide whether guarded content renders for the connected user.
// Dependencies: crate::core, crate::interfaces, crate::runtime::evaluator
// ============================================================================

//! ## Overview
//! The guard is the host-facing entry point. It reads the connected user and
//! tenant from a [`SessionContext`], picks the single-team or any-team check,
//! records the decision on the audit sink, and on denial optionally
//! dispatches an [`UnauthorizedError`].
//!
//! When no explicit target tenant (`which_one`) is given, the session tenant
//! is used as the target.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::Action;
use crate::core::Subject;
use crate::core::Team;
use crate::core::Tenant;
use crate::core::User;
use crate::interfaces::AuditSink;
use crate::interfaces::ErrorDispatcher;
use crate::interfaces::NoopErrorDispatcher;
use crate::interfaces::UnauthorizedError;
use crate::runtime::audit::AuthzAuditEvent;
use crate::runtime::audit::AuthzAuditEventParams;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::evaluator::AccessRequest;
use crate::runtime::evaluator::AuthzDecision;
use crate::runtime::evaluator::PermissionEvaluator;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Connected-session state the guard reads.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext<'a> {
    /// Connected user.
    pub connected_user: &'a User,
    /// Whether the connected user administers the session tenant.
    pub is_tenant_admin: bool,
    /// Session tenant.
    pub tenant: Option<&'a Tenant>,
}

impl<'a> SessionContext<'a> {
    /// Creates a context for a user with no tenant.
    #[must_use]
    pub const fn new(connected_user: &'a User) -> Self {
        Self {
            connected_user,
            is_tenant_admin: false,
            tenant: None,
        }
    }

    /// Returns the context bound to a tenant, deriving the admin flag from its admins.
    #[must_use]
    pub fn with_tenant(mut self, tenant: &'a Tenant) -> Self {
        self.is_tenant_admin = tenant.is_admin(&self.connected_user.id);
        self.tenant = Some(tenant);
        self
    }
}

/// Team scope of a guarded check.
#[derive(Debug, Clone, Copy)]
pub enum GuardTarget<'a> {
    /// No team context.
    Unscoped,
    /// A single team.
    Team(&'a Team),
    /// Any of several teams.
    Teams(&'a [Team]),
}

/// Guarded check parameters.
#[derive(Debug, Clone, Copy)]
pub struct GuardRequest<'a> {
    /// Requested action.
    pub action: Action,
    /// Targeted subject.
    pub subject: Subject,
    /// Team scope.
    pub target: GuardTarget<'a>,
    /// Tenant being acted upon; defaults to the session tenant.
    pub which_one: Option<&'a Tenant>,
    /// Dispatch an unauthorized error on denial.
    pub dispatch_error: bool,
}

impl<'a> GuardRequest<'a> {
    /// Creates an unscoped request that does not dispatch errors.
    #[must_use]
    pub const fn new(action: Action, subject: Subject) -> Self {
        Self {
            action,
            subject,
            target: GuardTarget::Unscoped,
            which_one: None,
            dispatch_error: false,
        }
    }

    /// Returns the request scoped to a single team.
    #[must_use]
    pub const fn on_team(mut self, team: &'a Team) -> Self {
        self.target = GuardTarget::Team(team);
        self
    }

    /// Returns the request scoped to any of the given teams.
    #[must_use]
    pub const fn on_teams(mut self, teams: &'a [Team]) -> Self {
        self.target = GuardTarget::Teams(teams);
        self
    }

    /// Returns the request targeting an explicit tenant.
    #[must_use]
    pub const fn which_one(mut self, tenant: &'a Tenant) -> Self {
        self.which_one = Some(tenant);
        self
    }

    /// Returns the request with error dispatch toggled.
    #[must_use]
    pub const fn dispatch_error(mut self, enabled: bool) -> Self {
        self.dispatch_error = enabled;
        self
    }
}

// ============================================================================
// SECTION: Guard
// ============================================================================

/// Render guard combining an evaluator with audit and error channels.
pub struct Guard {
    /// Evaluator consulted for decisions.
    evaluator: PermissionEvaluator,
    /// Sink receiving every decision.
    audit: Arc<dyn AuditSink>,
    /// Channel receiving unauthorized errors.
    dispatcher: Arc<dyn ErrorDispatcher>,
}

impl Guard {
    /// Creates a guard with no-op audit and error channels.
    #[must_use]
    pub fn new(evaluator: PermissionEvaluator) -> Self {
        Self {
            evaluator,
            audit: Arc::new(NoopAuditSink),
            dispatcher: Arc::new(NoopErrorDispatcher),
        }
    }

    /// Returns the guard recording decisions on `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the guard dispatching unauthorized errors to `dispatcher`.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn ErrorDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Returns the evaluator backing this guard.
    #[must_use]
    pub const fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    /// Evaluates a guarded check, recording it and dispatching on denial.
    #[must_use]
    pub fn check(&self, session: &SessionContext<'_>, request: &GuardRequest<'_>) -> AuthzDecision {
        let user = session.connected_user;
        let (decision, team_id, team_count) = match request.target {
            GuardTarget::Teams(teams) => (
                self.evaluator.can_i_do_action_for_one_of_teams(
                    user,
                    request.action,
                    request.subject,
                    teams,
                ),
                None,
                Some(teams.len()),
            ),
            GuardTarget::Team(team) => {
                (self.single_team(session, request, Some(team)), Some(team.id.clone()), None)
            }
            GuardTarget::Unscoped => (self.single_team(session, request, None), None, None),
        };
        self.audit.record(&AuthzAuditEvent::new(AuthzAuditEventParams {
            user_id: user.id.clone(),
            action: request.action,
            subject: request.subject,
            team_id,
            team_count,
            decision,
        }));
        if !decision.allowed && request.dispatch_error {
            self.dispatcher.dispatch(&UnauthorizedError::from_guard());
        }
        decision
    }

    /// Returns `children` when the check allows, `or_else` otherwise.
    pub fn render<T>(
        &self,
        session: &SessionContext<'_>,
        request: &GuardRequest<'_>,
        children: T,
        or_else: T,
    ) -> T {
        if self.check(session, request).allowed { children } else { or_else }
    }

    /// Runs the single-team check with session tenant context.
    fn single_team(
        &self,
        session: &SessionContext<'_>,
        request: &GuardRequest<'_>,
        team: Option<&Team>,
    ) -> AuthzDecision {
        let target_tenant = request.which_one.or(session.tenant);
        let mut access = AccessRequest::new(session.connected_user, request.action, request.subject)
            .with_tenant(session.is_tenant_admin, target_tenant, session.tenant);
        access.team = team;
        self.evaluator.can_i_do_action(&access)
    }
}
