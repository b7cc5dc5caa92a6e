// crates/daikoku-authz-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Permission Evaluator
// Description: Pure authorization decisions over users, teams, and tenants.
// Purpose: Decide whether a user may perform an action on a subject.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The evaluator is a total function of its explicit inputs. Evaluation order:
//! 1. Daikoku admins are allowed everything.
//! 2. The `tenant` subject is allowed only for tenant admins acting on the
//!    current tenant.
//! 3. Every other subject resolves the caller's grant through team membership
//!    and the permission table, then compares it with the requested action.
//!
//! Missing data (no team, no membership, no rule, no tenant) always resolves
//! to deny. A rule whose condition fails grants [`Action::DoNothing`]; it never
//! falls back to a lower grant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::Action;
use crate::core::PermissionTable;
use crate::core::Subject;
use crate::core::Team;
use crate::core::Tenant;
use crate::core::User;

// ============================================================================
// SECTION: Decision Types
// ============================================================================

/// Reason label attached to every decision.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthzReason {
    /// Caller is a daikoku admin.
    DaikokuAdmin,
    /// Caller administers the targeted (current) tenant.
    TenantAdmin,
    /// Caller is not a tenant admin.
    NotTenantAdmin,
    /// Target or current tenant is missing.
    TenantMissing,
    /// Target tenant differs from the current tenant.
    TenantMismatch,
    /// No team context was provided.
    NoTeam,
    /// Caller is not a member of the team.
    NotAMember,
    /// Caller's role has no rule for the subject.
    NoRule,
    /// The rule's condition does not hold for the team.
    ConditionFailed,
    /// The resolved grant covers the requested action.
    RoleGrant,
    /// The resolved grant is below the requested action.
    InsufficientGrant,
    /// Nothing was requested, so nothing needs to be granted.
    NothingRequested,
    /// The team collection was empty.
    NoTeams,
}

impl AuthzReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DaikokuAdmin => "daikoku_admin",
            Self::TenantAdmin => "tenant_admin",
            Self::NotTenantAdmin => "not_tenant_admin",
            Self::TenantMissing => "tenant_missing",
            Self::TenantMismatch => "tenant_mismatch",
            Self::NoTeam => "no_team",
            Self::NotAMember => "not_a_member",
            Self::NoRule => "no_rule",
            Self::ConditionFailed => "condition_failed",
            Self::RoleGrant => "role_grant",
            Self::InsufficientGrant => "insufficient_grant",
            Self::NothingRequested => "nothing_requested",
            Self::NoTeams => "no_teams",
        }
    }
}

/// Authorization decision outcome.
///
/// # Invariants
/// - `allowed` is the authoritative decision; `reason` is for audit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthzDecision {
    /// Whether the action is authorized.
    pub allowed: bool,
    /// Reason label for audit logs.
    pub reason: AuthzReason,
}

impl AuthzDecision {
    /// Builds an allowing decision.
    #[must_use]
    pub const fn allow(reason: AuthzReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    /// Builds a denying decision.
    #[must_use]
    pub const fn deny(reason: AuthzReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    /// Returns whether the action is authorized.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.allowed
    }
}

/// Grant resolved from team membership and the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    /// Resolved action level.
    pub level: Action,
    /// How the level was resolved.
    pub reason: AuthzReason,
}

impl Grant {
    /// No grant, labelled with why.
    const fn nothing(reason: AuthzReason) -> Self {
        Self {
            level: Action::DoNothing,
            reason,
        }
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Single-team authorization request.
///
/// # Invariants
/// - Tenant fields are only read for [`Subject::Tenant`].
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// Connected user.
    pub user: &'a User,
    /// Requested action level.
    pub action: Action,
    /// Targeted subject.
    pub subject: Subject,
    /// Team context, when any.
    pub team: Option<&'a Team>,
    /// Whether the caller administers the current tenant.
    pub is_tenant_admin: bool,
    /// Tenant being acted upon.
    pub target_tenant: Option<&'a Tenant>,
    /// Tenant the session belongs to.
    pub current_tenant: Option<&'a Tenant>,
}

impl<'a> AccessRequest<'a> {
    /// Creates a request with no team or tenant context.
    #[must_use]
    pub const fn new(user: &'a User, action: Action, subject: Subject) -> Self {
        Self {
            user,
            action,
            subject,
            team: None,
            is_tenant_admin: false,
            target_tenant: None,
            current_tenant: None,
        }
    }

    /// Returns the request scoped to a team.
    #[must_use]
    pub const fn with_team(mut self, team: &'a Team) -> Self {
        self.team = Some(team);
        self
    }

    /// Returns the request with tenant-admin context.
    #[must_use]
    pub const fn with_tenant(
        mut self,
        is_tenant_admin: bool,
        target_tenant: Option<&'a Tenant>,
        current_tenant: Option<&'a Tenant>,
    ) -> Self {
        self.is_tenant_admin = is_tenant_admin;
        self.target_tenant = target_tenant;
        self.current_tenant = current_tenant;
        self
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Resolves the user's grant on a subject within a team.
#[must_use]
pub fn resolve_grant(
    table: &PermissionTable,
    user: &User,
    subject: Subject,
    team: Option<&Team>,
) -> Grant {
    let Some(team) = team else {
        return Grant::nothing(AuthzReason::NoTeam);
    };
    let Some(membership) = team.membership(&user.id) else {
        return Grant::nothing(AuthzReason::NotAMember);
    };
    let Some(rule) = table.rule_for(membership.team_permission, subject) else {
        return Grant::nothing(AuthzReason::NoRule);
    };
    match rule.resolve(team) {
        Some(level) => Grant {
            level,
            reason: AuthzReason::RoleGrant,
        },
        None => Grant::nothing(AuthzReason::ConditionFailed),
    }
}

/// Decides a single-team request.
#[must_use]
pub fn can_i_do_action(table: &PermissionTable, request: &AccessRequest<'_>) -> AuthzDecision {
    if request.user.is_daikoku_admin {
        return AuthzDecision::allow(AuthzReason::DaikokuAdmin);
    }
    if request.subject == Subject::Tenant {
        return tenant_decision(request);
    }
    let grant = resolve_grant(table, request.user, request.subject, request.team);
    if request.action > grant.level {
        return match grant.reason {
            AuthzReason::RoleGrant => AuthzDecision::deny(AuthzReason::InsufficientGrant),
            reason => AuthzDecision::deny(reason),
        };
    }
    match grant.reason {
        AuthzReason::RoleGrant => AuthzDecision::allow(AuthzReason::RoleGrant),
        _ => AuthzDecision::allow(AuthzReason::NothingRequested),
    }
}

/// Decides a request against a collection of teams.
///
/// Returns the first allowing decision. Tenant-admin context is never applied
/// on this path. When no team allows, the last team's denial is returned; an
/// empty collection denies with [`AuthzReason::NoTeams`].
#[must_use]
pub fn can_i_do_action_for_one_of_teams(
    table: &PermissionTable,
    user: &User,
    action: Action,
    subject: Subject,
    teams: &[Team],
) -> AuthzDecision {
    let mut last = AuthzDecision::deny(AuthzReason::NoTeams);
    for team in teams {
        let request = AccessRequest::new(user, action, subject).with_team(team);
        let decision = can_i_do_action(table, &request);
        if decision.allowed {
            return decision;
        }
        last = decision;
    }
    last
}

/// Decides the tenant subject for a non-daikoku-admin caller.
fn tenant_decision(request: &AccessRequest<'_>) -> AuthzDecision {
    if !request.is_tenant_admin {
        return AuthzDecision::deny(AuthzReason::NotTenantAdmin);
    }
    let (Some(target), Some(current)) = (request.target_tenant, request.current_tenant) else {
        return AuthzDecision::deny(AuthzReason::TenantMissing);
    };
    if target.id == current.id {
        AuthzDecision::allow(AuthzReason::TenantAdmin)
    } else {
        AuthzDecision::deny(AuthzReason::TenantMismatch)
    }
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Permission evaluator bound to a permission table.
///
/// # Invariants
/// - Behavior is fully determined by the stored table and the request.
#[derive(Debug, Clone, Default)]
pub struct PermissionEvaluator {
    /// Table consulted for role grants.
    table: PermissionTable,
}

impl PermissionEvaluator {
    /// Creates an evaluator over `table`.
    #[must_use]
    pub const fn new(table: PermissionTable) -> Self {
        Self {
            table,
        }
    }

    /// Creates an evaluator over the builtin Daikoku table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(PermissionTable::builtin())
    }

    /// Returns the table backing this evaluator.
    #[must_use]
    pub const fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// Decides a single-team request.
    #[must_use]
    pub fn can_i_do_action(&self, request: &AccessRequest<'_>) -> AuthzDecision {
        can_i_do_action(&self.table, request)
    }

    /// Decides a request against a collection of teams.
    #[must_use]
    pub fn can_i_do_action_for_one_of_teams(
        &self,
        user: &User,
        action: Action,
        subject: Subject,
        teams: &[Team],
    ) -> AuthzDecision {
        can_i_do_action_for_one_of_teams(&self.table, user, action, subject, teams)
    }
}
