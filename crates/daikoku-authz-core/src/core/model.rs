// crates/daikoku-authz-core/src/core/model.rs
// ============================================================================
// Module: Daikoku Data Model
// Description: Users, teams, memberships, and tenants as seen by the evaluator.
// Purpose: Provide immutable, serializable snapshots of authorization inputs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! These types are snapshots of objects the portal has already fetched. They
//! deserialize from the Daikoku JSON shapes (`_id`, `isDaikokuAdmin`,
//! `teamPermission`, `apiKeyVisibility`) and ignore fields the evaluator does
//! not read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::TeamId;
use crate::core::identifiers::TenantId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Users
// ============================================================================

/// Connected user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User identifier.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Global administrator flag; overrides every team and tenant check.
    #[serde(default)]
    pub is_daikoku_admin: bool,
}

impl User {
    /// Creates a regular (non-admin) user.
    #[must_use]
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            is_daikoku_admin: false,
        }
    }

    /// Returns the user with the daikoku admin flag set.
    #[must_use]
    pub const fn daikoku_admin(mut self) -> Self {
        self.is_daikoku_admin = true;
        self
    }
}

// ============================================================================
// SECTION: Teams
// ============================================================================

/// Team-scoped role assigned per membership.
///
/// # Invariants
/// - Variants are ordered by privilege: `User < ApiEditor < Administrator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamPermission {
    /// Regular team member.
    User,
    /// Member allowed to edit the team's APIs.
    ApiEditor,
    /// Team administrator.
    Administrator,
}

impl TeamPermission {
    /// All roles in privilege order.
    pub const ALL: [Self; 3] = [Self::User, Self::ApiEditor, Self::Administrator];

    /// Returns the Daikoku wire label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::ApiEditor => "ApiEditor",
            Self::Administrator => "Administrator",
        }
    }
}

/// Team membership entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamUser {
    /// Member user identifier.
    pub user_id: UserId,
    /// Role held by the member in this team.
    pub team_permission: TeamPermission,
}

/// Kind of team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TeamType {
    /// Single-user team created for every account.
    Personal,
    /// Shared team.
    #[default]
    Organization,
    /// Tenant administration team.
    Admin,
}

/// Team snapshot used as the evaluation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Team identifier.
    #[serde(rename = "_id")]
    pub id: TeamId,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Team kind.
    #[serde(rename = "type", default)]
    pub team_type: TeamType,
    /// Memberships in declaration order.
    #[serde(default)]
    pub users: Vec<TeamUser>,
    /// Minimum role allowed to see API keys; unset means everyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_visibility: Option<TeamPermission>,
}

impl Team {
    /// Creates an organization team with no members.
    #[must_use]
    pub fn new(id: impl Into<TeamId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            team_type: TeamType::Organization,
            users: Vec::new(),
            api_key_visibility: None,
        }
    }

    /// Returns the team with an additional member.
    #[must_use]
    pub fn with_member(mut self, user_id: impl Into<UserId>, role: TeamPermission) -> Self {
        self.users.push(TeamUser {
            user_id: user_id.into(),
            team_permission: role,
        });
        self
    }

    /// Returns the team with the given API key visibility.
    #[must_use]
    pub const fn with_api_key_visibility(mut self, visibility: Option<TeamPermission>) -> Self {
        self.api_key_visibility = visibility;
        self
    }

    /// Returns the team with the given team type.
    #[must_use]
    pub const fn with_type(mut self, team_type: TeamType) -> Self {
        self.team_type = team_type;
        self
    }

    /// Returns the first membership for the user, if any.
    #[must_use]
    pub fn membership(&self, user_id: &UserId) -> Option<&TeamUser> {
        self.users.iter().find(|member| &member.user_id == user_id)
    }
}

// ============================================================================
// SECTION: Tenants
// ============================================================================

/// Tenant (top-level organization) snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant identifier.
    #[serde(rename = "_id")]
    pub id: TenantId,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Users administering the tenant.
    #[serde(default)]
    pub admins: Vec<UserId>,
}

impl Tenant {
    /// Creates a tenant with no admins.
    #[must_use]
    pub fn new(id: impl Into<TenantId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            admins: Vec::new(),
        }
    }

    /// Returns the tenant with an additional admin.
    #[must_use]
    pub fn with_admin(mut self, user_id: impl Into<UserId>) -> Self {
        self.admins.push(user_id.into());
        self
    }

    /// Returns true when the user administers this tenant.
    #[must_use]
    pub fn is_admin(&self, user_id: &UserId) -> bool {
        self.admins.contains(user_id)
    }
}
