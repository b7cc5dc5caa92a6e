// crates/daikoku-authz-core/src/core/permissions.rs
// ============================================================================
// Module: Daikoku Permission Table
// Description: Actions, subjects, rule conditions, and the per-role table.
// Purpose: Describe which privilege each team role holds on each subject.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`PermissionTable`] maps each [`TeamPermission`] to an ordered list of
//! [`PermissionRule`]s. A rule grants an [`Action`] level on a [`Subject`],
//! optionally gated by a [`Condition`] evaluated against the team snapshot.
//!
//! ## Invariants
//! - A role holds at most one rule per subject; construction rejects duplicates.
//! - Conditions are plain values; evaluation reads only the team passed in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::model::Team;
use crate::core::model::TeamPermission;
use crate::core::model::TeamType;

// ============================================================================
// SECTION: Actions and Subjects
// ============================================================================

/// Privilege level.
///
/// # Invariants
/// - Totally ordered: `DoNothing < Read < Manage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// No privilege.
    DoNothing,
    /// Read access.
    Read,
    /// Full management access.
    Manage,
}

impl Action {
    /// Returns a stable label for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DoNothing => "do_nothing",
            Self::Read => "read",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource category being protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// Tenant settings; resolved through tenant-admin checks, never the table.
    Tenant,
    /// APIs published by a team.
    Api,
    /// API keys (subscriptions) owned by a team.
    ApiKey,
    /// Team assets.
    Asset,
    /// The team itself.
    Team,
    /// Consumption statistics.
    Stat,
    /// Team back-office screens.
    Backoffice,
    /// Daikoku-wide administration.
    Daikoku,
}

impl Subject {
    /// All subjects in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Tenant,
        Self::Api,
        Self::ApiKey,
        Self::Asset,
        Self::Team,
        Self::Stat,
        Self::Backoffice,
        Self::Daikoku,
    ];

    /// Returns a stable label for the subject.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Api => "api",
            Self::ApiKey => "apikey",
            Self::Asset => "asset",
            Self::Team => "team",
            Self::Stat => "stat",
            Self::Backoffice => "backoffice",
            Self::Daikoku => "daikoku",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// Predicate over a team snapshot gating a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Holds when the team's API key visibility is unset or at most the given role.
    ApiKeyVisibleTo(TeamPermission),
    /// Holds when the team is of the given type.
    TeamTypeIs(TeamType),
}

impl Condition {
    /// Evaluates the predicate against the team.
    #[must_use]
    pub fn evaluate(&self, team: &Team) -> bool {
        match self {
            Self::ApiKeyVisibleTo(role) => {
                team.api_key_visibility.is_none_or(|visibility| visibility <= *role)
            }
            Self::TeamTypeIs(team_type) => team.team_type == *team_type,
        }
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Grant of an action level on a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    /// Granted action level.
    pub action: Action,
    /// Subject the grant applies to.
    pub subject: Subject,
    /// Optional gate; a failing condition grants nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl PermissionRule {
    /// Creates an unconditional rule.
    #[must_use]
    pub const fn new(subject: Subject, action: Action) -> Self {
        Self {
            action,
            subject,
            condition: None,
        }
    }

    /// Returns the rule gated by `condition`.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Resolves the granted level for the team.
    ///
    /// Returns `None` when the condition does not hold; callers treat that as
    /// [`Action::DoNothing`] and never fall back to a lower grant.
    #[must_use]
    pub fn resolve(&self, team: &Team) -> Option<Action> {
        match &self.condition {
            Some(condition) if !condition.evaluate(team) => None,
            _ => Some(self.action),
        }
    }
}

// ============================================================================
// SECTION: Table
// ============================================================================

/// Errors raised while building a permission table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionTableError {
    /// A role declares two rules for the same subject.
    #[error("role {role} declares more than one rule for subject {subject}")]
    DuplicateSubject {
        /// Role label.
        role: &'static str,
        /// Subject label.
        subject: &'static str,
    },
}

/// Per-role permission table.
///
/// # Invariants
/// - Each role maps to at most one rule per subject.
/// - Roles without an entry have no rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionTable {
    /// Ordered rules keyed by role.
    roles: BTreeMap<TeamPermission, Vec<PermissionRule>>,
}

impl PermissionTable {
    /// Builds a table from per-role rule lists.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionTableError::DuplicateSubject`] when a role lists a
    /// subject twice.
    pub fn new(
        roles: BTreeMap<TeamPermission, Vec<PermissionRule>>,
    ) -> Result<Self, PermissionTableError> {
        for (role, rules) in &roles {
            for (index, rule) in rules.iter().enumerate() {
                if rules[.. index].iter().any(|earlier| earlier.subject == rule.subject) {
                    return Err(PermissionTableError::DuplicateSubject {
                        role: role.as_str(),
                        subject: rule.subject.as_str(),
                    });
                }
            }
        }
        Ok(Self {
            roles,
        })
    }

    /// Builds a table from `(role, rule)` entries, preserving entry order per role.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionTableError::DuplicateSubject`] when a role lists a
    /// subject twice.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (TeamPermission, PermissionRule)>,
    ) -> Result<Self, PermissionTableError> {
        let mut roles: BTreeMap<TeamPermission, Vec<PermissionRule>> = BTreeMap::new();
        for (role, rule) in entries {
            roles.entry(role).or_default().push(rule);
        }
        Self::new(roles)
    }

    /// Returns the builtin Daikoku permission table.
    #[must_use]
    pub fn builtin() -> Self {
        let user = vec![
            PermissionRule::new(Subject::Daikoku, Action::DoNothing),
            PermissionRule::new(Subject::Api, Action::Read),
            PermissionRule::new(Subject::ApiKey, Action::Read)
                .when(Condition::ApiKeyVisibleTo(TeamPermission::User)),
            PermissionRule::new(Subject::Asset, Action::Read),
            PermissionRule::new(Subject::Stat, Action::Read)
                .when(Condition::ApiKeyVisibleTo(TeamPermission::User)),
            PermissionRule::new(Subject::Team, Action::Read),
            PermissionRule::new(Subject::Backoffice, Action::Read),
        ];
        let api_editor = vec![
            PermissionRule::new(Subject::Daikoku, Action::DoNothing),
            PermissionRule::new(Subject::Api, Action::Manage),
            PermissionRule::new(Subject::ApiKey, Action::Manage)
                .when(Condition::ApiKeyVisibleTo(TeamPermission::ApiEditor)),
            PermissionRule::new(Subject::Asset, Action::Manage),
            PermissionRule::new(Subject::Stat, Action::Read)
                .when(Condition::ApiKeyVisibleTo(TeamPermission::ApiEditor)),
            PermissionRule::new(Subject::Team, Action::Read),
            PermissionRule::new(Subject::Backoffice, Action::Read),
        ];
        let administrator = vec![
            PermissionRule::new(Subject::Daikoku, Action::DoNothing),
            PermissionRule::new(Subject::Api, Action::Manage),
            PermissionRule::new(Subject::ApiKey, Action::Manage),
            PermissionRule::new(Subject::Asset, Action::Manage),
            PermissionRule::new(Subject::Stat, Action::Manage),
            PermissionRule::new(Subject::Team, Action::Manage),
            PermissionRule::new(Subject::Backoffice, Action::Manage),
        ];
        let mut roles = BTreeMap::new();
        roles.insert(TeamPermission::User, user);
        roles.insert(TeamPermission::ApiEditor, api_editor);
        roles.insert(TeamPermission::Administrator, administrator);
        Self {
            roles,
        }
    }

    /// Returns the ordered rules for a role (empty when the role has none).
    #[must_use]
    pub fn rules_for(&self, role: TeamPermission) -> &[PermissionRule] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the first rule for the role and subject.
    #[must_use]
    pub fn rule_for(&self, role: TeamPermission, subject: Subject) -> Option<&PermissionRule> {
        self.rules_for(role).iter().find(|rule| rule.subject == subject)
    }

    /// Returns the total number of rules across all roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }

    /// Returns true when no role carries any rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
