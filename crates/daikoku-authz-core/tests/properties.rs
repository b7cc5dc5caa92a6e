// crates/daikoku-authz-core/tests/properties.rs
// ============================================================================
// Module: Evaluator Property-Based Tests
// Description: Property tests for authorization invariants.
// Purpose: Check admin override, tenant admin, monotonicity, and deny-by-default.
// ============================================================================

//! Property-based tests for permission evaluator invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use daikoku_authz_core::AccessRequest;
use daikoku_authz_core::Action;
use daikoku_authz_core::PermissionRule;
use daikoku_authz_core::PermissionTable;
use daikoku_authz_core::Subject;
use daikoku_authz_core::Team;
use daikoku_authz_core::TeamPermission;
use daikoku_authz_core::TeamType;
use daikoku_authz_core::Tenant;
use daikoku_authz_core::User;
use daikoku_authz_core::runtime::can_i_do_action;
use proptest::prelude::*;

fn role_strategy() -> impl Strategy<Value = TeamPermission> {
    prop::sample::select(TeamPermission::ALL.to_vec())
}

fn subject_strategy() -> impl Strategy<Value = Subject> {
    prop::sample::select(Subject::ALL.to_vec())
}

fn requested_action_strategy() -> impl Strategy<Value = Action> {
    prop::sample::select(vec![Action::Read, Action::Manage])
}

fn visibility_strategy() -> impl Strategy<Value = Option<TeamPermission>> {
    prop::option::of(role_strategy())
}

fn team_type_strategy() -> impl Strategy<Value = TeamType> {
    prop::sample::select(vec![TeamType::Personal, TeamType::Organization, TeamType::Admin])
}

fn team_strategy() -> impl Strategy<Value = Team> {
    (
        prop::collection::vec(("[a-d]", role_strategy()), 0 .. 4),
        visibility_strategy(),
        team_type_strategy(),
    )
        .prop_map(|(members, visibility, team_type)| {
            members
                .into_iter()
                .fold(Team::new("team"), |team, (user_id, role)| team.with_member(user_id, role))
                .with_api_key_visibility(visibility)
                .with_type(team_type)
        })
}

proptest! {
    #[test]
    fn daikoku_admin_is_allowed_everything(
        subject in subject_strategy(),
        action in requested_action_strategy(),
        team in prop::option::of(team_strategy()),
        is_tenant_admin in any::<bool>(),
    ) {
        let admin = User::new("a").daikoku_admin();
        let current = Tenant::new("tenant-a");
        let other = Tenant::new("tenant-b");
        let mut request = AccessRequest::new(&admin, action, subject)
            .with_tenant(is_tenant_admin, Some(&other), Some(&current));
        request.team = team.as_ref();
        prop_assert!(can_i_do_action(&PermissionTable::builtin(), &request).allowed);
    }

    #[test]
    fn tenant_admin_is_allowed_on_own_tenant(
        tenant_id in "[a-z0-9]{1,12}",
        action in requested_action_strategy(),
    ) {
        let user = User::new("alice");
        let tenant = Tenant::new(tenant_id);
        let request = AccessRequest::new(&user, action, Subject::Tenant)
            .with_tenant(true, Some(&tenant), Some(&tenant));
        prop_assert!(can_i_do_action(&PermissionTable::builtin(), &request).allowed);
    }

    #[test]
    fn manage_grant_implies_read_grant(
        subject in subject_strategy(),
        team in team_strategy(),
        user_id in "[a-d]",
    ) {
        let user = User::new(user_id);
        let table = PermissionTable::builtin();
        let manage = AccessRequest::new(&user, Action::Manage, subject).with_team(&team);
        let read = AccessRequest::new(&user, Action::Read, subject).with_team(&team);
        if can_i_do_action(&table, &manage).allowed {
            prop_assert!(can_i_do_action(&table, &read).allowed);
        }
    }

    #[test]
    fn subject_absent_from_role_rules_is_denied(
        role in role_strategy(),
        granted in prop::collection::btree_set(subject_strategy(), 0 .. 8),
        subject in subject_strategy(),
        action in requested_action_strategy(),
    ) {
        prop_assume!(!granted.contains(&subject));
        let table = PermissionTable::from_entries(
            granted.iter().map(|s| (role, PermissionRule::new(*s, Action::Manage))),
        ).unwrap();
        let user = User::new("alice");
        let team = Team::new("team").with_member("alice", role);
        let request = AccessRequest::new(&user, action, subject).with_team(&team);
        prop_assert!(!can_i_do_action(&table, &request).allowed);
    }

    #[test]
    fn api_editor_apikey_manage_follows_visibility(visibility in visibility_strategy()) {
        let user = User::new("alice");
        let team = Team::new("team")
            .with_member("alice", TeamPermission::ApiEditor)
            .with_api_key_visibility(visibility);
        let request = AccessRequest::new(&user, Action::Manage, Subject::ApiKey).with_team(&team);
        let allowed = can_i_do_action(&PermissionTable::builtin(), &request).allowed;
        prop_assert_eq!(allowed, visibility != Some(TeamPermission::Administrator));
    }

    #[test]
    fn non_member_is_denied_on_team_subjects(
        subject in subject_strategy(),
        action in requested_action_strategy(),
        team in team_strategy(),
    ) {
        let outsider = User::new("zed");
        let request = AccessRequest::new(&outsider, action, subject).with_team(&team);
        prop_assert!(!can_i_do_action(&PermissionTable::builtin(), &request).allowed);
    }
}
