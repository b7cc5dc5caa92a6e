// crates/daikoku-authz-core/src/core/mod.rs
// ============================================================================
// Module: Daikoku Authz Core Types
// Description: Identifiers, entity snapshots, and the permission table.
// Purpose: Provide stable, serializable inputs for authorization decisions.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe who is asking (users), in which context (teams and
//! tenants), and what each team role may do (the permission table).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod model;
pub mod permissions;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::TeamId;
pub use identifiers::TenantId;
pub use identifiers::UserId;
pub use model::Team;
pub use model::TeamPermission;
pub use model::TeamType;
pub use model::TeamUser;
pub use model::Tenant;
pub use model::User;
pub use permissions::Action;
pub use permissions::Condition;
pub use permissions::PermissionRule;
pub use permissions::PermissionTable;
pub use permissions::PermissionTableError;
pub use permissions::Subject;
