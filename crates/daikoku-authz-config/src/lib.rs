// crates/daikoku-authz-config/src/lib.rs
// ============================================================================
// Module: Daikoku Authz Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for daikoku-authz.toml semantics.
// Dependencies: daikoku-authz-core, serde, toml
// ============================================================================

//! ## Overview
//! `daikoku-authz-config` defines the configuration model for the Daikoku
//! authorization tooling: where decisions are audited, whether denials
//! dispatch errors by default, and which permission table is in force.
//! Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
