// crates/daikoku-authz-cli/src/lib.rs
// ============================================================================
// Module: Daikoku Authz CLI Library
// Description: Shared helpers for the daikoku-authz command-line interface.
// Purpose: Provide reusable components (i18n) for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! Houses the localized message catalog used by the binary entry point
//! (`src/main.rs`) so every user-facing line goes through one place.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;

#[cfg(test)]
mod tests;
