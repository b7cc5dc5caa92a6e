// crates/daikoku-authz-cli/src/tests/mod.rs
// ============================================================================
// Module: CLI Library Unit Tests
// Description: Unit test modules for the CLI library.
// Purpose: Group catalog tests that need crate-private access.
// Dependencies: daikoku-authz-cli
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions are permitted."
)]
