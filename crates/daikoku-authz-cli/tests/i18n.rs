// crates/daikoku-authz-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: daikoku-authz-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the public i18n surface: argument capture, key fallback, and
//! `t!` placeholder formatting under the default English locale.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions are permitted."
)]

use daikoku_authz_cli::i18n::Locale;
use daikoku_authz_cli::i18n::MessageArg;
use daikoku_authz_cli::i18n::current_locale;
use daikoku_authz_cli::i18n::translate;
use daikoku_authz_cli::t;

#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "request.json");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "request.json");
}

#[test]
fn translate_substitutes_placeholders() {
    let result = translate(
        "input.too_large",
        vec![
            MessageArg::new("path", "request.json"),
            MessageArg::new("size", "20"),
            MessageArg::new("limit", "10"),
        ],
    );
    assert_eq!(result, "Refusing to read request.json: 20 bytes exceeds limit of 10 bytes");
}

#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

#[test]
fn t_macro_formats_arguments() {
    assert_eq!(current_locale(), Locale::En);
    assert_eq!(t!("main.version", version = "1.2.3"), "daikoku-authz 1.2.3");
    assert_eq!(t!("config.validate.ok"), "Config valid");
}
