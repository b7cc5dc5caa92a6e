// crates/daikoku-authz-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for English and French output.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The `daikoku-authz` CLI stores user-facing strings in a small translation
//! catalog. All runtime output goes through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// French.
    Fr,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Fr];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "daikoku-authz {version}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid"),
    ("config.table_failed", "Failed to build permission table: {error}"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("audit.path_missing", "audit.sink=file requires audit.path"),
    ("input.read_failed", "Failed to read {path}: {error}"),
    ("input.too_large", "Refusing to read {path}: {size} bytes exceeds limit of {limit} bytes"),
    ("input.parse_failed", "Failed to parse request {path}: {error}"),
    ("input.team_and_teams", "Request may set either team or teams, not both"),
    ("output.serialize_failed", "Failed to serialize output: {error}"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'fr'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static French catalog entries.
const CATALOG_FR: &[(&str, &str)] = &[
    ("main.version", "daikoku-authz {version}"),
    ("config.load_failed", "Échec du chargement de la configuration : {error}"),
    ("config.validate.ok", "Configuration valide"),
    ("config.table_failed", "Échec de la construction de la table des permissions : {error}"),
    ("audit.open_failed", "Impossible d'ouvrir le journal d'audit {path} : {error}"),
    ("audit.path_missing", "audit.sink=file exige audit.path"),
    ("input.read_failed", "Échec de la lecture de {path} : {error}"),
    (
        "input.too_large",
        "Lecture de {path} refusée : {size} octets dépassent la limite de {limit} octets",
    ),
    ("input.parse_failed", "Échec de l'analyse de la requête {path} : {error}"),
    ("input.team_and_teams", "La requête peut définir team ou teams, pas les deux"),
    ("output.serialize_failed", "Échec de la sérialisation de la sortie : {error}"),
    ("output.write_failed", "Échec de l'écriture sur {stream} : {error}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortie"),
    ("i18n.lang.invalid_env", "Valeur invalide pour {env} : {value}. Attendu 'en' ou 'fr'."),
    (
        "i18n.disclaimer.machine_translated",
        "Remarque : la sortie non anglaise est traduite automatiquement et peut être inexacte.",
    ),
];

/// Returns the raw catalog entries for the requested locale.
#[cfg(test)]
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Fr => CATALOG_FR,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_FR_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Fr => CATALOG_FR_MAP.get_or_init(|| CATALOG_FR.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
