// crates/daikoku-authz-config/src/config.rs
// ============================================================================
// Module: Daikoku Authz Configuration
// Description: Configuration loading and validation for the authz tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: daikoku-authz-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed. A custom permission table
//! replaces the builtin Daikoku table wholesale; it is never merged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use daikoku_authz_core::Action;
use daikoku_authz_core::Condition;
use daikoku_authz_core::PermissionRule;
use daikoku_authz_core::PermissionTable;
use daikoku_authz_core::Subject;
use daikoku_authz_core::TeamPermission;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "daikoku-authz.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DAIKOKU_AUTHZ_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of custom permission rules.
pub const MAX_PERMISSION_RULES: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Daikoku authz configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthzConfig {
    /// Decision audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Render guard defaults.
    #[serde(default)]
    pub guard: GuardConfig,
    /// Permission table selection.
    #[serde(default)]
    pub permissions: PermissionsConfig,
}

impl AuthzConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audit.validate()?;
        self.permissions.validate()?;
        Ok(())
    }

    /// Builds the permission table in force.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when custom rules violate table invariants.
    pub fn permission_table(&self) -> Result<PermissionTable, ConfigError> {
        self.permissions.table()
    }
}

/// Where authorization decisions are audited.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving decision events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (JSON lines); only valid with the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink=file requires audit.path".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only allowed with audit.sink=file".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Drop decision events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// Render guard defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Dispatch an unauthorized error on every denial.
    #[serde(default)]
    pub dispatch_error: bool,
}

/// Permission table selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionsConfig {
    /// Table source.
    #[serde(default)]
    pub mode: PermissionsMode,
    /// Custom rules, in lookup order per role.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl PermissionsConfig {
    /// Validates permission configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            PermissionsMode::Builtin => {
                if !self.rules.is_empty() {
                    return Err(ConfigError::Invalid(
                        "permissions.rules requires permissions.mode=custom".to_string(),
                    ));
                }
            }
            PermissionsMode::Custom => {
                if self.rules.is_empty() {
                    return Err(ConfigError::Invalid(
                        "permissions.mode=custom requires at least one rule".to_string(),
                    ));
                }
                if self.rules.len() > MAX_PERMISSION_RULES {
                    return Err(ConfigError::Invalid(format!(
                        "permissions.rules exceeds max of {MAX_PERMISSION_RULES}"
                    )));
                }
                let mut seen = BTreeSet::new();
                for rule in &self.rules {
                    if !seen.insert((rule.role, rule.subject)) {
                        return Err(ConfigError::Invalid(format!(
                            "permissions.rules declares {} twice for role {}",
                            rule.subject.as_str(),
                            rule.role.as_str()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Builds the configured permission table.
    fn table(&self) -> Result<PermissionTable, ConfigError> {
        match self.mode {
            PermissionsMode::Builtin => Ok(PermissionTable::builtin()),
            PermissionsMode::Custom => PermissionTable::from_entries(
                self.rules.iter().map(|rule| (rule.role, rule.to_rule())),
            )
            .map_err(|err| ConfigError::Invalid(err.to_string())),
        }
    }
}

/// Permission table source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionsMode {
    /// Builtin Daikoku defaults.
    #[default]
    Builtin,
    /// Rules listed under `permissions.rules`.
    Custom,
}

/// One custom rule entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Role the rule applies to.
    pub role: TeamPermission,
    /// Subject granted.
    pub subject: Subject,
    /// Granted action level.
    pub action: Action,
    /// Optional team predicate.
    #[serde(default)]
    pub condition: Option<Condition>,
}

impl RuleConfig {
    /// Converts the entry into a core rule.
    fn to_rule(&self) -> PermissionRule {
        PermissionRule {
            action: self.action,
            subject: self.subject,
            condition: self.condition.clone(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
