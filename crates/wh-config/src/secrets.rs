//! Connection-string resolution.
//!
//! # Contract
//! - Config YAML stores only the **env var NAME** (`/database/url_env`),
//!   never the connection string itself.
//! - Callers resolve once at startup and pass the result into constructors;
//!   do not scatter `std::env::var` calls across the codebase.
//! - `Debug` on [`ResolvedDatabase`] redacts the URL.
//! - Error messages reference the env var **NAME**, never the value.

use anyhow::{bail, Result};
use serde_json::Value;

/// Env var consulted when `/database/url_env` is absent.
pub const DEFAULT_DATABASE_URL_ENV: &str = "WH_DATABASE_URL";

/// A resolved connection string. **Redacted in `Debug` output.**
#[derive(Clone)]
pub struct ResolvedDatabase {
    /// Name of the env var the URL was read from.
    pub source_var: String,
    pub url: String,
}

impl std::fmt::Debug for ResolvedDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDatabase")
            .field("source_var", &self.source_var)
            .field("url", &"<REDACTED>")
            .finish()
    }
}

/// Read a non-empty string value at `pointer`.
fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Returns `None` if the variable is unset or blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Name of the env var that carries the connection string.
pub fn database_url_env_name(config_json: &Value) -> String {
    read_str_at(config_json, "/database/url_env")
        .unwrap_or_else(|| DEFAULT_DATABASE_URL_ENV.to_string())
}

/// Resolve the connection string from the env var named in config.
///
/// # Errors
/// `SECRETS_MISSING` naming the env var when it is unset or blank.
pub fn resolve_database_url(config_json: &Value) -> Result<ResolvedDatabase> {
    let var = database_url_env_name(config_json);
    match resolve_env(&var) {
        Some(url) => Ok(ResolvedDatabase {
            source_var: var,
            url,
        }),
        None => bail!(
            "SECRETS_MISSING: required env var '{}' (database url) is not set or empty",
            var
        ),
    }
}
