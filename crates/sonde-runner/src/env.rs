//! Environment-variable contract.
//!
//! Every probe takes its run parameters from the environment (the CI
//! pipeline's native interface); a missing required variable terminates the
//! run with an error naming the variable, before any network call is made.

use anyhow::{bail, Context, Result};

/// Reads a required variable; the error names the variable so CI logs point
/// straight at the misconfiguration.
pub fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => bail!("{name} environment variable is required"),
    }
}

/// Reads an optional variable, treating empty values as unset.
pub fn optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Reads an optional integer variable with a default. A set-but-unparseable
/// value is an error rather than a silent fallback.
pub fn parse_u64(name: &str, default: u64) -> Result<u64> {
    match optional(name) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{name} must be an integer, got {raw:?}")),
        None => Ok(default),
    }
}
