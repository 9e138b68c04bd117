//! Regex checks for user-supplied names.

use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::error;

/// True if `pattern` matches anywhere in `input`.
pub fn valid_string(input: &str, pattern: &str) -> Result<bool> {
    let re = Regex::new(pattern).with_context(|| format!("Invalid pattern: {}", pattern))?;
    Ok(re.is_match(input))
}

/// Fail when `pattern` matches `input`.
///
/// `pattern` describes what is forbidden, e.g. `[^a-zA-Z0-9_.-]` for node names.
pub fn validate(message: &str, input: &str, pattern: &str) -> Result<()> {
    if valid_string(input, pattern)? {
        error!("{} does not validate: '{}'", message, input);
        bail!("{} does not validate: '{}'", message, input);
    }
    Ok(())
}
