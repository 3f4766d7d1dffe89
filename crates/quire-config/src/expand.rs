//! Environment variable and home directory expansion for configuration
//! strings.
//!
//! Supports:
//! - `~` at the start of a value - expands to the home directory
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand `~` and environment variable references in a string.
///
/// Returns the original string unchanged if it has neither a leading `~` nor
/// any `${}` pattern. Bare `$VAR` syntax is not expanded (only `${VAR}` with
/// braces).
pub(crate) fn expand_value(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.starts_with('~') && !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::full_with_context(
        value,
        || std::env::var("HOME").ok(),
        |var| -> Result<Option<String>, LookupError> {
            match std::env::var(var) {
                Ok(val) => Ok(Some(val)),
                Err(_) => Err(LookupError {
                    var_name: var.to_owned(),
                }),
            }
        },
    )
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}
