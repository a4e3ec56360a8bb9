//! `${VAR}` expansion for URL-valued settings.

use crate::ConfigError;

/// Expand `${VAR}` / `${VAR:-default}` references in an optional setting, in place.
///
/// Bare `$VAR` is left alone; URLs may contain `$`.
pub(crate) fn expand_setting(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    let Some(raw) = value.as_deref() else {
        return Ok(());
    };
    if !raw.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(raw, |name| std::env::var(name).map(Some))
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        })?
        .into_owned();
    tracing::debug!(field, "Expanded environment variables");
    *value = Some(expanded);
    Ok(())
}
