//! Environment variable expansion for command strings.
//!
//! Only the braced forms are recognised:
//! - `${VAR}` - value of VAR, error if unset
//! - `${VAR:-default}` - value of VAR if set, otherwise `default`
//!
//! Argument placeholders such as `{input}` carry no `$` and pass through.

use crate::ConfigError;

/// Expand environment variable references in a single value.
///
/// Each `${...}` span is expanded on its own; text outside the spans,
/// including bare `$VAR` and `$1`, is copied unchanged. An unterminated
/// `${` is left as is.
///
/// `field` names the config key for error reporting (e.g. `converter.program`).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let Some(close) = rest[start..].find('}') else {
            break;
        };
        let end = start + close + 1;
        out.push_str(&rest[..start]);
        out.push_str(&expand_braced(&rest[start..end], field)?);
        rest = &rest[end..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Expand one `${VAR}` or `${VAR:-default}` span.
fn expand_braced(span: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(span, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.0),
    })
}

/// Expand every element of an argument list.
///
/// Errors name the failing element as `field[index]`.
pub(crate) fn expand_args(args: &[String], field: &str) -> Result<Vec<String>, ConfigError> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| expand_env(arg, &format!("{field}[{i}]")))
        .collect()
}

/// Lookup failure carrying the variable name.
struct UnsetVar(String);
