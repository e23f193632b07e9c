//! Parameter schemas and validation.

use bg_core::{ParamValue, ensure_finite};
use serde::{Deserialize, Serialize};

use crate::error::{ComponentError, ComponentResult};

/// What to do with parameters a kind does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamPolicy {
    /// Reject unknown parameters (catches typos).
    #[default]
    Strict,
    /// Ignore unknown parameters with a warning.
    Lenient,
}

/// One entry of a kind's parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    /// Alternative spelling, e.g. the generic `value`.
    pub alias: Option<&'static str>,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            required: false,
        }
    }

    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    fn matches(&self, key: &str) -> bool {
        self.name == key || self.alias == Some(key)
    }
}

fn is_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check `given` against `schema`, returning the parameters under their canonical
/// names in schema order.
pub fn validate_params(
    component: &str,
    schema: &[ParamSpec],
    given: &[(String, ParamValue)],
    policy: ParamPolicy,
) -> ComponentResult<Vec<(String, ParamValue)>> {
    let invalid = |param: &str, reason: String| ComponentError::InvalidParameter {
        component: component.to_string(),
        param: param.to_string(),
        reason,
    };

    let mut resolved: Vec<Option<&ParamValue>> = vec![None; schema.len()];
    for (key, value) in given {
        let Some(slot) = schema.iter().position(|spec| spec.matches(key)) else {
            match policy {
                ParamPolicy::Strict => {
                    let known: Vec<&str> = schema.iter().map(|s| s.name).collect();
                    return Err(invalid(
                        key,
                        format!("unknown parameter (expected one of {known:?})"),
                    ));
                }
                ParamPolicy::Lenient => {
                    tracing::warn!(component, param = %key, "ignoring unknown parameter");
                    continue;
                }
            }
        };
        if resolved[slot].is_some() {
            return Err(invalid(
                key,
                format!("'{}' is given more than once", schema[slot].name),
            ));
        }
        match value {
            ParamValue::Number(v) => {
                ensure_finite(*v, key).map_err(|e| invalid(key, e.to_string()))?;
            }
            ParamValue::Symbol(s) if !is_symbol(s) => {
                return Err(invalid(
                    key,
                    format!("'{s}' is not a number or a symbol name"),
                ));
            }
            ParamValue::Symbol(_) => {}
        }
        resolved[slot] = Some(value);
    }

    schema
        .iter()
        .zip(resolved)
        .filter_map(|(spec, value)| match value {
            Some(v) => Some(Ok((spec.name.to_string(), v.clone()))),
            None if spec.required => Some(Err(invalid(
                spec.name,
                "missing required parameter".to_string(),
            ))),
            None => None,
        })
        .collect()
}
