//! Parameter bindings of a composite scope.
//!
//! A composite may declare parameters with defaults. Inside its body, a symbolic
//! leaf parameter that names a declared parameter is replaced by the bound value.
//! Inline nested composites see the enclosing bindings; a definition instance only
//! sees its own declared parameters, set from defaults and the instance's `params`.

use bg_components::ParamPolicy;
use bg_core::{ParamValue, ScopePath};
use bg_spec::CompositeSpec;

use crate::error::{ComposeError, ComposeResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Bindings {
    values: Vec<(String, ParamValue)>,
}

impl Bindings {
    /// Bindings of an inline composite: these values, shadowed by `spec`'s defaults.
    pub fn nest(&self, spec: &CompositeSpec) -> Self {
        let mut nested = self.clone();
        for (name, default) in &spec.params {
            let value = self.resolve(default);
            nested.bind(name, value);
        }
        nested
    }

    /// Bindings of a definition instance named `component` in `scope`.
    ///
    /// `overrides` are the instance's `params`; symbolic values are resolved against
    /// `self` (the use site). Undeclared names are an error under `Strict` and are
    /// ignored with a warning under `Lenient`.
    pub fn instance(
        &self,
        definition: (&str, &CompositeSpec),
        overrides: &[(String, ParamValue)],
        policy: ParamPolicy,
        scope: &ScopePath,
        component: &str,
    ) -> ComposeResult<Self> {
        let (tag, spec) = definition;
        let mut bound = Bindings::default().nest(spec);
        for (name, value) in overrides {
            if spec.params.iter().any(|(n, _)| n == name) {
                bound.bind(name, self.resolve(value));
                continue;
            }
            match policy {
                ParamPolicy::Strict => {
                    let declared: Vec<&str> = spec.params.iter().map(|(n, _)| n.as_str()).collect();
                    let reason = if declared.is_empty() {
                        format!("definition '{tag}' declares no parameters")
                    } else {
                        format!(
                            "definition '{tag}' has no parameter '{name}' (declared: {})",
                            declared.join(", ")
                        )
                    };
                    return Err(ComposeError::InvalidParameter {
                        scope: scope.clone(),
                        component: component.to_string(),
                        param: name.clone(),
                        reason,
                    });
                }
                ParamPolicy::Lenient => {
                    tracing::warn!(
                        scope = %scope,
                        component,
                        definition = tag,
                        param = %name,
                        "ignoring undeclared parameter"
                    );
                }
            }
        }
        Ok(bound)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Replace symbolic values that name a bound parameter; everything else is kept.
    pub fn substitute(&self, params: &[(String, ParamValue)]) -> Vec<(String, ParamValue)> {
        params
            .iter()
            .map(|(name, value)| (name.clone(), self.resolve(value)))
            .collect()
    }

    fn resolve(&self, value: &ParamValue) -> ParamValue {
        match value.as_symbol().and_then(|s| self.get(s)) {
            Some(bound) => bound.clone(),
            None => value.clone(),
        }
    }

    fn bind(&mut self, name: &str, value: ParamValue) {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name.to_string(), value)),
        }
    }
}
