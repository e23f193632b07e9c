//! Component registry: type tag -> kind, and the factory built on it.

use std::collections::BTreeMap;

use bg_core::ParamValue;
use bg_graph::Component;

use crate::error::{ComponentError, ComponentResult};
use crate::kind::ComponentKind;
use crate::params::{ParamPolicy, validate_params};

/// Catalog of known type tags.
///
/// Populate it before building, then share it by reference: it is never mutated by
/// instantiation, so concurrent builds can read it without coordination.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    tags: BTreeMap<String, ComponentKind>,
    policy: ParamPolicy,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ComponentRegistry {
    /// A registry with no tags.
    pub fn empty() -> Self {
        Self {
            tags: BTreeMap::new(),
            policy: ParamPolicy::default(),
        }
    }

    /// A registry with every built-in kind under its canonical tag and aliases.
    pub fn with_builtins() -> Self {
        let mut tags = BTreeMap::new();
        for kind in ComponentKind::ALL {
            tags.insert(kind.tag().to_string(), kind);
            for alias in kind.aliases() {
                tags.insert((*alias).to_string(), kind);
            }
        }
        Self {
            tags,
            policy: ParamPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ParamPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ParamPolicy {
        self.policy
    }

    /// Register an additional tag for a kind. Existing tags are never replaced.
    pub fn register(&mut self, tag: impl Into<String>, kind: ComponentKind) -> ComponentResult<()> {
        let tag = tag.into();
        if self.tags.contains_key(&tag) {
            return Err(ComponentError::DuplicateTag { tag });
        }
        self.tags.insert(tag, kind);
        Ok(())
    }

    pub fn lookup(&self, tag: &str) -> Option<ComponentKind> {
        self.tags.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// All registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, ComponentKind)> {
        self.tags.iter().map(|(tag, kind)| (tag.as_str(), *kind))
    }

    /// Distinct registered kinds, in catalog order.
    pub fn kinds(&self) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|k| self.tags.values().any(|v| v == k))
            .collect()
    }

    /// Create a fresh, unconnected component of the kind registered under `tag`.
    pub fn instantiate(
        &self,
        tag: &str,
        name: &str,
        params: &[(String, ParamValue)],
    ) -> ComponentResult<Component> {
        let kind = self.lookup(tag).ok_or_else(|| ComponentError::UnknownType {
            tag: tag.to_string(),
            component: name.to_string(),
        })?;
        let params = validate_params(name, kind.params(), params, self.policy)?;
        let component = Component::new(name, kind.tag(), params, kind.ports());
        Ok(match kind.default_port() {
            Some(port) => component.with_default_port(port),
            None => component,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bg_graph::{Element, PortArity};

    fn value(v: f64) -> Vec<(String, ParamValue)> {
        vec![("value".to_string(), ParamValue::Number(v))]
    }

    #[test]
    fn instantiate_resistor() {
        let registry = ComponentRegistry::with_builtins();
        let r = registry.instantiate("resistor", "R1", &value(1.0)).unwrap();
        assert_eq!(r.name, "R1");
        assert_eq!(r.kind, "R");
        assert_eq!(r.param("r"), Some(&ParamValue::Number(1.0)));
        assert!(r.default_port().is_some());
    }

    #[test]
    fn instantiate_junction_without_params() {
        let registry = ComponentRegistry::with_builtins();
        let j = registry.instantiate("0", "J", &[]).unwrap();
        assert_eq!(j.ports()[0].arity, PortArity::Many);
        assert!(j.params.is_empty());
    }

    #[test]
    fn unknown_tag_fails() {
        let registry = ComponentRegistry::with_builtins();
        let err = registry.instantiate("Q", "Q1", &[]).unwrap_err();
        assert_eq!(
            err,
            ComponentError::UnknownType {
                tag: "Q".into(),
                component: "Q1".into()
            }
        );
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = ComponentRegistry::empty();
        assert!(registry.instantiate("R", "R1", &value(1.0)).is_err());
        assert!(registry.kinds().is_empty());
    }

    #[test]
    fn register_custom_tag() {
        let mut registry = ComponentRegistry::empty();
        registry.register("damper", ComponentKind::Resistor).unwrap();
        let err = registry.register("damper", ComponentKind::Capacitor).unwrap_err();
        assert!(matches!(err, ComponentError::DuplicateTag { .. }));
        assert_eq!(registry.lookup("damper"), Some(ComponentKind::Resistor));
        assert_eq!(registry.kinds(), vec![ComponentKind::Resistor]);
    }

    #[test]
    fn lenient_policy_ignores_extras() {
        let mut params = value(1.0);
        params.push(("colour".to_string(), ParamValue::from("red")));

        let strict = ComponentRegistry::with_builtins();
        assert!(strict.instantiate("C", "C1", &params).is_err());

        let lenient = ComponentRegistry::with_builtins().with_policy(ParamPolicy::Lenient);
        let c = lenient.instantiate("C", "C1", &params).unwrap();
        assert_eq!(c.params.len(), 1);
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ComponentRegistry>();
    }
}
