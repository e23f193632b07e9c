//! Typed spec definitions.
//!
//! Specs are plain data: once parsed they are not modified. Entry lists keep the
//! declared order; `components` also keeps duplicate names so the builder can
//! reject them with a scope-level error.

use bg_core::{CoreResult, ParamValue, Reference};

/// A leaf component entry: a type tag plus parameters.
///
/// The tag names either a registered component kind or a composite definition
/// visible from the enclosing spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    pub type_tag: String,
    pub params: Vec<(String, ParamValue)>,
}

impl ComponentSpec {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

/// Two or more endpoint references joined by one connection, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub endpoints: Vec<Reference>,
}

impl ConnectionSpec {
    pub fn new(endpoints: Vec<Reference>) -> Self {
        Self { endpoints }
    }

    /// Parse textual references (`"R"`, `"TF.primary"`).
    pub fn parse(refs: &[&str]) -> CoreResult<Self> {
        let endpoints = refs
            .iter()
            .map(|r| Reference::parse(r))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { endpoints })
    }
}

/// An internal port published under an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureSpec {
    pub reference: Reference,
    pub alias: String,
}

/// A subcomponent entry: leaf or nested composite.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSpec {
    Leaf(ComponentSpec),
    Composite(CompositeSpec),
}

/// Declarative description of one composite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeSpec {
    pub name: String,
    /// Declared parameters with their defaults. Symbolic leaf parameters in the body
    /// that name one of these take its value; definition instances may override them.
    pub params: Vec<(String, ParamValue)>,
    pub components: Vec<(String, ElementSpec)>,
    pub connections: Vec<ConnectionSpec>,
    pub exposed_ports: Vec<ExposureSpec>,
    /// Reusable composite definitions, referenced by `ComponentSpec::type_tag`.
    pub definitions: Vec<(String, CompositeSpec)>,
}

impl CompositeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, default: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), default.into()));
        self
    }

    pub fn with_component(mut self, name: impl Into<String>, spec: ComponentSpec) -> Self {
        self.components.push((name.into(), ElementSpec::Leaf(spec)));
        self
    }

    pub fn with_composite(mut self, name: impl Into<String>, spec: CompositeSpec) -> Self {
        self.components
            .push((name.into(), ElementSpec::Composite(spec)));
        self
    }

    pub fn with_connection(mut self, connection: ConnectionSpec) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn with_exposure(mut self, reference: Reference, alias: impl Into<String>) -> Self {
        self.exposed_ports.push(ExposureSpec {
            reference,
            alias: alias.into(),
        });
        self
    }

    pub fn with_definition(mut self, name: impl Into<String>, spec: CompositeSpec) -> Self {
        self.definitions.push((name.into(), spec));
        self
    }

    pub fn component(&self, name: &str) -> Option<&ElementSpec> {
        self.components
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    pub fn definition(&self, name: &str) -> Option<&CompositeSpec> {
        self.definitions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }
}
