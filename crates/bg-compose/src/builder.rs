//! Composite builder: turns a `CompositeSpec` into a wired `Composite`.
//!
//! Build order per scope: subcomponents in declared order (nested specs recurse),
//! then connections, then exposures, then the isolation check. Each scope has its
//! own name table; an enclosing scope only ever sees a nested composite's aliases.

use bg_components::ComponentRegistry;
use bg_core::ScopePath;
use bg_graph::{Composite, CompositeBuilder, Node};
use bg_spec::{ComponentSpec, CompositeSpec, ElementSpec};
use rayon::prelude::*;

use crate::bindings::Bindings;
use crate::cycles::check_cycles;
use crate::definitions::Definitions;
use crate::error::{ComposeError, ComposeResult};
use crate::options::{ComposeOptions, IsolationPolicy};
use crate::resolve::{connect, expose};

/// Builds composites against a shared, read-only component registry.
#[derive(Debug, Clone)]
pub struct Composer<'r> {
    registry: &'r ComponentRegistry,
    options: ComposeOptions,
}

impl<'r> Composer<'r> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            options: ComposeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &ComponentRegistry {
        self.registry
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Build one composite. All-or-nothing: no partial composite is returned.
    pub fn build(&self, spec: &CompositeSpec) -> ComposeResult<Composite> {
        check_cycles(spec, self.registry)?;
        let path = ScopePath::root(spec.name.as_str());
        let bindings = Bindings::default().nest(spec);
        let composite =
            self.build_scope(spec, &spec.name, path, &Definitions::default(), &bindings)?;
        let summary = composite.summary();
        tracing::debug!(
            model = %spec.name,
            leaves = summary.leaves,
            composites = summary.composites,
            connections = summary.connections,
            "built composite"
        );
        Ok(composite)
    }

    /// Build independent specs in parallel. Results are in input order.
    pub fn build_all(&self, specs: &[CompositeSpec]) -> Vec<ComposeResult<Composite>> {
        specs.par_iter().map(|spec| self.build(spec)).collect()
    }

    fn build_scope<'s>(
        &self,
        spec: &'s CompositeSpec,
        instance: &str,
        path: ScopePath,
        outer: &Definitions<'s>,
        bindings: &Bindings,
    ) -> ComposeResult<Composite> {
        let definitions = outer.enter(spec);
        let mut scope =
            CompositeBuilder::new(spec.name.as_str(), path.clone()).with_instance_name(instance);

        for (name, element) in &spec.components {
            let node = match element {
                ElementSpec::Leaf(leaf) => {
                    self.build_leaf(leaf, name, &path, &definitions, bindings)?
                }
                ElementSpec::Composite(inner) => {
                    let child_path = path.child(name.as_str());
                    let nested = bindings.nest(inner);
                    Node::from(self.build_scope(inner, name, child_path, &definitions, &nested)?)
                }
            };
            scope.add_node(node)?;
        }

        for connection in &spec.connections {
            connect(&mut scope, &connection.endpoints)?;
        }
        for exposure in &spec.exposed_ports {
            expose(&mut scope, &exposure.reference, &exposure.alias)?;
        }

        self.check_isolated(&scope)?;
        Ok(scope.build()?)
    }

    /// Instantiate a registered kind, or build a fresh instance of a definition.
    ///
    /// Symbolic parameters naming a bound parameter are substituted first.
    fn build_leaf<'s>(
        &self,
        leaf: &ComponentSpec,
        name: &str,
        path: &ScopePath,
        definitions: &Definitions<'s>,
        bindings: &Bindings,
    ) -> ComposeResult<Node> {
        if self.registry.contains(&leaf.type_tag) {
            let params = bindings.substitute(&leaf.params);
            let component = self
                .registry
                .instantiate(&leaf.type_tag, name, &params)
                .map_err(|e| ComposeError::from_component(path, e))?;
            tracing::debug!(scope = %path, name, kind = %component.kind, "instantiated");
            return Ok(Node::from(component));
        }

        match definitions.lookup(&leaf.type_tag) {
            Some((def, visible)) => {
                let bound = bindings.instance(
                    (leaf.type_tag.as_str(), def),
                    &leaf.params,
                    self.registry.policy(),
                    path,
                    name,
                )?;
                tracing::debug!(scope = %path, name, definition = %leaf.type_tag, "expanding");
                let child = self.build_scope(def, name, path.child(name), &visible, &bound)?;
                Ok(Node::from(child))
            }
            None => Err(ComposeError::UnknownType {
                scope: path.clone(),
                tag: leaf.type_tag.clone(),
                component: name.to_string(),
            }),
        }
    }

    fn check_isolated(&self, scope: &CompositeBuilder) -> ComposeResult<()> {
        let isolated = scope.unreferenced();
        match self.options.isolated {
            IsolationPolicy::Allow => Ok(()),
            IsolationPolicy::Warn => {
                for name in isolated {
                    tracing::warn!(scope = %scope.path(), component = name, "isolated component");
                }
                Ok(())
            }
            IsolationPolicy::Deny => match isolated.first() {
                Some(name) => Err(ComposeError::IsolatedComponent {
                    scope: scope.path().clone(),
                    component: name.to_string(),
                }),
                None => Ok(()),
            },
        }
    }
}

/// Build `spec` with default options.
pub fn build(spec: &CompositeSpec, registry: &ComponentRegistry) -> ComposeResult<Composite> {
    Composer::new(registry).build(spec)
}
