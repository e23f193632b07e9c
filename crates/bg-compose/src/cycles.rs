//! Pre-build checks over the whole spec tree.
//!
//! Runs before anything is instantiated: a spec that embeds itself through its
//! definitions is rejected here, along with definitions that reuse a registered
//! component tag.

use std::collections::HashSet;

use bg_components::ComponentRegistry;
use bg_core::ScopePath;
use bg_spec::{CompositeSpec, ElementSpec};

use crate::definitions::Definitions;
use crate::error::{ComposeError, ComposeResult};

/// Reject cyclic composition and definitions that shadow registered tags.
pub fn check_cycles(spec: &CompositeSpec, registry: &ComponentRegistry) -> ComposeResult<()> {
    let mut checker = CycleChecker {
        registry,
        chain: Vec::new(),
        verified: HashSet::new(),
    };
    checker.visit(spec, &ScopePath::root(spec.name.as_str()), &Definitions::default())
}

struct CycleChecker<'a> {
    registry: &'a ComponentRegistry,
    /// Definitions currently being expanded, outermost first.
    chain: Vec<(&'a str, *const CompositeSpec)>,
    /// Definitions whose expansion is known to terminate.
    verified: HashSet<*const CompositeSpec>,
}

impl<'a> CycleChecker<'a> {
    fn visit(
        &mut self,
        spec: &'a CompositeSpec,
        path: &ScopePath,
        outer: &Definitions<'a>,
    ) -> ComposeResult<()> {
        self.check_definition_names(spec, path)?;
        let scope = outer.enter(spec);

        for (name, element) in &spec.components {
            match element {
                ElementSpec::Composite(inner) => {
                    self.visit(inner, &path.child(name.as_str()), &scope)?;
                }
                ElementSpec::Leaf(leaf) => {
                    if self.registry.contains(&leaf.type_tag) {
                        continue;
                    }
                    // Unknown tags are reported by the builder.
                    if let Some((def, visible)) = scope.lookup(&leaf.type_tag) {
                        self.expand(&leaf.type_tag, def, path, name, &visible)?;
                    }
                }
            }
        }

        // Unused definitions must be well-formed too.
        for (name, def) in &spec.definitions {
            self.expand(name, def, path, name, &scope)?;
        }
        Ok(())
    }

    fn expand(
        &mut self,
        tag: &'a str,
        def: &'a CompositeSpec,
        scope: &ScopePath,
        instance: &str,
        visible: &Definitions<'a>,
    ) -> ComposeResult<()> {
        let key: *const CompositeSpec = def;
        if let Some(start) = self.chain.iter().position(|(_, k)| *k == key) {
            let mut chain: Vec<String> = self.chain[start..]
                .iter()
                .map(|(n, _)| n.to_string())
                .collect();
            chain.push(tag.to_string());
            return Err(ComposeError::CyclicComposition {
                scope: scope.clone(),
                chain,
            });
        }
        if self.verified.contains(&key) {
            return Ok(());
        }

        self.chain.push((tag, key));
        let result = self.visit(def, &scope.child(instance), visible);
        self.chain.pop();
        result?;
        self.verified.insert(key);
        Ok(())
    }

    fn check_definition_names(&self, spec: &CompositeSpec, path: &ScopePath) -> ComposeResult<()> {
        let mut seen = HashSet::new();
        for (name, _) in &spec.definitions {
            if self.registry.contains(name) || !seen.insert(name.as_str()) {
                return Err(ComposeError::DuplicateName {
                    scope: path.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}
