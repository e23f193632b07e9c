//! Lexical scopes of composite definitions.

use bg_spec::CompositeSpec;

/// Definition tables visible from one point in a spec, outermost first.
#[derive(Debug, Clone, Default)]
pub(crate) struct Definitions<'a> {
    levels: Vec<&'a [(String, CompositeSpec)]>,
}

impl<'a> Definitions<'a> {
    /// Scope seen from inside `spec`: the current tables plus its own definitions.
    pub fn enter(&self, spec: &'a CompositeSpec) -> Self {
        let mut levels = self.levels.clone();
        levels.push(&spec.definitions);
        Self { levels }
    }

    /// Find `name`, innermost scope first.
    ///
    /// Returns the definition together with the scope it was declared in, which is
    /// what its body sees (not the scope at the use site).
    pub fn lookup(&self, name: &str) -> Option<(&'a CompositeSpec, Definitions<'a>)> {
        self.levels.iter().enumerate().rev().find_map(|(depth, level)| {
            level.iter().find(|(n, _)| n == name).map(|(_, def)| {
                let visible = Definitions {
                    levels: self.levels[..=depth].to_vec(),
                };
                (def, visible)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_definitions_shadow_outer() {
        let inner = CompositeSpec::new("Inner").with_definition("Block", CompositeSpec::new("Small"));
        let outer = CompositeSpec::new("Outer").with_definition("Block", CompositeSpec::new("Big"));

        let root = Definitions::default().enter(&outer);
        let nested = root.enter(&inner);

        assert_eq!(root.lookup("Block").unwrap().0.name, "Big");
        let (def, visible) = nested.lookup("Block").unwrap();
        assert_eq!(def.name, "Small");
        assert_eq!(visible.levels.len(), 2);
        assert!(nested.lookup("Other").is_none());
    }

    #[test]
    fn outer_definition_does_not_see_inner_scope() {
        let inner = CompositeSpec::new("Inner").with_definition("Local", CompositeSpec::new("L"));
        let outer = CompositeSpec::new("Outer").with_definition("Shared", CompositeSpec::new("S"));

        let nested = Definitions::default().enter(&outer).enter(&inner);
        let (_, visible) = nested.lookup("Shared").unwrap();
        assert!(visible.lookup("Local").is_none());
    }
}
