//! Read-only traversal of a built composite.
//!
//! Equation assembly and rendering stages walk the structure through `Visitor`;
//! nothing here can mutate it.

use bg_core::ScopePath;

use crate::graph::{Component, Composite, Node};

/// Callbacks for a depth-first walk. All methods default to doing nothing.
pub trait Visitor {
    /// Called before the nodes of a composite are visited.
    fn enter_composite(&mut self, _path: &ScopePath, _composite: &Composite) {}

    /// Called after all nodes of a composite have been visited.
    fn leave_composite(&mut self, _path: &ScopePath, _composite: &Composite) {}

    /// Called for every leaf; `path` is the scope that owns it.
    fn visit_leaf(&mut self, _path: &ScopePath, _component: &Component) {}
}

/// Recursive counts over a composite and everything nested in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub leaves: usize,
    /// Nested composites, not counting the root.
    pub composites: usize,
    pub connections: usize,
    pub exposures: usize,
    /// Nesting depth; a composite with only leaves has depth 1.
    pub depth: usize,
}

impl Composite {
    /// Walk this composite depth-first, nodes in declared order.
    pub fn walk<V: Visitor>(&self, visitor: &mut V) {
        visitor.enter_composite(&self.path, self);
        for node in &self.nodes {
            match node {
                Node::Leaf(component) => visitor.visit_leaf(&self.path, component),
                Node::Composite(inner) => inner.walk(visitor),
            }
        }
        visitor.leave_composite(&self.path, self);
    }

    pub fn summary(&self) -> Summary {
        let mut collector = SummaryCollector {
            summary: Summary::default(),
            root_depth: self.path.depth(),
        };
        self.walk(&mut collector);
        collector.summary
    }
}

struct SummaryCollector {
    summary: Summary,
    root_depth: usize,
}

impl Visitor for SummaryCollector {
    fn enter_composite(&mut self, path: &ScopePath, composite: &Composite) {
        let depth = path.depth().saturating_sub(self.root_depth) + 1;
        if depth > 1 {
            self.summary.composites += 1;
        }
        self.summary.depth = self.summary.depth.max(depth);
        self.summary.connections += composite.connections().len();
        self.summary.exposures += composite.exposures().len();
    }

    fn visit_leaf(&mut self, _path: &ScopePath, _component: &Component) {
        self.summary.leaves += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CompositeBuilder;
    use crate::graph::{Element, Endpoint, PortArity, PortDirection, PortSpec};

    const ONE_PORT: &[PortSpec] = &[PortSpec::new("p", PortDirection::In, PortArity::Single)];
    const JUNCTION: &[PortSpec] = &[PortSpec::new("p", PortDirection::None, PortArity::Many)];

    fn nested() -> Composite {
        let root = ScopePath::root("Top");
        let mut inner = CompositeBuilder::new("Block", root.child("B"));
        let r = inner
            .add_node(Node::Leaf(Component::new("R", "R", vec![], ONE_PORT)))
            .unwrap();
        let port = inner.node(r).unwrap().default_port().unwrap();
        inner.expose("p", Endpoint::new(r, port)).unwrap();
        let inner = inner.with_instance_name("B").build().unwrap();

        let mut top = CompositeBuilder::new("Top", root);
        let b = top.add_node(Node::from(inner)).unwrap();
        let j = top
            .add_node(Node::Leaf(Component::new("J", "0", vec![], JUNCTION)))
            .unwrap();
        let bp = top.node(b).unwrap().default_port().unwrap();
        let jp = top.node(j).unwrap().default_port().unwrap();
        top.connect(vec![Endpoint::new(b, bp), Endpoint::new(j, jp)])
            .unwrap();
        top.build().unwrap()
    }

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        fn enter_composite(&mut self, path: &ScopePath, _composite: &Composite) {
            self.0.push(format!("enter {path}"));
        }

        fn leave_composite(&mut self, path: &ScopePath, _composite: &Composite) {
            self.0.push(format!("leave {path}"));
        }

        fn visit_leaf(&mut self, path: &ScopePath, component: &Component) {
            self.0.push(path.qualify(&component.name));
        }
    }

    #[test]
    fn walk_is_depth_first_in_declared_order() {
        let mut trace = Trace::default();
        nested().walk(&mut trace);
        assert_eq!(
            trace.0,
            ["enter Top", "enter Top/B", "Top/B/R", "leave Top/B", "Top/J", "leave Top"]
        );
    }

    #[test]
    fn summary_counts_recursively() {
        let summary = nested().summary();
        assert_eq!(
            summary,
            Summary {
                leaves: 2,
                composites: 1,
                connections: 1,
                exposures: 1,
                depth: 2,
            }
        );
    }
}
