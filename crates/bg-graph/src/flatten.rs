//! Flattening for equation assembly.
//!
//! Collapses the composite hierarchy into a flat list of leaves with fully qualified
//! paths, and bonds whose endpoints are followed through exposure aliases down to
//! leaf ports. Leaf indices are contiguous (0..N) in depth-first declared order.
//!
//! An exposed boundary port (a source-sensor) appears in two bonds: the one declared
//! inside its composite and the one attached to the face port outside. Every other
//! leaf port appears in at most one bond unless it is a junction.

use bg_core::ParamValue;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Composite, Element, Endpoint, Node};

/// A leaf component with its fully qualified path (`RC/RCBlock/R1`).
#[derive(Debug, Clone, PartialEq)]
pub struct FlatLeaf {
    pub path: String,
    pub kind: String,
    pub params: Vec<(String, ParamValue)>,
}

/// A port of a flat leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlatPort {
    /// Index into `FlatModel::leaves`.
    pub leaf: usize,
    pub port: String,
}

/// A connection with every endpoint resolved to a leaf port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatBond {
    pub endpoints: Vec<FlatPort>,
    pub ordered: bool,
    /// Scope in which the connection was declared.
    pub scope: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatModel {
    pub leaves: Vec<FlatLeaf>,
    pub bonds: Vec<FlatBond>,
    /// Exposed ports of the root, `(alias, leaf port)`.
    pub external: Vec<(String, FlatPort)>,
}

impl FlatModel {
    pub fn leaf_index(&self, path: &str) -> Option<usize> {
        self.leaves.iter().position(|l| l.path == path)
    }

    /// `path.port` label of a flat port.
    pub fn describe(&self, port: &FlatPort) -> String {
        match self.leaves.get(port.leaf) {
            Some(leaf) => format!("{}.{}", leaf.path, port.port),
            None => format!("?.{}", port.port),
        }
    }
}

/// Flatten a composite and everything nested in it.
pub fn flatten(root: &Composite) -> GraphResult<FlatModel> {
    let mut model = FlatModel::default();
    let face = flatten_into(root, &mut model)?;
    model.external = root
        .exposures()
        .iter()
        .zip(face)
        .map(|(exposure, port)| (exposure.alias.clone(), port))
        .collect();
    Ok(model)
}

enum Slot {
    Leaf(usize),
    /// Resolved face ports of a nested composite, in exposure order.
    Face(Vec<FlatPort>),
}

/// Append the leaves and bonds of `composite`; return its face ports resolved to leaves.
fn flatten_into(composite: &Composite, model: &mut FlatModel) -> GraphResult<Vec<FlatPort>> {
    let mut slots = Vec::with_capacity(composite.nodes().len());
    for node in composite.nodes() {
        match node {
            Node::Leaf(component) => {
                model.leaves.push(FlatLeaf {
                    path: composite.path().qualify(&component.name),
                    kind: component.kind.clone(),
                    params: component.params.clone(),
                });
                slots.push(Slot::Leaf(model.leaves.len() - 1));
            }
            Node::Composite(inner) => slots.push(Slot::Face(flatten_into(inner, model)?)),
        }
    }

    let resolve = |endpoint: Endpoint| -> GraphResult<FlatPort> {
        let missing = || GraphError::UnknownEndpoint {
            scope: composite.path().clone(),
            node: endpoint.node,
            port: endpoint.port,
        };
        match slots.get(endpoint.node.slot()) {
            Some(Slot::Leaf(leaf)) => {
                let port = composite
                    .node(endpoint.node)
                    .and_then(|n| n.port(endpoint.port))
                    .ok_or_else(missing)?;
                Ok(FlatPort {
                    leaf: *leaf,
                    port: port.name.clone(),
                })
            }
            Some(Slot::Face(face)) => face.get(endpoint.port.slot()).cloned().ok_or_else(missing),
            None => Err(missing()),
        }
    };

    for connection in composite.connections() {
        let endpoints = connection
            .endpoints
            .iter()
            .map(|e| resolve(*e))
            .collect::<GraphResult<Vec<_>>>()?;
        model.bonds.push(FlatBond {
            endpoints,
            ordered: connection.ordered,
            scope: composite.path().to_string(),
        });
    }

    composite
        .exposures()
        .iter()
        .map(|e| resolve(e.target))
        .collect()
}
