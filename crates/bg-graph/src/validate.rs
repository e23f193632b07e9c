//! Structural validation of an assembled composite.

use std::collections::{HashMap, HashSet};

use bg_core::ScopePath;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Connection, Element, Endpoint, Exposure, Node, Port, PortArity};

/// Validate the composite structure: all references exist, no port carries more bonds
/// than its arity allows (an exposure spends a point-to-point port), face ports match
/// exposures.
pub(crate) fn validate_structure(
    scope: &ScopePath,
    nodes: &[Node],
    connections: &[Connection],
    exposures: &[Exposure],
    ports: &[Port],
) -> GraphResult<()> {
    let invariant = |what: String| GraphError::Invariant {
        scope: scope.clone(),
        what,
    };
    let lookup = |endpoint: Endpoint| {
        nodes
            .get(endpoint.node.slot())
            .and_then(|n| n.port(endpoint.port))
            .ok_or(GraphError::UnknownEndpoint {
                scope: scope.clone(),
                node: endpoint.node,
                port: endpoint.port,
            })
    };

    // Connection ids are contiguous and match their positions
    let mut usage: HashMap<Endpoint, usize> = HashMap::new();
    for (i, connection) in connections.iter().enumerate() {
        if connection.id.slot() != i {
            return Err(invariant(format!(
                "connection {} stored at position {}",
                connection.id, i
            )));
        }
        if connection.endpoints.len() < 2 {
            return Err(invariant(format!(
                "connection {} has {} endpoints",
                connection.id,
                connection.endpoints.len()
            )));
        }
        for &endpoint in &connection.endpoints {
            lookup(endpoint)?;
            *usage.entry(endpoint).or_insert(0) += 1;
        }
    }

    let exposed: HashSet<Endpoint> = exposures.iter().map(|e| e.target).collect();
    if exposed.len() != exposures.len() {
        return Err(invariant("a port is exposed under more than one alias".to_string()));
    }

    for (endpoint, count) in &usage {
        let port = lookup(*endpoint)?;
        let limit = match port.arity {
            PortArity::Single if exposed.contains(endpoint) => 0,
            PortArity::Single | PortArity::Boundary => 1,
            PortArity::Many => usize::MAX,
        };
        if *count > limit {
            return Err(invariant(format!(
                "port {} of node {} carries {} connections (limit {})",
                port.name, endpoint.node, count, limit
            )));
        }
    }

    // Every exposure has exactly one face port with the same name
    if exposures.len() != ports.len() {
        return Err(invariant(format!(
            "{} exposures but {} face ports",
            exposures.len(),
            ports.len()
        )));
    }
    let mut aliases = HashSet::new();
    for exposure in exposures {
        lookup(exposure.target)?;
        if !aliases.insert(exposure.alias.as_str()) {
            return Err(GraphError::DuplicateAlias {
                scope: scope.clone(),
                alias: exposure.alias.clone(),
            });
        }
        match ports.get(exposure.port.slot()) {
            Some(port) if port.name == exposure.alias && port.id == exposure.port => {}
            _ => {
                return Err(invariant(format!(
                    "alias '{}' has no matching face port",
                    exposure.alias
                )));
            }
        }
    }

    Ok(())
}
