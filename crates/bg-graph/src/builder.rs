//! Incremental composite builder: one instance per name scope.

use std::collections::{HashMap, HashSet};

use bg_core::{ConnectionId, Id, NodeId, PortId, ScopePath, validate_name};

use crate::error::{GraphError, GraphResult};
use crate::graph::{
    Composite, Connection, Element, Endpoint, Exposure, Node, Port, PortArity, PortDirection,
};
use crate::validate;

/// Builder for assembling one composite.
///
/// Holds the scope's name table, edge list and exposure table. Use `add_node`,
/// `connect` and `expose`, then call `build()` to validate and freeze it into an
/// immutable `Composite`.
#[derive(Debug)]
pub struct CompositeBuilder {
    name: String,
    model: String,
    path: ScopePath,
    nodes: Vec<Node>,
    names: HashMap<String, NodeId>,
    connections: Vec<Connection>,
    exposures: Vec<Exposure>,
    ports: Vec<Port>,
    usage: HashMap<Endpoint, usize>,
}

impl CompositeBuilder {
    /// Create an empty scope for the model `name` located at `path`.
    pub fn new(name: impl Into<String>, path: ScopePath) -> Self {
        let name = name.into();
        Self {
            model: name.clone(),
            name,
            path,
            nodes: Vec::new(),
            names: HashMap::new(),
            connections: Vec::new(),
            exposures: Vec::new(),
            ports: Vec::new(),
            usage: HashMap::new(),
        }
    }

    /// Give the composite an instance name that differs from its model name.
    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &ScopePath {
        &self.path
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Register a node under its own name. Names are never overwritten.
    pub fn add_node(&mut self, node: Node) -> GraphResult<NodeId> {
        let name = node.name().to_string();
        validate_name(&name).map_err(|e| GraphError::InvalidName {
            scope: self.path.clone(),
            name: name.clone(),
            reason: e.to_string(),
        })?;
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateName {
                scope: self.path.clone(),
                name,
            });
        }
        let id = self.next_id(self.nodes.len(), "node table is full")?;
        self.nodes.push(node);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Join two or more ports with one connection.
    ///
    /// Point-to-point ports accept one connection, and none once exposed. Boundary ports
    /// accept one connection whether exposed or not. Junction ports accept any number.
    /// Nothing is recorded when any check fails.
    pub fn connect(&mut self, endpoints: Vec<Endpoint>) -> GraphResult<ConnectionId> {
        if endpoints.len() < 2 {
            return Err(GraphError::InvalidConnection {
                scope: self.path.clone(),
                reason: format!(
                    "a connection needs at least 2 endpoints, got {}",
                    endpoints.len()
                ),
            });
        }

        let mut seen = HashSet::new();
        let mut ordered = false;
        for &endpoint in &endpoints {
            let port = self.port(endpoint)?;
            if port.direction != PortDirection::None {
                ordered = true;
            }
            if !seen.insert(endpoint) {
                return Err(GraphError::InvalidConnection {
                    scope: self.path.clone(),
                    reason: format!("port '{}' is connected to itself", self.describe(endpoint)),
                });
            }
            let used = self.usage.get(&endpoint).copied().unwrap_or(0);
            let taken = match port.arity {
                PortArity::Single => used > 0 || self.exposure_of(endpoint).is_some(),
                PortArity::Boundary => used > 0,
                PortArity::Many => false,
            };
            if taken {
                return Err(GraphError::PortAlreadyConnected {
                    scope: self.path.clone(),
                    endpoint: self.describe(endpoint),
                });
            }
        }

        let id = self.next_id(self.connections.len(), "connection table is full")?;
        for &endpoint in &endpoints {
            *self.usage.entry(endpoint).or_insert(0) += 1;
        }
        self.connections.push(Connection {
            id,
            endpoints,
            ordered,
        });
        Ok(id)
    }

    /// Make an internal port visible on the composite's face under `alias`.
    ///
    /// The face port inherits the direction and arity of the target, and becomes the
    /// only name for it outside: a port is exposed at most once, and an exposed
    /// point-to-point port cannot also be connected inside. A boundary port keeps its
    /// inside connection and its face port takes the outside one.
    pub fn expose(&mut self, alias: impl Into<String>, target: Endpoint) -> GraphResult<PortId> {
        let alias = alias.into();
        validate_name(&alias).map_err(|e| GraphError::InvalidName {
            scope: self.path.clone(),
            name: alias.clone(),
            reason: e.to_string(),
        })?;
        if self.exposures.iter().any(|e| e.alias == alias) {
            return Err(GraphError::DuplicateAlias {
                scope: self.path.clone(),
                alias,
            });
        }
        let (direction, arity) = {
            let port = self.port(target)?;
            (port.direction, port.arity)
        };
        if let Some(existing) = self.exposure_of(target) {
            return Err(GraphError::PortAlreadyExposed {
                scope: self.path.clone(),
                endpoint: self.describe(target),
                alias: existing.alias.clone(),
            });
        }
        if arity == PortArity::Single && self.usage.get(&target).copied().unwrap_or(0) > 0 {
            return Err(GraphError::PortAlreadyConnected {
                scope: self.path.clone(),
                endpoint: self.describe(target),
            });
        }
        let id = self.next_id(self.ports.len(), "port table is full")?;
        self.ports.push(Port {
            id,
            name: alias.clone(),
            direction,
            arity: arity.exposed(),
        });
        self.exposures.push(Exposure {
            alias,
            target,
            port: id,
        });
        Ok(id)
    }

    /// Names of nodes that no connection or exposure refers to, in declared order.
    pub fn unreferenced(&self) -> Vec<&str> {
        let referenced: HashSet<NodeId> = self
            .connections
            .iter()
            .flat_map(|c| c.endpoints.iter().map(|e| e.node))
            .chain(self.exposures.iter().map(|e| e.target.node))
            .collect();
        self.nodes
            .iter()
            .zip(0_u32..)
            .filter(|(_, index)| {
                Id::try_from_index(*index).is_some_and(|id| !referenced.contains(&id))
            })
            .map(|(node, _)| node.name())
            .collect()
    }

    /// Validate and freeze into an immutable `Composite`.
    pub fn build(self) -> GraphResult<Composite> {
        validate::validate_structure(
            &self.path,
            &self.nodes,
            &self.connections,
            &self.exposures,
            &self.ports,
        )?;

        Ok(Composite {
            name: self.name,
            model: self.model,
            path: self.path,
            nodes: self.nodes,
            names: self.names,
            connections: self.connections,
            exposures: self.exposures,
            ports: self.ports,
        })
    }

    fn port(&self, endpoint: Endpoint) -> GraphResult<&Port> {
        self.node(endpoint.node)
            .and_then(|n| n.port(endpoint.port))
            .ok_or_else(|| GraphError::UnknownEndpoint {
                scope: self.path.clone(),
                node: endpoint.node,
                port: endpoint.port,
            })
    }

    fn exposure_of(&self, endpoint: Endpoint) -> Option<&Exposure> {
        self.exposures.iter().find(|e| e.target == endpoint)
    }

    fn describe(&self, endpoint: Endpoint) -> String {
        let node = self.node(endpoint.node);
        let node_name = node.map_or("?", |n| n.name());
        let port_name = node
            .and_then(|n| n.port(endpoint.port))
            .map_or("?", |p| p.name.as_str());
        format!("{node_name}.{port_name}")
    }

    fn next_id(&self, len: usize, what: &str) -> GraphResult<Id> {
        Id::from_usize(len).ok_or_else(|| GraphError::Invariant {
            scope: self.path.clone(),
            what: what.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Component, PortSpec};

    const ONE_PORT: &[PortSpec] = &[PortSpec::new("p", PortDirection::In, PortArity::Single)];
    const SOURCE: &[PortSpec] = &[PortSpec::new("p", PortDirection::Out, PortArity::Single)];
    const JUNCTION: &[PortSpec] = &[PortSpec::new("p", PortDirection::None, PortArity::Many)];
    const BOUNDARY: &[PortSpec] = &[PortSpec::new("p", PortDirection::None, PortArity::Boundary)];

    fn p0() -> PortId {
        Id::try_from_index(0).unwrap()
    }

    fn leaf(name: &str, ports: &'static [PortSpec]) -> Node {
        Node::Leaf(Component::new(name, "X", vec![], ports))
    }

    fn scope() -> CompositeBuilder {
        CompositeBuilder::new("M", ScopePath::root("M"))
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut b = scope();
        b.add_node(leaf("R", ONE_PORT)).unwrap();
        let err = b.add_node(leaf("R", JUNCTION)).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateName { ref name, .. } if name == "R"));
        assert_eq!(b.nodes().len(), 1);
        // the original entry is untouched
        let kept = b.node_id("R").and_then(|id| b.node(id)).unwrap();
        assert_eq!(kept.ports()[0].arity, PortArity::Single);
    }

    #[test]
    fn junction_accepts_many_connections() {
        let mut b = scope();
        let r = b.add_node(leaf("R", ONE_PORT)).unwrap();
        let c = b.add_node(leaf("C", ONE_PORT)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        b.connect(vec![Endpoint::new(r, p0()), Endpoint::new(j, p0())]).unwrap();
        b.connect(vec![Endpoint::new(c, p0()), Endpoint::new(j, p0())]).unwrap();
        let composite = b.build().unwrap();
        assert_eq!(composite.connections().len(), 2);
        assert_eq!(composite.connection_count(Endpoint::new(j, p0())), 2);
    }

    #[test]
    fn point_to_point_port_accepts_one_connection() {
        let mut b = scope();
        let r = b.add_node(leaf("R", ONE_PORT)).unwrap();
        let j1 = b.add_node(leaf("J1", JUNCTION)).unwrap();
        let j2 = b.add_node(leaf("J2", JUNCTION)).unwrap();
        b.connect(vec![Endpoint::new(r, p0()), Endpoint::new(j1, p0())]).unwrap();
        let err = b
            .connect(vec![Endpoint::new(r, p0()), Endpoint::new(j2, p0())])
            .unwrap_err();
        assert!(matches!(err, GraphError::PortAlreadyConnected { ref endpoint, .. } if endpoint == "R.p"));
    }

    #[test]
    fn failed_connect_records_nothing() {
        let mut b = scope();
        let r = b.add_node(leaf("R", ONE_PORT)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        b.connect(vec![Endpoint::new(r, p0()), Endpoint::new(j, p0())]).unwrap();
        let err = b.connect(vec![Endpoint::new(j, p0()), Endpoint::new(r, p0())]);
        assert!(err.is_err());
        let composite = b.build().unwrap();
        assert_eq!(composite.connection_count(Endpoint::new(j, p0())), 1);
    }

    #[test]
    fn self_loop_and_short_connections_are_invalid() {
        let mut b = scope();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        let err = b
            .connect(vec![Endpoint::new(j, p0()), Endpoint::new(j, p0())])
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidConnection { .. }));
        let err = b.connect(vec![Endpoint::new(j, p0())]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConnection { .. }));
    }

    #[test]
    fn ordered_when_any_endpoint_is_directed() {
        let mut b = scope();
        let se = b.add_node(leaf("Se", SOURCE)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        let k = b.add_node(leaf("K", JUNCTION)).unwrap();
        b.connect(vec![Endpoint::new(se, p0()), Endpoint::new(j, p0())]).unwrap();
        b.connect(vec![Endpoint::new(j, p0()), Endpoint::new(k, p0())]).unwrap();
        let composite = b.build().unwrap();
        assert!(composite.connections()[0].ordered);
        assert!(!composite.connections()[1].ordered);
    }

    #[test]
    fn expose_creates_face_ports() {
        let mut b = scope();
        let r = b.add_node(leaf("R", ONE_PORT)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        b.expose("in", Endpoint::new(r, p0())).unwrap();
        b.expose("bus", Endpoint::new(j, p0())).unwrap();
        let err = b.expose("in", Endpoint::new(j, p0())).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateAlias { ref alias, .. } if alias == "in"));

        let composite = b.build().unwrap();
        let names: Vec<&str> = composite.ports().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["in", "bus"]);
        assert_eq!(composite.ports()[1].arity, PortArity::Many);
        assert!(composite.default_port().is_none());
    }

    #[test]
    fn exposed_point_to_point_port_is_spent() {
        let mut b = scope();
        let r = b.add_node(leaf("R", ONE_PORT)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        b.expose("in", Endpoint::new(r, p0())).unwrap();
        let err = b
            .connect(vec![Endpoint::new(r, p0()), Endpoint::new(j, p0())])
            .unwrap_err();
        assert!(matches!(err, GraphError::PortAlreadyConnected { ref endpoint, .. } if endpoint == "R.p"));

        let mut b = scope();
        let r = b.add_node(leaf("R", ONE_PORT)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        b.connect(vec![Endpoint::new(r, p0()), Endpoint::new(j, p0())]).unwrap();
        let err = b.expose("in", Endpoint::new(r, p0())).unwrap_err();
        assert!(matches!(err, GraphError::PortAlreadyConnected { .. }));
        assert!(b.build().unwrap().ports().is_empty());
    }

    #[test]
    fn port_is_exposed_once() {
        let mut b = scope();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        b.expose("a", Endpoint::new(j, p0())).unwrap();
        let err = b.expose("b", Endpoint::new(j, p0())).unwrap_err();
        assert_eq!(
            err,
            GraphError::PortAlreadyExposed {
                scope: ScopePath::root("M"),
                endpoint: "J.p".into(),
                alias: "a".into(),
            }
        );
        assert_eq!(b.build().unwrap().ports().len(), 1);
    }

    #[test]
    fn boundary_port_keeps_inside_connection() {
        let mut b = scope();
        let ss = b.add_node(leaf("SS", BOUNDARY)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        let k = b.add_node(leaf("K", JUNCTION)).unwrap();
        b.connect(vec![Endpoint::new(j, p0()), Endpoint::new(ss, p0())]).unwrap();
        b.expose("P", Endpoint::new(ss, p0())).unwrap();
        let err = b
            .connect(vec![Endpoint::new(k, p0()), Endpoint::new(ss, p0())])
            .unwrap_err();
        assert!(matches!(err, GraphError::PortAlreadyConnected { .. }));

        let composite = b.build().unwrap();
        assert_eq!(composite.ports()[0].arity, PortArity::Single);
    }

    #[test]
    fn unreferenced_lists_isolated_nodes() {
        let mut b = scope();
        let r = b.add_node(leaf("R", ONE_PORT)).unwrap();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        b.add_node(leaf("Spare", ONE_PORT)).unwrap();
        let x = b.add_node(leaf("X", ONE_PORT)).unwrap();
        b.connect(vec![Endpoint::new(r, p0()), Endpoint::new(j, p0())]).unwrap();
        b.expose("x", Endpoint::new(x, p0())).unwrap();
        assert_eq!(b.unreferenced(), ["Spare"]);
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let mut b = scope();
        let j = b.add_node(leaf("J", JUNCTION)).unwrap();
        let bogus = Endpoint::new(Id::try_from_index(7).unwrap(), p0());
        let err = b.connect(vec![Endpoint::new(j, p0()), bogus]).unwrap_err();
        assert!(matches!(err, GraphError::UnknownEndpoint { .. }));
    }

    #[test]
    fn empty_scope_builds() {
        let composite = scope().build().unwrap();
        assert!(composite.nodes().is_empty());
        assert!(composite.ports().is_empty());
    }
}
