//! Core data structures of a built composite.

use std::collections::HashMap;

use bg_core::{ConnectionId, Id, NodeId, ParamValue, PortId, ScopePath};

/// Power direction of a port, seen from the component that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Power flows into the component (dissipative and storage elements).
    In,
    /// Power flows out of the component (sources).
    Out,
    /// No preferred direction (junctions, source-sensors).
    None,
}

impl PortDirection {
    pub fn label(self) -> &'static str {
        match self {
            PortDirection::In => "in",
            PortDirection::Out => "out",
            PortDirection::None => "none",
        }
    }
}

/// How many connections a port accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortArity {
    /// Point-to-point: at most one connection.
    Single,
    /// Junction-capable: any number of connections.
    Many,
    /// Boundary of a composite: one connection inside the scope, plus one from outside
    /// once the port is exposed.
    Boundary,
}

impl PortArity {
    pub fn label(self) -> &'static str {
        match self {
            PortArity::Single => "single",
            PortArity::Many => "many",
            PortArity::Boundary => "boundary",
        }
    }

    /// Arity of the face port created by exposing a port of this arity.
    pub fn exposed(self) -> PortArity {
        match self {
            PortArity::Boundary => PortArity::Single,
            other => other,
        }
    }
}

/// Static description of a port, as listed in a component kind's port table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub name: &'static str,
    pub direction: PortDirection,
    pub arity: PortArity,
}

impl PortSpec {
    pub const fn new(name: &'static str, direction: PortDirection, arity: PortArity) -> Self {
        Self {
            name,
            direction,
            arity,
        }
    }
}

/// A named connection point. Owned by exactly one component or composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub direction: PortDirection,
    pub arity: PortArity,
}

/// A port of a specific node inside one composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub node: NodeId,
    pub port: PortId,
}

impl Endpoint {
    pub fn new(node: NodeId, port: PortId) -> Self {
        Self { node, port }
    }
}

/// An edge joining two or more ports of the same composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    /// Endpoints in declared order.
    pub endpoints: Vec<Endpoint>,
    /// True when at least one endpoint has a power direction, i.e. endpoint order carries meaning.
    pub ordered: bool,
}

/// An internal port made visible on the composite's face under `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    pub alias: String,
    pub target: Endpoint,
    /// The face port created for this alias.
    pub port: PortId,
}

/// The port-table contract shared by leaves and composites.
pub trait Element {
    fn name(&self) -> &str;

    fn ports(&self) -> &[Port];

    /// Port used when a reference does not name one.
    fn default_port(&self) -> Option<PortId>;

    fn port(&self, id: PortId) -> Option<&Port> {
        self.ports().get(id.slot())
    }

    fn port_named(&self, name: &str) -> Option<&Port> {
        self.ports().iter().find(|p| p.name == name)
    }
}

/// A leaf component instance: a typed element with resolved parameters and a fixed port table.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    /// Canonical type tag of the component kind.
    pub kind: String,
    pub params: Vec<(String, ParamValue)>,
    ports: Vec<Port>,
    default_port: Option<PortId>,
}

impl Component {
    /// Create a component with ports taken from a port table.
    ///
    /// A component with exactly one port defaults to it; otherwise there is no default
    /// until `with_default_port` names one.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        params: Vec<(String, ParamValue)>,
        ports: &[PortSpec],
    ) -> Self {
        let ports: Vec<Port> = ports
            .iter()
            .zip(0_u32..)
            .filter_map(|(spec, index)| {
                Some(Port {
                    id: Id::try_from_index(index)?,
                    name: spec.name.to_string(),
                    direction: spec.direction,
                    arity: spec.arity,
                })
            })
            .collect();
        let default_port = if ports.len() == 1 {
            ports.first().map(|p| p.id)
        } else {
            None
        };
        Self {
            name: name.into(),
            kind: kind.into(),
            params,
            ports,
            default_port,
        }
    }

    /// Use the named port as the default. Unknown names leave the default unchanged.
    pub fn with_default_port(mut self, port: &str) -> Self {
        if let Some(id) = self.port_named(port).map(|p| p.id) {
            self.default_port = Some(id);
        }
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

impl Element for Component {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &[Port] {
        &self.ports
    }

    fn default_port(&self) -> Option<PortId> {
        self.default_port
    }
}

/// A fully wired subgraph that behaves as a single element through its exposed ports.
///
/// Built once by `CompositeBuilder::build`; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// Instance name in the enclosing scope (the model name for a root composite).
    pub(crate) name: String,
    /// Name of the spec this composite was built from.
    pub(crate) model: String,
    pub(crate) path: ScopePath,
    pub(crate) nodes: Vec<Node>,
    pub(crate) names: HashMap<String, NodeId>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) exposures: Vec<Exposure>,
    /// Face ports, one per exposure, in exposure order.
    pub(crate) ports: Vec<Port>,
}

impl Composite {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn path(&self) -> &ScopePath {
        &self.path
    }

    /// All nodes in declared order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.node_id(name).and_then(|id| self.node(id))
    }

    /// All connections in declared order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// All exposures in declared order.
    pub fn exposures(&self) -> &[Exposure] {
        &self.exposures
    }

    pub fn exposure(&self, alias: &str) -> Option<&Exposure> {
        self.exposures.iter().find(|e| e.alias == alias)
    }

    /// Number of connections touching an endpoint.
    pub fn connection_count(&self, endpoint: Endpoint) -> usize {
        self.connections
            .iter()
            .map(|c| c.endpoints.iter().filter(|e| **e == endpoint).count())
            .sum()
    }

    /// Human-readable `node.port` label for an endpoint of this composite.
    pub fn describe(&self, endpoint: Endpoint) -> String {
        let node = self.node(endpoint.node);
        let node_name = node.map_or("?", |n| n.name());
        let port_name = node
            .and_then(|n| n.port(endpoint.port))
            .map_or("?", |p| p.name.as_str());
        format!("{node_name}.{port_name}")
    }
}

impl Element for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// A composite with exactly one exposed alias defaults to it.
    fn default_port(&self) -> Option<PortId> {
        if self.ports.len() == 1 {
            self.ports.first().map(|p| p.id)
        } else {
            None
        }
    }
}

/// A graph node: either a leaf component or an embedded composite.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Component),
    Composite(Box<Composite>),
}

impl Node {
    /// Type tag for leaves, model name for composites.
    pub fn kind_label(&self) -> &str {
        match self {
            Node::Leaf(c) => &c.kind,
            Node::Composite(c) => &c.model,
        }
    }

    pub fn as_leaf(&self) -> Option<&Component> {
        match self {
            Node::Leaf(c) => Some(c),
            Node::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Node::Leaf(_) => None,
            Node::Composite(c) => Some(c),
        }
    }

    fn element(&self) -> &dyn Element {
        match self {
            Node::Leaf(c) => c,
            Node::Composite(c) => c.as_ref(),
        }
    }
}

impl From<Component> for Node {
    fn from(c: Component) -> Self {
        Node::Leaf(c)
    }
}

impl From<Composite> for Node {
    fn from(c: Composite) -> Self {
        Node::Composite(Box::new(c))
    }
}

impl Element for Node {
    fn name(&self) -> &str {
        self.element().name()
    }

    fn ports(&self) -> &[Port] {
        self.element().ports()
    }

    fn default_port(&self) -> Option<PortId> {
        self.element().default_port()
    }
}
