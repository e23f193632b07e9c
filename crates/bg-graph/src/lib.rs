//! bg-graph: built model layer for bond-graph composites.
//!
//! Provides:
//! - Core data structures (Port, Component, Composite, Node, Connection, Exposure)
//! - Incremental per-scope builder with uniqueness and wiring checks
//! - Read-only traversal and flattening for downstream equation assembly
//!
//! # Example
//!
//! ```
//! use bg_core::ScopePath;
//! use bg_graph::{Component, CompositeBuilder, Element, Endpoint, Node, PortArity, PortDirection, PortSpec};
//!
//! const ONE_PORT: &[PortSpec] = &[PortSpec::new("p", PortDirection::In, PortArity::Single)];
//! const JUNCTION: &[PortSpec] = &[PortSpec::new("p", PortDirection::None, PortArity::Many)];
//!
//! let mut builder = CompositeBuilder::new("RC", ScopePath::root("RC"));
//! let r = builder.add_node(Node::Leaf(Component::new("R", "R", vec![], ONE_PORT))).unwrap();
//! let j = builder.add_node(Node::Leaf(Component::new("J", "0", vec![], JUNCTION))).unwrap();
//! let r_port = builder.node(r).unwrap().default_port().unwrap();
//! let j_port = builder.node(j).unwrap().default_port().unwrap();
//! builder
//!     .connect(vec![Endpoint::new(r, r_port), Endpoint::new(j, j_port)])
//!     .unwrap();
//! let rc = builder.build().unwrap();
//!
//! assert_eq!(rc.nodes().len(), 2);
//! assert_eq!(rc.connections().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod traversal;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::CompositeBuilder;
pub use error::{GraphError, GraphResult};
pub use flatten::{FlatBond, FlatLeaf, FlatModel, FlatPort, flatten};
pub use graph::{
    Component, Composite, Connection, Element, Endpoint, Exposure, Node, Port, PortArity,
    PortDirection, PortSpec,
};
pub use traversal::{Summary, Visitor};
