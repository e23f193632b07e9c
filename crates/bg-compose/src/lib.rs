//! bg-compose: assembles bond-graph composites from declarative specs.
//!
//! Provides:
//! - Reference resolution (`name` / `name.port`) with explicit default ports
//! - Wiring and port exposure within one isolated name scope
//! - Recursive composite building with definitions and cycle detection
//! - Parallel batch builds against a shared registry
//!
//! # Example
//!
//! ```
//! use bg_components::ComponentRegistry;
//! use bg_compose::Composer;
//!
//! let spec = bg_spec::parse_json(
//!     r#"{"name":"RC","components":{"R":{"type":"R","params":{"value":1.0}},
//!        "C":{"type":"C","params":{"value":1.0}},"J":{"type":"0"}},
//!        "connections":[["R","J"],["C","J"]],"exposed_ports":{}}"#,
//! )
//! .unwrap();
//!
//! let registry = ComponentRegistry::with_builtins();
//! let rc = Composer::new(&registry).build(&spec).unwrap();
//!
//! assert_eq!(rc.nodes().len(), 3);
//! assert_eq!(rc.connections().len(), 2);
//! ```

pub(crate) mod bindings;
pub mod builder;
pub mod cycles;
pub(crate) mod definitions;
pub mod error;
pub mod options;
pub mod resolve;

pub use builder::{Composer, build};
pub use cycles::check_cycles;
pub use error::{ComposeError, ComposeResult};
pub use options::{ComposeOptions, IsolationPolicy};
pub use resolve::{connect, expose, resolve};
