//! bg-components: component library and factory for bond-graph models.
//!
//! Provides the standard element kinds:
//! - One-port elements (R, C, I) and sources (Se, Sf, SS)
//! - Junctions (0, 1) whose single port accepts any number of bonds
//! - Two-port elements (TF, GY) with `primary` and `secondary` ports
//!
//! Each kind carries its own port table and parameter schema. The registry maps
//! type tags to kinds and instantiates fresh, unconnected components.
//!
//! # Example
//!
//! ```
//! use bg_components::ComponentRegistry;
//! use bg_core::ParamValue;
//! use bg_graph::Element;
//!
//! let registry = ComponentRegistry::with_builtins();
//! let r = registry
//!     .instantiate("R", "R1", &[("value".to_string(), ParamValue::Number(1.0))])
//!     .unwrap();
//!
//! assert_eq!(r.kind, "R");
//! assert_eq!(r.param("r"), Some(&ParamValue::Number(1.0)));
//! assert_eq!(r.ports().len(), 1);
//! ```

pub mod error;
pub mod kind;
pub mod params;
pub mod registry;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use kind::ComponentKind;
pub use params::{ParamPolicy, ParamSpec};
pub use registry::ComponentRegistry;
