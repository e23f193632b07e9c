//! bg-core: shared foundation for the bond-graph composition engine.
//!
//! Contains:
//! - ids (compact ids for nodes, ports and connections inside one composite)
//! - path (scope paths used to locate errors in nested specs)
//! - reference (symbolic `name` / `name.port` endpoint references)
//! - param (numeric or symbolic parameter values)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod param;
pub mod path;
pub mod reference;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use param::{ParamValue, ensure_finite};
pub use path::ScopePath;
pub use reference::{Reference, validate_name};
