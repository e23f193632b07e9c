//! Error types for component instantiation.

use thiserror::Error;

/// Factory-level errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("Unknown component type '{tag}' for component '{component}'")]
    UnknownType { tag: String, component: String },

    #[error("Invalid parameter '{param}' on component '{component}': {reason}")]
    InvalidParameter {
        component: String,
        param: String,
        reason: String,
    },

    #[error("Component type '{tag}' is already registered")]
    DuplicateTag { tag: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;
