//! Error types for composite assembly.

use bg_components::ComponentError;
use bg_core::ScopePath;
use bg_graph::GraphError;
use thiserror::Error;

/// Every way a composite build can fail.
///
/// Each variant carries the scope path of the composite in which the problem was
/// detected, so a failure deep inside a nested spec can be traced back to it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Unknown component type '{tag}' for '{component}' in scope '{scope}'")]
    UnknownType {
        scope: ScopePath,
        tag: String,
        component: String,
    },

    #[error("Invalid parameter '{param}' on '{component}' in scope '{scope}': {reason}")]
    InvalidParameter {
        scope: ScopePath,
        component: String,
        param: String,
        reason: String,
    },

    #[error("Unresolved reference '{reference}' in scope '{scope}'")]
    UnresolvedReference { scope: ScopePath, reference: String },

    #[error("'{component}' has no port '{port}' in scope '{scope}' (ports: {})", .available.join(", "))]
    UnknownPort {
        scope: ScopePath,
        component: String,
        port: String,
        available: Vec<String>,
    },

    #[error("Reference to '{component}' in scope '{scope}' is ambiguous; name one of: {}", .candidates.join(", "))]
    AmbiguousPort {
        scope: ScopePath,
        component: String,
        candidates: Vec<String>,
    },

    #[error("'{component}' in scope '{scope}' has no ports to connect")]
    NoPorts { scope: ScopePath, component: String },

    #[error("Port '{endpoint}' in scope '{scope}' is already connected")]
    PortAlreadyConnected { scope: ScopePath, endpoint: String },

    #[error("Port '{endpoint}' in scope '{scope}' is already exposed as '{alias}'")]
    PortAlreadyExposed {
        scope: ScopePath,
        endpoint: String,
        alias: String,
    },

    #[error("Invalid connection in scope '{scope}': {reason}")]
    InvalidConnection { scope: ScopePath, reason: String },

    #[error("Duplicate name '{name}' in scope '{scope}'")]
    DuplicateName { scope: ScopePath, name: String },

    #[error("Duplicate alias '{alias}' in scope '{scope}'")]
    DuplicateAlias { scope: ScopePath, alias: String },

    #[error("Invalid name '{name}' in scope '{scope}': {reason}")]
    InvalidName {
        scope: ScopePath,
        name: String,
        reason: String,
    },

    #[error("Cyclic composition in scope '{scope}': {}", .chain.join(" -> "))]
    CyclicComposition { scope: ScopePath, chain: Vec<String> },

    #[error("Component '{component}' in scope '{scope}' is not connected or exposed")]
    IsolatedComponent { scope: ScopePath, component: String },

    #[error("Internal error in scope '{scope}': {what}")]
    Internal { scope: ScopePath, what: String },
}

pub type ComposeResult<T> = Result<T, ComposeError>;

impl ComposeError {
    pub fn scope(&self) -> &ScopePath {
        match self {
            ComposeError::UnknownType { scope, .. }
            | ComposeError::InvalidParameter { scope, .. }
            | ComposeError::UnresolvedReference { scope, .. }
            | ComposeError::UnknownPort { scope, .. }
            | ComposeError::AmbiguousPort { scope, .. }
            | ComposeError::NoPorts { scope, .. }
            | ComposeError::PortAlreadyConnected { scope, .. }
            | ComposeError::PortAlreadyExposed { scope, .. }
            | ComposeError::InvalidConnection { scope, .. }
            | ComposeError::DuplicateName { scope, .. }
            | ComposeError::DuplicateAlias { scope, .. }
            | ComposeError::InvalidName { scope, .. }
            | ComposeError::CyclicComposition { scope, .. }
            | ComposeError::IsolatedComponent { scope, .. }
            | ComposeError::Internal { scope, .. } => scope,
        }
    }

    /// Attach the scope in which a factory error occurred.
    pub fn from_component(scope: &ScopePath, err: ComponentError) -> Self {
        let scope = scope.clone();
        match err {
            ComponentError::UnknownType { tag, component } => ComposeError::UnknownType {
                scope,
                tag,
                component,
            },
            ComponentError::InvalidParameter {
                component,
                param,
                reason,
            } => ComposeError::InvalidParameter {
                scope,
                component,
                param,
                reason,
            },
            ComponentError::DuplicateTag { tag } => ComposeError::DuplicateName { scope, name: tag },
        }
    }
}

impl From<GraphError> for ComposeError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::DuplicateName { scope, name } => ComposeError::DuplicateName { scope, name },
            GraphError::DuplicateAlias { scope, alias } => {
                ComposeError::DuplicateAlias { scope, alias }
            }
            GraphError::InvalidName {
                scope,
                name,
                reason,
            } => ComposeError::InvalidName {
                scope,
                name,
                reason,
            },
            GraphError::PortAlreadyConnected { scope, endpoint } => {
                ComposeError::PortAlreadyConnected { scope, endpoint }
            }
            GraphError::PortAlreadyExposed {
                scope,
                endpoint,
                alias,
            } => ComposeError::PortAlreadyExposed {
                scope,
                endpoint,
                alias,
            },
            GraphError::InvalidConnection { scope, reason } => {
                ComposeError::InvalidConnection { scope, reason }
            }
            other @ (GraphError::UnknownEndpoint { .. } | GraphError::Invariant { .. }) => {
                ComposeError::Internal {
                    scope: other.scope().clone(),
                    what: other.to_string(),
                }
            }
        }
    }
}
