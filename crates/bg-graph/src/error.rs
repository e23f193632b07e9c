//! Graph-specific error types.

use bg_core::{NodeId, PortId, ScopePath};

pub type GraphResult<T> = Result<T, GraphError>;

/// Scope-level and wiring-level errors raised while assembling a composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node name is already taken in this scope.
    DuplicateName { scope: ScopePath, name: String },

    /// An alias is already exposed by this composite.
    DuplicateAlias { scope: ScopePath, alias: String },

    /// A node name or alias cannot be used in references.
    InvalidName {
        scope: ScopePath,
        name: String,
        reason: String,
    },

    /// A point-to-point port already carries a connection.
    PortAlreadyConnected { scope: ScopePath, endpoint: String },

    /// A port is already visible on the composite's face under another alias.
    PortAlreadyExposed {
        scope: ScopePath,
        endpoint: String,
        alias: String,
    },

    /// A connection is malformed (too few endpoints, self-loop).
    InvalidConnection { scope: ScopePath, reason: String },

    /// An endpoint refers to a node or port that does not exist.
    UnknownEndpoint {
        scope: ScopePath,
        node: NodeId,
        port: PortId,
    },

    /// Structural invariant violated in an assembled composite.
    Invariant { scope: ScopePath, what: String },
}

impl GraphError {
    pub fn scope(&self) -> &ScopePath {
        match self {
            GraphError::DuplicateName { scope, .. }
            | GraphError::DuplicateAlias { scope, .. }
            | GraphError::InvalidName { scope, .. }
            | GraphError::PortAlreadyConnected { scope, .. }
            | GraphError::PortAlreadyExposed { scope, .. }
            | GraphError::InvalidConnection { scope, .. }
            | GraphError::UnknownEndpoint { scope, .. }
            | GraphError::Invariant { scope, .. } => scope,
        }
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateName { scope, name } => {
                write!(f, "Duplicate name '{}' in scope '{}'", name, scope)
            }
            GraphError::DuplicateAlias { scope, alias } => {
                write!(f, "Duplicate alias '{}' in scope '{}'", alias, scope)
            }
            GraphError::InvalidName {
                scope,
                name,
                reason,
            } => {
                write!(f, "Invalid name '{}' in scope '{}': {}", name, scope, reason)
            }
            GraphError::PortAlreadyConnected { scope, endpoint } => {
                write!(
                    f,
                    "Port '{}' in scope '{}' is already connected",
                    endpoint, scope
                )
            }
            GraphError::PortAlreadyExposed {
                scope,
                endpoint,
                alias,
            } => {
                write!(
                    f,
                    "Port '{}' in scope '{}' is already exposed as '{}'",
                    endpoint, scope, alias
                )
            }
            GraphError::InvalidConnection { scope, reason } => {
                write!(f, "Invalid connection in scope '{}': {}", scope, reason)
            }
            GraphError::UnknownEndpoint { scope, node, port } => {
                write!(
                    f,
                    "Endpoint (node {}, port {}) does not exist in scope '{}'",
                    node, port, scope
                )
            }
            GraphError::Invariant { scope, what } => {
                write!(f, "Invariant violated in scope '{}': {}", scope, what)
            }
        }
    }
}

impl std::error::Error for GraphError {}
