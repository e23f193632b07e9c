//! Symbolic endpoint references: `name` or `name.port`.

use core::fmt;
use core::str::FromStr;

use crate::{CoreError, CoreResult};

/// Check that a component name or alias can appear in a reference.
pub fn validate_name(name: &str) -> CoreResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains('.') {
        "must not contain '.'"
    } else if name.contains('/') {
        "must not contain '/'"
    } else if name.trim() != name {
        "must not have leading or trailing whitespace"
    } else {
        return Ok(());
    };
    Err(CoreError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// A reference to a component, optionally qualified by one of its ports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub component: String,
    pub port: Option<String>,
}

impl Reference {
    pub fn component(name: impl Into<String>) -> Self {
        Self {
            component: name.into(),
            port: None,
        }
    }

    pub fn port(name: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            component: name.into(),
            port: Some(port.into()),
        }
    }

    pub fn parse(raw: &str) -> CoreResult<Self> {
        let invalid = |reason| CoreError::InvalidReference {
            reference: raw.to_string(),
            reason,
        };
        let mut parts = raw.split('.');
        let component = parts.next().unwrap_or_default();
        let port = parts.next();
        if parts.next().is_some() {
            return Err(invalid("expected 'name' or 'name.port'"));
        }
        if component.is_empty() {
            return Err(invalid("component name is empty"));
        }
        if component.contains('/') || component.trim() != component {
            return Err(invalid("component name is malformed"));
        }
        match port {
            Some("") => Err(invalid("port name is empty")),
            Some(p) if p.contains('/') || p.trim() != p => Err(invalid("port name is malformed")),
            Some(p) => Ok(Self::port(component, p)),
            None => Ok(Self::component(component)),
        }
    }
}

impl FromStr for Reference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.port {
            Some(port) => write!(f, "{}.{}", self.component, port),
            None => write!(f, "{}", self.component),
        }
    }
}
