//! Build options.

use serde::{Deserialize, Serialize};

/// What to do with components that no connection or exposure refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationPolicy {
    Allow,
    /// Log a warning per isolated component.
    #[default]
    Warn,
    /// Fail with `ComposeError::IsolatedComponent`.
    Deny,
}

impl IsolationPolicy {
    pub fn label(self) -> &'static str {
        match self {
            IsolationPolicy::Allow => "allow",
            IsolationPolicy::Warn => "warn",
            IsolationPolicy::Deny => "deny",
        }
    }
}

impl std::str::FromStr for IsolationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(IsolationPolicy::Allow),
            "warn" => Ok(IsolationPolicy::Warn),
            "deny" => Ok(IsolationPolicy::Deny),
            other => Err(format!(
                "unknown isolation policy '{other}' (expected allow, warn or deny)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    pub isolated: IsolationPolicy,
}

impl ComposeOptions {
    pub fn with_isolation(mut self, policy: IsolationPolicy) -> Self {
        self.isolated = policy;
        self
    }
}
