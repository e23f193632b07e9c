use core::fmt;

/// Location of a composite inside a nested spec, e.g. `RC/RCBlock`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopePath {
    segments: Vec<String>,
}

impl ScopePath {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Path of a child scope nested under this one.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Qualify a name local to this scope (`RC/RCBlock` + `R1` -> `RC/RCBlock/R1`).
    pub fn qualify(&self, name: &str) -> String {
        if self.segments.is_empty() {
            name.to_string()
        } else {
            format!("{self}/{name}")
        }
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_qualify() {
        let root = ScopePath::root("RC");
        let inner = root.child("RCBlock");
        assert_eq!(inner.to_string(), "RC/RCBlock");
        assert_eq!(inner.depth(), 2);
        assert_eq!(inner.qualify("R1"), "RC/RCBlock/R1");
        assert_eq!(ScopePath::default().qualify("R1"), "R1");
    }
}
