//! Canonical serialization of specs.
//!
//! Output uses the mapping form for `components` and omits empty `params` and
//! `definitions`, so parsing the output yields an equal spec.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::schema::{ComponentSpec, CompositeSpec, ConnectionSpec, ElementSpec, ExposureSpec};

/// Ordered `(key, value)` pairs written as a map.
struct Entries<'a, T>(&'a [(String, T)]);

impl<T: Serialize> Serialize for Entries<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct Connections<'a>(&'a [ConnectionSpec]);

impl Serialize for Connections<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for connection in self.0 {
            let refs: Vec<String> = connection.endpoints.iter().map(|r| r.to_string()).collect();
            seq.serialize_element(&refs)?;
        }
        seq.end()
    }
}

struct Exposures<'a>(&'a [ExposureSpec]);

impl Serialize for Exposures<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for exposure in self.0 {
            map.serialize_entry(&exposure.reference.to_string(), &exposure.alias)?;
        }
        map.end()
    }
}

impl Serialize for ComponentSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.params.is_empty() { 1 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", &self.type_tag)?;
        if !self.params.is_empty() {
            map.serialize_entry("params", &Entries(&self.params))?;
        }
        map.end()
    }
}

impl Serialize for ElementSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ElementSpec::Leaf(leaf) => leaf.serialize(serializer),
            ElementSpec::Composite(composite) => composite.serialize(serializer),
        }
    }
}

impl Serialize for CompositeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 4
            + usize::from(!self.params.is_empty())
            + usize::from(!self.definitions.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("name", &self.name)?;
        if !self.params.is_empty() {
            map.serialize_entry("params", &Entries(&self.params))?;
        }
        if !self.definitions.is_empty() {
            map.serialize_entry("definitions", &Entries(&self.definitions))?;
        }
        map.serialize_entry("components", &Entries(&self.components))?;
        map.serialize_entry("connections", &Connections(&self.connections))?;
        map.serialize_entry("exposed_ports", &Exposures(&self.exposed_ports))?;
        map.end()
    }
}
