//! Schema validation: document tree -> typed specs.
//!
//! Every failure is a `SchemaError` whose path locates the first offending value,
//! e.g. `$.components.RCBlock.connections[1][0]`. Nothing is coerced or dropped.

use std::collections::HashSet;

use bg_core::{ParamValue, Reference, validate_name};

use crate::raw::RawValue;
use crate::schema::{ComponentSpec, CompositeSpec, ConnectionSpec, ElementSpec, ExposureSpec};

/// Malformed input, located by a path into the document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Schema error at {path}: {message}")]
pub struct SchemaError {
    pub path: String,
    pub message: String,
}

type SchemaResult<T> = Result<T, SchemaError>;

const COMPOSITE_FIELDS: &[&str] = &[
    "name",
    "params",
    "components",
    "connections",
    "exposed_ports",
    "definitions",
];
const LEAF_FIELDS: &[&str] = &["name", "type", "params"];

/// Position in the document, rendered JSONPath-style.
#[derive(Clone)]
struct Path(String);

impl Path {
    fn root() -> Self {
        Path("$".to_string())
    }

    fn key(&self, key: &str) -> Self {
        Path(format!("{}.{}", self.0, key))
    }

    fn index(&self, index: usize) -> Self {
        Path(format!("{}[{}]", self.0, index))
    }

    fn error(&self, message: impl Into<String>) -> SchemaError {
        SchemaError {
            path: self.0.clone(),
            message: message.into(),
        }
    }
}

/// Validate a document tree and build the root composite spec.
pub fn parse_value(raw: &RawValue) -> SchemaResult<CompositeSpec> {
    parse_composite(raw, &Path::root(), None)
}

fn object<'a>(raw: &'a RawValue, path: &Path) -> SchemaResult<&'a [(String, RawValue)]> {
    raw.as_object()
        .ok_or_else(|| path.error(format!("expected an object, found {}", raw.type_name())))
}

fn string<'a>(raw: &'a RawValue, path: &Path) -> SchemaResult<&'a str> {
    raw.as_str()
        .ok_or_else(|| path.error(format!("expected a string, found {}", raw.type_name())))
}

fn parse_name(raw: &RawValue, path: &Path) -> SchemaResult<String> {
    let s = string(raw, path)?;
    validate_name(s).map_err(|e| path.error(e.to_string()))?;
    Ok(s.to_string())
}

fn check_fields(entries: &[(String, RawValue)], allowed: &[&str], path: &Path) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for (key, _) in entries {
        if !allowed.contains(&key.as_str()) {
            return Err(path.key(key).error(format!(
                "unknown field (expected one of {})",
                allowed.join(", ")
            )));
        }
        if !seen.insert(key.as_str()) {
            return Err(path.key(key).error("duplicate field"));
        }
    }
    Ok(())
}

fn field<'a>(entries: &'a [(String, RawValue)], key: &str) -> Option<&'a RawValue> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// `default_name` is the entry key for nested composites and `None` for the root,
/// whose `name` is required.
fn parse_composite(
    raw: &RawValue,
    path: &Path,
    default_name: Option<&str>,
) -> SchemaResult<CompositeSpec> {
    let entries = object(raw, path)?;
    check_fields(entries, COMPOSITE_FIELDS, path)?;

    let name = match (field(entries, "name"), default_name) {
        (Some(v), _) => parse_name(v, &path.key("name"))?,
        (None, Some(d)) => d.to_string(),
        (None, None) => return Err(path.error("missing required field 'name'")),
    };

    let params = match field(entries, "params") {
        Some(v) => parse_params(v, &path.key("params"))?,
        None => Vec::new(),
    };
    let components = match field(entries, "components") {
        Some(v) => parse_components(v, &path.key("components"))?,
        None => Vec::new(),
    };
    let connections = match field(entries, "connections") {
        Some(v) => parse_connections(v, &path.key("connections"))?,
        None => Vec::new(),
    };
    let exposed_ports = match field(entries, "exposed_ports") {
        Some(v) => parse_exposures(v, &path.key("exposed_ports"))?,
        None => Vec::new(),
    };
    let definitions = match field(entries, "definitions") {
        Some(v) => parse_definitions(v, &path.key("definitions"))?,
        None => Vec::new(),
    };

    Ok(CompositeSpec {
        name,
        params,
        components,
        connections,
        exposed_ports,
        definitions,
    })
}

/// Mapping form (`name -> entry`) or list form (entries carrying `name`).
fn parse_components(raw: &RawValue, path: &Path) -> SchemaResult<Vec<(String, ElementSpec)>> {
    match raw {
        RawValue::Object(entries) => entries
            .iter()
            .map(|(key, entry)| {
                let entry_path = path.key(key);
                validate_name(key).map_err(|e| entry_path.error(e.to_string()))?;
                if let Some(v) = entry.get("name") {
                    let declared = string(v, &entry_path.key("name"))?;
                    if declared != key.as_str() && entry.get("type").is_some() {
                        return Err(entry_path
                            .key("name")
                            .error(format!("'{declared}' does not match the entry key '{key}'")));
                    }
                }
                Ok((key.clone(), parse_element(entry, &entry_path, key)?))
            })
            .collect(),
        RawValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let entry_path = path.index(i);
                let raw_name = entry
                    .get("name")
                    .ok_or_else(|| entry_path.error("missing required field 'name'"))?;
                let key = parse_name(raw_name, &entry_path.key("name"))?;
                let element = parse_element(entry, &entry_path, &key)?;
                Ok((key, element))
            })
            .collect(),
        other => Err(path.error(format!(
            "expected an object or an array, found {}",
            other.type_name()
        ))),
    }
}

fn parse_element(raw: &RawValue, path: &Path, key: &str) -> SchemaResult<ElementSpec> {
    let entries = object(raw, path)?;
    match (field(entries, "type"), field(entries, "components")) {
        (Some(_), Some(_)) => Err(path.error("an entry cannot have both 'type' and 'components'")),
        (Some(tag), None) => {
            check_fields(entries, LEAF_FIELDS, path)?;
            let type_tag = string(tag, &path.key("type"))?;
            if type_tag.is_empty() {
                return Err(path.key("type").error("must not be empty"));
            }
            let params = match field(entries, "params") {
                Some(v) => parse_params(v, &path.key("params"))?,
                None => Vec::new(),
            };
            Ok(ElementSpec::Leaf(ComponentSpec {
                type_tag: type_tag.to_string(),
                params,
            }))
        }
        (None, Some(_)) => Ok(ElementSpec::Composite(parse_composite(raw, path, Some(key))?)),
        (None, None) => Err(path.error("expected a 'type' (leaf) or 'components' (nested composite)")),
    }
}

fn parse_params(raw: &RawValue, path: &Path) -> SchemaResult<Vec<(String, ParamValue)>> {
    let entries = object(raw, path)?;
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|(key, value)| {
            let value_path = path.key(key);
            if !seen.insert(key.as_str()) {
                return Err(value_path.error("duplicate parameter"));
            }
            let value = match value {
                RawValue::Number(v) => ParamValue::Number(*v),
                RawValue::String(s) => ParamValue::Symbol(s.clone()),
                other => {
                    return Err(value_path.error(format!(
                        "expected a number or a string, found {}",
                        other.type_name()
                    )));
                }
            };
            Ok((key.clone(), value))
        })
        .collect()
}

fn parse_connections(raw: &RawValue, path: &Path) -> SchemaResult<Vec<ConnectionSpec>> {
    let RawValue::Array(items) = raw else {
        return Err(path.error(format!("expected an array, found {}", raw.type_name())));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item_path = path.index(i);
            let RawValue::Array(refs) = item else {
                return Err(item_path.error(format!(
                    "expected an array of references, found {}",
                    item.type_name()
                )));
            };
            if refs.len() < 2 {
                return Err(item_path.error(format!(
                    "a connection needs at least 2 references, found {}",
                    refs.len()
                )));
            }
            let endpoints = refs
                .iter()
                .enumerate()
                .map(|(j, r)| reference(r, &item_path.index(j)))
                .collect::<SchemaResult<Vec<_>>>()?;
            Ok(ConnectionSpec { endpoints })
        })
        .collect()
}

fn reference(raw: &RawValue, path: &Path) -> SchemaResult<Reference> {
    let s = string(raw, path)?;
    Reference::parse(s).map_err(|e| path.error(e.to_string()))
}

fn parse_exposures(raw: &RawValue, path: &Path) -> SchemaResult<Vec<ExposureSpec>> {
    let entries = object(raw, path)?;
    let mut keys = HashSet::new();
    let mut aliases = HashSet::new();
    entries
        .iter()
        .map(|(key, value)| {
            let entry_path = path.key(key);
            if !keys.insert(key.as_str()) {
                return Err(entry_path.error("duplicate reference"));
            }
            let reference =
                Reference::parse(key).map_err(|e| entry_path.error(e.to_string()))?;
            let alias = parse_name(value, &entry_path)?;
            if !aliases.insert(alias.clone()) {
                return Err(entry_path.error(format!("alias '{alias}' is already used")));
            }
            Ok(ExposureSpec { reference, alias })
        })
        .collect()
}

fn parse_definitions(raw: &RawValue, path: &Path) -> SchemaResult<Vec<(String, CompositeSpec)>> {
    let entries = object(raw, path)?;
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|(key, value)| {
            let entry_path = path.key(key);
            validate_name(key).map_err(|e| entry_path.error(e.to_string()))?;
            if !seen.insert(key.as_str()) {
                return Err(entry_path.error("duplicate definition"));
            }
            Ok((key.clone(), parse_composite(value, &entry_path, Some(key))?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SchemaResult<CompositeSpec> {
        let raw: RawValue = serde_json::from_str(text).unwrap();
        parse_value(&raw)
    }

    fn error_path(text: &str) -> String {
        parse(text).unwrap_err().path
    }

    #[test]
    fn parses_rc_scenario() {
        let spec = parse(
            r#"{"name":"RC","components":{"R":{"type":"R","params":{"value":1.0}},
                "C":{"type":"C","params":{"value":1.0}},"J":{"type":"0"}},
                "connections":[["R","J"],["C","J"]],"exposed_ports":{}}"#,
        )
        .unwrap();
        assert_eq!(spec.name, "RC");
        assert_eq!(spec.components.len(), 3);
        assert_eq!(spec.connections.len(), 2);
        assert!(spec.exposed_ports.is_empty());
        assert_eq!(
            spec.connections[1].endpoints,
            vec![Reference::component("C"), Reference::component("J")]
        );
    }

    #[test]
    fn list_form_components() {
        let spec = parse(
            r#"{"name":"ThrottleValve","components":[
                {"type":"R","name":"FlowR","params":{"value":0.6}},
                {"type":"0","name":"Junction"}],
                "connections":[["FlowR","Junction"]],
                "exposed_ports":{"FlowR":"in"}}"#,
        )
        .unwrap();
        let names: Vec<&str> = spec.components.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["FlowR", "Junction"]);
        assert_eq!(spec.exposed_ports[0].alias, "in");
    }

    #[test]
    fn nested_composite_defaults_name_to_key() {
        let spec = parse(
            r#"{"name":"Main","components":{"RCBlock":{"components":{"SS":{"type":"SS"}},
                "exposed_ports":{"SS":"P"}}}}"#,
        )
        .unwrap();
        match spec.component("RCBlock") {
            Some(ElementSpec::Composite(inner)) => {
                assert_eq!(inner.name, "RCBlock");
                assert_eq!(inner.exposed_ports.len(), 1);
            }
            other => panic!("expected nested composite, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_component_names_are_preserved() {
        let spec = parse(r#"{"name":"M","components":{"R":{"type":"R"},"R":{"type":"C"}}}"#)
            .unwrap();
        assert_eq!(spec.components.len(), 2);
    }

    #[test]
    fn errors_are_path_qualified() {
        assert_eq!(error_path(r#"{"components":{}}"#), "$");
        assert_eq!(error_path(r#"{"name":5}"#), "$.name");
        assert_eq!(
            error_path(r#"{"name":"M","connections":[["A","B"],["A"]]}"#),
            "$.connections[1]"
        );
        assert_eq!(
            error_path(r#"{"name":"M","connections":[["A","B.c.d"]]}"#),
            "$.connections[0][1]"
        );
        assert_eq!(
            error_path(r#"{"name":"M","components":{"B":{"components":{"X":{}}}}}"#),
            "$.components.B.components.X"
        );
        assert_eq!(
            error_path(r#"{"name":"M","components":{"R":{"type":"R","params":{"v":true}}}}"#),
            "$.components.R.params.v"
        );
        assert_eq!(error_path(r#"{"name":"M","extra":1}"#), "$.extra");
    }

    #[test]
    fn duplicate_alias_values_are_rejected() {
        let err = parse(r#"{"name":"M","exposed_ports":{"A":"x","B":"x"}}"#).unwrap_err();
        assert_eq!(err.path, "$.exposed_ports.B");
        assert!(err.message.contains("already used"));
    }

    #[test]
    fn type_and_components_together_are_rejected() {
        let err = parse(r#"{"name":"M","components":{"X":{"type":"R","components":{}}}}"#)
            .unwrap_err();
        assert_eq!(err.path, "$.components.X");
    }

    #[test]
    fn dotted_names_are_rejected() {
        let err = parse(r#"{"name":"M","components":{"R.1":{"type":"R"}}}"#).unwrap_err();
        assert_eq!(err.path, "$.components.R.1");
    }

    #[test]
    fn definitions_are_parsed() {
        let spec = parse(
            r#"{"name":"M","definitions":{"Block":{"components":{"J":{"type":"0"}},
                "exposed_ports":{"J":"p"}}},
                "components":{"B1":{"type":"Block"},"B2":{"type":"Block"}}}"#,
        )
        .unwrap();
        assert_eq!(spec.definitions.len(), 1);
        assert_eq!(spec.definition("Block").unwrap().name, "Block");
    }

    #[test]
    fn definition_params_are_parsed() {
        let spec = parse(
            r#"{"name":"M","definitions":{"Valve":{"params":{"r":0.6,"leak":"g"},
                "components":{"R":{"type":"R","params":{"value":"r"}}}}},
                "components":{"V1":{"type":"Valve","params":{"r":0.9}}}}"#,
        )
        .unwrap();
        let valve = spec.definition("Valve").unwrap();
        assert_eq!(
            valve.params,
            vec![
                ("r".to_string(), ParamValue::Number(0.6)),
                ("leak".to_string(), ParamValue::Symbol("g".into())),
            ]
        );
        assert_eq!(
            error_path(r#"{"name":"M","params":{"r":[1]}}"#),
            "$.params.r"
        );
    }
}
