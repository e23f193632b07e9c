//! Reference resolution, wiring and exposure within one scope.
//!
//! A reference is `name` or `name.port`. The name is looked up in the scope's own
//! name table only; nested composites are reached through their exposed aliases.
//! An unqualified reference uses the element's default port and never guesses.

use bg_core::{ConnectionId, PortId, Reference};
use bg_graph::{CompositeBuilder, Element, Endpoint};

use crate::error::{ComposeError, ComposeResult};

/// Resolve a reference to a concrete node and port in `scope`.
pub fn resolve(scope: &CompositeBuilder, reference: &Reference) -> ComposeResult<Endpoint> {
    let unresolved = || ComposeError::UnresolvedReference {
        scope: scope.path().clone(),
        reference: reference.to_string(),
    };
    let id = scope.node_id(&reference.component).ok_or_else(unresolved)?;
    let node = scope.node(id).ok_or_else(unresolved)?;

    let port = match reference.port.as_deref() {
        Some(name) => node
            .port_named(name)
            .map(|p| p.id)
            .ok_or_else(|| ComposeError::UnknownPort {
                scope: scope.path().clone(),
                component: reference.component.clone(),
                port: name.to_string(),
                available: port_names(node),
            })?,
        None => match node.default_port() {
            Some(port) => port,
            None if node.ports().is_empty() => {
                return Err(ComposeError::NoPorts {
                    scope: scope.path().clone(),
                    component: reference.component.clone(),
                });
            }
            None => {
                return Err(ComposeError::AmbiguousPort {
                    scope: scope.path().clone(),
                    component: reference.component.clone(),
                    candidates: port_names(node),
                });
            }
        },
    };
    Ok(Endpoint::new(id, port))
}

/// Resolve every reference and join them with one connection.
pub fn connect(scope: &mut CompositeBuilder, refs: &[Reference]) -> ComposeResult<ConnectionId> {
    if refs.len() < 2 {
        return Err(ComposeError::InvalidConnection {
            scope: scope.path().clone(),
            reason: format!("a connection needs at least 2 references, got {}", refs.len()),
        });
    }
    let endpoints = refs
        .iter()
        .map(|r| resolve(scope, r))
        .collect::<ComposeResult<Vec<_>>>()?;
    let id = scope.connect(endpoints)?;
    tracing::debug!(
        scope = %scope.path(),
        refs = %refs.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", "),
        "connected"
    );
    Ok(id)
}

/// Publish the referenced port on the composite's face under `alias`.
pub fn expose(
    scope: &mut CompositeBuilder,
    reference: &Reference,
    alias: &str,
) -> ComposeResult<PortId> {
    let target = resolve(scope, reference)?;
    let port = scope.expose(alias, target)?;
    tracing::debug!(scope = %scope.path(), reference = %reference, alias, "exposed");
    Ok(port)
}

fn port_names(node: &impl Element) -> Vec<String> {
    node.ports().iter().map(|p| p.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bg_components::ComponentRegistry;
    use bg_core::{ParamValue, ScopePath};
    use bg_graph::Node;

    fn scope_with(components: &[(&str, &str)]) -> CompositeBuilder {
        let registry = ComponentRegistry::with_builtins();
        let mut scope = CompositeBuilder::new("M", ScopePath::root("M"));
        for (name, tag) in components {
            let params: Vec<(String, ParamValue)> = registry
                .lookup(tag)
                .unwrap()
                .params()
                .iter()
                .map(|p| (p.name.to_string(), ParamValue::Number(1.0)))
                .collect();
            let component = registry.instantiate(tag, name, &params).unwrap();
            scope.add_node(Node::Leaf(component)).unwrap();
        }
        scope
    }

    fn r(s: &str) -> Reference {
        Reference::parse(s).unwrap()
    }

    #[test]
    fn bare_name_uses_default_port() {
        let scope = scope_with(&[("R", "R")]);
        let endpoint = resolve(&scope, &r("R")).unwrap();
        assert_eq!(Some(endpoint.node), scope.node_id("R"));
        assert_eq!(resolve(&scope, &r("R.p")).unwrap(), endpoint);
    }

    #[test]
    fn unknown_name() {
        let scope = scope_with(&[("R", "R")]);
        let err = resolve(&scope, &r("C")).unwrap_err();
        assert!(
            matches!(err, ComposeError::UnresolvedReference { ref reference, .. } if reference == "C")
        );
    }

    #[test]
    fn unknown_port_lists_available() {
        let scope = scope_with(&[("TF", "TF")]);
        let err = resolve(&scope, &r("TF.tertiary")).unwrap_err();
        match err {
            ComposeError::UnknownPort { port, available, .. } => {
                assert_eq!(port, "tertiary");
                assert_eq!(available, ["primary", "secondary"]);
            }
            other => panic!("expected UnknownPort, got {other}"),
        }
    }

    #[test]
    fn two_port_without_port_is_ambiguous() {
        let scope = scope_with(&[("TF", "TF")]);
        let err = resolve(&scope, &r("TF")).unwrap_err();
        assert!(matches!(err, ComposeError::AmbiguousPort { .. }));
        assert!(resolve(&scope, &r("TF.secondary")).is_ok());
    }

    #[test]
    fn connect_needs_two_references() {
        let mut scope = scope_with(&[("R", "R")]);
        let err = connect(&mut scope, &[r("R")]).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidConnection { .. }));
    }

    #[test]
    fn point_to_point_port_connects_once() {
        let mut scope = scope_with(&[("R", "R"), ("J", "0"), ("K", "1")]);
        connect(&mut scope, &[r("R"), r("J")]).unwrap();
        let err = connect(&mut scope, &[r("R"), r("K")]).unwrap_err();
        assert!(
            matches!(err, ComposeError::PortAlreadyConnected { ref endpoint, .. } if endpoint == "R.p")
        );
        connect(&mut scope, &[r("J"), r("K")]).unwrap();
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut scope = scope_with(&[("J", "0")]);
        let err = connect(&mut scope, &[r("J"), r("J")]).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidConnection { .. }));
    }

    #[test]
    fn expose_rejects_duplicate_alias() {
        let mut scope = scope_with(&[("R", "R"), ("C", "C")]);
        expose(&mut scope, &r("R"), "P").unwrap();
        let err = expose(&mut scope, &r("C"), "P").unwrap_err();
        assert!(matches!(err, ComposeError::DuplicateAlias { ref alias, .. } if alias == "P"));
    }

    #[test]
    fn exposure_spends_point_to_point_port() {
        let mut scope = scope_with(&[("R", "R"), ("J", "0")]);
        expose(&mut scope, &r("R"), "P").unwrap();
        let err = connect(&mut scope, &[r("R"), r("J")]).unwrap_err();
        assert!(
            matches!(err, ComposeError::PortAlreadyConnected { ref endpoint, .. } if endpoint == "R.p")
        );
    }

    #[test]
    fn junction_and_boundary_ports_stay_connectable() {
        let mut scope = scope_with(&[("R", "R"), ("J", "0"), ("SS", "SS")]);
        expose(&mut scope, &r("J"), "bus").unwrap();
        expose(&mut scope, &r("SS"), "P").unwrap();
        connect(&mut scope, &[r("R"), r("J")]).unwrap();
        connect(&mut scope, &[r("J"), r("SS")]).unwrap();

        let err = expose(&mut scope, &r("SS.p"), "Q").unwrap_err();
        assert!(matches!(err, ComposeError::PortAlreadyExposed { ref alias, .. } if alias == "P"));
    }
}
