//! Text rendering of built composites and the component catalog.

use std::fmt::Write;

use bg_components::ComponentRegistry;
use bg_core::{ParamValue, ScopePath};
use bg_graph::{Component, Composite, Element, FlatModel, Port, PortArity, Visitor};
use serde::Serialize;

/// Machine-readable result of a successful build.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub model: String,
    pub leaves: usize,
    pub composites: usize,
    pub connections: usize,
    pub exposures: usize,
    pub depth: usize,
    pub ports: Vec<String>,
}

impl BuildReport {
    pub fn new(composite: &Composite) -> Self {
        let summary = composite.summary();
        Self {
            model: composite.model().to_string(),
            leaves: summary.leaves,
            composites: summary.composites,
            connections: summary.connections,
            exposures: summary.exposures,
            depth: summary.depth,
            ports: composite.ports().iter().map(|p| p.name.clone()).collect(),
        }
    }

    pub fn to_text(&self) -> String {
        format!(
            "{}: {} leaves, {} nested composites, {} connections, {} exposures (depth {}), ports [{}]",
            self.model,
            self.leaves,
            self.composites,
            self.connections,
            self.exposures,
            self.depth,
            self.ports.join(", ")
        )
    }
}

pub fn tree(composite: &Composite) -> String {
    let mut printer = TreePrinter {
        out: String::new(),
        root_depth: composite.path().depth(),
    };
    composite.walk(&mut printer);
    printer.out
}

struct TreePrinter {
    out: String,
    root_depth: usize,
}

impl TreePrinter {
    fn indent(&self, path: &ScopePath) -> String {
        "  ".repeat(path.depth().saturating_sub(self.root_depth))
    }
}

impl Visitor for TreePrinter {
    fn enter_composite(&mut self, path: &ScopePath, composite: &Composite) {
        let indent = self.indent(path);
        let _ = writeln!(
            self.out,
            "{indent}{} <{}> ports: {}",
            composite.name(),
            composite.model(),
            ports(composite.ports())
        );
    }

    fn leave_composite(&mut self, path: &ScopePath, composite: &Composite) {
        let indent = self.indent(path);
        for connection in composite.connections() {
            let sep = if connection.ordered { " -> " } else { " -- " };
            let ends: Vec<String> = connection
                .endpoints
                .iter()
                .map(|e| composite.describe(*e))
                .collect();
            let _ = writeln!(self.out, "{indent}  bond {}", ends.join(sep));
        }
        for exposure in composite.exposures() {
            let _ = writeln!(
                self.out,
                "{indent}  expose {} as {}",
                composite.describe(exposure.target),
                exposure.alias
            );
        }
    }

    fn visit_leaf(&mut self, path: &ScopePath, component: &Component) {
        let indent = self.indent(path);
        let _ = writeln!(
            self.out,
            "{indent}  {} [{}]{} ports: {}",
            component.name,
            component.kind,
            params(&component.params),
            ports(component.ports())
        );
    }
}

pub fn flat(model: &FlatModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "leaves:");
    for leaf in &model.leaves {
        let _ = writeln!(out, "  {} [{}]{}", leaf.path, leaf.kind, params(&leaf.params));
    }
    let _ = writeln!(out, "bonds:");
    for bond in &model.bonds {
        let sep = if bond.ordered { " -> " } else { " -- " };
        let ends: Vec<String> = bond.endpoints.iter().map(|p| model.describe(p)).collect();
        let _ = writeln!(out, "  {}", ends.join(sep));
    }
    if !model.external.is_empty() {
        let _ = writeln!(out, "external:");
        for (alias, port) in &model.external {
            let _ = writeln!(out, "  {alias} = {}", model.describe(port));
        }
    }
    out
}

pub fn kinds(registry: &ComponentRegistry) -> String {
    let mut out = String::new();
    for kind in registry.kinds() {
        let tags: Vec<&str> = std::iter::once(kind.tag())
            .chain(kind.aliases().iter().copied())
            .filter(|t| registry.contains(t))
            .collect();
        let params: Vec<String> = kind
            .params()
            .iter()
            .map(|p| match p.alias {
                Some(alias) => format!("{}|{alias}", p.name),
                None => p.name.to_string(),
            })
            .collect();
        let port_list: Vec<String> = kind
            .ports()
            .iter()
            .map(|p| match p.arity {
                PortArity::Single => format!("{}({})", p.name, p.direction.label()),
                arity => format!("{}({}, {})", p.name, p.direction.label(), arity.label()),
            })
            .collect();
        let role = if kind.is_junction() {
            "junction"
        } else if kind.is_directional() {
            "directed"
        } else {
            "undirected"
        };
        let _ = writeln!(
            out,
            "{:<28} {:<40} {:<10} ports: {:<32} params: {}",
            tags.join(", "),
            kind.description(),
            role,
            port_list.join(" "),
            if params.is_empty() { "-".to_string() } else { params.join(" ") }
        );
    }
    out
}

fn ports(ports: &[Port]) -> String {
    if ports.is_empty() {
        return "-".to_string();
    }
    ports
        .iter()
        .map(|p| format!("{}({})", p.name, p.direction.label()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn params(params: &[(String, ParamValue)]) -> String {
    params.iter().map(|(k, v)| format!(" {k}={v}")).collect()
}
