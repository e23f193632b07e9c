//! The closed set of component kinds and their static tables.

use bg_graph::{PortArity, PortDirection, PortSpec};

use crate::params::ParamSpec;

const DISSIPATIVE: &[PortSpec] = &[PortSpec::new("p", PortDirection::In, PortArity::Single)];
const SOURCE: &[PortSpec] = &[PortSpec::new("p", PortDirection::Out, PortArity::Single)];
const SENSOR: &[PortSpec] = &[PortSpec::new("p", PortDirection::None, PortArity::Boundary)];
const JUNCTION: &[PortSpec] = &[PortSpec::new("p", PortDirection::None, PortArity::Many)];
const TWO_PORT: &[PortSpec] = &[
    PortSpec::new("primary", PortDirection::In, PortArity::Single),
    PortSpec::new("secondary", PortDirection::Out, PortArity::Single),
];

const RESISTANCE: &[ParamSpec] = &[ParamSpec::required("r").with_alias("value")];
const CAPACITANCE: &[ParamSpec] = &[ParamSpec::required("c").with_alias("value")];
const INDUCTANCE: &[ParamSpec] = &[ParamSpec::required("l").with_alias("value")];
const EFFORT: &[ParamSpec] = &[ParamSpec::required("e").with_alias("value")];
const FLOW: &[ParamSpec] = &[ParamSpec::required("f").with_alias("value")];
const RATIO: &[ParamSpec] = &[ParamSpec::required("r").with_alias("value")];
const NONE: &[ParamSpec] = &[];

/// A bond-graph element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    EffortSource,
    FlowSource,
    SourceSensor,
    ZeroJunction,
    OneJunction,
    Transformer,
    Gyrator,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::Inductor,
        ComponentKind::EffortSource,
        ComponentKind::FlowSource,
        ComponentKind::SourceSensor,
        ComponentKind::ZeroJunction,
        ComponentKind::OneJunction,
        ComponentKind::Transformer,
        ComponentKind::Gyrator,
    ];

    /// Canonical type tag.
    pub fn tag(self) -> &'static str {
        match self {
            ComponentKind::Resistor => "R",
            ComponentKind::Capacitor => "C",
            ComponentKind::Inductor => "I",
            ComponentKind::EffortSource => "Se",
            ComponentKind::FlowSource => "Sf",
            ComponentKind::SourceSensor => "SS",
            ComponentKind::ZeroJunction => "0",
            ComponentKind::OneJunction => "1",
            ComponentKind::Transformer => "TF",
            ComponentKind::Gyrator => "GY",
        }
    }

    /// Long-form tags accepted in addition to the canonical one.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ComponentKind::Resistor => &["resistor"],
            ComponentKind::Capacitor => &["capacitor"],
            ComponentKind::Inductor => &["inductor"],
            ComponentKind::EffortSource => &["effort_source"],
            ComponentKind::FlowSource => &["flow_source"],
            ComponentKind::SourceSensor => &["source_sensor"],
            ComponentKind::ZeroJunction => &["zero_junction", "junction"],
            ComponentKind::OneJunction => &["one_junction"],
            ComponentKind::Transformer => &["transformer"],
            ComponentKind::Gyrator => &["gyrator"],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ComponentKind::Resistor => "linear resistor",
            ComponentKind::Capacitor => "linear capacitor (stores displacement)",
            ComponentKind::Inductor => "linear inductor (stores momentum)",
            ComponentKind::EffortSource => "effort source",
            ComponentKind::FlowSource => "flow source",
            ComponentKind::SourceSensor => "source-sensor, placeholder for an external port",
            ComponentKind::ZeroJunction => "common-effort junction",
            ComponentKind::OneJunction => "common-flow junction",
            ComponentKind::Transformer => "transformer",
            ComponentKind::Gyrator => "gyrator",
        }
    }

    pub fn ports(self) -> &'static [PortSpec] {
        match self {
            ComponentKind::Resistor | ComponentKind::Capacitor | ComponentKind::Inductor => {
                DISSIPATIVE
            }
            ComponentKind::EffortSource | ComponentKind::FlowSource => SOURCE,
            ComponentKind::SourceSensor => SENSOR,
            ComponentKind::ZeroJunction | ComponentKind::OneJunction => JUNCTION,
            ComponentKind::Transformer | ComponentKind::Gyrator => TWO_PORT,
        }
    }

    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            ComponentKind::Resistor => RESISTANCE,
            ComponentKind::Capacitor => CAPACITANCE,
            ComponentKind::Inductor => INDUCTANCE,
            ComponentKind::EffortSource => EFFORT,
            ComponentKind::FlowSource => FLOW,
            ComponentKind::Transformer | ComponentKind::Gyrator => RATIO,
            ComponentKind::SourceSensor | ComponentKind::ZeroJunction | ComponentKind::OneJunction => {
                NONE
            }
        }
    }

    /// Port used for references that do not name one.
    ///
    /// Single-port kinds default to their only port. Two-port kinds have none, so
    /// unqualified references to them are ambiguous.
    pub fn default_port(self) -> Option<&'static str> {
        match self.ports() {
            [only] => Some(only.name),
            _ => None,
        }
    }

    pub fn is_junction(self) -> bool {
        self.ports().iter().all(|p| p.arity == PortArity::Many)
    }

    /// Whether the order of connection endpoints touching this kind carries meaning.
    pub fn is_directional(self) -> bool {
        self.ports().iter().any(|p| p.direction != PortDirection::None)
    }

    /// Look up a kind by canonical tag or alias.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag() == tag || k.aliases().contains(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_tag(kind.tag()), Some(kind));
            for alias in kind.aliases() {
                assert_eq!(ComponentKind::from_tag(alias), Some(kind));
            }
        }
        assert_eq!(ComponentKind::from_tag("junction"), Some(ComponentKind::ZeroJunction));
        assert!(ComponentKind::from_tag("r").is_none());
    }

    #[test]
    fn default_port_policy() {
        assert_eq!(ComponentKind::Resistor.default_port(), Some("p"));
        assert_eq!(ComponentKind::OneJunction.default_port(), Some("p"));
        assert_eq!(ComponentKind::Transformer.default_port(), None);
        assert_eq!(ComponentKind::Gyrator.default_port(), None);
    }

    #[test]
    fn directionality_is_per_kind() {
        assert!(ComponentKind::EffortSource.is_directional());
        assert!(ComponentKind::Transformer.is_directional());
        assert!(!ComponentKind::ZeroJunction.is_directional());
        assert!(!ComponentKind::SourceSensor.is_directional());
        assert!(ComponentKind::ZeroJunction.is_junction());
        assert!(!ComponentKind::SourceSensor.is_junction());
        assert_eq!(ComponentKind::SourceSensor.ports()[0].arity, PortArity::Boundary);
    }
}
