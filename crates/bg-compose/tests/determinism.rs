use bg_components::ComponentRegistry;
use bg_compose::{Composer, build};
use bg_core::Reference;
use bg_spec::{ComponentSpec, CompositeSpec, ConnectionSpec};
use proptest::prelude::*;

/// A star of one-port elements around a junction, optionally wrapped in a nested block.
fn star(kinds: &[&'static str], nested: bool) -> CompositeSpec {
    let mut inner = CompositeSpec::new("Star").with_component("J", ComponentSpec::new("0"));
    for (i, kind) in kinds.iter().enumerate() {
        let name = format!("E{i}");
        let spec = match *kind {
            "SS" => ComponentSpec::new("SS"),
            tag => ComponentSpec::new(tag).with_param("value", (i + 1) as f64),
        };
        inner = inner
            .with_component(name.as_str(), spec)
            .with_connection(ConnectionSpec::new(vec![
                Reference::component(name),
                Reference::component("J"),
            ]));
    }
    if !nested {
        return inner;
    }
    inner = inner.with_exposure(Reference::component("J"), "bus");
    CompositeSpec::new("Top")
        .with_composite("S", inner)
        .with_component("Src", ComponentSpec::new("Se").with_param("e", 1.0))
        .with_connection(ConnectionSpec::new(vec![
            Reference::component("Src"),
            Reference::component("S"),
        ]))
}

fn kinds() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(vec!["R", "C", "I", "Se", "Sf", "SS"]), 0..8)
}

proptest! {
    #[test]
    fn builds_are_deterministic(kinds in kinds(), nested in any::<bool>()) {
        let registry = ComponentRegistry::with_builtins();
        let spec = star(&kinds, nested);

        let first = build(&spec, &registry).unwrap();
        let second = build(&spec, &registry).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.summary().leaves, kinds.len() + 1 + usize::from(nested));
    }

    #[test]
    fn parallel_builds_match_sequential(kinds in kinds()) {
        let registry = ComponentRegistry::with_builtins();
        let specs = vec![star(&kinds, false), star(&kinds, true)];
        let composer = Composer::new(&registry);

        let parallel = composer.build_all(&specs);
        for (spec, result) in specs.iter().zip(parallel) {
            prop_assert_eq!(result.unwrap(), composer.build(spec).unwrap());
        }
    }

    #[test]
    fn embedding_exposes_only_aliases(kinds in kinds()) {
        let registry = ComponentRegistry::with_builtins();
        let top = build(&star(&kinds, true), &registry).unwrap();
        let block = top.node_by_name("S").unwrap();
        let names: Vec<&str> = bg_graph::Element::ports(block).iter().map(|p| p.name.as_str()).collect();
        prop_assert_eq!(names, vec!["bus"]);
    }
}
