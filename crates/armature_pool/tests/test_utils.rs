//! Shared fixtures for the pool integration tests.

#![allow(dead_code, reason = "shared helpers are used by multiple test binaries")]

use std::sync::Arc;

use armature_graph::resource::{Resource, ResourceGraph};
use armature_graph::term::Term;
use armature_pool::pool::InstancePool;
use armature_pool::value::ValueStrategy;
use armature_registry::component::{Component, Module};
use armature_registry::parameter::Parameter;
use armature_registry::registry::ComponentRegistry;
use armature_registry::template::ArgumentTemplate;

/// The module every test component lives in.
pub const MODULE: &str = "ex:module";

/// The opaque require name carried by the test module.
pub const PACKAGE: &str = "demo-package";

/// Shorthand for a named-node term.
pub fn named(iri: &str) -> Term {
    Term::named(iri)
}

/// Builds a pool over the given components and resources, with a
/// [`ValueStrategy`] backend.
pub fn pool_of(
    components: Vec<Component>,
    resources: Vec<Resource>,
) -> InstancePool<ValueStrategy> {
    let mut registry = ComponentRegistry::new();
    registry
        .register_module(Module::new(named(MODULE), PACKAGE))
        .expect("fresh registry accepts the module");
    for component in components {
        registry
            .register_component(&named(MODULE), component)
            .expect("fresh registry accepts test components");
    }
    registry.finalize().expect("test hierarchies are acyclic");

    let mut graph = ResourceGraph::new();
    for resource in resources {
        graph.insert(resource).expect("test resources are unique");
    }
    let graph = graph.seal();

    InstancePool::new(Arc::new(graph), Arc::new(registry), ValueStrategy)
}

/// A component with `hello` and `say` parameters mapped 1:1 into a hash.
pub fn greeter_component() -> Component {
    Component::new(named("ex:Greeter"))
        .with_parameter(Parameter::new(named("ex:hello")).unique())
        .with_parameter(Parameter::new(named("ex:say")).unique())
        .with_constructor_arguments(ArgumentTemplate::hash([
            (
                Arc::from("hello"),
                ArgumentTemplate::value_ref(named("ex:hello")),
            ),
            (
                Arc::from("say"),
                ArgumentTemplate::value_ref(named("ex:say")),
            ),
        ]))
}

/// A config for [`greeter_component`] with explicit `hello`/`say` values.
pub fn greeter_config(id: &str, hello: &str, say: &str) -> Resource {
    Resource::new(named(id))
        .with_type(named("ex:Greeter"))
        .with_property("ex:hello", Term::literal(hello))
        .with_property("ex:say", Term::literal(say))
}
