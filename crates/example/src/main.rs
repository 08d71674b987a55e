//! Wires a small configuration graph end-to-end and logs the result.
//!
//! A `Database` component feeds a `Server` component through a reference
//! parameter; the pool resolves, memoizes, and materializes both through
//! the in-memory value strategy.

use std::sync::Arc;

use armature_graph::datatype::Datatype;
use armature_graph::resource::{Resource, ResourceGraph};
use armature_graph::term::Term;
use armature_pool::pool::InstancePool;
use armature_pool::value::ValueStrategy;
use armature_registry::component::{Component, Module};
use armature_registry::parameter::Parameter;
use armature_registry::registry::ComponentRegistry;
use armature_registry::template::ArgumentTemplate;
use tracing::info;

fn registry() -> ComponentRegistry {
    let module = Term::named("demo:module");
    let mut registry = ComponentRegistry::new();
    registry
        .register_module(Module::new(module.clone(), "demo-services"))
        .expect("fresh registry");

    let database = Component::new(Term::named("demo:Database"))
        .with_parameter(
            Parameter::new(Term::named("demo:port"))
                .unique()
                .with_range(Datatype::Integer)
                .with_default(Term::literal("5432")),
        )
        .with_constructor_arguments(ArgumentTemplate::hash([(
            Arc::from("port"),
            ArgumentTemplate::value_ref(Term::named("demo:port")),
        )]));

    let server = Component::new(Term::named("demo:Server"))
        .with_parameter(Parameter::new(Term::named("demo:name")).unique().required())
        .with_parameter(Parameter::new(Term::named("demo:database")).unique())
        .with_constructor_arguments(ArgumentTemplate::hash([
            (
                Arc::from("name"),
                ArgumentTemplate::value_ref(Term::named("demo:name")),
            ),
            (
                Arc::from("database"),
                ArgumentTemplate::value_ref(Term::named("demo:database")),
            ),
        ]));

    registry
        .register_component(&module, database)
        .expect("fresh registry");
    registry
        .register_component(&module, server)
        .expect("fresh registry");
    registry.finalize().expect("acyclic hierarchy");
    registry
}

fn graph() -> ResourceGraph {
    let mut graph = ResourceGraph::new();
    graph
        .insert(Resource::new(Term::named("demo:db")).with_type(Term::named("demo:Database")))
        .expect("unique ids");
    graph
        .insert(
            Resource::new(Term::named("demo:api"))
                .with_type(Term::named("demo:Server"))
                .with_property("demo:name", Term::literal("api"))
                .with_property("demo:database", Term::named("demo:db")),
        )
        .expect("unique ids");
    graph.seal()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,armature_pool=debug".into()),
        )
        .init();

    let pool = InstancePool::new(Arc::new(graph()), Arc::new(registry()), ValueStrategy);

    match pool.instantiate(&Term::named("demo:api")).await {
        Ok(instance) => info!(?instance, "wired"),
        Err(err) => info!(%err, "instantiation failed"),
    }
}
