//! End-to-end instantiation tests: memoization, type resolution, coercion,
//! shallow mode, variables, lazy values, and the raw require bypass.

mod test_utils;

use std::sync::Arc;

use armature_graph::datatype::Primitive;
use armature_graph::resource::Resource;
use armature_graph::term::Term;
use armature_graph::vocab;
use armature_pool::error::InstantiationError;
use armature_pool::pool::InstantiationSettings;
use armature_pool::value::InstanceValue;
use armature_registry::component::Component;
use armature_registry::parameter::Parameter;
use armature_registry::template::ArgumentTemplate;
use armature_resolve::error::ResolveError;
use test_utils::{greeter_component, greeter_config, named, pool_of};

/// Extracts the single hash argument of a constructed instance.
fn constructor_hash(instance: &InstanceValue) -> &indexmap::IndexMap<Arc<str>, InstanceValue> {
    let InstanceValue::Constructed { args, .. } = instance else {
        panic!("expected constructed instance, got {instance:?}");
    };
    assert_eq!(args.len(), 1, "greeter-style components take one hash arg");
    args[0].as_hash().expect("hash argument")
}

#[tokio::test]
async fn end_to_end_greeter_hash() {
    let pool = pool_of(
        vec![greeter_component()],
        vec![greeter_config("ex:config", "WORLD", "HI")],
    );

    let instance = pool.instantiate(&named("ex:config")).await.unwrap();

    let InstanceValue::Constructed {
        instance_id,
        require_name,
        call_constructor,
        ..
    } = &instance
    else {
        panic!("expected constructed instance");
    };
    assert_eq!(instance_id, &named("ex:config"));
    assert_eq!(require_name.as_ref(), test_utils::PACKAGE);
    assert!(call_constructor);

    let hash = constructor_hash(&instance);
    assert_eq!(
        hash.get("hello").unwrap().as_primitive(),
        Some(&Primitive::String("WORLD".into()))
    );
    assert_eq!(
        hash.get("say").unwrap().as_primitive(),
        Some(&Primitive::String("HI".into()))
    );
}

#[tokio::test]
async fn sequential_calls_return_the_same_instance() {
    let pool = pool_of(
        vec![greeter_component()],
        vec![greeter_config("ex:config", "A", "B")],
    );

    let first = pool.instantiate(&named("ex:config")).await.unwrap();
    assert!(pool.is_instantiated(&named("ex:config")));
    let second = pool.instantiate(&named("ex:config")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_calls_observe_one_construction() {
    let pool = pool_of(
        vec![greeter_component()],
        vec![greeter_config("ex:config", "A", "B")],
    );

    let id_a = named("ex:config");
    let id_b = named("ex:config");
    let (first, second) = tokio::join!(
        pool.instantiate(&id_a),
        pool.instantiate(&id_b),
    );
    assert_eq!(first.unwrap(), second.unwrap());
}

#[tokio::test]
async fn distinct_ids_yield_distinct_instances() {
    let pool = pool_of(
        vec![greeter_component()],
        vec![
            greeter_config("ex:one", "A", "B"),
            greeter_config("ex:two", "A", "B"),
        ],
    );

    let one = pool.instantiate(&named("ex:one")).await.unwrap();
    let two = pool.instantiate(&named("ex:two")).await.unwrap();
    assert_ne!(one, two);
}

#[tokio::test]
async fn unknown_config_is_an_error() {
    let pool = pool_of(vec![greeter_component()], vec![]);

    let err = pool.instantiate(&named("ex:ghost")).await.unwrap_err();
    assert!(matches!(err, InstantiationError::UnknownConfig(_)));
}

#[tokio::test]
async fn config_without_a_registered_type_fails_type_resolution() {
    let pool = pool_of(
        vec![greeter_component()],
        vec![Resource::new(named("ex:config")).with_type(named("ex:Unregistered"))],
    );

    let err = pool.instantiate(&named("ex:config")).await.unwrap_err();
    let InstantiationError::ConfigTypeResolution { found, .. } = err else {
        panic!("expected type-resolution error, got {err:?}");
    };
    assert_eq!(found, 0);
}

#[tokio::test]
async fn config_with_two_registered_types_fails_type_resolution() {
    let pool = pool_of(
        vec![
            greeter_component(),
            Component::new(named("ex:Other")),
        ],
        vec![
            Resource::new(named("ex:config"))
                .with_type(named("ex:Greeter"))
                .with_type(named("ex:Other")),
        ],
    );

    let err = pool.instantiate(&named("ex:config")).await.unwrap_err();
    let InstantiationError::ConfigTypeResolution { found, .. } = err else {
        panic!("expected type-resolution error, got {err:?}");
    };
    assert_eq!(found, 2);
}

#[tokio::test]
async fn raw_require_bypass_constructs_without_a_component() {
    let pool = pool_of(
        vec![],
        vec![
            Resource::new(named("ex:raw"))
                .with_property(vocab::REQUIRE_NAME, Term::literal("lodash"))
                .with_property(vocab::REQUIRE_ELEMENT, Term::literal("map"))
                .with_property(vocab::NO_CONSTRUCTOR, Term::literal("true")),
        ],
    );

    let instance = pool.instantiate(&named("ex:raw")).await.unwrap();
    let InstanceValue::Constructed {
        require_name,
        require_element,
        call_constructor,
        args,
        ..
    } = instance
    else {
        panic!("expected constructed instance");
    };
    assert_eq!(require_name.as_ref(), "lodash");
    assert_eq!(require_element.as_deref(), Some("map"));
    assert!(!call_constructor);
    assert!(args.is_empty());
}

#[tokio::test]
async fn coercion_failure_rejects_the_instantiation() {
    let component = Component::new(named("ex:Counter"))
        .with_parameter(
            Parameter::new(named("ex:count"))
                .unique()
                .with_range(armature_graph::datatype::Datatype::Integer),
        )
        .with_constructor_arguments(ArgumentTemplate::hash([(
            Arc::from("count"),
            ArgumentTemplate::value_ref(named("ex:count")),
        )]));
    let pool = pool_of(
        vec![component],
        vec![
            Resource::new(named("ex:config"))
                .with_type(named("ex:Counter"))
                .with_property("ex:count", Term::literal("abc")),
        ],
    );

    let err = pool.instantiate(&named("ex:config")).await.unwrap_err();
    assert!(matches!(
        err,
        InstantiationError::Resolve(ResolveError::TypeCoercion { .. })
    ));
}

#[tokio::test]
async fn earlier_instances_stay_cached_when_a_later_call_fails() {
    let pool = pool_of(
        vec![greeter_component()],
        vec![greeter_config("ex:good", "A", "B")],
    );

    pool.instantiate(&named("ex:good")).await.unwrap();
    let err = pool.instantiate(&named("ex:ghost")).await.unwrap_err();
    assert!(matches!(err, InstantiationError::UnknownConfig(_)));
    assert!(pool.is_instantiated(&named("ex:good")));
}

// ─────────────────────────────────────────────────────────────────────────────
// References, shallow mode, variables, lazy values
// ─────────────────────────────────────────────────────────────────────────────

/// A component holding one reference-valued parameter.
fn wrapper_component() -> Component {
    Component::new(named("ex:Wrapper"))
        .with_parameter(Parameter::new(named("ex:dep")).unique())
        .with_constructor_arguments(ArgumentTemplate::hash([(
            Arc::from("dep"),
            ArgumentTemplate::value_ref(named("ex:dep")),
        )]))
}

fn wrapper_config(dep: &str) -> Resource {
    Resource::new(named("ex:wrapper"))
        .with_type(named("ex:Wrapper"))
        .with_property("ex:dep", named(dep))
}

#[tokio::test]
async fn references_instantiate_recursively() {
    let pool = pool_of(
        vec![wrapper_component(), greeter_component()],
        vec![wrapper_config("ex:inner"), greeter_config("ex:inner", "A", "B")],
    );

    let instance = pool.instantiate(&named("ex:wrapper")).await.unwrap();
    let hash = constructor_hash(&instance);
    assert!(matches!(
        hash.get("dep").unwrap(),
        InstanceValue::Constructed { .. }
    ));
    // The nested construction is cached under its own id.
    assert!(pool.is_instantiated(&named("ex:inner")));
}

#[tokio::test]
async fn shallow_mode_realizes_references_to_undefined() {
    let pool = pool_of(
        vec![wrapper_component(), greeter_component()],
        vec![wrapper_config("ex:inner"), greeter_config("ex:inner", "A", "B")],
    );

    let instance = pool
        .instantiate_with(
            &named("ex:wrapper"),
            InstantiationSettings {
                shallow: true,
                ..InstantiationSettings::default()
            },
        )
        .await
        .unwrap();

    let hash = constructor_hash(&instance);
    assert!(hash.get("dep").unwrap().is_undefined());
    assert!(!pool.is_instantiated(&named("ex:inner")));
}

#[tokio::test]
async fn bound_variables_resolve_through_the_variable_map() {
    let pool = pool_of(
        vec![wrapper_component()],
        vec![
            wrapper_config("ex:var"),
            Resource::new(named("ex:var")).with_type(Term::named(vocab::VARIABLE)),
        ],
    );

    let mut settings = InstantiationSettings::default();
    settings.variables.insert(
        "ex:var".to_string(),
        InstanceValue::Primitive(Primitive::String("injected".into())),
    );

    let instance = pool
        .instantiate_with(&named("ex:wrapper"), settings)
        .await
        .unwrap();
    let hash = constructor_hash(&instance);
    assert_eq!(
        hash.get("dep").unwrap().as_primitive(),
        Some(&Primitive::String("injected".into()))
    );
}

#[tokio::test]
async fn unbound_variables_are_an_error() {
    let pool = pool_of(
        vec![wrapper_component()],
        vec![
            wrapper_config("ex:var"),
            Resource::new(named("ex:var")).with_type(Term::named(vocab::VARIABLE)),
        ],
    );

    let err = pool.instantiate(&named("ex:wrapper")).await.unwrap_err();
    let InstantiationError::UndefinedVariable { name } = err else {
        panic!("expected undefined-variable error, got {err:?}");
    };
    assert_eq!(name, "ex:var");
}

#[tokio::test]
async fn lazy_parameters_defer_realization() {
    let component = Component::new(named("ex:Lazy"))
        .with_parameter(Parameter::new(named("ex:dep")).unique().lazy())
        .with_constructor_arguments(ArgumentTemplate::hash([(
            Arc::from("dep"),
            ArgumentTemplate::value_ref(named("ex:dep")),
        )]));
    let pool = pool_of(
        vec![component, greeter_component()],
        vec![
            Resource::new(named("ex:config"))
                .with_type(named("ex:Lazy"))
                .with_property("ex:dep", named("ex:inner")),
            greeter_config("ex:inner", "A", "B"),
        ],
    );

    let instance = pool.instantiate(&named("ex:config")).await.unwrap();
    let hash = constructor_hash(&instance);
    let deferred = hash.get("dep").unwrap();
    assert!(deferred.is_lazy());
    // Nothing was constructed for the target yet.
    assert!(!pool.is_instantiated(&named("ex:inner")));

    // Forcing the supplier re-enters the pool.
    let forced = deferred.force().await.unwrap();
    assert!(matches!(forced, InstanceValue::Constructed { .. }));
    assert!(pool.is_instantiated(&named("ex:inner")));
}

#[tokio::test]
async fn constructorless_component_takes_the_require_target_verbatim() {
    let component = Component::new(named("ex:Plain"))
        .with_require_element("plainExport")
        .without_constructor();
    let pool = pool_of(
        vec![component],
        vec![Resource::new(named("ex:config")).with_type(named("ex:Plain"))],
    );

    let instance = pool.instantiate(&named("ex:config")).await.unwrap();
    let InstanceValue::Constructed {
        require_element,
        call_constructor,
        args,
        ..
    } = instance
    else {
        panic!("expected constructed instance");
    };
    assert_eq!(require_element.as_deref(), Some("plainExport"));
    assert!(!call_constructor);
    assert!(args.is_empty());
}
