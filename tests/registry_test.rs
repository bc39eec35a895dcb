//! Integration tests for the model registry.

use serde_json::json;
use yangtree::{
    Entry, ErrorKind, LeafrefOptions, ModelRegistry, RecordType, RegistryError, Scalar, SchemaTree, TypeKind,
    UnmarshalOptions, YangRange, YangType,
};

fn unwrap_success<T, E: std::fmt::Debug>(v: stillwater::Validation<T, E>) -> T {
    v.into_result().unwrap()
}

fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn register_interfaces(registry: &ModelRegistry) {
    let tree = SchemaTree::new(
        Entry::container("interfaces")
            .child(
                Entry::list("interface", "name")
                    .child(Entry::leaf("name", YangType::string()))
                    .child(Entry::leaf(
                        "mtu",
                        YangType::new(TypeKind::Uint16).range(vec![YangRange::uint(68, 9216)]),
                    )),
            )
            .child(Entry::leaf("primary", YangType::leafref("../interface/name"))),
    )
    .unwrap();
    let interface = RecordType::builder("Interface").leaf("Name", "name").leaf("Mtu", "mtu").build();
    let ty = RecordType::builder("Interfaces")
        .keyed_list("Interface", "interface", interface)
        .leaf("Primary", "primary")
        .build();
    registry.register("interfaces", tree, ty).unwrap();
}

fn register_system(registry: &ModelRegistry) {
    let tree = SchemaTree::new(Entry::container("system").child(Entry::leaf("hostname", YangType::string()))).unwrap();
    let ty = RecordType::builder("System").leaf("Hostname", "hostname").build();
    registry.register("system", tree, ty).unwrap();
}

#[test]
fn test_register_and_list() {
    let registry = ModelRegistry::new();
    register_system(&registry);
    register_interfaces(&registry);
    assert_eq!(registry.names(), vec!["interfaces", "system"]);
    assert!(registry.get("system").is_some());
    assert!(registry.get("routing").is_none());
}

#[test]
fn test_duplicate_registration_rejected() {
    let registry = ModelRegistry::new();
    register_system(&registry);
    let tree = SchemaTree::new(Entry::container("system")).unwrap();
    let err = registry
        .register("system", tree, RecordType::builder("System").build())
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateName(ref name) if name == "system"));
    assert_eq!(err.to_string(), "model 'system' already registered");
}

#[test]
fn test_unknown_model() {
    let registry = ModelRegistry::new();
    let err = registry
        .unmarshal_json("routing", &json!({}), &UnmarshalOptions::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "model 'routing' not found");
    assert!(matches!(registry.validate_batch("routing", &[]), Err(RegistryError::ModelNotFound(_))));
}

#[test]
fn test_full_pipeline() {
    let registry = ModelRegistry::new();
    register_interfaces(&registry);

    let payload = json!({
        "interface": [{"name": "eth0", "mtu": 1500}, {"name": "eth1", "mtu": 9000}],
        "primary": "eth1"
    });
    let record = unwrap_success(
        registry
            .unmarshal_json("interfaces", &payload, &UnmarshalOptions::new())
            .unwrap(),
    );
    unwrap_success(registry.validate("interfaces", &record).unwrap());
    unwrap_success(registry.resolve_leafrefs("interfaces", &record).unwrap());

    let record = record.with("Primary", Scalar::from("eth9")).unwrap();
    let errors = unwrap_failure(registry.resolve_leafrefs("interfaces", &record).unwrap());
    assert_eq!(errors.first().kind, ErrorKind::LeafrefMismatch);
    assert_eq!(errors.first().path.to_string(), "/primary");
}

#[test]
fn test_invalid_values_survive_unmarshal() {
    let registry = ModelRegistry::new();
    register_interfaces(&registry);

    let payload = json!({"interface": [{"name": "eth0", "mtu": 20}]});
    let record = unwrap_success(
        registry
            .unmarshal_json("interfaces", &payload, &UnmarshalOptions::new())
            .unwrap(),
    );
    let errors = unwrap_failure(registry.validate("interfaces", &record).unwrap());
    assert_eq!(errors.first().kind, ErrorKind::Range);
    assert_eq!(errors.first().path.to_string(), "/interface[eth0]/mtu");
}

#[test]
fn test_missing_data_option() {
    let registry = ModelRegistry::new().with_leafref_options(LeafrefOptions::new().log_missing_data());
    register_interfaces(&registry);
    let record = registry
        .get("interfaces")
        .unwrap()
        .new_record()
        .with("Primary", Scalar::from("eth0"))
        .unwrap();
    unwrap_success(registry.resolve_leafrefs("interfaces", &record).unwrap());
}

#[test]
fn test_clones_share_models() {
    let registry = ModelRegistry::new();
    let clone = registry.clone();
    register_system(&clone);
    assert_eq!(registry.names(), vec!["system"]);
}
