//! Integration tests for leafref resolution over records that mirror every
//! schema level.

use indexmap::IndexMap;
use std::sync::Arc;
use yangtree::{
    resolve_leafrefs, DataNode, Entry, ErrorKind, LeafrefOptions, LeafrefPath, LeafrefPathError, ListKey, Record,
    RecordType, Scalar, SchemaTree, Step, YangType,
};

fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn tree() -> SchemaTree {
    SchemaTree::new(
        Entry::container("device")
            .child(
                Entry::container("interfaces").child(
                    Entry::list("interface", "name")
                        .child(Entry::leaf("name", YangType::leafref("../config/name")))
                        .child(
                            Entry::container("config")
                                .child(Entry::leaf("name", YangType::string()))
                                .child(Entry::leaf("peer", YangType::leafref("../../../interface/name"))),
                        ),
                ),
            )
            .child(
                Entry::container("system")
                    .child(Entry::leaf("mgmt", YangType::leafref("/interfaces/interface/name")))
                    .child(Entry::leaf("broken", YangType::leafref("../mgmt[name"))),
            ),
    )
    .unwrap()
}

struct Types {
    device: Arc<RecordType>,
    interfaces: Arc<RecordType>,
    interface: Arc<RecordType>,
    config: Arc<RecordType>,
    system: Arc<RecordType>,
}

fn types() -> Types {
    let config = RecordType::builder("Config").leaf("Name", "name").leaf("Peer", "peer").build();
    let interface = RecordType::builder("Interface")
        .leaf("Name", "name")
        .container("Config", "config", config.clone())
        .build();
    let interfaces = RecordType::builder("Interfaces")
        .keyed_list("Interface", "interface", interface.clone())
        .build();
    let system = RecordType::builder("System").leaf("Mgmt", "mgmt").leaf("Broken", "broken").build();
    let device = RecordType::builder("Device")
        .container("Interfaces", "interfaces", interfaces.clone())
        .container("System", "system", system.clone())
        .build();
    Types {
        device,
        interfaces,
        interface,
        config,
        system,
    }
}

impl Types {
    fn interface(&self, key: &str, config_name: &str, peer: Option<&str>) -> Record {
        let mut config = Record::new(self.config.clone()).with("Name", Scalar::from(config_name)).unwrap();
        if let Some(peer) = peer {
            config = config.with("Peer", Scalar::from(peer)).unwrap();
        }
        Record::new(self.interface.clone())
            .with("Name", Scalar::from(key))
            .unwrap()
            .with("Config", config)
            .unwrap()
    }

    fn device(&self, interfaces: Vec<Record>, system: Option<Record>) -> Record {
        let map: IndexMap<ListKey, Record> = interfaces
            .into_iter()
            .map(|r| (ListKey::from(r.leaf("Name").unwrap().clone()), r))
            .collect();
        let interfaces = Record::new(self.interfaces.clone())
            .with("Interface", DataNode::KeyedList(map))
            .unwrap();
        let mut device = Record::new(self.device.clone()).with("Interfaces", interfaces).unwrap();
        if let Some(system) = system {
            device = device.with("System", system).unwrap();
        }
        device
    }

    fn system(&self, mgmt: &str) -> Record {
        Record::new(self.system.clone()).with("Mgmt", Scalar::from(mgmt)).unwrap()
    }
}

#[test]
fn test_consistent_tree_resolves() {
    let t = types();
    let device = t.device(
        vec![t.interface("eth0", "eth0", Some("eth1")), t.interface("eth1", "eth1", None)],
        Some(t.system("eth1")),
    );
    assert!(resolve_leafrefs(tree().root(), &device, &LeafrefOptions::new()).is_success());
}

#[test]
fn test_dangling_peer() {
    let t = types();
    let device = t.device(vec![t.interface("eth0", "eth0", Some("eth7"))], None);
    let errors = unwrap_failure(resolve_leafrefs(tree().root(), &device, &LeafrefOptions::new()));
    assert_eq!(errors.len(), 1);
    let error = errors.first();
    assert_eq!(error.kind, ErrorKind::LeafrefMismatch);
    assert_eq!(error.path.to_string(), "/interfaces/interface[eth0]/config/peer");
    assert_eq!(error.expected.as_deref(), Some("eth0"));
    assert_eq!(error.got.as_deref(), Some("eth7"));
}

#[test]
fn test_key_disagrees_with_config() {
    let t = types();
    let device = t.device(vec![t.interface("eth0", "eth1", None)], None);
    let errors = unwrap_failure(resolve_leafrefs(tree().root(), &device, &LeafrefOptions::new()));
    assert_eq!(errors.first().path.to_string(), "/interfaces/interface[eth0]/name");
    assert_eq!(errors.first().got.as_deref(), Some("eth0"));
}

#[test]
fn test_every_mismatch_reported() {
    let t = types();
    let device = t.device(
        vec![t.interface("eth0", "eth0", Some("x")), t.interface("eth1", "eth1", Some("y"))],
        Some(t.system("z")),
    );
    let errors = unwrap_failure(resolve_leafrefs(tree().root(), &device, &LeafrefOptions::new()));
    assert_eq!(errors.of_kind(ErrorKind::LeafrefMismatch).len(), 3);
}

#[test]
fn test_absolute_path_to_missing_list() {
    let t = types();
    let device = t.device(Vec::new(), Some(t.system("eth0")));

    let errors = unwrap_failure(resolve_leafrefs(tree().root(), &device, &LeafrefOptions::new()));
    assert_eq!(errors.first().path.to_string(), "/system/mgmt");

    let ignore = LeafrefOptions::new().ignore_missing_data();
    assert!(resolve_leafrefs(tree().root(), &device, &ignore).is_success());

    let log = LeafrefOptions::new().log_missing_data();
    assert!(resolve_leafrefs(tree().root(), &device, &log).is_success());
}

#[test]
fn test_malformed_path_is_schema_error() {
    let t = types();
    let system = t.system("eth0").with("Broken", Scalar::from("eth0")).unwrap();
    let device = t.device(vec![t.interface("eth0", "eth0", None)], Some(system));
    let errors = unwrap_failure(resolve_leafrefs(tree().root(), &device, &LeafrefOptions::new()));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().kind, ErrorKind::Schema);
    assert_eq!(errors.first().path.to_string(), "/system/broken");
}

#[test]
fn test_path_parsing() {
    let path = LeafrefPath::parse("../../config/name").unwrap();
    assert!(!path.is_absolute());
    assert_eq!(path.leading_parents(), 2);
    assert!(matches!(path.steps()[0], Step::Parent));

    assert!(LeafrefPath::parse("/interfaces/interface/name").unwrap().is_absolute());
    assert!(matches!(LeafrefPath::parse(""), Err(LeafrefPathError::Empty)));
    assert!(matches!(
        LeafrefPath::parse("../a[b"),
        Err(LeafrefPathError::UnbalancedBrackets(_))
    ));
}
