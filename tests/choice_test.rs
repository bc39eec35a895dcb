//! Integration tests for choice exclusivity inside containers.

use serde_json::json;
use std::sync::Arc;
use yangtree::{
    unmarshal, validate_record, Entry, ErrorKind, Payload, Record, RecordType, Scalar, SchemaTree, TypeKind,
    UnmarshalOptions, YangRange, YangType,
};

fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn tree() -> SchemaTree {
    SchemaTree::new(
        Entry::container("server")
            .child(Entry::leaf("name", YangType::string()))
            .child(
                Entry::choice("listen")
                    .child(
                        Entry::case("tcp")
                            .child(Entry::leaf(
                                "port",
                                YangType::new(TypeKind::Uint16).range(vec![YangRange::uint(1, 65535)]),
                            ))
                            .child(Entry::leaf("backlog", YangType::new(TypeKind::Uint32))),
                    )
                    .child(Entry::case("unix").child(Entry::leaf("socket", YangType::string())))
                    .child(Entry::leaf("inetd", YangType::new(TypeKind::Empty))),
            ),
    )
    .unwrap()
}

fn ty() -> Arc<RecordType> {
    RecordType::builder("Server")
        .leaf("Name", "name")
        .leaf("Port", "port")
        .leaf("Backlog", "backlog")
        .leaf("Socket", "socket")
        .leaf("Inetd", "inetd")
        .build()
}

#[test]
fn test_one_case_is_valid() {
    let record = Record::new(ty())
        .with("Name", Scalar::from("web"))
        .unwrap()
        .with("Port", Scalar::Uint16(8080))
        .unwrap()
        .with("Backlog", Scalar::Uint32(128))
        .unwrap();
    assert!(validate_record(tree().root(), &record).is_success());
}

#[test]
fn test_no_case_is_valid() {
    let record = Record::new(ty()).with("Name", Scalar::from("web")).unwrap();
    assert!(validate_record(tree().root(), &record).is_success());
}

#[test]
fn test_two_cases_conflict() {
    let record = Record::new(ty())
        .with("Port", Scalar::Uint16(8080))
        .unwrap()
        .with("Socket", Scalar::from("/run/web.sock"))
        .unwrap();
    let errors = unwrap_failure(validate_record(tree().root(), &record));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().kind, ErrorKind::ChoiceConflict);
    assert_eq!(errors.first().got.as_deref(), Some("tcp, unix"));
    assert_eq!(errors.first().path.to_string(), "/");
}

#[test]
fn test_implicit_case_conflicts_with_named_case() {
    let record = Record::new(ty())
        .with("Inetd", Scalar::Empty)
        .unwrap()
        .with("Socket", Scalar::from("/run/web.sock"))
        .unwrap();
    let errors = unwrap_failure(validate_record(tree().root(), &record));
    assert_eq!(errors.first().kind, ErrorKind::ChoiceConflict);
    assert_eq!(errors.first().got.as_deref(), Some("unix, inetd"));
}

#[test]
fn test_case_members_still_validated() {
    let record = Record::new(ty())
        .with("Port", Scalar::Uint16(0))
        .unwrap()
        .with("Socket", Scalar::from("/run/web.sock"))
        .unwrap();
    let errors = unwrap_failure(validate_record(tree().root(), &record));
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_kind(ErrorKind::Range));
    assert!(errors.contains_kind(ErrorKind::ChoiceConflict));
}

#[test]
fn test_choice_levels_invisible_in_json() {
    let tree = tree();
    let mut record = Record::new(ty());
    let payload = json!({"name": "web", "socket": "/run/web.sock"});
    assert!(unmarshal(tree.root(), &mut record, Payload::Json(&payload), &UnmarshalOptions::new()).is_success());
    assert_eq!(record.leaf("Socket"), Some(&Scalar::from("/run/web.sock")));
    assert!(validate_record(tree.root(), &record).is_success());
}
