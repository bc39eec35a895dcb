//! Integration tests for string, enumeration and leaf-list validation.

use yangtree::{
    validate_record, validate_scalar, validate_scalar_slice, DataNode, DataPath, Entry, ErrorKind, Record,
    RecordType, Scalar, SchemaTree, YangRange, YangType,
};

fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn tree() -> SchemaTree {
    SchemaTree::new(
        Entry::container("user")
            .child(Entry::leaf(
                "login",
                YangType::string()
                    .length(vec![YangRange::length(2, Some(8))])
                    .pattern("[a-z][a-z0-9]*")
                    .unwrap(),
            ))
            .child(Entry::leaf(
                "code",
                YangType::string().pattern("[A-Z]+").unwrap().pattern("A.*").unwrap(),
            ))
            .child(Entry::leaf("role", YangType::enumeration(["admin", "operator"])))
            .child(Entry::leaf_list("groups", YangType::string())),
    )
    .unwrap()
}

fn ty() -> std::sync::Arc<RecordType> {
    RecordType::builder("User")
        .leaf("Login", "login")
        .leaf("Code", "code")
        .leaf("Role", "role")
        .leaf_list("Groups", "groups")
        .build()
}

fn login(value: &str) -> stillwater::Validation<(), yangtree::YangErrors> {
    let tree = tree();
    validate_scalar(tree.find("login").unwrap(), &Scalar::from(value), &DataPath::from_node("login"))
}

#[test]
fn test_length_and_pattern() {
    assert!(login("alice").is_success());
    assert!(login("bob42").is_success());

    let errors = unwrap_failure(login("a"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().kind, ErrorKind::Length);
    assert_eq!(errors.first().expected.as_deref(), Some("2..8"));
    assert_eq!(errors.first().got.as_deref(), Some("1"));

    let errors = unwrap_failure(login("42bob"));
    assert_eq!(errors.first().kind, ErrorKind::Pattern);
    assert_eq!(errors.first().expected.as_deref(), Some("[a-z][a-z0-9]*"));
}

#[test]
fn test_pattern_is_anchored() {
    // Matches a substring, but not the whole value.
    let errors = unwrap_failure(login("alice!"));
    assert_eq!(errors.first().kind, ErrorKind::Pattern);
}

#[test]
fn test_every_pattern_reported() {
    let tree = tree();
    let code = tree.find("code").unwrap();
    assert!(validate_scalar(code, &Scalar::from("ABC"), &DataPath::root()).is_success());
    let errors = unwrap_failure(validate_scalar(code, &Scalar::from("bc"), &DataPath::root()));
    assert_eq!(errors.of_kind(ErrorKind::Pattern).len(), 2);
}

#[test]
fn test_errors_accumulate_across_fields() {
    let record = Record::new(ty())
        .with("Login", Scalar::from("X"))
        .unwrap()
        .with("Role", Scalar::Enum("guest".into()))
        .unwrap();
    let errors = unwrap_failure(validate_record(tree().root(), &record));

    let login = errors.at_path(&DataPath::from_node("login"));
    assert_eq!(login.len(), 2);
    assert!(login.iter().any(|e| e.kind == ErrorKind::Length));
    assert!(login.iter().any(|e| e.kind == ErrorKind::Pattern));

    let role = errors.at_path(&DataPath::from_node("role"));
    assert_eq!(role.len(), 1);
    assert_eq!(role[0].got.as_deref(), Some("guest"));
}

#[test]
fn test_leaf_list_duplicates() {
    let tree = tree();
    let groups = tree.find("groups").unwrap();
    let values = vec![Scalar::from("wheel"), Scalar::from("staff"), Scalar::from("wheel")];
    let errors = unwrap_failure(validate_scalar_slice(groups, &values, &DataPath::from_node("groups")));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().kind, ErrorKind::DuplicateValue);
    assert_eq!(errors.first().path.to_string(), "/groups[2]");

    let record = Record::new(ty())
        .with("Groups", DataNode::LeafList(vec![Scalar::from("wheel"), Scalar::from("staff")]))
        .unwrap();
    assert!(validate_record(tree.root(), &record).is_success());
}

#[test]
fn test_negative_length_bound_is_schema_error() {
    let tree = SchemaTree::new(
        Entry::container("root")
            .child(Entry::leaf("name", YangType::string().length(vec![YangRange::int(-1, 4)]))),
    )
    .unwrap();
    let errors = unwrap_failure(validate_scalar(
        tree.find("name").unwrap(),
        &Scalar::from("ok"),
        &DataPath::root(),
    ));
    assert_eq!(errors.first().kind, ErrorKind::Schema);
}

#[test]
fn test_string_leaf_rejects_other_hosts() {
    let tree = tree();
    let errors = unwrap_failure(validate_scalar(
        tree.find("login").unwrap(),
        &Scalar::Int32(7),
        &DataPath::root(),
    ));
    assert_eq!(errors.first().kind, ErrorKind::TypeMismatch);
}
