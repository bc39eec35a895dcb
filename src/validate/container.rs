use crate::data::Record;
use crate::error::{ErrorSink, YangError};
use crate::navigate::child_schema;
use crate::path::DataPath;
use crate::schema::SchemaRef;
use crate::ValidationResult;

use super::{child_path, unexpected_fields, validate_choice, validate_node};

/// Validates every populated field of `record` against `schema`, then runs
/// the choice pass and reports fields with no schema home.
pub(crate) fn validate_container(schema: SchemaRef<'_>, record: &Record, path: &DataPath) -> ValidationResult<()> {
    let mut sink = ErrorSink::collect();
    let mut extra: Vec<&str> = Vec::new();

    for (name, value) in record.values() {
        let Some(def) = record.record_type().field(name) else {
            extra.push(name);
            continue;
        };
        if def.is_annotation() {
            continue;
        }
        match child_schema(schema, def) {
            Err(e) => {
                let _ = sink.push(YangError::schema(path.push_node(name), e.to_string()));
            }
            Ok(Some(resolved)) => {
                let at = child_path(path, &resolved.path);
                let _ = sink.absorb(validate_node(resolved.schema, value, &at));
            }
            Ok(None) => extra.push(name),
        }
    }

    for choice in schema.dir().filter(|c| c.is_choice()) {
        let outcome = validate_choice(choice, record, path);
        extra.retain(|name| !outcome.selected.iter().any(|s| s.as_str() == *name));
        let _ = sink.absorb(outcome.result);
    }

    if !extra.is_empty() {
        let _ = sink.push(unexpected_fields(schema, &extra, path));
    }

    sink.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataNode, RecordType, Scalar};
    use crate::error::ErrorKind;
    use crate::schema::{Entry, SchemaTree, TypeKind, YangType};

    fn tree() -> SchemaTree {
        SchemaTree::new(
            Entry::container("interface")
                .child(Entry::leaf("name", YangType::string()))
                .child(
                    Entry::container("config")
                        .child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16)))
                        .child(Entry::leaf("enabled", YangType::new(TypeKind::Boolean))),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_siblings_validated_past_a_failure() {
        let tree = tree();
        let ty = RecordType::builder("Interface")
            .leaf("Name", "name")
            .leaf("Mtu", "config/mtu")
            .leaf("Enabled", "config/enabled")
            .build();
        let record = Record::new(ty)
            .with("Name", Scalar::Int8(1))
            .unwrap()
            .with("Mtu", Scalar::from("big"))
            .unwrap()
            .with("Enabled", Scalar::Bool(true))
            .unwrap();
        let errors = validate_container(tree.root(), &record, &DataPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.iter().nth(1).unwrap().path.to_string(), "/config/mtu");
    }

    #[test]
    fn test_extra_fields_reported_once() {
        let tree = tree();
        let ty = RecordType::builder("Interface")
            .leaf("Name", "name")
            .leaf("Speed", "speed")
            .leaf("Duplex", "config/duplex")
            .annotation("Meta", "@")
            .build();
        let record = Record::new(ty)
            .with("Name", Scalar::from("eth0"))
            .unwrap()
            .with("Speed", Scalar::Uint32(1))
            .unwrap()
            .with("Duplex", Scalar::from("full"))
            .unwrap()
            .with("Meta", DataNode::Annotation(serde_json::json!({"a": 1})))
            .unwrap();
        let errors = validate_container(tree.root(), &record, &DataPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        let err = errors.first();
        assert_eq!(err.kind, ErrorKind::UnexpectedField);
        assert_eq!(err.got.as_deref(), Some("Speed, Duplex"));
        assert!(err.message.contains("/interface"));
    }

    #[test]
    fn test_malformed_tag_reported_per_field() {
        let tree = tree();
        let ty = RecordType::builder("Interface")
            .leaf("Name", "name|alias")
            .leaf("Mtu", "config/mtu")
            .build();
        let record = Record::new(ty)
            .with("Name", Scalar::from("eth0"))
            .unwrap()
            .with("Mtu", Scalar::from("x"))
            .unwrap();
        let errors = validate_container(tree.root(), &record, &DataPath::root())
            .into_result()
            .unwrap_err();
        assert!(errors.contains_kind(ErrorKind::Schema));
        assert!(errors.contains_kind(ErrorKind::TypeMismatch));
    }
}
