use crate::data::{DataNode, ListKey, Record};
use crate::error::{ErrorKind, ErrorSink, YangError};
use crate::navigate::field_for_schema_name;
use crate::path::DataPath;
use crate::schema::SchemaRef;
use crate::ValidationResult;

use super::{fail, validate_record_at};

/// Validates a list field in any of its host shapes.
pub(crate) fn validate_list(schema: SchemaRef<'_>, value: &DataNode, path: &DataPath) -> ValidationResult<()> {
    match value {
        DataNode::UnkeyedList(entries) => {
            let mut sink = ErrorSink::collect();
            if let Some(e) = check_list_attr(schema, entries.len(), path) {
                let _ = sink.push(e);
            }
            for (i, entry) in entries.iter().enumerate() {
                let _ = sink.absorb(validate_record_at(schema, entry, &path.push_index(i)));
            }
            sink.finish()
        }
        DataNode::KeyedList(entries) => {
            let mut sink = ErrorSink::collect();
            if let Some(e) = check_list_attr(schema, entries.len(), path) {
                let _ = sink.push(e);
            }
            for (key, entry) in entries {
                let at = path.push_key(key.to_string());
                if let Err(e) = check_key(schema, key, entry, &at) {
                    let _ = sink.push(e);
                }
                let _ = sink.absorb(validate_record_at(schema, entry, &at));
            }
            sink.finish()
        }
        DataNode::Container(entry) => validate_record_at(schema, entry, path),
        other => fail(
            YangError::type_mismatch(path.clone(), format!("list {} holds a {}", schema.name(), other.shape_name()))
                .with_expected("keyed list, unkeyed list or list entry")
                .with_got(other.shape_name()),
        ),
    }
}

/// Checks an element count against `min-elements` / `max-elements`.
pub(crate) fn check_list_attr(schema: SchemaRef<'_>, count: usize, path: &DataPath) -> Option<YangError> {
    let attr = schema.list_attr()?;
    let count = count as u64;
    let violated = if count < attr.min_elements {
        Some(format!("at least {} elements", attr.min_elements))
    } else {
        attr.max_elements
            .filter(|max| count > *max)
            .map(|max| format!("at most {} elements", max))
    };
    violated.map(|expected| {
        YangError::new(
            ErrorKind::Length,
            path.clone(),
            format!("{} {} has {} elements", schema.kind().name(), schema.name(), count),
        )
        .with_expected(expected)
        .with_got(count.to_string())
    })
}

/// Checks that a map key agrees with the key fields of its entry.
fn check_key(schema: SchemaRef<'_>, key: &ListKey, entry: &Record, path: &DataPath) -> Result<(), YangError> {
    let names = schema.key_names();
    match (names.as_slice(), key) {
        ([], _) => Err(YangError::schema(
            path.clone(),
            format!("keyed map for list {} which declares no key", schema.name()),
        )),
        ([name], ListKey::Single(value)) => {
            let field = key_field(schema, entry, name, path)?;
            match entry.leaf(field) {
                Some(actual) if actual == value => Ok(()),
                Some(actual) => Err(key_mismatch(path, "map key differs from the entry's key field")
                    .with_expected(value.to_string())
                    .with_got(actual.to_string())),
                None => Err(key_mismatch(path, format!("key field {} is not set", field))),
            }
        }
        ([_], ListKey::Composite(_)) => Err(key_mismatch(path, "composite map key for a single-key list")),
        (_, ListKey::Single(_)) => Err(key_mismatch(
            path,
            format!("single map key for a list keyed by {}", names.join(" ")),
        )),
        (_, ListKey::Composite(parts)) => {
            if parts.len() != names.len() {
                return Err(key_mismatch(path, "composite key has the wrong number of components")
                    .with_expected(names.len().to_string())
                    .with_got(parts.len().to_string()));
            }
            let mut mismatched = Vec::new();
            for name in &names {
                let field = key_field(schema, entry, name, path)?;
                match (key.component(field), entry.leaf(field)) {
                    (Some(k), Some(v)) if k == v => {}
                    (Some(k), Some(v)) => mismatched.push(format!("{}: key {}, entry {}", field, k, v)),
                    (None, _) => mismatched.push(format!("{}: missing from key", field)),
                    (_, None) => mismatched.push(format!("{}: not set in entry", field)),
                }
            }
            if mismatched.is_empty() {
                Ok(())
            } else {
                Err(key_mismatch(path, "map key differs from the entry's key fields").with_got(mismatched.join("; ")))
            }
        }
    }
}

fn key_field<'r>(schema: SchemaRef<'_>, entry: &'r Record, name: &str, path: &DataPath) -> Result<&'r str, YangError> {
    field_for_schema_name(entry.record_type(), name)
        .map(|f| f.name.as_str())
        .ok_or_else(|| {
            YangError::schema(
                path.clone(),
                format!("entry type {} has no field for key leaf {} of {}", entry.record_type().name(), name, schema.name()),
            )
        })
}

fn key_mismatch(path: &DataPath, message: impl Into<String>) -> YangError {
    YangError::new(ErrorKind::KeyMismatch, path.clone(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RecordType, Scalar};
    use crate::schema::{Entry, SchemaTree, TypeKind, YangType};
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn tree() -> SchemaTree {
        SchemaTree::new(
            Entry::container("root")
                .child(
                    Entry::list("single", "name")
                        .child(Entry::leaf("name", YangType::string()))
                        .child(Entry::leaf("value", YangType::new(TypeKind::Int32)))
                        .max_elements(2),
                )
                .child(
                    Entry::list("multi", "name unit")
                        .child(Entry::leaf("name", YangType::string()))
                        .child(Entry::leaf("unit", YangType::new(TypeKind::Uint8))),
                ),
        )
        .unwrap()
    }

    fn single_ty() -> Arc<RecordType> {
        RecordType::builder("Single").leaf("Name", "name").leaf("Value", "value").build()
    }

    fn multi_ty() -> Arc<RecordType> {
        RecordType::builder("Multi").leaf("Name", "name").leaf("Unit", "unit").build()
    }

    fn single(name: &str) -> Record {
        Record::new(single_ty()).with("Name", Scalar::from(name)).unwrap()
    }

    #[test]
    fn test_keyed_map_matching_keys() {
        let tree = tree();
        let mut map = IndexMap::new();
        map.insert(ListKey::from("a"), single("a"));
        map.insert(ListKey::from("b"), single("b"));
        let result = validate_list(tree.find("single").unwrap(), &DataNode::KeyedList(map), &DataPath::root());
        assert!(result.is_success());
    }

    #[test]
    fn test_single_key_mismatch() {
        let tree = tree();
        let mut map = IndexMap::new();
        map.insert(ListKey::from("a"), single("b"));
        let list = tree.find("single").unwrap();
        let errors = validate_list(list, &DataNode::KeyedList(map), &DataPath::from_node("single"))
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().kind, ErrorKind::KeyMismatch);
        assert_eq!(errors.first().path.to_string(), "/single[a]");
    }

    #[test]
    fn test_composite_key_mismatch_names_field() {
        let tree = tree();
        let entry = Record::new(multi_ty())
            .with("Name", Scalar::from("eth0"))
            .unwrap()
            .with("Unit", Scalar::Uint8(1))
            .unwrap();
        let mut map = IndexMap::new();
        map.insert(ListKey::composite([("Name", Scalar::from("eth0")), ("Unit", Scalar::Uint8(2))]), entry);
        let errors = validate_list(tree.find("multi").unwrap(), &DataNode::KeyedList(map), &DataPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().got.as_deref(), Some("Unit: key 2, entry 1"));
    }

    #[test]
    fn test_max_elements() {
        let tree = tree();
        let entries = vec![single("a"), single("b"), single("c")];
        let errors = validate_list(tree.find("single").unwrap(), &DataNode::UnkeyedList(entries), &DataPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().kind, ErrorKind::Length);
    }

    #[test]
    fn test_bare_entry_skips_counts() {
        let tree = tree();
        let list = tree.find("single").unwrap();
        assert!(validate_list(list, &DataNode::Container(single("a")), &DataPath::root()).is_success());
    }

    #[test]
    fn test_other_shapes_rejected() {
        let tree = tree();
        let errors = validate_list(tree.find("single").unwrap(), &DataNode::Leaf(Scalar::Int32(1)), &DataPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().kind, ErrorKind::TypeMismatch);
    }
}
