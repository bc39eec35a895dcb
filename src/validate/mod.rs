//! Tree validation.
//!
//! [`validate`] checks a host data tree against the schema node that
//! describes it. Dispatch is on the schema kind; containers and list
//! entries accumulate errors across their fields, so one malformed field
//! never hides problems in its siblings.
//!
//! # Example
//!
//! ```rust
//! use yangtree::{validate_record, Entry, Record, RecordType, Scalar, SchemaTree, TypeKind, YangType};
//!
//! let tree = SchemaTree::new(
//!     Entry::container("system")
//!         .child(Entry::leaf("hostname", YangType::string()))
//!         .child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16))),
//! )
//! .unwrap();
//! let ty = RecordType::builder("System")
//!     .leaf("Hostname", "hostname")
//!     .leaf("Mtu", "mtu")
//!     .build();
//!
//! let good = Record::new(ty.clone()).with("Mtu", Scalar::Uint16(1500)).unwrap();
//! assert!(validate_record(tree.root(), &good).is_success());
//!
//! let bad = Record::new(ty).with("Mtu", Scalar::from("1500")).unwrap();
//! assert!(validate_record(tree.root(), &bad).is_failure());
//! ```

mod choice;
mod container;
mod list;

use stillwater::Validation;

use crate::data::{DataNode, Record};
use crate::error::{ErrorKind, YangError, YangErrors};
use crate::path::DataPath;
use crate::scalar::{validate_scalar, validate_scalar_slice};
use crate::schema::{Kind, SchemaRef};
use crate::ValidationResult;

pub use choice::{validate_choice, ChoiceOutcome};

/// Validates `value` against `schema`.
pub fn validate(schema: SchemaRef<'_>, value: &DataNode) -> ValidationResult<()> {
    validate_node(schema, value, &DataPath::root())
}

/// Validates a container record, or a single list entry, against `schema`.
pub fn validate_record(schema: SchemaRef<'_>, record: &Record) -> ValidationResult<()> {
    validate_record_at(schema, record, &DataPath::root())
}

/// Validates a possibly absent value against a possibly absent schema.
///
/// An absent value is always valid. A value with no schema is a schema
/// error.
pub fn validate_optional(schema: Option<SchemaRef<'_>>, value: Option<&DataNode>) -> ValidationResult<()> {
    match (schema, value) {
        (_, None) => Validation::Success(()),
        (None, Some(v)) => fail(YangError::schema(
            DataPath::root(),
            format!("no schema for {} value", v.shape_name()),
        )),
        (Some(schema), Some(v)) => validate(schema, v),
    }
}

pub(crate) fn validate_node(schema: SchemaRef<'_>, value: &DataNode, path: &DataPath) -> ValidationResult<()> {
    tracing::trace!(schema = %schema.path(), path = %path, "validate");
    match (schema.kind(), value) {
        (Kind::Leaf, DataNode::Leaf(scalar)) => validate_scalar(schema, scalar, path),
        (Kind::LeafList, DataNode::LeafList(values)) => {
            let mut errors: Vec<YangError> = list::check_list_attr(schema, values.len(), path)
                .into_iter()
                .collect();
            if let Validation::Failure(e) = validate_scalar_slice(schema, values, path) {
                errors.extend(e);
            }
            crate::scalar::into_validation(errors)
        }
        (Kind::List, value) => list::validate_list(schema, value, path),
        (Kind::Container, DataNode::Container(record)) => validate_record_at(schema, record, path),
        (Kind::Choice | Kind::Case, _) => fail(YangError::schema(
            path.clone(),
            format!(
                "{} {} is validated as part of its container",
                schema.kind().name(),
                schema.name()
            ),
        )),
        (kind, value) => fail(
            YangError::type_mismatch(path.clone(), format!("{} schema with {} value", kind.name(), value.shape_name()))
                .with_expected(kind.name())
                .with_got(value.shape_name()),
        ),
    }
}

pub(crate) fn validate_record_at(schema: SchemaRef<'_>, record: &Record, path: &DataPath) -> ValidationResult<()> {
    if !(schema.is_container() || schema.is_list()) {
        return fail(
            YangError::type_mismatch(path.clone(), format!("{} schema with record value", schema.kind().name()))
                .with_got("record"),
        );
    }
    container::validate_container(schema, record, path)
}

fn fail(error: YangError) -> ValidationResult<()> {
    Validation::Failure(YangErrors::single(error))
}

/// Appends a path tag's resolved segments to `path`.
pub(crate) fn child_path(path: &DataPath, segments: &[String]) -> DataPath {
    segments.iter().fold(path.clone(), |p, s| p.push_node(s.as_str()))
}

pub(crate) fn unexpected_fields(schema: SchemaRef<'_>, names: &[&str], path: &DataPath) -> YangError {
    YangError::new(
        ErrorKind::UnexpectedField,
        path.clone(),
        format!("unexpected fields in {}", schema.path()),
    )
    .with_got(names.join(", "))
}
