//! Schema-guided construction of host records from encoded payloads.
//!
//! [`unmarshal`] fills a [`Record`] from a JSON object, following the
//! schema. Only fields present in the payload are touched; everything else
//! keeps its current value. [`unmarshal_field`] writes a single field, and is
//! the only entry point that accepts a [`TypedValue`].
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use yangtree::{unmarshal, Entry, Payload, Record, RecordType, Scalar, SchemaTree, TypeKind, UnmarshalOptions, YangType};
//!
//! let tree = SchemaTree::new(
//!     Entry::container("system")
//!         .child(Entry::leaf("hostname", YangType::string()))
//!         .child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16))),
//! )
//! .unwrap();
//! let ty = RecordType::builder("System").leaf("Hostname", "hostname").leaf("Mtu", "mtu").build();
//!
//! let mut record = Record::new(ty).with("Hostname", Scalar::from("r1")).unwrap();
//! let payload = json!({"mtu": 1500});
//! let result = unmarshal(tree.root(), &mut record, Payload::Json(&payload), &UnmarshalOptions::new());
//!
//! assert!(result.is_success());
//! assert_eq!(record.leaf("Mtu"), Some(&Scalar::Uint16(1500)));
//! assert_eq!(record.leaf("Hostname"), Some(&Scalar::from("r1")));
//! ```

mod container;
mod json;
mod typed;

use serde_json::Value;

use crate::data::Record;
use crate::error::{ErrorSink, YangError};
use crate::navigate::child_schema;
use crate::path::DataPath;
use crate::schema::SchemaRef;
use crate::validate::child_path;
use crate::ValidationResult;

pub use json::decode_json_leaf;
pub use typed::{decode_typed, TypedValue};

use container::Unmarshaler;

/// Behaviour switches for [`unmarshal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnmarshalOptions {
    /// Discard JSON members with no matching field instead of failing.
    pub ignore_extra_fields: bool,
    /// Keep going after an error and report every error found.
    pub best_effort: bool,
}

impl UnmarshalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_extra_fields(mut self) -> Self {
        self.ignore_extra_fields = true;
        self
    }

    pub fn best_effort(mut self) -> Self {
        self.best_effort = true;
        self
    }

    pub(crate) fn sink(&self) -> ErrorSink {
        if self.best_effort {
            ErrorSink::collect()
        } else {
            ErrorSink::fail_fast()
        }
    }
}

/// An encoded value and its encoding.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// A JSON object graph.
    Json(&'a Value),
    /// A typed point value, for leaf and leaf-list targets only.
    Typed(&'a TypedValue),
}

impl Payload<'_> {
    pub(crate) fn describe(&self) -> String {
        match self {
            Payload::Json(v) => v.to_string(),
            Payload::Typed(v) => v.kind_name().to_string(),
        }
    }
}

/// Populates `record`, described by the container or list `schema`, from a
/// JSON object.
///
/// Absent members leave their fields untouched. Members with no matching
/// field fail the call unless [`UnmarshalOptions::ignore_extra_fields`] is
/// set. Without [`UnmarshalOptions::best_effort`] the first error stops the
/// call; fields set before it keep their new values.
pub fn unmarshal(
    schema: SchemaRef<'_>,
    record: &mut Record,
    payload: Payload<'_>,
    options: &UnmarshalOptions,
) -> ValidationResult<()> {
    tracing::debug!(schema = %schema.path(), "unmarshal");
    let mut u = Unmarshaler::new(options);
    let _ = u.root(schema, record, payload, &DataPath::root());
    u.finish()
}

/// Populates one field of `record` from a payload.
///
/// A [`Payload::Typed`] value is only legal when the field holds a leaf or
/// leaf-list.
///
/// ```rust
/// use yangtree::{unmarshal_field, Entry, Payload, Record, RecordType, Scalar, SchemaTree, TypedValue, TypeKind, UnmarshalOptions, YangType};
///
/// let tree = SchemaTree::new(
///     Entry::container("system").child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16))),
/// )
/// .unwrap();
/// let ty = RecordType::builder("System").leaf("Mtu", "mtu").build();
/// let mut record = Record::new(ty);
///
/// let value = TypedValue::Uint(9000);
/// let result = unmarshal_field(tree.root(), &mut record, "Mtu", Payload::Typed(&value), &UnmarshalOptions::new());
/// assert!(result.is_success());
/// assert_eq!(record.leaf("Mtu"), Some(&Scalar::Uint16(9000)));
/// ```
pub fn unmarshal_field(
    schema: SchemaRef<'_>,
    record: &mut Record,
    field: &str,
    payload: Payload<'_>,
    options: &UnmarshalOptions,
) -> ValidationResult<()> {
    tracing::debug!(schema = %schema.path(), field, "unmarshal field");
    let mut u = Unmarshaler::new(options);
    let ty = std::sync::Arc::clone(record.record_type());
    let path = DataPath::root();

    let Some(def) = ty.field(field) else {
        let _ = u.push(YangError::schema(
            path.push_node(field),
            format!("record type {} has no field {}", ty.name(), field),
        ));
        return u.finish();
    };
    let resolved = match child_schema(schema, def) {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            let _ = u.push(YangError::schema(
                path.push_node(field),
                format!("field {} has no schema node under {}", field, schema.path()),
            ));
            return u.finish();
        }
        Err(e) => {
            let _ = u.push(YangError::schema(path.push_node(field), e.to_string()));
            return u.finish();
        }
    };
    let at = child_path(&path, &resolved.path);
    let _ = u.value(resolved.schema, record, def, payload, &at);
    u.finish()
}
