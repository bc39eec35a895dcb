//! # yangtree
//!
//! Schema-driven validation and unmarshaling of YANG-modeled data trees.
//!
//! ## Overview
//!
//! Generated code describes each YANG container and list entry as a
//! [`RecordType`]: named fields, each carrying a path tag that says which
//! schema node it holds. Given the compiled schema as a [`SchemaTree`], this
//! crate
//!
//! - validates populated [`Record`]s against ranges, lengths, patterns, list
//!   keys, element counts and choice exclusivity ([`validate_record`]),
//! - fills records from RFC 7951 JSON or typed point values without
//!   disturbing fields absent from the payload ([`unmarshal`]),
//! - checks that every leafref points at an existing value
//!   ([`resolve_leafrefs`]).
//!
//! Tree-level operations return a [`ValidationResult`], which carries every
//! error found rather than stopping at the first one.
//!
//! ## Core Types
//!
//! - [`DataPath`]: The location of a value in a data tree (e.g. `/interfaces/interface[eth0]/mtu`)
//! - [`YangError`]: A single failure with context (path, kind, expected/got values)
//! - [`YangErrors`]: A non-empty collection of failures
//! - [`SchemaRef`]: A handle on one node of the read-only schema graph
//!
//! ## Example
//!
//! ```rust
//! use yangtree::{validate_record, Entry, Record, RecordType, Scalar, SchemaTree, TypeKind, YangRange, YangType};
//!
//! let tree = SchemaTree::new(
//!     Entry::container("system")
//!         .child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16).range(vec![YangRange::uint(68, 9216)]))),
//! )
//! .unwrap();
//! let ty = RecordType::builder("System").leaf("Mtu", "mtu").build();
//!
//! let record = Record::new(ty.clone()).with("Mtu", Scalar::Uint16(1500)).unwrap();
//! assert!(validate_record(tree.root(), &record).is_success());
//!
//! let record = Record::new(ty).with("Mtu", Scalar::Uint16(20)).unwrap();
//! let errors = validate_record(tree.root(), &record).into_result().unwrap_err();
//! assert_eq!(errors.first().path.to_string(), "/mtu");
//! ```

pub mod data;
pub mod error;
pub mod leafref;
pub mod navigate;
pub mod path;
pub mod range;
pub mod registry;
pub mod scalar;
pub mod schema;
pub mod unmarshal;
pub mod validate;
pub mod walk;

pub use data::{
    local_name, DataNode, FieldDef, FieldShape, ListKey, PathTag, PathTagError, Record, RecordError, RecordType,
    RecordTypeBuilder, Scalar,
};
pub use error::{ErrorKind, ErrorSink, Policy, YangError, YangErrors};
pub use leafref::{resolve_leafrefs, LeafrefOptions, LeafrefPath, LeafrefPathError, PredicateValue, Step};
pub use navigate::{child_schema, field_for_schema_name, leafref_target, ResolvedField};
pub use path::{DataPath, PathSegment};
pub use range::{in_range, in_ranges, Number, YangRange};
pub use registry::{Model, ModelRegistry, RegistryError};
pub use scalar::{validate_scalar, validate_scalar_slice, ScalarValidator};
pub use schema::{Entry, Kind, ListAttr, SchemaBuildError, SchemaRef, SchemaTree, TypeKind, YangType};
pub use unmarshal::{decode_json_leaf, decode_typed, unmarshal, unmarshal_field, Payload, TypedValue, UnmarshalOptions};
pub use validate::{validate, validate_choice, validate_optional, validate_record, ChoiceOutcome};
pub use walk::{for_each_node, NodeInfo, NodeValue};

/// Type alias for tree-level results carrying every error found.
pub type ValidationResult<T> = stillwater::Validation<T, YangErrors>;
