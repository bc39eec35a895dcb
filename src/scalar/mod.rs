//! Scalar type validators.
//!
//! Each YANG built-in type has a [`ScalarValidator`]: a schema sanity check
//! over the type's restrictions and a value check over a [`Scalar`]. The
//! entry points [`validate_scalar`] and [`validate_scalar_slice`] pick the
//! validator from the leaf's schema node, resolving leafref-typed leaves to
//! the type of their target first.
//!
//! # Example
//!
//! ```rust
//! use yangtree::{validate_scalar, DataPath, Entry, Scalar, SchemaTree, TypeKind, YangRange, YangType};
//!
//! let tree = SchemaTree::new(
//!     Entry::leaf("mtu", YangType::new(TypeKind::Uint16).range(vec![YangRange::uint(68, 9216)])),
//! )
//! .unwrap();
//!
//! assert!(validate_scalar(tree.root(), &Scalar::Uint16(1500), &DataPath::root()).is_success());
//! assert!(validate_scalar(tree.root(), &Scalar::Uint16(9217), &DataPath::root()).is_failure());
//! assert!(validate_scalar(tree.root(), &Scalar::Uint32(1500), &DataPath::root()).is_failure());
//! ```

mod binary;
mod bits;
mod decimal;
mod enumeration;
mod integer;
mod simple;
mod string;
mod union;

use std::collections::HashSet;

use stillwater::Validation;

use crate::data::Scalar;
use crate::error::{ErrorKind, YangError, YangErrors};
use crate::navigate::leafref_target;
use crate::path::DataPath;
use crate::range::YangRange;
use crate::schema::{SchemaRef, TypeKind, YangType};
use crate::ValidationResult;

pub use binary::BinaryValidator;
pub use bits::BitsValidator;
pub use decimal::DecimalValidator;
pub use enumeration::EnumerationValidator;
pub use integer::IntegerValidator;
pub use simple::{BooleanValidator, EmptyValidator};
pub use string::StringValidator;
pub use union::UnionValidator;

/// Validation of one YANG built-in type.
///
/// Implementors supply the kind check and the two restriction checks; the
/// provided methods compose them so that a value is only examined once the
/// type's own restrictions are known to be consistent.
pub trait ScalarValidator: Send + Sync {
    /// Returns true if this validator handles `kind`.
    fn accepts_kind(&self, kind: TypeKind) -> bool;

    /// Checks the type's restriction metadata for internal consistency.
    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError>;

    /// Checks a value against the type's restrictions.
    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError>;

    /// Checks that `ty` is of a kind this validator handles and that its
    /// restrictions are consistent.
    fn check_schema(&self, ty: &YangType, path: &DataPath) -> ValidationResult<()> {
        if !self.accepts_kind(ty.kind) {
            return Validation::Failure(YangErrors::single(
                YangError::schema(path.clone(), "validator applied to a type of the wrong kind")
                    .with_got(ty.kind.name()),
            ));
        }
        into_validation(self.check_restrictions(ty, path))
    }

    /// Validates `value` against `ty`.
    fn validate(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> ValidationResult<()> {
        match self.check_schema(ty, path) {
            Validation::Success(()) => into_validation(self.check_value(ty, value, path)),
            failure => failure,
        }
    }
}

/// Returns the validator for a built-in type, or `None` for a leafref,
/// which has no value space of its own.
pub fn validator_for(kind: TypeKind) -> Option<&'static dyn ScalarValidator> {
    let validator: &'static dyn ScalarValidator = match kind {
        TypeKind::Int8
        | TypeKind::Int16
        | TypeKind::Int32
        | TypeKind::Int64
        | TypeKind::Uint8
        | TypeKind::Uint16
        | TypeKind::Uint32
        | TypeKind::Uint64 => &IntegerValidator,
        TypeKind::Decimal64 => &DecimalValidator,
        TypeKind::String => &StringValidator,
        TypeKind::Binary => &BinaryValidator,
        TypeKind::Bits => &BitsValidator,
        TypeKind::Boolean => &BooleanValidator,
        TypeKind::Empty => &EmptyValidator,
        TypeKind::Enumeration | TypeKind::Identityref => &EnumerationValidator,
        TypeKind::Union => &UnionValidator,
        TypeKind::Leafref => return None,
    };
    Some(validator)
}

/// Returns the type a leaf or leaf-list value must satisfy: the declared
/// type, or for a leafref the type of the node it points at.
pub fn value_type<'a>(schema: SchemaRef<'a>, path: &DataPath) -> Result<&'a YangType, YangError> {
    let declared = schema.yang_type().ok_or_else(|| {
        YangError::schema(path.clone(), format!("{} has no type", schema.path()))
    })?;
    if declared.kind != TypeKind::Leafref {
        return Ok(declared);
    }
    let target = leafref_target(schema, path)?;
    target.yang_type().ok_or_else(|| {
        YangError::schema(
            path.clone(),
            format!("leafref target {} has no type", target.path()),
        )
    })
}

/// Validates a value against a type.
///
/// A leafref member type (inside a union) accepts any value here; the
/// integrity of the reference is checked by the leafref resolver.
pub fn validate_type(ty: &YangType, value: &Scalar, path: &DataPath) -> ValidationResult<()> {
    match validator_for(ty.kind) {
        Some(validator) => validator.validate(ty, value, path),
        None => Validation::Success(()),
    }
}

/// Validates the value of a leaf against its schema node.
pub fn validate_scalar(schema: SchemaRef<'_>, value: &Scalar, path: &DataPath) -> ValidationResult<()> {
    match value_type(schema, path) {
        Ok(ty) => validate_type(ty, value, path),
        Err(e) => Validation::Failure(YangErrors::single(e)),
    }
}

/// Validates the values of a leaf-list against its schema node.
///
/// Every element is validated on its own, and any value occurring twice is
/// reported. Bits values are compared with their names sorted.
pub fn validate_scalar_slice(
    schema: SchemaRef<'_>,
    values: &[Scalar],
    path: &DataPath,
) -> ValidationResult<()> {
    let ty = match value_type(schema, path) {
        Ok(ty) => ty,
        Err(e) => return Validation::Failure(YangErrors::single(e)),
    };
    if let Validation::Failure(errors) = check_type(ty, path) {
        return Validation::Failure(errors);
    }

    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for (i, value) in values.iter().enumerate() {
        let at = path.push_index(i);
        if let Validation::Failure(e) = validate_type(ty, value, &at) {
            errors.extend(e);
        }
        if !seen.insert(value.normalized()) {
            errors.push(
                YangError::new(ErrorKind::DuplicateValue, at, "duplicate value in leaf-list")
                    .with_got(value.to_string()),
            );
        }
    }
    into_validation(errors)
}

/// Checks a type's restrictions without a value.
pub fn check_type(ty: &YangType, path: &DataPath) -> ValidationResult<()> {
    match validator_for(ty.kind) {
        Some(validator) => validator.check_schema(ty, path),
        None => Validation::Success(()),
    }
}

pub(crate) fn into_validation(errors: Vec<YangError>) -> ValidationResult<()> {
    match YangErrors::from_vec(errors) {
        None => Validation::Success(()),
        Some(errors) => Validation::Failure(errors),
    }
}

pub(crate) fn type_mismatch(ty: &YangType, value: &Scalar, path: &DataPath) -> YangError {
    YangError::type_mismatch(path.clone(), format!("{} leaf holds a {} value", ty.kind, value.type_name()))
        .with_expected(ty.kind.name())
        .with_got(value.type_name())
}

/// Reports every inverted interval, and every interval with a negative
/// lower bound when `non_negative` is set.
pub(crate) fn check_intervals(
    ranges: &[YangRange],
    what: &str,
    non_negative: bool,
    path: &DataPath,
) -> Vec<YangError> {
    let zero = crate::range::Number::from_u64(0);
    ranges
        .iter()
        .filter_map(|r| {
            if r.is_inverted() {
                Some(
                    YangError::schema(path.clone(), format!("{} has max < min", what))
                        .with_got(r.to_string()),
                )
            } else if non_negative && r.min < zero {
                Some(
                    YangError::schema(path.clone(), format!("{} has a negative bound", what))
                        .with_got(r.to_string()),
                )
            } else {
                None
            }
        })
        .collect()
}
