//! `boolean` and `empty`, which carry no restrictions of their own.

use crate::data::Scalar;
use crate::error::YangError;
use crate::path::DataPath;
use crate::schema::{TypeKind, YangType};

use super::{type_mismatch, ScalarValidator};

fn no_restrictions(ty: &YangType, path: &DataPath) -> Vec<YangError> {
    if ty.range.is_empty() && ty.length.is_empty() && ty.patterns.is_empty() {
        Vec::new()
    } else {
        vec![YangError::schema(
            path.clone(),
            format!("{} type cannot carry range, length or pattern restrictions", ty.kind),
        )]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValidator;

impl ScalarValidator for BooleanValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind == TypeKind::Boolean
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        no_restrictions(ty, path)
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        match value {
            Scalar::Bool(_) => Vec::new(),
            other => vec![type_mismatch(ty, other, path)],
        }
    }
}

/// An `empty` leaf is either present or absent; presence is
/// `Scalar::Empty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyValidator;

impl ScalarValidator for EmptyValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind == TypeKind::Empty
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        no_restrictions(ty, path)
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        match value {
            Scalar::Empty => Vec::new(),
            other => vec![type_mismatch(ty, other, path)],
        }
    }
}
