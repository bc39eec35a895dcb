use std::collections::HashSet;

use crate::data::Scalar;
use crate::error::{ErrorKind, YangError};
use crate::path::DataPath;
use crate::schema::{TypeKind, YangType};

use super::{type_mismatch, ScalarValidator};

/// Validator for `bits`: every set bit must be declared, and no bit may be
/// named twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitsValidator;

impl ScalarValidator for BitsValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind == TypeKind::Bits
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        let mut errors = Vec::new();
        if ty.bits.is_empty() {
            errors.push(YangError::schema(path.clone(), "bits type declares no bits"));
        }
        let mut seen = HashSet::new();
        for name in ty.bits.iter().filter(|n| !seen.insert(n.as_str())) {
            errors.push(YangError::schema(path.clone(), "bit declared twice").with_got(name.clone()));
        }
        errors
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        let Scalar::Bits(names) = value else {
            return vec![type_mismatch(ty, value, path)];
        };
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for name in names {
            if !ty.bits.contains(name) {
                errors.push(
                    YangError::type_mismatch(path.clone(), "bit is not declared")
                        .with_expected(ty.bits.join(" "))
                        .with_got(name.clone()),
                );
            }
            if !seen.insert(name.as_str()) {
                errors.push(
                    YangError::new(ErrorKind::DuplicateValue, path.clone(), "bit set twice")
                        .with_got(name.clone()),
                );
            }
        }
        errors
    }
}
