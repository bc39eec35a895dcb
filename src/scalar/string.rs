use crate::data::Scalar;
use crate::error::{ErrorKind, YangError};
use crate::path::DataPath;
use crate::range::{in_ranges, ranges_to_string, Number};
use crate::schema::{TypeKind, YangType};

use super::{check_intervals, type_mismatch, ScalarValidator};

/// Validator for `string`: `length` counts characters, and every `pattern`
/// must match the whole value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValidator;

impl ScalarValidator for StringValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind == TypeKind::String
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        check_intervals(&ty.length, "length", true, path)
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        let Scalar::String(s) = value else {
            return vec![type_mismatch(ty, value, path)];
        };
        let mut errors = Vec::new();

        let len = s.chars().count() as u64;
        if !in_ranges(&ty.length, Number::from_u64(len)) {
            errors.push(
                YangError::new(ErrorKind::Length, path.clone(), "string length outside declared length")
                    .with_expected(ranges_to_string(&ty.length))
                    .with_got(len.to_string()),
            );
        }

        for pattern in ty.patterns.iter().filter(|p| !p.is_match(s)) {
            errors.push(
                YangError::new(ErrorKind::Pattern, path.clone(), "string does not match pattern")
                    .with_expected(pattern.source())
                    .with_got(s.clone()),
            );
        }
        errors
    }
}
