use crate::data::Scalar;
use crate::error::{ErrorKind, YangError};
use crate::path::DataPath;
use crate::range::{in_ranges, ranges_to_string, Number};
use crate::schema::{TypeKind, YangType};

use super::{check_intervals, type_mismatch, ScalarValidator};

/// Validator for `binary`; `length` counts octets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryValidator;

impl ScalarValidator for BinaryValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind == TypeKind::Binary
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        check_intervals(&ty.length, "length", true, path)
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        let Scalar::Binary(bytes) = value else {
            return vec![type_mismatch(ty, value, path)];
        };
        let len = bytes.len() as u64;
        if in_ranges(&ty.length, Number::from_u64(len)) {
            return Vec::new();
        }
        vec![
            YangError::new(ErrorKind::Length, path.clone(), "binary length outside declared length")
                .with_expected(ranges_to_string(&ty.length))
                .with_got(len.to_string()),
        ]
    }
}
