use crate::data::Scalar;
use crate::error::{ErrorKind, YangError};
use crate::path::DataPath;
use crate::range::{in_ranges, ranges_to_string, Number};
use crate::schema::{TypeKind, YangType};

use super::{check_intervals, type_mismatch, ScalarValidator};

/// Validator for the eight integer types.
///
/// The value must carry the host variant matching the declared width
/// (`Scalar::Uint32` for `uint32`). Values and bounds are compared as
/// [`Number`]s, so unsigned values never pass through a signed conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerValidator;

/// Returns the value as a number if its variant matches `kind`.
fn integer_value(kind: TypeKind, value: &Scalar) -> Option<Number> {
    let n = match (kind, value) {
        (TypeKind::Int8, Scalar::Int8(v)) => Number::from_i64((*v).into()),
        (TypeKind::Int16, Scalar::Int16(v)) => Number::from_i64((*v).into()),
        (TypeKind::Int32, Scalar::Int32(v)) => Number::from_i64((*v).into()),
        (TypeKind::Int64, Scalar::Int64(v)) => Number::from_i64(*v),
        (TypeKind::Uint8, Scalar::Uint8(v)) => Number::from_u64((*v).into()),
        (TypeKind::Uint16, Scalar::Uint16(v)) => Number::from_u64((*v).into()),
        (TypeKind::Uint32, Scalar::Uint32(v)) => Number::from_u64((*v).into()),
        (TypeKind::Uint64, Scalar::Uint64(v)) => Number::from_u64(*v),
        _ => return None,
    };
    Some(n)
}

impl ScalarValidator for IntegerValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind.is_integer()
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        let mut errors = check_intervals(&ty.range, "range", false, path);
        for r in &ty.range {
            for bound in [r.min, r.max] {
                if !ty.bound_fits(&bound) {
                    errors.push(
                        YangError::schema(
                            path.clone(),
                            format!("range bound {} does not fit {}", bound, ty.kind),
                        )
                        .with_got(r.to_string()),
                    );
                }
            }
        }
        errors
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        let Some(n) = integer_value(ty.kind, value) else {
            return vec![type_mismatch(ty, value, path)];
        };
        let ranges = ty.effective_ranges();
        if in_ranges(&ranges, n) {
            return Vec::new();
        }
        vec![
            YangError::new(ErrorKind::Range, path.clone(), "value outside declared range")
                .with_expected(ranges_to_string(&ranges))
                .with_got(value.to_string()),
        ]
    }
}
