use crate::data::Scalar;
use crate::error::{ErrorKind, YangError};
use crate::path::DataPath;
use crate::range::{in_ranges, ranges_to_string, Number, MAX_FRACTION_DIGITS};
use crate::schema::{TypeKind, YangType};

use super::{check_intervals, type_mismatch, ScalarValidator};

/// Validator for `decimal64`. Values are carried as `f64` and compared at
/// the type's declared precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalValidator;

impl ScalarValidator for DecimalValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind == TypeKind::Decimal64
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        let mut errors = check_intervals(&ty.range, "range", false, path);
        if !ty.has_valid_fraction_digits() {
            errors.push(
                YangError::schema(path.clone(), "fraction-digits out of bounds")
                    .with_expected(format!("1..{}", MAX_FRACTION_DIGITS))
                    .with_got(ty.fraction_digits.to_string()),
            );
        }
        errors
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        let Scalar::Decimal64(v) = value else {
            return vec![type_mismatch(ty, value, path)];
        };
        let Some(n) = Number::from_decimal(*v, ty.fraction_digits) else {
            return vec![
                YangError::new(ErrorKind::Range, path.clone(), "value not representable as decimal64")
                    .with_expected(format!("{} fraction digits", ty.fraction_digits))
                    .with_got(v.to_string()),
            ];
        };
        if in_ranges(&ty.range, n) {
            return Vec::new();
        }
        vec![
            YangError::new(ErrorKind::Range, path.clone(), "value outside declared range")
                .with_expected(ranges_to_string(&ty.range))
                .with_got(n.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::YangRange;

    #[test]
    fn test_range_at_precision() {
        let ty = YangType::decimal64(2).range(vec![YangRange::new(
            Number::from_scaled(-150, 2),
            Number::from_scaled(150, 2),
        )]);
        let path = DataPath::root();
        assert!(DecimalValidator.check_value(&ty, &Scalar::Decimal64(1.5), &path).is_empty());
        assert!(DecimalValidator.check_value(&ty, &Scalar::Decimal64(-1.5), &path).is_empty());
        let errors = DecimalValidator.check_value(&ty, &Scalar::Decimal64(1.51), &path);
        assert_eq!(errors[0].kind, ErrorKind::Range);
        assert_eq!(errors[0].got.as_deref(), Some("1.51"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let ty = YangType::decimal64(2);
        let errors = DecimalValidator.check_value(&ty, &Scalar::Decimal64(f64::NAN), &DataPath::root());
        assert_eq!(errors[0].kind, ErrorKind::Range);
    }

    #[test]
    fn test_host_type_must_be_float() {
        let errors = DecimalValidator.check_value(&YangType::decimal64(1), &Scalar::Int64(1), &DataPath::root());
        assert_eq!(errors[0].kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_fraction_digits_checked() {
        assert_eq!(DecimalValidator.check_restrictions(&YangType::decimal64(0), &DataPath::root()).len(), 1);
        assert_eq!(DecimalValidator.check_restrictions(&YangType::decimal64(19), &DataPath::root()).len(), 1);
        assert!(DecimalValidator.check_restrictions(&YangType::decimal64(18), &DataPath::root()).is_empty());
    }
}
