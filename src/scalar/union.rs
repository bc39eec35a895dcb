use crate::data::Scalar;
use crate::error::YangError;
use crate::path::DataPath;
use crate::schema::{TypeKind, YangType};

use super::{check_type, validate_type, ScalarValidator};

/// Validator for `union`: a value is valid if any member type accepts it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionValidator;

impl ScalarValidator for UnionValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        kind == TypeKind::Union
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        if ty.union.is_empty() {
            return vec![YangError::schema(path.clone(), "union declares no member types")];
        }
        ty.union
            .iter()
            .flat_map(|member| check_type(member, path).into_result().err())
            .flatten()
            .collect()
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        if ty
            .union
            .iter()
            .any(|member| validate_type(member, value, path).is_success())
        {
            return Vec::new();
        }
        let members: Vec<_> = ty.union.iter().map(|m| m.kind.name()).collect();
        vec![YangError::type_mismatch(path.clone(), "value matches no member of the union")
            .with_expected(members.join(" | "))
            .with_got(value.to_string())]
    }
}
