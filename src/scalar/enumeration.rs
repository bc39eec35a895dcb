use crate::data::{local_name, Scalar};
use crate::error::YangError;
use crate::path::DataPath;
use crate::schema::{TypeKind, YangType};

use super::{type_mismatch, ScalarValidator};

/// Validator for `enumeration` and `identityref`.
///
/// Both carry `Scalar::Enum` holding a name from the type's declared set.
/// A module prefix on an identity name is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerationValidator;

impl ScalarValidator for EnumerationValidator {
    fn accepts_kind(&self, kind: TypeKind) -> bool {
        matches!(kind, TypeKind::Enumeration | TypeKind::Identityref)
    }

    fn check_restrictions(&self, ty: &YangType, path: &DataPath) -> Vec<YangError> {
        if ty.kind == TypeKind::Enumeration && ty.enums.is_empty() {
            vec![YangError::schema(path.clone(), "enumeration declares no enums")]
        } else {
            Vec::new()
        }
    }

    fn check_value(&self, ty: &YangType, value: &Scalar, path: &DataPath) -> Vec<YangError> {
        let Scalar::Enum(name) = value else {
            return vec![type_mismatch(ty, value, path)];
        };
        let name = match ty.kind {
            TypeKind::Identityref => local_name(name),
            _ => name.as_str(),
        };
        if ty.enums.iter().any(|e| e == name) {
            return Vec::new();
        }
        let what = if ty.kind == TypeKind::Identityref {
            "identity is not derived from the base"
        } else {
            "value is not a member of the enumeration"
        };
        vec![YangError::type_mismatch(path.clone(), what)
            .with_expected(ty.enums.join(" | "))
            .with_got(name)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_membership() {
        let ty = YangType::enumeration(["UP", "DOWN"]);
        let path = DataPath::root();
        assert!(EnumerationValidator.check_value(&ty, &Scalar::Enum("UP".into()), &path).is_empty());
        let errors = EnumerationValidator.check_value(&ty, &Scalar::Enum("up".into()), &path);
        assert_eq!(errors[0].expected.as_deref(), Some("UP | DOWN"));
        assert_eq!(EnumerationValidator.check_value(&ty, &Scalar::from("UP"), &path).len(), 1);
    }

    #[test]
    fn test_identity_prefix_ignored() {
        let ty = YangType::identityref(["ethernetCsmacd", "softwareLoopback"]);
        let path = DataPath::root();
        let qualified = Scalar::Enum("iana-if-type:ethernetCsmacd".into());
        assert!(EnumerationValidator.check_value(&ty, &qualified, &path).is_empty());
        assert_eq!(EnumerationValidator.check_value(&ty, &Scalar::Enum("atm".into()), &path).len(), 1);
    }

    #[test]
    fn test_empty_enumeration_is_schema_error() {
        let ty = YangType::enumeration(Vec::<String>::new());
        assert_eq!(EnumerationValidator.check_restrictions(&ty, &DataPath::root()).len(), 1);
    }
}
