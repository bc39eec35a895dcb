//! The typed point-value encoding.
//!
//! A [`TypedValue`] carries one leaf or leaf-list value in the form used by
//! management protocols for single-path writes. It never describes a
//! container or a list.

use serde_json::Value;

use crate::data::{local_name, Scalar};
use crate::error::YangError;
use crate::path::DataPath;
use crate::range::MAX_FRACTION_DIGITS;
use crate::schema::{TypeKind, YangType};

use super::json::{decode_json_leaf, integer_scalar, out_of_width};

/// One encoded point value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Int(i64),
    Uint(u64),
    Bool(bool),
    Bytes(Vec<u8>),
    Float(f32),
    Double(f64),
    /// `digits * 10^-precision`.
    Decimal { digits: i64, precision: u32 },
    Leaflist(Vec<TypedValue>),
    /// A JSON-encoded value.
    Json(Vec<u8>),
    /// An RFC 7951 JSON-encoded value.
    JsonIetf(Vec<u8>),
    Ascii(String),
}

impl TypedValue {
    /// Returns the encoding name, used in mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypedValue::String(_) => "string_val",
            TypedValue::Int(_) => "int_val",
            TypedValue::Uint(_) => "uint_val",
            TypedValue::Bool(_) => "bool_val",
            TypedValue::Bytes(_) => "bytes_val",
            TypedValue::Float(_) => "float_val",
            TypedValue::Double(_) => "double_val",
            TypedValue::Decimal { .. } => "decimal_val",
            TypedValue::Leaflist(_) => "leaflist_val",
            TypedValue::Json(_) => "json_val",
            TypedValue::JsonIetf(_) => "json_ietf_val",
            TypedValue::Ascii(_) => "ascii_val",
        }
    }

    /// Parses a JSON or RFC 7951 payload.
    pub(crate) fn parse_json(bytes: &[u8], path: &DataPath) -> Result<Value, YangError> {
        serde_json::from_slice(bytes).map_err(|e| {
            YangError::type_mismatch(path.clone(), format!("typed value holds invalid JSON: {}", e))
        })
    }
}

/// Decodes a typed value into the host value of a leaf of type `ty`.
///
/// `ty` must already be resolved past any leafref.
///
/// ```rust
/// use yangtree::{decode_typed, DataPath, Scalar, TypedValue, TypeKind, YangType};
///
/// let ty = YangType::new(TypeKind::Uint8);
/// assert_eq!(decode_typed(&ty, &TypedValue::Uint(42), &DataPath::root()).unwrap(), Scalar::Uint8(42));
/// assert!(decode_typed(&ty, &TypedValue::Uint(300), &DataPath::root()).is_err());
/// ```
pub fn decode_typed(ty: &YangType, value: &TypedValue, path: &DataPath) -> Result<Scalar, YangError> {
    let mismatch = || {
        YangError::type_mismatch(
            path.clone(),
            format!("{} cannot hold a {} leaf", value.kind_name(), ty.kind),
        )
        .with_expected(ty.kind.name())
        .with_got(value.kind_name())
    };

    match (ty.kind, value) {
        (_, TypedValue::Json(bytes) | TypedValue::JsonIetf(bytes)) => {
            decode_json_leaf(ty, &TypedValue::parse_json(bytes, path)?, path)
        }
        (TypeKind::Union, _) => decode_union(ty, value, path),
        (kind, TypedValue::Int(v)) if kind.is_integer() => {
            integer_scalar(kind, (*v).into()).ok_or_else(|| out_of_width(ty, i128::from(*v), path))
        }
        (kind, TypedValue::Uint(v)) if kind.is_integer() => {
            integer_scalar(kind, (*v).into()).ok_or_else(|| out_of_width(ty, i128::from(*v), path))
        }
        (TypeKind::Decimal64, TypedValue::Decimal { digits, precision }) => {
            if *precision > u32::from(MAX_FRACTION_DIGITS) {
                return Err(mismatch());
            }
            Ok(Scalar::Decimal64(*digits as f64 / 10f64.powi(*precision as i32)))
        }
        (TypeKind::Decimal64, TypedValue::Double(v)) if v.is_finite() => Ok(Scalar::Decimal64(*v)),
        (TypeKind::Decimal64, TypedValue::Float(v)) if v.is_finite() => Ok(Scalar::Decimal64((*v).into())),
        (TypeKind::String, TypedValue::String(s) | TypedValue::Ascii(s)) => Ok(Scalar::String(s.clone())),
        (TypeKind::Boolean, TypedValue::Bool(b)) => Ok(Scalar::Bool(*b)),
        (TypeKind::Empty, TypedValue::Bool(true)) => Ok(Scalar::Empty),
        (TypeKind::Binary, TypedValue::Bytes(b)) => Ok(Scalar::Binary(b.clone())),
        (TypeKind::Enumeration | TypeKind::Identityref, TypedValue::String(s)) => {
            let name = local_name(s);
            if ty.enums.is_empty() || ty.enums.iter().any(|e| e == name) {
                Ok(Scalar::Enum(name.to_string()))
            } else {
                Err(YangError::type_mismatch(path.clone(), format!("{} is not a member of the {}", name, ty.kind))
                    .with_expected(ty.enums.join(" | "))
                    .with_got(name))
            }
        }
        (TypeKind::Bits, TypedValue::String(s)) => decode_json_leaf(ty, &Value::String(s.clone()), path),
        _ => Err(mismatch()),
    }
}

fn decode_union(ty: &YangType, value: &TypedValue, path: &DataPath) -> Result<Scalar, YangError> {
    ty.union
        .iter()
        .filter(|member| member.kind != TypeKind::Leafref)
        .find_map(|member| {
            decode_typed(member, value, path)
                .ok()
                .filter(|s| crate::scalar::validate_type(member, s, path).is_success())
        })
        .ok_or_else(|| {
            let members: Vec<_> = ty.union.iter().map(|m| m.kind.name()).collect();
            YangError::type_mismatch(path.clone(), "no union member accepts the value")
                .with_expected(members.join(" | "))
                .with_got(value.kind_name())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn root() -> DataPath {
        DataPath::root()
    }

    #[test]
    fn test_integer_narrowing() {
        let ty = YangType::new(TypeKind::Int8);
        assert_eq!(decode_typed(&ty, &TypedValue::Int(-128), &root()).unwrap(), Scalar::Int8(-128));
        let err = decode_typed(&ty, &TypedValue::Int(128), &root()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Range);
        assert_eq!(decode_typed(&ty, &TypedValue::Uint(7), &root()).unwrap(), Scalar::Int8(7));
    }

    #[test]
    fn test_decimal_from_digits() {
        let ty = YangType::decimal64(2);
        let v = decode_typed(&ty, &TypedValue::Decimal { digits: 314, precision: 2 }, &root()).unwrap();
        assert_eq!(v, Scalar::Decimal64(3.14));
        assert!(decode_typed(&ty, &TypedValue::Decimal { digits: 1, precision: 19 }, &root()).is_err());
    }

    #[test]
    fn test_wrong_encoding_for_kind() {
        let err = decode_typed(&YangType::string(), &TypedValue::Int(1), &root()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.got.as_deref(), Some("int_val"));
    }

    #[test]
    fn test_json_payload() {
        let ty = YangType::new(TypeKind::Uint64);
        let v = decode_typed(&ty, &TypedValue::JsonIetf(b"\"18446744073709551615\"".to_vec()), &root()).unwrap();
        assert_eq!(v, Scalar::Uint64(u64::MAX));
        assert!(decode_typed(&ty, &TypedValue::Json(b"{".to_vec()), &root()).is_err());
    }

    #[test]
    fn test_identityref_prefix_stripped() {
        let ty = YangType::identityref(["ethernetCsmacd"]);
        let v = decode_typed(&ty, &TypedValue::String("iana-if-type:ethernetCsmacd".into()), &root()).unwrap();
        assert_eq!(v, Scalar::Enum("ethernetCsmacd".into()));
    }

    #[test]
    fn test_union_prefers_first_accepting_member() {
        let ty = YangType::union(vec![YangType::new(TypeKind::Uint16), YangType::string()]);
        assert_eq!(decode_typed(&ty, &TypedValue::Uint(80), &root()).unwrap(), Scalar::Uint16(80));
        assert_eq!(
            decode_typed(&ty, &TypedValue::String("any".into()), &root()).unwrap(),
            Scalar::String("any".into())
        );
        assert!(decode_typed(&ty, &TypedValue::Bool(true), &root()).is_err());
    }
}
