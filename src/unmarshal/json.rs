//! RFC 7951 decoding of JSON leaf values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::data::{local_name, Scalar};
use crate::error::{ErrorKind, YangError};
use crate::path::DataPath;
use crate::range::ranges_to_string;
use crate::schema::{TypeKind, YangType};

/// Decodes a JSON value into the host value of a leaf of type `ty`.
///
/// Follows RFC 7951: `int64`, `uint64` and `decimal64` may arrive as
/// strings, `empty` is `[null]`, `binary` is base64 and `bits` is a
/// space-separated string. Enumeration and identity names may carry a
/// module prefix. Integers are narrowed to the declared width; other
/// restrictions are left to validation.
///
/// ```rust
/// use serde_json::json;
/// use yangtree::{decode_json_leaf, DataPath, Scalar, TypeKind, YangType};
///
/// let ty = YangType::new(TypeKind::Int64);
/// let v = decode_json_leaf(&ty, &json!("-9223372036854775808"), &DataPath::root()).unwrap();
/// assert_eq!(v, Scalar::Int64(i64::MIN));
///
/// let ty = YangType::new(TypeKind::Int8);
/// assert!(decode_json_leaf(&ty, &json!(1.5), &DataPath::root()).is_err());
/// ```
pub fn decode_json_leaf(ty: &YangType, value: &Value, path: &DataPath) -> Result<Scalar, YangError> {
    let mismatch = |expected: &str| {
        YangError::type_mismatch(path.clone(), format!("JSON value cannot hold a {} leaf", ty.kind))
            .with_expected(expected)
            .with_got(value.to_string())
    };

    match ty.kind {
        kind if kind.is_integer() => {
            let wide = matches!(kind, TypeKind::Int64 | TypeKind::Uint64);
            let n = match value {
                Value::Number(n) => json_integer(n).ok_or_else(|| mismatch("an integral number"))?,
                Value::String(s) if wide => s.trim().parse::<i128>().map_err(|_| mismatch("an integer string"))?,
                _ => return Err(mismatch("a number")),
            };
            integer_scalar(kind, n).ok_or_else(|| out_of_width(ty, n, path))
        }
        TypeKind::Decimal64 => {
            let v = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            v.filter(|v| v.is_finite())
                .map(Scalar::Decimal64)
                .ok_or_else(|| mismatch("a decimal number or string"))
        }
        TypeKind::String => value
            .as_str()
            .map(|s| Scalar::String(s.to_string()))
            .ok_or_else(|| mismatch("a string")),
        TypeKind::Boolean => value.as_bool().map(Scalar::Bool).ok_or_else(|| mismatch("true or false")),
        TypeKind::Empty => match value.as_array().map(Vec::as_slice) {
            Some([Value::Null]) => Ok(Scalar::Empty),
            _ => Err(mismatch("[null]")),
        },
        TypeKind::Binary => {
            let s = value.as_str().ok_or_else(|| mismatch("a base64 string"))?;
            STANDARD
                .decode(s)
                .map(Scalar::Binary)
                .map_err(|e| mismatch("a base64 string").with_got(format!("{} ({})", value, e)))
        }
        TypeKind::Bits => {
            let s = value.as_str().ok_or_else(|| mismatch("a space-separated string of bit names"))?;
            Ok(Scalar::Bits(s.split_whitespace().map(str::to_string).collect()))
        }
        TypeKind::Enumeration | TypeKind::Identityref => {
            let s = value.as_str().ok_or_else(|| mismatch("a name string"))?;
            let name = local_name(s);
            if !ty.enums.is_empty() && !ty.enums.iter().any(|e| e == name) {
                return Err(YangError::type_mismatch(
                    path.clone(),
                    format!("{} is not a member of the {}", name, ty.kind),
                )
                .with_expected(ty.enums.join(" | "))
                .with_got(name));
            }
            Ok(Scalar::Enum(name.to_string()))
        }
        TypeKind::Union => decode_union(ty, value, path),
        TypeKind::Leafref => Err(YangError::schema(path.clone(), "leafref type must be resolved before decoding")),
        // Every integer kind is handled by the first arm.
        _ => Err(mismatch(ty.kind.name())),
    }
}

fn decode_union(ty: &YangType, value: &Value, path: &DataPath) -> Result<Scalar, YangError> {
    ty.union
        .iter()
        .filter(|member| member.kind != TypeKind::Leafref)
        .find_map(|member| {
            decode_json_leaf(member, value, path)
                .ok()
                .filter(|s| crate::scalar::validate_type(member, s, path).is_success())
        })
        .ok_or_else(|| {
            let members: Vec<_> = ty.union.iter().map(|m| m.kind.name()).collect();
            YangError::type_mismatch(path.clone(), "no union member accepts the value")
                .with_expected(members.join(" | "))
                .with_got(value.to_string())
        })
}

fn json_integer(n: &serde_json::Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.into());
    }
    let f = n.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= u64::MAX as f64).then_some(f as i128)
}

/// Narrows an integer to the host value of an integer kind.
pub(crate) fn integer_scalar(kind: TypeKind, v: i128) -> Option<Scalar> {
    let scalar = match kind {
        TypeKind::Int8 => Scalar::Int8(i8::try_from(v).ok()?),
        TypeKind::Int16 => Scalar::Int16(i16::try_from(v).ok()?),
        TypeKind::Int32 => Scalar::Int32(i32::try_from(v).ok()?),
        TypeKind::Int64 => Scalar::Int64(i64::try_from(v).ok()?),
        TypeKind::Uint8 => Scalar::Uint8(u8::try_from(v).ok()?),
        TypeKind::Uint16 => Scalar::Uint16(u16::try_from(v).ok()?),
        TypeKind::Uint32 => Scalar::Uint32(u32::try_from(v).ok()?),
        TypeKind::Uint64 => Scalar::Uint64(u64::try_from(v).ok()?),
        _ => return None,
    };
    Some(scalar)
}

pub(crate) fn out_of_width(ty: &YangType, v: i128, path: &DataPath) -> YangError {
    let bounds: Vec<_> = ty.kind.integer_bounds().into_iter().collect();
    YangError::new(
        ErrorKind::Range,
        path.clone(),
        format!("value does not fit in {}", ty.kind),
    )
    .with_expected(ranges_to_string(&bounds))
    .with_got(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(ty: &YangType, v: Value) -> Result<Scalar, YangError> {
        decode_json_leaf(ty, &v, &DataPath::from_node("leaf"))
    }

    #[test]
    fn test_integer_width_checked() {
        let ty = YangType::new(TypeKind::Uint8);
        assert_eq!(decode(&ty, json!(255)).unwrap(), Scalar::Uint8(255));
        assert_eq!(decode(&ty, json!(3.0)).unwrap(), Scalar::Uint8(3));

        let err = decode(&ty, json!(256)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Range);
        assert_eq!(err.expected.as_deref(), Some("0..255"));

        assert_eq!(decode(&ty, json!(-1)).unwrap_err().kind, ErrorKind::Range);
        assert_eq!(decode(&ty, json!("7")).unwrap_err().kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_sixty_four_bit_strings() {
        let ty = YangType::new(TypeKind::Uint64);
        assert_eq!(decode(&ty, json!("18446744073709551615")).unwrap(), Scalar::Uint64(u64::MAX));
        assert_eq!(decode(&ty, json!(u64::MAX)).unwrap(), Scalar::Uint64(u64::MAX));
        assert!(decode(&ty, json!("x")).is_err());
    }

    #[test]
    fn test_decimal_number_or_string() {
        let ty = YangType::decimal64(2);
        assert_eq!(decode(&ty, json!(1.25)).unwrap(), Scalar::Decimal64(1.25));
        assert_eq!(decode(&ty, json!("1.25")).unwrap(), Scalar::Decimal64(1.25));
        assert!(decode(&ty, json!(true)).is_err());
    }

    #[test]
    fn test_empty_and_boolean() {
        let empty = YangType::new(TypeKind::Empty);
        assert_eq!(decode(&empty, json!([null])).unwrap(), Scalar::Empty);
        assert!(decode(&empty, json!(null)).is_err());

        let boolean = YangType::new(TypeKind::Boolean);
        assert_eq!(decode(&boolean, json!(false)).unwrap(), Scalar::Bool(false));
        assert!(decode(&boolean, json!("false")).is_err());
    }

    #[test]
    fn test_binary_base64() {
        let ty = YangType::new(TypeKind::Binary);
        assert_eq!(decode(&ty, json!("AQID")).unwrap(), Scalar::Binary(vec![1, 2, 3]));
        assert!(decode(&ty, json!("***")).is_err());
    }

    #[test]
    fn test_bits_and_enumerations() {
        let bits = YangType::bits(["up", "running"]);
        assert_eq!(
            decode(&bits, json!("up  running")).unwrap(),
            Scalar::Bits(vec!["up".into(), "running".into()])
        );

        let enumeration = YangType::enumeration(["UP", "DOWN"]);
        assert_eq!(decode(&enumeration, json!("openconfig-if:UP")).unwrap(), Scalar::Enum("UP".into()));
        let err = decode(&enumeration, json!("TESTING")).unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("UP | DOWN"));
    }

    #[test]
    fn test_union_members_tried_in_order() {
        let ty = YangType::union(vec![
            YangType::new(TypeKind::Uint16),
            YangType::enumeration(["auto"]),
        ]);
        assert_eq!(decode(&ty, json!(443)).unwrap(), Scalar::Uint16(443));
        assert_eq!(decode(&ty, json!("auto")).unwrap(), Scalar::Enum("auto".into()));
        let err = decode(&ty, json!("manual")).unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("uint16 | enumeration"));
    }
}
