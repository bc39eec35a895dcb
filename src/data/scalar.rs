//! Leaf values and list keys.

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use base64::Engine;

use crate::range::Number;

/// The value of a leaf, typed the way generated code would type it.
///
/// The host type is fixed by the leaf's YANG type: an `int8` leaf carries
/// `Scalar::Int8`, a `decimal64` leaf carries `Scalar::Decimal64`, and so on.
#[derive(Debug, Clone)]
pub enum Scalar {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Decimal64(f64),
    String(String),
    Bool(bool),
    Empty,
    Binary(Vec<u8>),
    Bits(Vec<String>),
    /// An enumeration or identityref, by name.
    Enum(String),
}

impl Scalar {
    /// Returns the host type name, used in mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Int8(_) => "int8",
            Scalar::Int16(_) => "int16",
            Scalar::Int32(_) => "int32",
            Scalar::Int64(_) => "int64",
            Scalar::Uint8(_) => "uint8",
            Scalar::Uint16(_) => "uint16",
            Scalar::Uint32(_) => "uint32",
            Scalar::Uint64(_) => "uint64",
            Scalar::Decimal64(_) => "decimal64",
            Scalar::String(_) => "string",
            Scalar::Bool(_) => "boolean",
            Scalar::Empty => "empty",
            Scalar::Binary(_) => "binary",
            Scalar::Bits(_) => "bits",
            Scalar::Enum(_) => "enum",
        }
    }

    /// Returns the value as a range-comparable number, for integer and
    /// decimal values.
    pub fn as_number(&self, fraction_digits: u8) -> Option<Number> {
        let n = match self {
            Scalar::Int8(v) => Number::from_i64((*v).into()),
            Scalar::Int16(v) => Number::from_i64((*v).into()),
            Scalar::Int32(v) => Number::from_i64((*v).into()),
            Scalar::Int64(v) => Number::from_i64(*v),
            Scalar::Uint8(v) => Number::from_u64((*v).into()),
            Scalar::Uint16(v) => Number::from_u64((*v).into()),
            Scalar::Uint32(v) => Number::from_u64((*v).into()),
            Scalar::Uint64(v) => Number::from_u64(*v),
            Scalar::Decimal64(v) => return Number::from_decimal(*v, fraction_digits),
            _ => return None,
        };
        Some(n)
    }

    /// Returns the value with bit names sorted, so that two bits values
    /// naming the same set compare equal.
    pub fn normalized(&self) -> Scalar {
        match self {
            Scalar::Bits(names) => {
                let mut names = names.clone();
                names.sort();
                Scalar::Bits(names)
            }
            other => other.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) | Scalar::Enum(s) => Some(s),
            _ => None,
        }
    }

    fn decimal_bits(v: f64) -> u64 {
        if v == 0.0 {
            0
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Int8(a), Scalar::Int8(b)) => a == b,
            (Scalar::Int16(a), Scalar::Int16(b)) => a == b,
            (Scalar::Int32(a), Scalar::Int32(b)) => a == b,
            (Scalar::Int64(a), Scalar::Int64(b)) => a == b,
            (Scalar::Uint8(a), Scalar::Uint8(b)) => a == b,
            (Scalar::Uint16(a), Scalar::Uint16(b)) => a == b,
            (Scalar::Uint32(a), Scalar::Uint32(b)) => a == b,
            (Scalar::Uint64(a), Scalar::Uint64(b)) => a == b,
            (Scalar::Decimal64(a), Scalar::Decimal64(b)) => {
                Scalar::decimal_bits(*a) == Scalar::decimal_bits(*b)
            }
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Empty, Scalar::Empty) => true,
            (Scalar::Binary(a), Scalar::Binary(b)) => a == b,
            (Scalar::Bits(a), Scalar::Bits(b)) => a == b,
            (Scalar::Enum(a), Scalar::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Int8(v) => v.hash(state),
            Scalar::Int16(v) => v.hash(state),
            Scalar::Int32(v) => v.hash(state),
            Scalar::Int64(v) => v.hash(state),
            Scalar::Uint8(v) => v.hash(state),
            Scalar::Uint16(v) => v.hash(state),
            Scalar::Uint32(v) => v.hash(state),
            Scalar::Uint64(v) => v.hash(state),
            Scalar::Decimal64(v) => Scalar::decimal_bits(*v).hash(state),
            Scalar::String(v) | Scalar::Enum(v) => v.hash(state),
            Scalar::Bool(v) => v.hash(state),
            Scalar::Empty => {}
            Scalar::Binary(v) => v.hash(state),
            Scalar::Bits(v) => v.hash(state),
        }
    }
}

/// Canonical string form, as used in list keys and leafref predicates.
impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int8(v) => write!(f, "{}", v),
            Scalar::Int16(v) => write!(f, "{}", v),
            Scalar::Int32(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Uint8(v) => write!(f, "{}", v),
            Scalar::Uint16(v) => write!(f, "{}", v),
            Scalar::Uint32(v) => write!(f, "{}", v),
            Scalar::Uint64(v) => write!(f, "{}", v),
            Scalar::Decimal64(v) => write!(f, "{}", v),
            Scalar::String(v) | Scalar::Enum(v) => f.write_str(v),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Empty => Ok(()),
            Scalar::Binary(v) => f.write_str(&base64::engine::general_purpose::STANDARD.encode(v)),
            Scalar::Bits(v) => f.write_str(&v.join(" ")),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v)
                }
            }
        )*
    };
}

scalar_from! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f64 => Decimal64,
    bool => Bool,
    String => String,
    Vec<u8> => Binary,
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

/// The map key of a keyed list entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListKey {
    /// A list with one key leaf.
    Single(Scalar),
    /// A list with several key leaves, as (record field name, value) pairs
    /// in key order.
    Composite(Vec<(String, Scalar)>),
}

impl ListKey {
    /// Builds a composite key.
    pub fn composite<I, N, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Scalar>,
    {
        ListKey::Composite(
            fields
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }

    /// Looks up one component of a composite key by field name.
    pub fn component(&self, field: &str) -> Option<&Scalar> {
        match self {
            ListKey::Single(_) => None,
            ListKey::Composite(parts) => parts.iter().find(|(n, _)| n == field).map(|(_, v)| v),
        }
    }
}

macro_rules! single_key_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ListKey {
                fn from(v: $ty) -> Self {
                    ListKey::Single(v.into())
                }
            }
        )*
    };
}

single_key_from!(i8, i16, i32, i64, u8, u16, u32, u64, bool, String, &str, Scalar);

impl Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKey::Single(v) => write!(f, "{}", v),
            ListKey::Composite(parts) => {
                let rendered: Vec<_> = parts.iter().map(|(n, v)| format!("{}={}", n, v)).collect();
                f.write_str(&rendered.join(","))
            }
        }
    }
}
