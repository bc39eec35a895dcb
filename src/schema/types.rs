//! Leaf type descriptors.

use std::fmt::{self, Display};

use regex::Regex;

use crate::range::{Number, YangRange, MAX_FRACTION_DIGITS};

/// The YANG built-in type of a leaf or leaf-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64,
    String,
    Boolean,
    Empty,
    Binary,
    Bits,
    Enumeration,
    Identityref,
    Leafref,
    Union,
}

impl TypeKind {
    /// Returns the YANG spelling of this type.
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Int8 => "int8",
            TypeKind::Int16 => "int16",
            TypeKind::Int32 => "int32",
            TypeKind::Int64 => "int64",
            TypeKind::Uint8 => "uint8",
            TypeKind::Uint16 => "uint16",
            TypeKind::Uint32 => "uint32",
            TypeKind::Uint64 => "uint64",
            TypeKind::Decimal64 => "decimal64",
            TypeKind::String => "string",
            TypeKind::Boolean => "boolean",
            TypeKind::Empty => "empty",
            TypeKind::Binary => "binary",
            TypeKind::Bits => "bits",
            TypeKind::Enumeration => "enumeration",
            TypeKind::Identityref => "identityref",
            TypeKind::Leafref => "leafref",
            TypeKind::Union => "union",
        }
    }

    /// Returns true for the eight integer types.
    pub fn is_integer(&self) -> bool {
        self.integer_bounds().is_some()
    }

    /// Returns true for the signed integer types.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            TypeKind::Int8 | TypeKind::Int16 | TypeKind::Int32 | TypeKind::Int64
        )
    }

    /// Returns the representable interval of an integer type.
    pub fn integer_bounds(&self) -> Option<YangRange> {
        let range = match self {
            TypeKind::Int8 => YangRange::int(i8::MIN.into(), i8::MAX.into()),
            TypeKind::Int16 => YangRange::int(i16::MIN.into(), i16::MAX.into()),
            TypeKind::Int32 => YangRange::int(i32::MIN.into(), i32::MAX.into()),
            TypeKind::Int64 => YangRange::int(i64::MIN, i64::MAX),
            TypeKind::Uint8 => YangRange::uint(0, u8::MAX.into()),
            TypeKind::Uint16 => YangRange::uint(0, u16::MAX.into()),
            TypeKind::Uint32 => YangRange::uint(0, u32::MAX.into()),
            TypeKind::Uint64 => YangRange::uint(0, u64::MAX),
            _ => return None,
        };
        Some(range)
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled `pattern` restriction.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a YANG pattern. YANG patterns match the whole value, so the
    /// expression is anchored on both ends.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written in the module.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if `value` matches.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// The resolved type of a leaf or leaf-list.
///
/// ```rust
/// use yangtree::{TypeKind, YangRange, YangType};
///
/// let mtu = YangType::new(TypeKind::Uint16).range(vec![YangRange::uint(68, 9216)]);
/// let name = YangType::string().length(vec![YangRange::length(1, Some(64))]);
/// let parent = YangType::leafref("../config/name");
/// assert_eq!(parent.kind, TypeKind::Leafref);
/// # let _ = (mtu, name);
/// ```
#[derive(Debug, Clone)]
pub struct YangType {
    pub kind: TypeKind,
    pub range: Vec<YangRange>,
    pub length: Vec<YangRange>,
    pub fraction_digits: u8,
    pub patterns: Vec<Pattern>,
    pub bits: Vec<String>,
    /// Enumeration names, or identity names for an identityref.
    pub enums: Vec<String>,
    /// The path expression of a leafref.
    pub path: Option<String>,
    /// Member types of a union, in preference order.
    pub union: Vec<YangType>,
}

impl YangType {
    /// Creates an unrestricted type of the given kind.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            range: Vec::new(),
            length: Vec::new(),
            fraction_digits: 0,
            patterns: Vec::new(),
            bits: Vec::new(),
            enums: Vec::new(),
            path: None,
            union: Vec::new(),
        }
    }

    /// An unrestricted `string`.
    pub fn string() -> Self {
        Self::new(TypeKind::String)
    }

    /// A `decimal64` with the given fraction digits.
    pub fn decimal64(fraction_digits: u8) -> Self {
        let mut ty = Self::new(TypeKind::Decimal64);
        ty.fraction_digits = fraction_digits;
        ty
    }

    /// A `leafref` with the given path.
    pub fn leafref(path: impl Into<String>) -> Self {
        let mut ty = Self::new(TypeKind::Leafref);
        ty.path = Some(path.into());
        ty
    }

    /// An `enumeration` with the given names.
    pub fn enumeration<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ty = Self::new(TypeKind::Enumeration);
        ty.enums = names.into_iter().map(Into::into).collect();
        ty
    }

    /// An `identityref` whose base has the given derived identities.
    pub fn identityref<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ty = Self::new(TypeKind::Identityref);
        ty.enums = identities.into_iter().map(Into::into).collect();
        ty
    }

    /// A `bits` type with the given bit names.
    pub fn bits<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ty = Self::new(TypeKind::Bits);
        ty.bits = names.into_iter().map(Into::into).collect();
        ty
    }

    /// A `union` of the given member types.
    pub fn union(members: Vec<YangType>) -> Self {
        let mut ty = Self::new(TypeKind::Union);
        ty.union = members;
        ty
    }

    /// Sets the `range` restriction.
    pub fn range(mut self, ranges: Vec<YangRange>) -> Self {
        self.range = ranges;
        self
    }

    /// Sets the `length` restriction.
    pub fn length(mut self, ranges: Vec<YangRange>) -> Self {
        self.length = ranges;
        self
    }

    /// Adds a `pattern` restriction.
    ///
    /// Returns an error if the pattern is not a valid regular expression.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.patterns.push(Pattern::new(pattern)?);
        Ok(self)
    }

    /// Returns the declared ranges, or the representable interval for an
    /// unrestricted integer type.
    pub fn effective_ranges(&self) -> Vec<YangRange> {
        if self.range.is_empty() {
            self.kind.integer_bounds().into_iter().collect()
        } else {
            self.range.clone()
        }
    }

    /// Returns true if `fraction_digits` is within `1..=18`.
    pub fn has_valid_fraction_digits(&self) -> bool {
        (1..=MAX_FRACTION_DIGITS).contains(&self.fraction_digits)
    }

    /// Returns true if a finite bound fits the declared integer width.
    pub(crate) fn bound_fits(&self, bound: &Number) -> bool {
        match self.kind.integer_bounds() {
            Some(width) if !bound.is_symbolic() => width.min <= *bound && *bound <= width.max,
            _ => true,
        }
    }
}
