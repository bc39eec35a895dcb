//! Data tree error types.
//!
//! This module provides [`YangError`] for single failures, [`ErrorKind`]
//! for classifying them, and [`YangErrors`] for accumulating many.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::DataPath;

/// Classification of a validation, unmarshal or leafref failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or inconsistent schema metadata.
    Schema,
    /// The runtime value's shape or type does not match the schema.
    TypeMismatch,
    /// A numeric value lies outside the declared `range`.
    Range,
    /// A string, binary or list size lies outside the declared `length`
    /// or element count.
    Length,
    /// A string does not match a declared `pattern`.
    Pattern,
    /// A leaf-list or list carries the same value twice.
    DuplicateValue,
    /// Data with no schema home.
    UnexpectedField,
    /// Fields from more than one case of a choice are populated.
    ChoiceConflict,
    /// A list map key disagrees with its element's key fields.
    KeyMismatch,
    /// A leafref does not point at an existing value.
    LeafrefMismatch,
}

impl ErrorKind {
    /// Returns the machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Schema => "schema",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::Range => "range",
            ErrorKind::Length => "length",
            ErrorKind::Pattern => "pattern",
            ErrorKind::DuplicateValue => "duplicate_value",
            ErrorKind::UnexpectedField => "unexpected_field",
            ErrorKind::ChoiceConflict => "choice_conflict",
            ErrorKind::KeyMismatch => "key_mismatch",
            ErrorKind::LeafrefMismatch => "leafref_mismatch",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single failure with full context.
///
/// # Example
///
/// ```rust
/// use yangtree::{DataPath, ErrorKind, YangError};
///
/// let error = YangError::new(
///     ErrorKind::Range,
///     DataPath::from_node("mtu"),
///     "value outside declared range",
/// )
/// .with_got("70000")
/// .with_expected("68..65535");
///
/// assert_eq!(error.code(), "range");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YangError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where in the data tree it went wrong.
    pub path: DataPath,
    /// Human-readable error message.
    pub message: String,
    /// The offending value, formatted as a string.
    pub got: Option<String>,
    /// Description of what was expected instead.
    pub expected: Option<String>,
}

impl YangError {
    /// Creates a new error of the given kind.
    pub fn new(kind: ErrorKind, path: DataPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
            got: None,
            expected: None,
        }
    }

    /// Creates a [`ErrorKind::Schema`] error.
    pub fn schema(path: DataPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, path, message)
    }

    /// Creates a [`ErrorKind::TypeMismatch`] error.
    pub fn type_mismatch(path: DataPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, path, message)
    }

    /// Sets the "got" field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Returns the machine-readable code of this error's kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Display for YangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for YangError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<YangError>();
    assert_sync::<YangError>();
};

/// A non-empty collection of errors.
///
/// `YangErrors` wraps a `NonEmptyVec<YangError>` so that a
/// `Validation::Failure` always carries at least one error.
///
/// ```rust
/// use yangtree::{DataPath, ErrorKind, YangError, YangErrors};
/// use stillwater::prelude::*;
///
/// let a = YangErrors::single(YangError::new(
///     ErrorKind::Range, DataPath::from_node("a"), "out of range"));
/// let b = YangErrors::single(YangError::new(
///     ErrorKind::Length, DataPath::from_node("b"), "too long"));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YangErrors(NonEmptyVec<YangError>);

impl YangErrors {
    /// Creates a `YangErrors` containing a single error.
    pub fn single(error: YangError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `YangErrors` from a `Vec`, or `None` if it is empty.
    pub fn from_vec(errors: Vec<YangError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &YangError> {
        self.0.iter()
    }

    /// Returns all errors at the specified path.
    pub fn at_path(&self, path: &DataPath) -> Vec<&YangError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors of the specified kind.
    pub fn of_kind(&self, kind: ErrorKind) -> Vec<&YangError> {
        self.0.iter().filter(|e| e.kind == kind).collect()
    }

    /// Returns true if any error is of the specified kind.
    pub fn contains_kind(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.kind == kind)
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &YangError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<YangError>`.
    pub fn into_vec(self) -> Vec<YangError> {
        self.0.into_vec()
    }
}

impl Semigroup for YangErrors {
    fn combine(self, other: Self) -> Self {
        YangErrors(self.0.combine(other.0))
    }
}

impl From<YangError> for YangErrors {
    fn from(error: YangError) -> Self {
        Self::single(error)
    }
}

impl Display for YangErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for YangErrors {}

impl IntoIterator for YangErrors {
    type Item = YangError;
    type IntoIter = std::vec::IntoIter<YangError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a YangErrors {
    type Item = &'a YangError;
    type IntoIter = Box<dyn Iterator<Item = &'a YangError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}
