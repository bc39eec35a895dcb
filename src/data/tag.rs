//! Field path descriptors.
//!
//! Every generated record field carries a path tag naming the schema node
//! that governs it: `seg1/seg2/.../segN`, or several alternatives joined
//! by `|` (`name|config/name`). A tag beginning with `@` marks an
//! annotation field with no schema counterpart.

use std::fmt::{self, Display};

/// Errors for malformed path tags.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PathTagError {
    #[error("path tag is empty")]
    Empty,

    #[error("path tag '{0}' has an empty segment")]
    EmptySegment(String),

    #[error("path tag '{0}' has alternatives but none of the form a/b")]
    NoCompoundAlternative(String),
}

/// A parsed field path descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTag {
    raw: String,
    alternatives: Vec<Vec<String>>,
}

impl PathTag {
    /// Parses a tag. A leading `/` on an alternative is ignored and module
    /// prefixes (`oc-if:interfaces`) are stripped from every segment.
    ///
    /// ```rust
    /// use yangtree::PathTag;
    ///
    /// let tag = PathTag::parse("name|config/name").unwrap();
    /// assert_eq!(tag.alternatives().len(), 2);
    /// assert_eq!(tag.preferred().unwrap(), ["config", "name"]);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PathTagError> {
        if raw.trim().is_empty() {
            return Err(PathTagError::Empty);
        }
        let mut alternatives = Vec::new();
        for alt in raw.split('|') {
            let alt = alt.trim();
            let alt = alt.strip_prefix('/').unwrap_or(alt);
            let segments: Vec<String> = alt.split('/').map(|s| local_name(s).to_string()).collect();
            if segments.iter().any(|s| s.is_empty()) {
                return Err(PathTagError::EmptySegment(raw.to_string()));
            }
            alternatives.push(segments);
        }
        Ok(Self {
            raw: raw.to_string(),
            alternatives,
        })
    }

    /// The tag as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Every alternative, in the order written.
    pub fn alternatives(&self) -> &[Vec<String>] {
        &self.alternatives
    }

    /// The alternative that governs the field.
    ///
    /// A single alternative is used as-is. With several, the first one with
    /// more than one segment wins: that is the full path of a list key field
    /// whose short alternative is the key leaf itself.
    pub fn preferred(&self) -> Result<&[String], PathTagError> {
        if self.alternatives.len() == 1 {
            return Ok(&self.alternatives[0]);
        }
        self.alternatives
            .iter()
            .find(|alt| alt.len() > 1)
            .map(|alt| alt.as_slice())
            .ok_or_else(|| PathTagError::NoCompoundAlternative(self.raw.clone()))
    }

    /// Returns true if the tag marks an annotation field.
    pub fn is_annotation(raw: &str) -> bool {
        raw.trim_start().starts_with('@')
    }
}

impl Display for PathTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Strips a module prefix from a schema or JSON member name.
pub fn local_name(name: &str) -> &str {
    match name.rsplit_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}
