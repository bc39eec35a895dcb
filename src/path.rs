//! Data tree path representation for locating values in nested records.
//!
//! This module provides [`DataPath`] and [`PathSegment`] types for building
//! and representing the location of a value inside a data tree. Every
//! [`YangError`](crate::YangError) carries one.

use std::fmt::{self, Display};

/// A segment of a data path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A schema node name (e.g. `interfaces`, `mtu`).
    Node(String),
    /// A keyed list entry, rendered as `[key]`.
    Key(String),
    /// A position in an unkeyed list or leaf-list, rendered as `[0]`.
    Index(usize),
}

/// A path to a value in a data tree.
///
/// Paths render YANG-style, for example `/interfaces/interface[eth0]/mtu`.
///
/// # Example
///
/// ```rust
/// use yangtree::DataPath;
///
/// let path = DataPath::root()
///     .push_node("interfaces")
///     .push_node("interface")
///     .push_key("eth0")
///     .push_node("mtu");
///
/// assert_eq!(path.to_string(), "/interfaces/interface[eth0]/mtu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DataPath {
    segments: Vec<PathSegment>,
}

impl DataPath {
    /// Creates an empty path representing the root of the tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single node segment.
    pub fn from_node(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Node(name.into())],
        }
    }

    /// Returns a new path with a node segment appended.
    pub fn push_node(&self, name: impl Into<String>) -> Self {
        self.push(PathSegment::Node(name.into()))
    }

    /// Returns a new path with a list key segment appended.
    pub fn push_key(&self, key: impl Into<String>) -> Self {
        self.push(PathSegment::Key(key.into()))
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    fn push(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            match segment {
                PathSegment::Node(name) => write!(f, "/{}", name)?,
                PathSegment::Key(key) => write!(f, "[{}]", key)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
