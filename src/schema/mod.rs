//! The read-only schema graph.
//!
//! A [`SchemaTree`] is produced once from a compiled YANG module and shared,
//! immutable, by every validation, unmarshal and leafref pass. Nodes live in
//! an arena; parents are indices, so upward traversal never needs shared
//! ownership.
//!
//! # Example
//!
//! ```rust
//! use yangtree::{Entry, SchemaTree, YangType, TypeKind};
//!
//! let tree = SchemaTree::new(
//!     Entry::container("device").child(
//!         Entry::container("interfaces").child(
//!             Entry::list("interface", "name")
//!                 .child(Entry::leaf("name", YangType::string()))
//!                 .child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16))),
//!         ),
//!     ),
//! )
//! .unwrap();
//!
//! let list = tree.root().child("interfaces").unwrap().child("interface").unwrap();
//! assert!(list.is_list());
//! assert_eq!(list.key_names(), vec!["name"]);
//! assert_eq!(list.parent().unwrap().name(), "interfaces");
//! ```

mod types;

use std::fmt;

use indexmap::IndexMap;

pub use types::{Pattern, TypeKind, YangType};

/// The kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
}

impl Kind {
    /// Returns the YANG keyword for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Container => "container",
            Kind::List => "list",
            Kind::Leaf => "leaf",
            Kind::LeafList => "leaf-list",
            Kind::Choice => "choice",
            Kind::Case => "case",
        }
    }
}

/// `min-elements` / `max-elements` of a list or leaf-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListAttr {
    pub min_elements: u64,
    /// `None` means `unbounded`.
    pub max_elements: Option<u64>,
}

/// Errors raised while assembling a [`SchemaTree`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaBuildError {
    /// Two children of one node share a name.
    #[error("node '{parent}' has more than one child named '{child}'")]
    DuplicateChild { parent: String, child: String },
}

/// Owned description of a schema node, used to build a [`SchemaTree`].
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    kind: Kind,
    yang_type: Option<YangType>,
    key: Option<String>,
    list_attr: Option<ListAttr>,
    children: Vec<Entry>,
}

impl Entry {
    fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            yang_type: None,
            key: None,
            list_attr: None,
            children: Vec::new(),
        }
    }

    /// A container.
    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Container)
    }

    /// A keyed list. `key` is the space-separated list of key leaf names.
    pub fn list(name: impl Into<String>, key: impl Into<String>) -> Self {
        let mut entry = Self::new(name, Kind::List);
        let key = key.into();
        if !key.trim().is_empty() {
            entry.key = Some(key);
        }
        entry
    }

    /// A list without keys.
    pub fn keyless_list(name: impl Into<String>) -> Self {
        Self::new(name, Kind::List)
    }

    /// A leaf of the given type.
    pub fn leaf(name: impl Into<String>, yang_type: YangType) -> Self {
        let mut entry = Self::new(name, Kind::Leaf);
        entry.yang_type = Some(yang_type);
        entry
    }

    /// A leaf-list of the given type.
    pub fn leaf_list(name: impl Into<String>, yang_type: YangType) -> Self {
        let mut entry = Self::new(name, Kind::LeafList);
        entry.yang_type = Some(yang_type);
        entry
    }

    /// A choice.
    pub fn choice(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Choice)
    }

    /// A case of a choice.
    pub fn case(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Case)
    }

    /// Adds a child node.
    pub fn child(mut self, child: Entry) -> Self {
        self.children.push(child);
        self
    }

    /// Sets `min-elements`.
    pub fn min_elements(mut self, min: u64) -> Self {
        self.list_attr.get_or_insert_with(ListAttr::default).min_elements = min;
        self
    }

    /// Sets `max-elements`.
    pub fn max_elements(mut self, max: u64) -> Self {
        self.list_attr.get_or_insert_with(ListAttr::default).max_elements = Some(max);
        self
    }
}

#[derive(Debug)]
struct Node {
    name: String,
    kind: Kind,
    yang_type: Option<YangType>,
    key: Option<String>,
    list_attr: Option<ListAttr>,
    dir: IndexMap<String, usize>,
    parent: Option<usize>,
}

/// An immutable schema graph.
#[derive(Debug)]
pub struct SchemaTree {
    nodes: Vec<Node>,
}

impl SchemaTree {
    /// Builds a tree from its root description.
    ///
    /// # Errors
    ///
    /// Fails if a node has two children with the same name.
    pub fn new(root: Entry) -> Result<Self, SchemaBuildError> {
        let mut tree = SchemaTree { nodes: Vec::new() };
        tree.insert(root, None)?;
        Ok(tree)
    }

    fn insert(&mut self, entry: Entry, parent: Option<usize>) -> Result<usize, SchemaBuildError> {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: entry.name.clone(),
            kind: entry.kind,
            yang_type: entry.yang_type,
            key: entry.key,
            list_attr: entry.list_attr,
            dir: IndexMap::new(),
            parent,
        });
        for child in entry.children {
            let child_name = child.name.clone();
            if self.nodes[id].dir.contains_key(&child_name) {
                return Err(SchemaBuildError::DuplicateChild {
                    parent: entry.name,
                    child: child_name,
                });
            }
            let child_id = self.insert(child, Some(id))?;
            self.nodes[id].dir.insert(child_name, child_id);
        }
        Ok(id)
    }

    /// Returns the root node.
    pub fn root(&self) -> SchemaRef<'_> {
        SchemaRef { tree: self, id: 0 }
    }

    /// Looks up a node by a slash-separated path from the root, excluding
    /// the root's own name (`"interfaces/interface/mtu"`).
    pub fn find(&self, path: &str) -> Option<SchemaRef<'_>> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self.root(), |node, name| node.child(name))
    }
}

/// A borrowed handle on one node of a [`SchemaTree`].
#[derive(Clone, Copy)]
pub struct SchemaRef<'a> {
    tree: &'a SchemaTree,
    id: usize,
}

impl<'a> SchemaRef<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id]
    }

    fn at(&self, id: usize) -> SchemaRef<'a> {
        SchemaRef {
            tree: self.tree,
            id,
        }
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn kind(&self) -> Kind {
        self.node().kind
    }

    pub fn is_container(&self) -> bool {
        self.kind() == Kind::Container
    }

    pub fn is_list(&self) -> bool {
        self.kind() == Kind::List
    }

    pub fn is_leaf(&self) -> bool {
        self.kind() == Kind::Leaf
    }

    pub fn is_leaf_list(&self) -> bool {
        self.kind() == Kind::LeafList
    }

    pub fn is_choice(&self) -> bool {
        self.kind() == Kind::Choice
    }

    pub fn is_case(&self) -> bool {
        self.kind() == Kind::Case
    }

    /// Returns true for a list with at least one key leaf.
    pub fn is_keyed_list(&self) -> bool {
        self.is_list() && self.node().key.is_some()
    }

    /// The type of a leaf or leaf-list.
    pub fn yang_type(&self) -> Option<&'a YangType> {
        self.node().yang_type.as_ref()
    }

    /// The raw `key` statement of a list.
    pub fn key(&self) -> Option<&'a str> {
        self.node().key.as_deref()
    }

    /// The key leaf names of a list, in declaration order.
    pub fn key_names(&self) -> Vec<&'a str> {
        self.key()
            .map(|k| k.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn list_attr(&self) -> Option<ListAttr> {
        self.node().list_attr
    }

    /// Children in declaration order.
    pub fn dir(&self) -> impl Iterator<Item = SchemaRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .dir
            .values()
            .map(move |&id| SchemaRef { tree, id })
    }

    /// The child with the given name.
    pub fn child(&self, name: &str) -> Option<SchemaRef<'a>> {
        self.node().dir.get(name).map(|&id| self.at(id))
    }

    pub fn parent(&self) -> Option<SchemaRef<'a>> {
        self.node().parent.map(|id| self.at(id))
    }

    /// The schema path from the root, e.g. `/device/interfaces`.
    pub fn path(&self) -> String {
        let mut names = vec![self.name()];
        let mut cur = self.parent();
        while let Some(node) = cur {
            names.push(node.name());
            cur = node.parent();
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }
}

impl PartialEq for SchemaRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SchemaRef<'_> {}

impl fmt::Debug for SchemaRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind().name(), self.path())
    }
}
