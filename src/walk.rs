//! Schema-driven traversal of a host data tree.
//!
//! [`for_each_node`] visits every populated node in pre-order, handing the
//! visitor a [`NodeInfo`] that links back to its parent all the way to the
//! root. Keyed and unkeyed lists contribute two levels: the list field
//! itself, then one level per entry whose `path_from_parent` is empty.

use stillwater::Validation;

use crate::data::{DataNode, FieldDef, ListKey, Record};
use crate::error::{YangError, YangErrors};
use crate::navigate::child_schema;
use crate::path::DataPath;
use crate::schema::SchemaRef;
use crate::ValidationResult;

/// The value at a visited node.
#[derive(Debug, Clone, Copy)]
pub enum NodeValue<'a> {
    /// The root record, or a list entry.
    Record(&'a Record),
    /// A record field.
    Node(&'a DataNode),
}

/// One visited node and its ancestry.
#[derive(Debug)]
pub struct NodeInfo<'a> {
    pub schema: SchemaRef<'a>,
    pub value: NodeValue<'a>,
    pub parent: Option<&'a NodeInfo<'a>>,
    /// Schema path segments from the parent's record to this node. Empty
    /// for the root and for list entries.
    pub path_from_parent: Vec<String>,
    /// The record field that holds this node, if any.
    pub field: Option<&'a FieldDef>,
    /// The map key of a keyed list entry.
    pub key: Option<&'a ListKey>,
    pub data_path: DataPath,
}

impl<'a> NodeInfo<'a> {
    /// Returns the record at this node, for containers and list entries.
    pub fn record(&self) -> Option<&'a Record> {
        match self.value {
            NodeValue::Record(r) | NodeValue::Node(DataNode::Container(r)) => Some(r),
            _ => None,
        }
    }

    /// Returns the root of the chain.
    pub fn root(&self) -> &NodeInfo<'a> {
        let mut cur = self;
        while let Some(parent) = cur.parent {
            cur = parent;
        }
        cur
    }
}

/// Visits every node of `record`, described by `schema`, in pre-order.
///
/// Fields with no schema are skipped. Fields with a malformed path tag are
/// skipped and reported.
///
/// ```rust
/// use yangtree::{for_each_node, Entry, Record, RecordType, Scalar, SchemaTree, YangType};
///
/// let tree = SchemaTree::new(
///     Entry::container("system").child(Entry::leaf("hostname", YangType::string())),
/// )
/// .unwrap();
/// let ty = RecordType::builder("System").leaf("Hostname", "hostname").build();
/// let record = Record::new(ty).with("Hostname", Scalar::from("r1")).unwrap();
///
/// let mut seen = Vec::new();
/// let result = for_each_node(tree.root(), &record, |info| seen.push(info.schema.path()));
/// assert!(result.is_success());
/// assert_eq!(seen, vec!["/system", "/system/hostname"]);
/// ```
pub fn for_each_node<F>(schema: SchemaRef<'_>, record: &Record, mut visitor: F) -> ValidationResult<()>
where
    F: FnMut(&NodeInfo<'_>),
{
    let root = NodeInfo {
        schema,
        value: NodeValue::Record(record),
        parent: None,
        path_from_parent: Vec::new(),
        field: None,
        key: None,
        data_path: DataPath::root(),
    };
    let mut errors = Vec::new();
    visit(&root, &mut visitor, &mut errors);
    match YangErrors::from_vec(errors) {
        None => Validation::Success(()),
        Some(errors) => Validation::Failure(errors),
    }
}

fn visit<'p, F>(info: &'p NodeInfo<'p>, visitor: &mut F, errors: &mut Vec<YangError>)
where
    F: FnMut(&NodeInfo<'_>),
{
    visitor(info);
    match info.value {
        NodeValue::Node(DataNode::KeyedList(entries)) => {
            for (key, entry) in entries {
                let child = NodeInfo {
                    schema: info.schema,
                    value: NodeValue::Record(entry),
                    parent: Some(info),
                    path_from_parent: Vec::new(),
                    field: None,
                    key: Some(key),
                    data_path: info.data_path.push_key(key.to_string()),
                };
                visit(&child, visitor, errors);
            }
        }
        NodeValue::Node(DataNode::UnkeyedList(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                let child = NodeInfo {
                    schema: info.schema,
                    value: NodeValue::Record(entry),
                    parent: Some(info),
                    path_from_parent: Vec::new(),
                    field: None,
                    key: None,
                    data_path: info.data_path.push_index(i),
                };
                visit(&child, visitor, errors);
            }
        }
        _ => {
            if let Some(record) = info.record() {
                visit_fields(info, record, visitor, errors);
            }
        }
    }
}

fn visit_fields<'p, F>(info: &'p NodeInfo<'p>, record: &'p Record, visitor: &mut F, errors: &mut Vec<YangError>)
where
    F: FnMut(&NodeInfo<'_>),
{
    for (name, value) in record.values() {
        let Some(def) = record.record_type().field(name) else {
            continue;
        };
        let resolved = match child_schema(info.schema, def) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => continue,
            Err(e) => {
                errors.push(YangError::schema(info.data_path.push_node(name), e.to_string()));
                continue;
            }
        };
        let data_path = resolved
            .path
            .iter()
            .fold(info.data_path.clone(), |p, s| p.push_node(s.as_str()));
        let child = NodeInfo {
            schema: resolved.schema,
            value: NodeValue::Node(value),
            parent: Some(info),
            path_from_parent: resolved.path,
            field: Some(def),
            key: None,
            data_path,
        };
        visit(&child, visitor, errors);
    }
}
