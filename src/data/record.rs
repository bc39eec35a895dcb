//! Records: the host side of a schema-described tree.
//!
//! A [`RecordType`] is the layout a code generator would emit for one YANG
//! container or list entry: an ordered set of named fields, each with a path
//! tag and a shape. A [`Record`] is an instance of that layout holding only
//! the fields that are populated.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::scalar::{ListKey, Scalar};

/// The host shape of one record field.
#[derive(Debug, Clone)]
pub enum FieldShape {
    Leaf,
    LeafList,
    /// A child container, or a single list entry held directly.
    Container(Arc<RecordType>),
    /// A keyed list held as a key to entry map.
    KeyedList(Arc<RecordType>),
    /// A list held as an ordered sequence.
    UnkeyedList(Arc<RecordType>),
    /// Out-of-band metadata with no schema node.
    Annotation,
}

impl FieldShape {
    /// Returns the element layout of a container or list field.
    pub fn record_type(&self) -> Option<&Arc<RecordType>> {
        match self {
            FieldShape::Container(ty) | FieldShape::KeyedList(ty) | FieldShape::UnkeyedList(ty) => {
                Some(ty)
            }
            _ => None,
        }
    }

    /// Returns an empty value of this shape.
    pub fn empty_node(&self) -> DataNode {
        match self {
            FieldShape::Leaf => DataNode::Leaf(Scalar::Empty),
            FieldShape::LeafList => DataNode::LeafList(Vec::new()),
            FieldShape::Container(ty) => DataNode::Container(Record::new(Arc::clone(ty))),
            FieldShape::KeyedList(_) => DataNode::KeyedList(IndexMap::new()),
            FieldShape::UnkeyedList(_) => DataNode::UnkeyedList(Vec::new()),
            FieldShape::Annotation => DataNode::Annotation(Value::Null),
        }
    }
}

/// One field of a [`RecordType`].
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    /// The raw path tag, parsed by [`PathTag::parse`](super::PathTag::parse).
    pub path: String,
    pub shape: FieldShape,
}

impl FieldDef {
    pub fn is_annotation(&self) -> bool {
        matches!(self.shape, FieldShape::Annotation)
    }
}

/// The layout of a generated record.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    fields: IndexMap<String, FieldDef>,
}

impl RecordType {
    /// Starts building a layout with the given type name.
    ///
    /// ```rust
    /// use yangtree::RecordType;
    ///
    /// let config = RecordType::builder("Interface_Config")
    ///     .leaf("Name", "name")
    ///     .leaf("Mtu", "mtu")
    ///     .build();
    ///
    /// let interface = RecordType::builder("Interface")
    ///     .leaf("Name", "name")
    ///     .container("Config", "config", config)
    ///     .build();
    ///
    /// assert_eq!(interface.fields().count(), 2);
    /// ```
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            ty: RecordType {
                name: name.into(),
                fields: IndexMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }
}

/// Builder for [`RecordType`].
pub struct RecordTypeBuilder {
    ty: RecordType,
}

impl RecordTypeBuilder {
    /// Adds a field of any shape.
    pub fn field(mut self, name: impl Into<String>, path: impl Into<String>, shape: FieldShape) -> Self {
        let name = name.into();
        self.ty.fields.insert(
            name.clone(),
            FieldDef {
                name,
                path: path.into(),
                shape,
            },
        );
        self
    }

    pub fn leaf(self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(name, path, FieldShape::Leaf)
    }

    pub fn leaf_list(self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(name, path, FieldShape::LeafList)
    }

    pub fn container(
        self,
        name: impl Into<String>,
        path: impl Into<String>,
        ty: Arc<RecordType>,
    ) -> Self {
        self.field(name, path, FieldShape::Container(ty))
    }

    pub fn keyed_list(
        self,
        name: impl Into<String>,
        path: impl Into<String>,
        ty: Arc<RecordType>,
    ) -> Self {
        self.field(name, path, FieldShape::KeyedList(ty))
    }

    pub fn unkeyed_list(
        self,
        name: impl Into<String>,
        path: impl Into<String>,
        ty: Arc<RecordType>,
    ) -> Self {
        self.field(name, path, FieldShape::UnkeyedList(ty))
    }

    pub fn annotation(self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(name, path, FieldShape::Annotation)
    }

    pub fn build(self) -> Arc<RecordType> {
        Arc::new(self.ty)
    }
}

/// A value held by a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum DataNode {
    Leaf(Scalar),
    LeafList(Vec<Scalar>),
    Container(Record),
    KeyedList(IndexMap<ListKey, Record>),
    UnkeyedList(Vec<Record>),
    Annotation(Value),
}

impl DataNode {
    /// Returns the shape name, used in mismatch messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            DataNode::Leaf(_) => "leaf value",
            DataNode::LeafList(_) => "leaf-list",
            DataNode::Container(_) => "record",
            DataNode::KeyedList(_) => "keyed list",
            DataNode::UnkeyedList(_) => "unkeyed list",
            DataNode::Annotation(_) => "annotation",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            DataNode::Leaf(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            DataNode::Container(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Scalar> for DataNode {
    fn from(v: Scalar) -> Self {
        DataNode::Leaf(v)
    }
}

impl From<Record> for DataNode {
    fn from(r: Record) -> Self {
        DataNode::Container(r)
    }
}

/// Errors for record field access.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record type '{record}' has no field '{field}'")]
    UnknownField { record: String, field: String },
}

/// An instance of a [`RecordType`].
#[derive(Debug, Clone)]
pub struct Record {
    ty: Arc<RecordType>,
    values: IndexMap<String, DataNode>,
}

impl Record {
    /// Creates a record with every field absent.
    pub fn new(ty: Arc<RecordType>) -> Self {
        Self {
            ty,
            values: IndexMap::new(),
        }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    /// Returns the value of a populated field.
    pub fn get(&self, field: &str) -> Option<&DataNode> {
        self.values.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut DataNode> {
        self.values.get_mut(field)
    }

    /// Returns the value of a populated leaf field.
    pub fn leaf(&self, field: &str) -> Option<&Scalar> {
        self.get(field).and_then(DataNode::as_scalar)
    }

    /// Populates a field, returning its previous value.
    ///
    /// # Errors
    ///
    /// Fails if the record's type declares no such field.
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<DataNode>,
    ) -> Result<Option<DataNode>, RecordError> {
        self.check_field(field)?;
        Ok(self.values.insert(field.to_string(), value.into()))
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, field: &str, value: impl Into<DataNode>) -> Result<Self, RecordError> {
        self.set(field, value)?;
        Ok(self)
    }

    /// Makes a field absent again, returning its previous value.
    pub fn clear(&mut self, field: &str) -> Option<DataNode> {
        self.values.shift_remove(field)
    }

    /// Returns a field's value, creating an empty value of the field's
    /// shape if it is absent.
    pub fn entry_mut(&mut self, field: &str) -> Result<&mut DataNode, RecordError> {
        let def = self.check_field(field)?;
        let empty = def.shape.empty_node();
        Ok(self.values.entry(field.to_string()).or_insert(empty))
    }

    /// Returns true if no field is populated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The populated fields, in population order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &DataNode)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn check_field(&self, field: &str) -> Result<&FieldDef, RecordError> {
        self.ty.field(field).ok_or_else(|| RecordError::UnknownField {
            record: self.ty.name.clone(),
            field: field.to_string(),
        })
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.ty, &other.ty) || self.ty.name == other.ty.name)
            && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_type() -> Arc<RecordType> {
        RecordType::builder("Leafy")
            .leaf("Name", "name")
            .leaf_list("Tags", "tags")
            .build()
    }

    #[test]
    fn test_set_and_get() {
        let mut r = Record::new(leaf_type());
        assert!(r.is_empty());
        assert_eq!(r.set("Name", Scalar::from("a")).unwrap(), None);
        assert_eq!(r.leaf("Name"), Some(&Scalar::from("a")));
        let previous = r.set("Name", Scalar::from("b")).unwrap();
        assert_eq!(previous, Some(DataNode::Leaf(Scalar::from("a"))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut r = Record::new(leaf_type());
        let err = r.set("Nope", Scalar::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownField {
                record: "Leafy".to_string(),
                field: "Nope".to_string()
            }
        );
    }

    #[test]
    fn test_entry_mut_creates_empty_shape() {
        let mut r = Record::new(leaf_type());
        match r.entry_mut("Tags").unwrap() {
            DataNode::LeafList(v) => v.push(Scalar::from("x")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(r.get("Tags"), Some(&DataNode::LeafList(vec![Scalar::from("x")])));
    }

    #[test]
    fn test_clear() {
        let mut r = Record::new(leaf_type()).with("Name", Scalar::from("a")).unwrap();
        assert!(r.clear("Name").is_some());
        assert!(r.get("Name").is_none());
    }

    #[test]
    fn test_equality_ignores_population_order() {
        let a = Record::new(leaf_type())
            .with("Name", Scalar::from("a"))
            .unwrap()
            .with("Tags", DataNode::LeafList(vec![]))
            .unwrap();
        let b = Record::new(leaf_type())
            .with("Tags", DataNode::LeafList(vec![]))
            .unwrap()
            .with("Name", Scalar::from("a"))
            .unwrap();
        assert_eq!(a, b);
    }
}
