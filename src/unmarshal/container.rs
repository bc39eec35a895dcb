use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::data::{local_name, DataNode, FieldDef, FieldShape, ListKey, PathTag, Record, RecordType};
use crate::error::{ErrorKind, ErrorSink, Halt, YangError};
use crate::navigate::{child_schema, field_for_schema_name, relative_to};
use crate::path::DataPath;
use crate::scalar::value_type;
use crate::schema::{Kind, SchemaRef, YangType};
use crate::validate::child_path;
use crate::ValidationResult;

use super::json::decode_json_leaf;
use super::typed::{decode_typed, TypedValue};
use super::{Payload, UnmarshalOptions};

/// One unmarshal call: the options and the errors found so far.
pub(super) struct Unmarshaler<'o> {
    options: &'o UnmarshalOptions,
    sink: ErrorSink,
}

impl<'o> Unmarshaler<'o> {
    pub(super) fn new(options: &'o UnmarshalOptions) -> Self {
        Self {
            options,
            sink: options.sink(),
        }
    }

    pub(super) fn push(&mut self, error: YangError) -> Result<(), Halt> {
        self.sink.push(error)
    }

    pub(super) fn finish(self) -> ValidationResult<()> {
        self.sink.finish()
    }

    pub(super) fn root(
        &mut self,
        schema: SchemaRef<'_>,
        record: &mut Record,
        payload: Payload<'_>,
        path: &DataPath,
    ) -> Result<(), Halt> {
        let value = match payload {
            Payload::Json(value) => value,
            Payload::Typed(value) => return self.push(typed_not_allowed(schema, value, path)),
        };
        if !(schema.is_container() || schema.is_list()) {
            return self.push(YangError::schema(
                path.clone(),
                format!("cannot unmarshal a record into {} {}", schema.kind().name(), schema.name()),
            ));
        }
        let Some(obj) = value.as_object() else {
            return self.push(expected_object(schema, value, path));
        };
        self.container(schema, record, obj, path)
    }

    /// Unmarshals the payload of one field. `at` is the field's location.
    pub(super) fn value(
        &mut self,
        schema: SchemaRef<'_>,
        record: &mut Record,
        def: &FieldDef,
        payload: Payload<'_>,
        at: &DataPath,
    ) -> Result<(), Halt> {
        let value = match payload {
            Payload::Typed(typed) => {
                if !(schema.is_leaf() || schema.is_leaf_list()) {
                    return self.push(typed_not_allowed(schema, typed, at));
                }
                if let TypedValue::Json(bytes) | TypedValue::JsonIetf(bytes) = typed {
                    let parsed = match TypedValue::parse_json(bytes, at) {
                        Ok(parsed) => parsed,
                        Err(e) => return self.push(e),
                    };
                    return self.scalar_field(schema, record, def, Payload::Json(&parsed), at);
                }
                return self.scalar_field(schema, record, def, payload, at);
            }
            Payload::Json(value) => value,
        };

        match (schema.kind(), &def.shape) {
            (Kind::Leaf | Kind::LeafList, _) => self.scalar_field(schema, record, def, payload, at),
            (Kind::Container | Kind::List, FieldShape::Container(_)) => {
                self.container_field(schema, record, def, value, at)
            }
            (Kind::List, FieldShape::KeyedList(entry_ty)) => self.keyed_list(schema, record, def, entry_ty, value, at),
            (Kind::List, FieldShape::UnkeyedList(entry_ty)) => {
                self.unkeyed_list(schema, record, def, entry_ty, value, at)
            }
            _ => self.shape_mismatch(schema, def, at),
        }
    }

    fn container(
        &mut self,
        schema: SchemaRef<'_>,
        record: &mut Record,
        obj: &Map<String, Value>,
        path: &DataPath,
    ) -> Result<(), Halt> {
        tracing::trace!(schema = %schema.path(), path = %path, "unmarshal record");
        let ty = Arc::clone(record.record_type());
        let mut known = KeyTrie::default();

        for def in ty.fields() {
            if def.is_annotation() || PathTag::is_annotation(&def.path) {
                let key = def.path.trim();
                known.insert(&[key.to_string()]);
                if let Some(value) = obj.get(key) {
                    self.set(record, def, DataNode::Annotation(value.clone()), &path.push_node(key))?;
                }
                continue;
            }

            let resolved = match child_schema(schema, def) {
                Ok(Some(resolved)) => resolved,
                Ok(None) => continue,
                Err(e) => {
                    self.push(YangError::schema(path.push_node(def.name.as_str()), e.to_string()))?;
                    continue;
                }
            };

            let alternatives = member_paths(schema, def, &resolved.path);
            for alt in &alternatives {
                known.insert(alt);
            }
            let found = alternatives
                .iter()
                .find_map(|alt| lookup(obj, alt).map(|value| (alt, value)));
            let Some((alt, value)) = found else {
                continue;
            };
            self.value(resolved.schema, record, def, Payload::Json(value), &child_path(path, alt))?;
        }

        if !self.options.ignore_extra_fields {
            let mut extra = Vec::new();
            known.leftovers(obj, "", &mut extra);
            if !extra.is_empty() {
                self.push(
                    YangError::new(
                        ErrorKind::UnexpectedField,
                        path.clone(),
                        format!("JSON members with no field in {}", ty.name()),
                    )
                    .with_got(extra.join(", ")),
                )?;
            }
        }
        Ok(())
    }

    fn scalar_field(
        &mut self,
        schema: SchemaRef<'_>,
        record: &mut Record,
        def: &FieldDef,
        payload: Payload<'_>,
        at: &DataPath,
    ) -> Result<(), Halt> {
        let ty = match value_type(schema, at) {
            Ok(ty) => ty,
            Err(e) => return self.push(e),
        };
        match (schema.kind(), &def.shape) {
            (Kind::Leaf, FieldShape::Leaf) => match decode(ty, payload, at) {
                Ok(value) => self.set(record, def, DataNode::Leaf(value), at),
                Err(e) => self.push(e),
            },
            (Kind::LeafList, FieldShape::LeafList) => {
                let Some(items) = elements(payload) else {
                    return self.push(
                        YangError::type_mismatch(at.clone(), format!("leaf-list {} expects a list of values", schema.name()))
                            .with_expected("array")
                            .with_got(payload.describe()),
                    );
                };
                let before = self.sink.len();
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    match decode(ty, item, &at.push_index(i)) {
                        Ok(value) => values.push(value),
                        Err(e) => self.push(e)?,
                    }
                }
                if self.sink.len() == before {
                    self.set(record, def, DataNode::LeafList(values), at)
                } else {
                    Ok(())
                }
            }
            _ => self.shape_mismatch(schema, def, at),
        }
    }

    fn container_field(
        &mut self,
        schema: SchemaRef<'_>,
        record: &mut Record,
        def: &FieldDef,
        value: &Value,
        at: &DataPath,
    ) -> Result<(), Halt> {
        let Some(obj) = value.as_object() else {
            return self.push(expected_object(schema, value, at));
        };
        match record.entry_mut(&def.name) {
            Ok(DataNode::Container(child)) => self.container(schema, child, obj, at),
            Ok(other) => {
                let held = other.shape_name();
                self.push(held_mismatch(def, held, at))
            }
            Err(e) => self.push(YangError::schema(at.clone(), e.to_string())),
        }
    }

    fn keyed_list(
        &mut self,
        schema: SchemaRef<'_>,
        record: &mut Record,
        def: &FieldDef,
        entry_ty: &Arc<RecordType>,
        value: &Value,
        at: &DataPath,
    ) -> Result<(), Halt> {
        let Some(items) = value.as_array() else {
            return self.push(expected_array(schema, value, at));
        };
        let map: &mut IndexMap<ListKey, Record> = match record.entry_mut(&def.name) {
            Ok(DataNode::KeyedList(map)) => map,
            Ok(other) => {
                let held = other.shape_name();
                return self.push(held_mismatch(def, held, at));
            }
            Err(e) => return self.push(YangError::schema(at.clone(), e.to_string())),
        };

        let mut seen = HashSet::new();
        for (i, item) in items.iter().enumerate() {
            let item_at = at.push_index(i);
            let Some(obj) = item.as_object() else {
                self.push(expected_object(schema, item, &item_at))?;
                continue;
            };
            let mut entry = Record::new(Arc::clone(entry_ty));
            self.container(schema, &mut entry, obj, &item_at)?;

            let key = match list_key(schema, &entry, &item_at) {
                Ok(key) => key,
                Err(e) => {
                    self.push(e)?;
                    continue;
                }
            };
            if !seen.insert(key.clone()) {
                self.push(
                    YangError::new(ErrorKind::DuplicateValue, at.push_key(key.to_string()), "list key appears twice")
                        .with_got(key.to_string()),
                )?;
                continue;
            }
            map.insert(key, entry);
        }
        Ok(())
    }

    fn unkeyed_list(
        &mut self,
        schema: SchemaRef<'_>,
        record: &mut Record,
        def: &FieldDef,
        entry_ty: &Arc<RecordType>,
        value: &Value,
        at: &DataPath,
    ) -> Result<(), Halt> {
        let Some(items) = value.as_array() else {
            return self.push(expected_array(schema, value, at));
        };
        let entries = match record.entry_mut(&def.name) {
            Ok(DataNode::UnkeyedList(entries)) => entries,
            Ok(other) => {
                let held = other.shape_name();
                return self.push(held_mismatch(def, held, at));
            }
            Err(e) => return self.push(YangError::schema(at.clone(), e.to_string())),
        };

        let offset = entries.len();
        for (i, item) in items.iter().enumerate() {
            let item_at = at.push_index(offset + i);
            let Some(obj) = item.as_object() else {
                self.push(expected_object(schema, item, &item_at))?;
                continue;
            };
            let mut entry = Record::new(Arc::clone(entry_ty));
            self.container(schema, &mut entry, obj, &item_at)?;
            entries.push(entry);
        }
        Ok(())
    }

    fn set(&mut self, record: &mut Record, def: &FieldDef, node: DataNode, at: &DataPath) -> Result<(), Halt> {
        match record.set(&def.name, node) {
            Ok(_) => Ok(()),
            Err(e) => self.push(YangError::schema(at.clone(), e.to_string())),
        }
    }

    fn shape_mismatch(&mut self, schema: SchemaRef<'_>, def: &FieldDef, at: &DataPath) -> Result<(), Halt> {
        self.push(YangError::schema(
            at.clone(),
            format!(
                "field {} is a {} but {} is a {}",
                def.name,
                shape_name(&def.shape),
                schema.path(),
                schema.kind().name()
            ),
        ))
    }
}

/// Reads the key of a freshly built list entry from its key fields.
fn list_key(schema: SchemaRef<'_>, entry: &Record, at: &DataPath) -> Result<ListKey, YangError> {
    let names = schema.key_names();
    if names.is_empty() {
        return Err(YangError::schema(
            at.clone(),
            format!("keyed map for list {} which declares no key", schema.name()),
        ));
    }
    let mut parts = Vec::with_capacity(names.len());
    for name in &names {
        let field = field_for_schema_name(entry.record_type(), name).ok_or_else(|| {
            YangError::schema(
                at.clone(),
                format!("entry type {} has no field for key leaf {}", entry.record_type().name(), name),
            )
        })?;
        let value = entry.leaf(&field.name).ok_or_else(|| {
            YangError::new(
                ErrorKind::KeyMismatch,
                at.clone(),
                format!("list entry has no value for key leaf {}", name),
            )
        })?;
        parts.push((field.name.clone(), value.clone()));
    }
    if parts.len() == 1 {
        if let Some((_, value)) = parts.pop() {
            return Ok(ListKey::Single(value));
        }
    }
    Ok(ListKey::Composite(parts))
}

/// The member paths a field may be found at, the governing one first.
fn member_paths(schema: SchemaRef<'_>, def: &FieldDef, preferred: &[String]) -> Vec<Vec<String>> {
    let mut paths = vec![preferred.to_vec()];
    if let Ok(tag) = PathTag::parse(&def.path) {
        for alt in tag.alternatives() {
            let alt = relative_to(schema, alt);
            if !paths.iter().any(|p| p.as_slice() == alt) {
                paths.push(alt.to_vec());
            }
        }
    }
    paths
}

/// Finds the member at `path`, accepting module-qualified member names.
fn lookup<'v>(obj: &'v Map<String, Value>, path: &[String]) -> Option<&'v Value> {
    let (last, init) = path.split_last()?;
    let mut cur = obj;
    for seg in init {
        cur = member(cur, seg)?.as_object()?;
    }
    member(cur, last)
}

fn member<'v>(obj: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    obj.get(name)
        .or_else(|| obj.iter().find(|(k, _)| local_name(k) == name).map(|(_, v)| v))
}

fn decode(ty: &YangType, payload: Payload<'_>, at: &DataPath) -> Result<crate::data::Scalar, YangError> {
    match payload {
        Payload::Json(value) => decode_json_leaf(ty, value, at),
        Payload::Typed(value) => decode_typed(ty, value, at),
    }
}

fn elements(payload: Payload<'_>) -> Option<Vec<Payload<'_>>> {
    match payload {
        Payload::Json(Value::Array(items)) => Some(items.iter().map(Payload::Json).collect()),
        Payload::Typed(TypedValue::Leaflist(items)) => Some(items.iter().map(Payload::Typed).collect()),
        _ => None,
    }
}

fn shape_name(shape: &FieldShape) -> &'static str {
    match shape {
        FieldShape::Leaf => "leaf",
        FieldShape::LeafList => "leaf-list",
        FieldShape::Container(_) => "record",
        FieldShape::KeyedList(_) => "keyed list",
        FieldShape::UnkeyedList(_) => "unkeyed list",
        FieldShape::Annotation => "annotation",
    }
}

fn typed_not_allowed(schema: SchemaRef<'_>, value: &TypedValue, at: &DataPath) -> YangError {
    YangError::type_mismatch(
        at.clone(),
        format!(
            "typed values can only be unmarshaled into a leaf or leaf-list, not {} {}",
            schema.kind().name(),
            schema.name()
        ),
    )
    .with_got(value.kind_name())
}

fn expected_object(schema: SchemaRef<'_>, value: &Value, at: &DataPath) -> YangError {
    YangError::type_mismatch(at.clone(), format!("{} {} expects a JSON object", schema.kind().name(), schema.name()))
        .with_expected("object")
        .with_got(value.to_string())
}

fn expected_array(schema: SchemaRef<'_>, value: &Value, at: &DataPath) -> YangError {
    YangError::type_mismatch(at.clone(), format!("list {} expects a JSON array", schema.name()))
        .with_expected("array")
        .with_got(value.to_string())
}

fn held_mismatch(def: &FieldDef, held: &str, at: &DataPath) -> YangError {
    YangError::type_mismatch(at.clone(), format!("field {} already holds a {}", def.name, held))
        .with_expected(shape_name(&def.shape))
        .with_got(held)
}

/// The member paths claimed by a record's fields.
#[derive(Debug, Default)]
struct KeyTrie {
    children: IndexMap<String, KeyTrie>,
    claimed: bool,
}

impl KeyTrie {
    fn insert(&mut self, path: &[String]) {
        let mut node = self;
        for seg in path {
            node = node.children.entry(seg.clone()).or_default();
        }
        node.claimed = true;
    }

    /// Collects the members of `obj` that no field claims.
    fn leftovers(&self, obj: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
        for (key, value) in obj {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}/{}", prefix, key)
            };
            match self.children.get(key.as_str()).or_else(|| self.children.get(local_name(key))) {
                None => out.push(name),
                Some(child) if child.claimed => {}
                Some(child) => match value.as_object() {
                    Some(inner) => child.leftovers(inner, &name, out),
                    None => out.push(name),
                },
            }
        }
    }
}
