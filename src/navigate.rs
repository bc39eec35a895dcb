//! Schema navigation.
//!
//! Maps record fields to the schema nodes that govern them, maps schema
//! leaf names back to record fields, and resolves the schema node a leafref
//! points at. Choice and case nodes never appear in data trees, so every
//! lookup here looks through them.

use indexmap::IndexMap;

use crate::data::{FieldDef, PathTag, PathTagError, RecordType};
use crate::error::YangError;
use crate::leafref::{LeafrefPath, Step};
use crate::path::DataPath;
use crate::schema::SchemaRef;

/// Follow at most this many leafref-to-leafref hops.
const MAX_LEAFREF_CHAIN: usize = 16;

/// The schema node governing a record field, and the segments of the path
/// tag alternative that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField<'a> {
    pub schema: SchemaRef<'a>,
    pub path: Vec<String>,
}

/// Resolves the schema node governing `field` of a record described by
/// `parent`.
///
/// Returns `Ok(None)` for annotation fields and for fields with no schema
/// counterpart. Only a malformed path tag is an error.
///
/// ```rust
/// use yangtree::{child_schema, Entry, RecordType, SchemaTree, YangType};
///
/// let tree = SchemaTree::new(
///     Entry::container("interface")
///         .child(Entry::leaf("name", YangType::string()))
///         .child(Entry::container("config").child(Entry::leaf("name", YangType::string()))),
/// )
/// .unwrap();
/// let ty = RecordType::builder("Interface").leaf("Name", "name|config/name").build();
///
/// let resolved = child_schema(tree.root(), ty.field("Name").unwrap()).unwrap().unwrap();
/// assert_eq!(resolved.path, vec!["config", "name"]);
/// assert_eq!(resolved.schema.path(), "/interface/config/name");
/// ```
pub fn child_schema<'a>(
    parent: SchemaRef<'a>,
    field: &FieldDef,
) -> Result<Option<ResolvedField<'a>>, PathTagError> {
    if field.is_annotation() || PathTag::is_annotation(&field.path) {
        return Ok(None);
    }
    let tag = PathTag::parse(&field.path)?;
    let path = relative_to(parent, tag.preferred()?).to_vec();

    if let Some(schema) = walk_dir(parent, &path) {
        return Ok(Some(ResolvedField { schema, path }));
    }

    if path.len() != 1 {
        return Ok(None);
    }

    Ok(find_in_choices(parent, &path[0]).map(|schema| ResolvedField { schema, path }))
}

/// Drops a leading segment naming `parent` itself. Generated tags on a
/// container's own fields may start with the container's name.
pub(crate) fn relative_to<'s>(parent: SchemaRef<'_>, alt: &'s [String]) -> &'s [String] {
    match alt {
        [first, rest @ ..] if !rest.is_empty() && parent.is_container() && first == parent.name() => rest,
        _ => alt,
    }
}

fn walk_dir<'a>(start: SchemaRef<'a>, path: &[String]) -> Option<SchemaRef<'a>> {
    path.iter().try_fold(start, |node, name| node.child(name))
}

/// Looks for `name` among the data nodes reachable from `parent` through
/// choice and case levels only.
fn find_in_choices<'a>(parent: SchemaRef<'a>, name: &str) -> Option<SchemaRef<'a>> {
    parent
        .dir()
        .filter(|c| c.is_choice() || c.is_case())
        .find_map(|c| data_descendants(c).shift_remove(name))
}

/// Collects the first non-choice, non-case descendants of `schema`, keyed
/// by name.
pub fn data_descendants(schema: SchemaRef<'_>) -> IndexMap<String, SchemaRef<'_>> {
    let mut found = IndexMap::new();
    for child in schema.dir() {
        if child.is_choice() || child.is_case() {
            for (name, node) in data_descendants(child) {
                found.entry(name).or_insert(node);
            }
        } else {
            found.entry(child.name().to_string()).or_insert(child);
        }
    }
    found
}

/// Returns the child named `name`, looking through choice and case levels.
pub fn data_child<'a>(schema: SchemaRef<'a>, name: &str) -> Option<SchemaRef<'a>> {
    schema.child(name).or_else(|| find_in_choices(schema, name))
}

/// Returns the nearest ancestor that is a data node.
pub fn data_parent(schema: SchemaRef<'_>) -> Option<SchemaRef<'_>> {
    let mut cur = schema.parent();
    while let Some(node) = cur {
        if !(node.is_choice() || node.is_case()) {
            return Some(node);
        }
        cur = node.parent();
    }
    None
}

/// Finds the field of `ty` that holds the schema leaf called `name`.
///
/// A field whose tag has an alternative consisting of exactly `name` wins;
/// otherwise the first field with an alternative ending in `name` is used.
pub fn field_for_schema_name<'t>(ty: &'t RecordType, name: &str) -> Option<&'t FieldDef> {
    let tags: Vec<(&FieldDef, PathTag)> = ty
        .fields()
        .filter(|f| !f.is_annotation())
        .filter_map(|f| PathTag::parse(&f.path).ok().map(|t| (f, t)))
        .collect();

    tags.iter()
        .find(|(_, tag)| tag.alternatives().iter().any(|alt| alt.len() == 1 && alt[0] == name))
        .or_else(|| {
            tags.iter().find(|(_, tag)| {
                tag.alternatives()
                    .iter()
                    .any(|alt| alt.last().map(String::as_str) == Some(name))
            })
        })
        .map(|(f, _)| *f)
}

/// Resolves the leaf or leaf-list a leafref-typed schema node points at,
/// following chains of leafrefs.
pub fn leafref_target<'a>(schema: SchemaRef<'a>, at: &DataPath) -> Result<SchemaRef<'a>, YangError> {
    let mut current = schema;
    for _ in 0..MAX_LEAFREF_CHAIN {
        let raw = match current.yang_type().and_then(|t| t.path.as_deref()) {
            Some(raw) => raw,
            None => return Ok(current),
        };
        let path = LeafrefPath::parse(raw).map_err(|e| {
            YangError::schema(at.clone(), format!("leafref {}: {}", current.path(), e))
        })?;
        current = resolve_schema_path(current, &path).ok_or_else(|| {
            YangError::schema(
                at.clone(),
                format!("leafref path '{}' of {} does not resolve", raw, current.path()),
            )
        })?;
    }
    Err(YangError::schema(
        at.clone(),
        format!("leafref chain from {} is too long", schema.path()),
    ))
}

fn resolve_schema_path<'a>(from: SchemaRef<'a>, path: &LeafrefPath) -> Option<SchemaRef<'a>> {
    let mut node = if path.is_absolute() {
        let mut root = from;
        while let Some(parent) = root.parent() {
            root = parent;
        }
        root
    } else {
        from
    };
    let mut steps = path.steps().iter().peekable();

    // An absolute path may name the root itself.
    if path.is_absolute() {
        if let Some(Step::Node(seg)) = steps.peek() {
            if seg.name == node.name() && data_child(node, &seg.name).is_none() {
                steps.next();
            }
        }
    }

    for step in steps {
        node = match step {
            Step::Parent => data_parent(node)?,
            Step::Node(seg) => data_child(node, &seg.name)?,
        };
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Entry, SchemaTree, TypeKind, YangType};

    fn tree() -> SchemaTree {
        SchemaTree::new(
            Entry::container("device")
                .child(
                    Entry::container("interfaces").child(
                        Entry::list("interface", "name")
                            .child(Entry::leaf("name", YangType::leafref("../config/name")))
                            .child(
                                Entry::container("config")
                                    .child(Entry::leaf("name", YangType::string()))
                                    .child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16))),
                            ),
                    ),
                )
                .child(
                    Entry::choice("address-family")
                        .child(Entry::case("v4").child(Entry::leaf("ipv4", YangType::string())))
                        .child(
                            Entry::case("v6").child(
                                Entry::choice("mode")
                                    .child(Entry::case("slaac").child(Entry::leaf("slaac", YangType::new(TypeKind::Empty)))),
                            ),
                        ),
                )
                .child(Entry::leaf("primary", YangType::leafref("/interfaces/interface/name"))),
        )
        .unwrap()
    }

    fn field(path: &str) -> FieldDef {
        RecordType::builder("T")
            .leaf("F", path)
            .build()
            .field("F")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_direct_child() {
        let tree = tree();
        let r = child_schema(tree.root(), &field("interfaces")).unwrap().unwrap();
        assert_eq!(r.schema.name(), "interfaces");
    }

    #[test]
    fn test_own_name_prefix_dropped() {
        let tree = tree();
        let r = child_schema(tree.root(), &field("/device/interfaces")).unwrap().unwrap();
        assert_eq!(r.path, vec!["interfaces"]);
    }

    #[test]
    fn test_compressed_path_through_elided_container() {
        let tree = tree();
        let list = tree.find("interfaces/interface").unwrap();
        let r = child_schema(list, &field("config/mtu")).unwrap().unwrap();
        assert_eq!(r.schema.path(), "/device/interfaces/interface/config/mtu");
    }

    #[test]
    fn test_choice_levels_are_transparent() {
        let tree = tree();
        let r = child_schema(tree.root(), &field("ipv4")).unwrap().unwrap();
        assert_eq!(r.schema.path(), "/device/address-family/v4/ipv4");
        let r = child_schema(tree.root(), &field("slaac")).unwrap().unwrap();
        assert!(r.schema.is_leaf());
    }

    #[test]
    fn test_missing_field_is_not_an_error() {
        let tree = tree();
        assert_eq!(child_schema(tree.root(), &field("nope")).unwrap(), None);
        assert_eq!(child_schema(tree.root(), &field("interfaces/nope")).unwrap(), None);
        let annotation = RecordType::builder("T").annotation("Meta", "@").build();
        assert_eq!(
            child_schema(tree.root(), annotation.field("Meta").unwrap()).unwrap(),
            None
        );
    }

    #[test]
    fn test_malformed_tag_is_an_error() {
        let tree = tree();
        assert!(child_schema(tree.root(), &field("a|b")).is_err());
        assert!(child_schema(tree.root(), &field("a//b")).is_err());
    }

    #[test]
    fn test_field_for_schema_name() {
        let ty = RecordType::builder("Interface")
            .leaf("Mtu", "config/mtu")
            .leaf("Name", "config/name|name")
            .leaf("Description", "config/description")
            .build();
        assert_eq!(field_for_schema_name(&ty, "name").unwrap().name, "Name");
        assert_eq!(field_for_schema_name(&ty, "mtu").unwrap().name, "Mtu");
        assert!(field_for_schema_name(&ty, "type").is_none());
    }

    #[test]
    fn test_leafref_targets() {
        let tree = tree();
        let key = tree.find("interfaces/interface/name").unwrap();
        let target = leafref_target(key, &DataPath::root()).unwrap();
        assert_eq!(target.path(), "/device/interfaces/interface/config/name");

        let primary = tree.find("primary").unwrap();
        let target = leafref_target(primary, &DataPath::root()).unwrap();
        assert_eq!(target.path(), "/device/interfaces/interface/config/name");
    }

    #[test]
    fn test_dangling_leafref() {
        let tree = SchemaTree::new(
            Entry::container("c").child(Entry::leaf("r", YangType::leafref("../missing"))),
        )
        .unwrap();
        let err = leafref_target(tree.find("r").unwrap(), &DataPath::root()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Schema);
    }
}
