use crate::data::{DataNode, PathTag, Record, Scalar};
use crate::error::{ErrorKind, YangError, YangErrors};
use crate::navigate::{data_child, field_for_schema_name, relative_to};
use crate::path::DataPath;
use crate::schema::{SchemaRef, TypeKind};
use crate::walk::{for_each_node, NodeInfo, NodeValue};
use crate::ValidationResult;

use super::path::{LeafrefPath, PredicateValue, Step};
use super::LeafrefOptions;

/// A named step with every predicate reduced to a literal.
#[derive(Debug, Clone)]
struct ResolvedStep {
    name: String,
    keys: Vec<(String, String)>,
}

impl ResolvedStep {
    fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            keys: Vec::new(),
        }
    }
}

/// Checks every leafref-typed leaf and leaf-list of `record` against the
/// values it points at.
///
/// The whole tree is always checked; every mismatch is reported.
///
/// ```rust
/// use yangtree::{resolve_leafrefs, Entry, LeafrefOptions, Record, RecordType, Scalar, SchemaTree, YangType};
///
/// let tree = SchemaTree::new(
///     Entry::container("system")
///         .child(Entry::leaf("hostname", YangType::string()))
///         .child(Entry::leaf("alias", YangType::leafref("../hostname"))),
/// )
/// .unwrap();
/// let ty = RecordType::builder("System").leaf("Hostname", "hostname").leaf("Alias", "alias").build();
///
/// let good = Record::new(ty.clone())
///     .with("Hostname", Scalar::from("r1")).unwrap()
///     .with("Alias", Scalar::from("r1")).unwrap();
/// assert!(resolve_leafrefs(tree.root(), &good, &LeafrefOptions::new()).is_success());
///
/// let bad = Record::new(ty)
///     .with("Hostname", Scalar::from("r1")).unwrap()
///     .with("Alias", Scalar::from("r2")).unwrap();
/// assert!(resolve_leafrefs(tree.root(), &bad, &LeafrefOptions::new()).is_failure());
/// ```
pub fn resolve_leafrefs(schema: SchemaRef<'_>, record: &Record, options: &LeafrefOptions) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let walked = for_each_node(schema, record, |info| check_node(info, options, &mut errors));
    if let stillwater::Validation::Failure(e) = walked {
        errors.extend(e);
    }
    match YangErrors::from_vec(errors) {
        None => stillwater::Validation::Success(()),
        Some(errors) => stillwater::Validation::Failure(errors),
    }
}

fn check_node(info: &NodeInfo<'_>, options: &LeafrefOptions, errors: &mut Vec<YangError>) {
    let Some(ty) = info.schema.yang_type() else {
        return;
    };
    if ty.kind != TypeKind::Leafref {
        return;
    }
    let own: Vec<&Scalar> = match info.value {
        NodeValue::Node(DataNode::Leaf(v)) => vec![v],
        NodeValue::Node(DataNode::LeafList(vs)) => vs.iter().collect(),
        _ => return,
    };
    let Some(raw) = ty.path.as_deref() else {
        errors.push(YangError::schema(info.data_path.clone(), "leafref type has no path"));
        return;
    };
    let path = match LeafrefPath::parse(raw) {
        Ok(path) => path,
        Err(e) => {
            errors.push(YangError::schema(info.data_path.clone(), e.to_string()));
            return;
        }
    };
    tracing::trace!(path = %info.data_path, leafref = raw, "resolve leafref");

    let matches = match evaluate(info, path.is_absolute(), path.steps()) {
        Ok(matches) => matches,
        Err(e) => {
            errors.push(e);
            return;
        }
    };

    if own.is_empty() && matches.is_empty() {
        return;
    }

    if matches.is_empty() {
        if options.ignore_missing_data {
            tracing::debug!(path = %info.data_path, leafref = raw, "skipping leafref with no data");
            return;
        }
        let err = mismatch(&info.data_path, "pointed-to value is empty", raw, &own);
        if options.log_missing_data {
            tracing::warn!(error = %err, "leafref points at missing data");
        } else {
            errors.push(err);
        }
        return;
    }

    if own.is_empty() {
        errors.push(mismatch(&info.data_path, "leafref value is empty but the pointed-to value is not", raw, &own));
        return;
    }

    for value in own {
        if !matches.iter().any(|m| *m == value) {
            let found: Vec<_> = matches.iter().map(|m| m.to_string()).collect();
            errors.push(
                YangError::new(
                    ErrorKind::LeafrefMismatch,
                    info.data_path.clone(),
                    format!("value does not match any value at {}", raw),
                )
                .with_expected(found.join(", "))
                .with_got(value.to_string()),
            );
        }
    }
}

fn mismatch(path: &DataPath, message: &str, raw: &str, own: &[&Scalar]) -> YangError {
    let own: Vec<_> = own.iter().map(|v| v.to_string()).collect();
    YangError::new(ErrorKind::LeafrefMismatch, path.clone(), format!("{} at {}", message, raw)).with_got(own.join(", "))
}

/// Collects the values a path reaches from `info`.
fn evaluate<'a>(info: &NodeInfo<'a>, absolute: bool, steps: &[Step]) -> Result<Vec<&'a Scalar>, YangError> {
    let (start, names) = if absolute {
        let root = info.root();
        let mut names = resolve_steps(info, steps)?;
        if let Some(first) = names.first() {
            if first.name == root.schema.name() && data_child(root.schema, &first.name).is_none() {
                names.remove(0);
            }
        }
        (root, names)
    } else {
        let ups = steps.iter().take_while(|s| matches!(s, Step::Parent)).count();
        let Some((start, prefix)) = ascend(info, ups) else {
            return Ok(Vec::new());
        };
        let mut names: Vec<ResolvedStep> = prefix.iter().map(|s| ResolvedStep::plain(s)).collect();
        names.extend(resolve_steps(info, &steps[ups..])?);
        (start, names)
    };

    let mut out = Vec::new();
    if let Some(record) = start.record() {
        descend(start.schema, record, &names, &mut out);
    }
    Ok(out)
}

/// Climbs `ups` schema levels from `info`.
///
/// Each level consumes as many `..` as its `path_from_parent` has
/// segments; list entries consume none. When fewer remain than a level
/// needs, the climb stops at that level's parent and the unconsumed leading
/// segments are returned to be walked back down.
fn ascend<'n, 'a>(info: &'n NodeInfo<'a>, ups: usize) -> Option<(&'n NodeInfo<'a>, Vec<String>)> {
    let mut cur = info;
    let mut remaining = ups;
    while remaining > 0 {
        let parent = cur.parent?;
        let need = cur.path_from_parent.len();
        if need > remaining {
            let prefix = cur.path_from_parent[..need - remaining].to_vec();
            return Some((parent, prefix));
        }
        remaining -= need;
        cur = parent;
    }
    Some((cur, Vec::new()))
}

fn resolve_steps(info: &NodeInfo<'_>, steps: &[Step]) -> Result<Vec<ResolvedStep>, YangError> {
    let mut resolved = Vec::with_capacity(steps.len());
    for step in steps {
        let Step::Node(node) = step else {
            return Err(YangError::schema(
                info.data_path.clone(),
                "'..' may only lead a leafref path",
            ));
        };
        let mut keys = Vec::with_capacity(node.predicates.len());
        for predicate in &node.predicates {
            let value = match &predicate.value {
                PredicateValue::Literal(v) => v.clone(),
                PredicateValue::Current(path) => {
                    let found = evaluate(info, false, path)?;
                    match found.as_slice() {
                        [one] => one.to_string(),
                        _ => {
                            return Err(YangError::new(
                                ErrorKind::LeafrefMismatch,
                                info.data_path.clone(),
                                format!(
                                    "predicate on {} must match exactly one node, matched {}",
                                    predicate.key,
                                    found.len()
                                ),
                            ))
                        }
                    }
                }
            };
            keys.push((predicate.key.clone(), value));
        }
        resolved.push(ResolvedStep {
            name: node.name.clone(),
            keys,
        });
    }
    Ok(resolved)
}

/// Walks `steps` down from `record`, collecting leaf values.
fn descend<'a>(schema: SchemaRef<'_>, record: &'a Record, steps: &[ResolvedStep], out: &mut Vec<&'a Scalar>) {
    if steps.is_empty() {
        return;
    }
    for (name, value) in record.values() {
        let Some(def) = record.record_type().field(name) else {
            continue;
        };
        if def.is_annotation() {
            continue;
        }
        let Ok(tag) = PathTag::parse(&def.path) else {
            continue;
        };
        for alt in tag.alternatives() {
            let alt = relative_to(schema, alt);
            if alt.len() > steps.len() || !alt.iter().zip(steps).all(|(a, s)| *a == s.name) {
                continue;
            }
            let Some(child) = alt.iter().try_fold(schema, |node, seg| data_child(node, seg)) else {
                continue;
            };
            let rest = &steps[alt.len()..];
            let keys = &steps[alt.len() - 1].keys;
            match value {
                DataNode::Leaf(v) if rest.is_empty() => out.push(v),
                DataNode::LeafList(vs) if rest.is_empty() => out.extend(vs.iter()),
                DataNode::Container(r) => descend(child, r, rest, out),
                DataNode::KeyedList(entries) => {
                    for entry in entries.values().filter(|e| keys_match(e, keys)) {
                        descend(child, entry, rest, out);
                    }
                }
                DataNode::UnkeyedList(entries) => {
                    for entry in entries.iter().filter(|e| keys_match(e, keys)) {
                        descend(child, entry, rest, out);
                    }
                }
                _ => {}
            }
            break;
        }
    }
}

fn keys_match(entry: &Record, keys: &[(String, String)]) -> bool {
    keys.iter().all(|(key, want)| {
        field_for_schema_name(entry.record_type(), key)
            .and_then(|f| entry.leaf(&f.name))
            .is_some_and(|v| v.to_string() == *want)
    })
}
