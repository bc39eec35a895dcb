use stillwater::Validation;

use crate::data::{PathTag, Record};
use crate::error::{ErrorKind, YangError};
use crate::navigate::data_parent;
use crate::path::DataPath;
use crate::scalar::into_validation;
use crate::schema::SchemaRef;
use crate::ValidationResult;

/// The result of validating one choice of a record.
#[derive(Debug)]
pub struct ChoiceOutcome {
    /// Names of the record fields that select some case, across every case.
    pub selected: Vec<String>,
    pub result: ValidationResult<()>,
}

/// Checks that the populated fields of `record` select at most one case of
/// `choice`.
///
/// A data node placed directly under the choice is its own implicit case,
/// and choices nested in a case select that case when any of their own
/// cases is selected. On a conflict every selected field name is still
/// returned.
///
/// ```rust
/// use yangtree::{validate_choice, DataPath, Entry, Record, RecordType, Scalar, SchemaTree, YangType};
///
/// let tree = SchemaTree::new(
///     Entry::container("addr").child(
///         Entry::choice("family")
///             .child(Entry::case("v4").child(Entry::leaf("ipv4", YangType::string())))
///             .child(Entry::case("v6").child(Entry::leaf("ipv6", YangType::string()))),
///     ),
/// )
/// .unwrap();
/// let ty = RecordType::builder("Addr").leaf("Ipv4", "ipv4").leaf("Ipv6", "ipv6").build();
/// let record = Record::new(ty).with("Ipv4", Scalar::from("10.0.0.1")).unwrap();
///
/// let outcome = validate_choice(tree.find("family").unwrap(), &record, &DataPath::root());
/// assert_eq!(outcome.selected, vec!["Ipv4"]);
/// assert!(outcome.result.is_success());
/// ```
pub fn validate_choice(choice: SchemaRef<'_>, record: &Record, path: &DataPath) -> ChoiceOutcome {
    let owner = data_parent(choice);
    let mut errors = Vec::new();
    let mut selected = Vec::new();
    let mut cases = Vec::new();

    for branch in choice.dir() {
        let fields = branch_fields(branch, record, owner, path, &mut errors);
        if !fields.is_empty() {
            cases.push(branch.name());
            selected.extend(fields);
        }
    }

    if cases.len() > 1 {
        errors.push(
            YangError::new(
                ErrorKind::ChoiceConflict,
                path.clone(),
                format!("fields from more than one case of choice {} are populated", choice.name()),
            )
            .with_got(cases.join(", ")),
        );
    }

    ChoiceOutcome {
        selected,
        result: into_validation(errors),
    }
}

fn branch_fields(
    node: SchemaRef<'_>,
    record: &Record,
    owner: Option<SchemaRef<'_>>,
    path: &DataPath,
    errors: &mut Vec<YangError>,
) -> Vec<String> {
    if node.is_case() {
        let mut fields = Vec::new();
        for child in node.dir() {
            fields.extend(branch_fields(child, record, owner, path, errors));
        }
        fields
    } else if node.is_choice() {
        let outcome = validate_choice(node, record, path);
        if let Validation::Failure(e) = outcome.result {
            errors.extend(e);
        }
        outcome.selected
    } else {
        populated_fields(node, record, owner)
    }
}

/// Populated record fields whose path tag leads into `node`.
fn populated_fields(node: SchemaRef<'_>, record: &Record, owner: Option<SchemaRef<'_>>) -> Vec<String> {
    record
        .values()
        .filter_map(|(name, _)| {
            let def = record.record_type().field(name)?;
            if def.is_annotation() {
                return None;
            }
            let tag = PathTag::parse(&def.path).ok()?;
            tag.alternatives()
                .iter()
                .any(|alt| first_segment(alt, owner) == Some(node.name()))
                .then(|| name.to_string())
        })
        .collect()
}

fn first_segment<'s>(alt: &'s [String], owner: Option<SchemaRef<'_>>) -> Option<&'s str> {
    match alt {
        [first, second, ..] if owner.is_some_and(|o| o.is_container() && o.name() == first.as_str()) => {
            Some(second)
        }
        [first, ..] => Some(first),
        [] => None,
    }
}
