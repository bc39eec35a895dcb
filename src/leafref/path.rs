//! Leafref path expressions.
//!
//! A path is a `/`-separated list of steps. A step is `..` or a node name,
//! optionally followed by key predicates:
//!
//! ```text
//! ../../interfaces/interface[name = current()/../ifname]/subinterfaces/subinterface/index
//! /routing/instance[name = 'default']/id
//! ```
//!
//! Module prefixes are dropped from every name. Separators inside quotes or
//! brackets do not split steps.

use std::fmt::{self, Display};

use crate::data::local_name;

/// Errors for malformed leafref path expressions.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LeafrefPathError {
    #[error("leafref path is empty")]
    Empty,

    #[error("leafref path '{0}' has an empty step")]
    EmptyStep(String),

    #[error("leafref path '{0}' has an unterminated quote")]
    UnterminatedQuote(String),

    #[error("leafref path '{0}' has unbalanced brackets")]
    UnbalancedBrackets(String),

    #[error("leafref predicate '[{0}]' is not of the form key = 'literal' or key = current()/path")]
    BadPredicate(String),
}

/// The right-hand side of a key predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateValue {
    /// A quoted literal, unquoted.
    Literal(String),
    /// A `current()/...` path, evaluated from the node holding the leafref.
    Current(Vec<Step>),
}

/// One `[key = value]` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub key: String,
    pub value: PredicateValue,
}

/// A named step, with its predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStep {
    pub name: String,
    pub predicates: Vec<Predicate>,
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Parent,
    Node(NodeStep),
}

/// A parsed leafref path.
///
/// ```rust
/// use yangtree::{LeafrefPath, PredicateValue, Step};
///
/// let path = LeafrefPath::parse("../../oc-if:interface[oc-if:name = current()/../ifname]/index").unwrap();
/// assert!(!path.is_absolute());
/// assert_eq!(path.leading_parents(), 2);
///
/// let Step::Node(interface) = &path.steps()[2] else { panic!() };
/// assert_eq!(interface.name, "interface");
/// assert_eq!(interface.predicates[0].key, "name");
/// assert!(matches!(interface.predicates[0].value, PredicateValue::Current(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafrefPath {
    raw: String,
    absolute: bool,
    steps: Vec<Step>,
}

impl LeafrefPath {
    pub fn parse(raw: &str) -> Result<Self, LeafrefPathError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LeafrefPathError::Empty);
        }
        let absolute = trimmed.starts_with('/');
        let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let steps = parse_steps(body, raw)?;
        Ok(Self {
            raw: raw.to_string(),
            absolute,
            steps,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns true if the path starts at the root of the data tree.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Counts the `..` steps at the start of the path.
    pub fn leading_parents(&self) -> usize {
        self.steps
            .iter()
            .take_while(|s| matches!(s, Step::Parent))
            .count()
    }
}

impl Display for LeafrefPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_steps(body: &str, raw: &str) -> Result<Vec<Step>, LeafrefPathError> {
    split_outside(body, '/', raw)?
        .into_iter()
        .map(|segment| parse_step(segment.trim(), raw))
        .collect()
}

fn parse_step(segment: &str, raw: &str) -> Result<Step, LeafrefPathError> {
    if segment.is_empty() {
        return Err(LeafrefPathError::EmptyStep(raw.to_string()));
    }
    if segment == ".." {
        return Ok(Step::Parent);
    }
    let (name, mut rest) = match segment.find('[') {
        Some(i) => (&segment[..i], &segment[i..]),
        None => (segment, ""),
    };
    let name = local_name(name.trim());
    if name.is_empty() {
        return Err(LeafrefPathError::EmptyStep(raw.to_string()));
    }

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let close = closing_bracket(rest).ok_or_else(|| LeafrefPathError::UnbalancedBrackets(raw.to_string()))?;
        predicates.push(parse_predicate(&rest[1..close], raw)?);
        rest = rest[close + 1..].trim_start();
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(LeafrefPathError::UnbalancedBrackets(raw.to_string()));
        }
    }

    Ok(Step::Node(NodeStep {
        name: name.to_string(),
        predicates,
    }))
}

fn parse_predicate(body: &str, raw: &str) -> Result<Predicate, LeafrefPathError> {
    let bad = || LeafrefPathError::BadPredicate(body.trim().to_string());
    let parts = split_outside(body, '=', raw)?;
    let [key, value] = parts.as_slice() else {
        return Err(bad());
    };
    let key = local_name(key.trim());
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return Err(bad());
    }

    let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);
    let value = if quoted('\'') || quoted('"') {
        PredicateValue::Literal(value[1..value.len() - 1].to_string())
    } else if let Some(rest) = value.strip_prefix("current()") {
        let rest = rest.trim_start();
        let rest = rest.strip_prefix('/').ok_or_else(bad)?;
        PredicateValue::Current(parse_steps(rest, raw)?)
    } else {
        return Err(bad());
    };

    Ok(Predicate {
        key: key.to_string(),
        value,
    })
}

/// Splits `s` on `sep`, ignoring separators inside quotes or brackets.
fn split_outside<'s>(s: &'s str, sep: char, raw: &str) -> Result<Vec<&'s str>, LeafrefPathError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| LeafrefPathError::UnbalancedBrackets(raw.to_string()))?;
            }
            (None, c) if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(LeafrefPathError::UnterminatedQuote(raw.to_string()));
    }
    if depth != 0 {
        return Err(LeafrefPathError::UnbalancedBrackets(raw.to_string()));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

/// Returns the index of the `]` closing the `[` at the start of `s`.
fn closing_bracket(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
