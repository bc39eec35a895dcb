//! Referential integrity for leafref-typed leaves.
//!
//! A leafref leaf names another leaf by path; its value must be one of the
//! values found there. [`resolve_leafrefs`] walks a populated tree and checks
//! every such leaf, evaluating `current()` key predicates along the way.

mod path;
mod resolve;

pub use path::{LeafrefPath, LeafrefPathError, NodeStep, Predicate, PredicateValue, Step};
pub use resolve::resolve_leafrefs;

/// Controls how a leafref pointing at data that is not present is treated.
///
/// By default it is an error. A populated target whose values do not include
/// the leafref's value is an error regardless of these options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeafrefOptions {
    pub ignore_missing_data: bool,
    pub log_missing_data: bool,
}

impl LeafrefOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips leafrefs whose target holds no data.
    pub fn ignore_missing_data(mut self) -> Self {
        self.ignore_missing_data = true;
        self
    }

    /// Logs leafrefs whose target holds no data at `warn` instead of failing.
    pub fn log_missing_data(mut self) -> Self {
        self.log_missing_data = true;
        self
    }
}
