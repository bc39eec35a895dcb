//! Error types for validation, unmarshal and leafref failures.
//!
//! This module provides the per-failure [`YangError`], the non-empty
//! [`YangErrors`] collection and the [`ErrorSink`] that decides between
//! fail-fast and collect-everything walks.

mod sink;
mod yang_error;

pub use sink::{ErrorSink, Halt, Policy};
pub use yang_error::{ErrorKind, YangError, YangErrors};
