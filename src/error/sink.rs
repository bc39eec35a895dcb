//! Error collection policy shared by every recursive walk.

use stillwater::Validation;

use super::{YangError, YangErrors};

/// How an [`ErrorSink`] reacts to the first recorded error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Stop the walk at the first error.
    FailFast,
    /// Record every error and keep walking.
    Collect,
}

/// Marker returned by [`ErrorSink::push`] when the walk must unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt;

/// Append-only error collector threaded through a tree walk.
///
/// Under [`Policy::FailFast`] every `push` returns `Err(Halt)`, so call sites
/// written as `sink.push(err)?` unwind immediately. Under
/// [`Policy::Collect`] `push` always returns `Ok` and the walk continues.
///
/// ```rust
/// use yangtree::{DataPath, ErrorKind, ErrorSink, YangError};
///
/// let mut sink = ErrorSink::collect();
/// for name in ["a", "b"] {
///     let err = YangError::new(ErrorKind::Range, DataPath::from_node(name), "bad");
///     assert!(sink.push(err).is_ok());
/// }
/// assert_eq!(sink.finish().into_result().unwrap_err().len(), 2);
/// ```
#[derive(Debug)]
pub struct ErrorSink {
    policy: Policy,
    errors: Vec<YangError>,
}

impl ErrorSink {
    /// Creates a sink with the given policy.
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            errors: Vec::new(),
        }
    }

    /// Creates a sink that stops at the first error.
    pub fn fail_fast() -> Self {
        Self::new(Policy::FailFast)
    }

    /// Creates a sink that records every error.
    pub fn collect() -> Self {
        Self::new(Policy::Collect)
    }

    /// Returns the sink's policy.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Records an error.
    pub fn push(&mut self, error: YangError) -> Result<(), Halt> {
        self.errors.push(error);
        match self.policy {
            Policy::FailFast => Err(Halt),
            Policy::Collect => Ok(()),
        }
    }

    /// Records every error of a collection.
    pub fn extend(&mut self, errors: YangErrors) -> Result<(), Halt> {
        self.errors.extend(errors);
        match self.policy {
            Policy::FailFast => Err(Halt),
            Policy::Collect => Ok(()),
        }
    }

    /// Records the failure side of a nested result, if any.
    pub fn absorb(&mut self, result: Validation<(), YangErrors>) -> Result<(), Halt> {
        match result {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => self.extend(errors),
        }
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consumes the sink, producing the final result.
    pub fn finish(self) -> Validation<(), YangErrors> {
        match YangErrors::from_vec(self.errors) {
            None => Validation::Success(()),
            Some(errors) => Validation::Failure(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::path::DataPath;

    fn err() -> YangError {
        YangError::new(ErrorKind::Length, DataPath::root(), "too long")
    }

    #[test]
    fn test_fail_fast_halts() {
        let mut sink = ErrorSink::fail_fast();
        assert_eq!(sink.push(err()), Err(Halt));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_collect_continues() {
        let mut sink = ErrorSink::collect();
        assert!(sink.push(err()).is_ok());
        assert!(sink.absorb(Validation::Failure(YangErrors::single(err()))).is_ok());
        assert!(sink.absorb(Validation::Success(())).is_ok());
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_empty_sink_succeeds() {
        assert!(ErrorSink::collect().finish().is_success());
    }
}
