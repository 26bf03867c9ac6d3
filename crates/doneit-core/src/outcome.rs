//! Tri-state outcome published for every asynchronous task operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No session owner was available.
    NotAuthenticated,
    /// The record belongs to someone else.
    Unauthorized,
    /// A point lookup found nothing.
    NotFound,
    /// The backing store reported an error.
    Store,
    /// The input was rejected before any store call.
    Validation,
}

/// Human-readable failure carried by [`Outcome::Failure`].
///
/// Plain data, so it can be cloned onto any observer's thread.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure classification.
    pub kind: FailureKind,
    /// Short message suitable for display.
    pub message: String,
}

impl Failure {
    /// Build a failure.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// State of one operation invocation: `Loading`, then exactly one of
/// `Success` or `Failure`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Request issued, no answer yet.
    Loading,
    /// Completed with a payload.
    Success(T),
    /// Completed with an error.
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Shorthand for a failed outcome.
    #[must_use]
    pub fn failure_of(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(kind, message))
    }

    /// Returns true while the operation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true once the operation has finished either way.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Returns true for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrow the payload of a successful outcome.
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the failure of a failed outcome.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Transform the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Loading => Outcome::Loading,
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Convert a terminal outcome into a `Result`; `None` while loading.
    pub fn into_result(self) -> Option<Result<T, Failure>> {
        match self {
            Self::Loading => None,
            Self::Success(value) => Some(Ok(value)),
            Self::Failure(failure) => Some(Err(failure)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T>
where
    E: Into<Failure>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_is_not_terminal() {
        let outcome: Outcome<u8> = Outcome::Loading;
        assert!(outcome.is_loading());
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.into_result(), None);
    }

    #[test]
    fn map_keeps_failures() {
        let failed: Outcome<u8> = Outcome::failure_of(FailureKind::Store, "disk full");
        let mapped = failed.map(u16::from);
        assert_eq!(
            mapped.failure().map(|f| f.message.as_str()),
            Some("disk full")
        );

        let ok: Outcome<u8> = Outcome::Success(2);
        assert_eq!(ok.map(|v| v * 2).success(), Some(&4));
    }

    #[test]
    fn converts_from_result() {
        let result: Result<u8, Failure> = Err(Failure::new(FailureKind::NotFound, "task t-1 not found"));
        let outcome = Outcome::from(result);
        assert_eq!(outcome.failure().map(|f| f.kind), Some(FailureKind::NotFound));
    }
}
