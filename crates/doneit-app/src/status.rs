//! Per-operation status channels.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use doneit_core::{Outcome, TaskRecord};
use tokio::sync::watch;
use tracing::warn;

use crate::error::TaskError;

/// Latest outcome of one kind of operation, observable through a `watch` channel.
///
/// The channel starts at `None`. Each invocation publishes `Loading` before its
/// first store call and its terminal outcome when it finishes. Observers that
/// fall behind see only the latest value, so [`is_loading`](Self::is_loading)
/// is the reliable "anything pending?" check when invocations overlap.
#[derive(Debug)]
pub struct Publisher<T> {
    operation: &'static str,
    tx: watch::Sender<Option<Outcome<T>>>,
    in_flight: AtomicUsize,
}

impl<T: Clone> Publisher<T> {
    /// Publisher for the named operation.
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            operation,
            tx,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Operation name used in logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Observe future outcomes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Outcome<T>>> {
        self.tx.subscribe()
    }

    /// Most recently published outcome.
    #[must_use]
    pub fn current(&self) -> Option<Outcome<T>> {
        self.tx.borrow().clone()
    }

    /// Returns true while at least one invocation is pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    /// Run one invocation, publishing `Loading` then its terminal outcome.
    pub(crate) async fn track<F>(&self, invocation: F) -> Outcome<T>
    where
        F: Future<Output = Result<T, TaskError>>,
    {
        let _pending = InFlight::enter(&self.in_flight);
        self.tx.send_replace(Some(Outcome::Loading));

        let outcome = match invocation.await {
            Ok(value) => Outcome::Success(value),
            Err(err) => {
                warn!(operation = self.operation, kind = ?err.kind(), error = %err, "Task operation failed");
                Outcome::Failure(err.into())
            }
        };
        self.tx.send_replace(Some(outcome.clone()));
        outcome
    }
}

/// Decrements the in-flight count even when the invocation future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Status publishers for every coordinator operation.
#[derive(Debug)]
pub struct Statuses {
    /// `load` and `reload`.
    pub load: Publisher<Vec<TaskRecord>>,
    /// `add`.
    pub add: Publisher<TaskRecord>,
    /// `update`.
    pub update: Publisher<TaskRecord>,
    /// `delete`.
    pub delete: Publisher<TaskRecord>,
    /// `toggle_done`.
    pub toggle: Publisher<TaskRecord>,
    /// `fetch`.
    pub fetch: Publisher<TaskRecord>,
    /// `bulk_store`; the payload is the number of stored records.
    pub bulk: Publisher<usize>,
}

impl Default for Statuses {
    fn default() -> Self {
        Self {
            load: Publisher::new("load"),
            add: Publisher::new("add"),
            update: Publisher::new("update"),
            delete: Publisher::new("delete"),
            toggle: Publisher::new("toggle_done"),
            fetch: Publisher::new("fetch"),
            bulk: Publisher::new("bulk_store"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doneit_core::FailureKind;

    #[tokio::test]
    async fn track_publishes_terminal_outcome() {
        let publisher = Publisher::<usize>::new("count");
        assert_eq!(publisher.current(), None);

        let outcome = publisher.track(async { Ok(3) }).await;
        assert_eq!(outcome, Outcome::Success(3));
        assert_eq!(publisher.current(), Some(Outcome::Success(3)));
        assert!(!publisher.is_loading());

        let outcome = publisher.track(async { Err(TaskError::NotAuthenticated) }).await;
        assert_eq!(
            outcome.failure().map(|failure| failure.kind),
            Some(FailureKind::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn loading_is_visible_while_pending() {
        let publisher = Publisher::<()>::new("refresh");
        let outcome = publisher
            .track(async {
                assert!(publisher.is_loading());
                assert_eq!(publisher.current(), Some(Outcome::Loading));
                Ok(())
            })
            .await;
        assert!(outcome.is_success());
        assert!(!publisher.is_loading());
    }

    #[tokio::test]
    async fn dropped_invocation_is_no_longer_pending() {
        let publisher = Publisher::<()>::new("dropped");
        tokio::select! {
            biased;
            _ = publisher.track(std::future::pending()) => {}
            () = std::future::ready(()) => {}
        }
        assert!(!publisher.is_loading());
        assert_eq!(publisher.current(), Some(Outcome::Loading));
    }
}
