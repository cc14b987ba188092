use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::entity::{EntityId, EntitySnapshot, LifecycleState, Operation};
use crate::runtime::{RuntimeClient, RuntimeError};

#[derive(Debug, Default)]
struct FakeState {
    containers: Vec<EntitySnapshot>,
    calls: Vec<(Operation, EntityId)>,
    failing: BTreeSet<EntityId>,
    list_failure: Option<String>,
}

/// In-memory runtime used for demo mode and tests.
///
/// Every lifecycle call is recorded. Ids registered with `fail_on` reject
/// every operation, and a successful call moves the stored container to the
/// operation's target state so a later listing reflects it.
#[derive(Debug, Default)]
pub struct FakeRuntime {
    state: Mutex<FakeState>,
}

impl FakeRuntime {
    pub fn new(containers: Vec<EntitySnapshot>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                containers,
                ..Default::default()
            }),
        }
    }

    /// A handful of containers in mixed states
    pub fn demo() -> Self {
        let containers = [
            ("3f9a1c0e7b2d4c8a9e1f", "api", "ghcr.io/acme/api:1.4", "running"),
            ("8b2e4d6f0a1c3e5b7d9f", "worker", "ghcr.io/acme/worker:1.4", "running"),
            ("c41d7e9a2b5f8c0e3a6d", "postgres", "postgres:16", "running"),
            ("d7a0b3c6e9f2a5d8b1c4", "redis", "redis:7-alpine", "paused"),
            ("e5c8f1a4d7b0e3c6f9a2", "migrate", "ghcr.io/acme/api:1.4", "exited"),
        ]
        .into_iter()
        .map(|(id, name, image, state)| EntitySnapshot {
            id: id.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            state: LifecycleState::from_remote(state),
        })
        .collect();

        Self::new(containers)
    }

    /// Make every operation on `id` fail
    pub fn fail_on(&self, id: &str) {
        self.lock().failing.insert(id.to_string());
    }

    /// Make `list_entities` fail with `message`
    pub fn fail_listing(&self, message: &str) {
        self.lock().list_failure = Some(message.to_string());
    }

    /// Replace the containers returned by the next listing
    pub fn set_containers(&self, containers: Vec<EntitySnapshot>) {
        self.lock().containers = containers;
    }

    /// Lifecycle calls received so far, in order
    pub fn calls(&self) -> Vec<(Operation, EntityId)> {
        self.lock().calls.clone()
    }

    pub fn calls_for(&self, operation: Operation) -> Vec<EntityId> {
        self.lock()
            .calls
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, id)| id.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, operation: Operation, id: &str) -> Result<(), RuntimeError> {
        let mut state = self.lock();
        state.calls.push((operation, id.to_string()));

        if state.failing.contains(id) {
            return Err(RuntimeError::operation(id, operation, "injected failure"));
        }

        let container = state
            .containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RuntimeError::operation(id, operation, "no such container"))?;
        container.state = operation.target_state();
        Ok(())
    }
}

#[async_trait]
impl RuntimeClient for FakeRuntime {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn list_entities(&self) -> Result<Vec<EntitySnapshot>, RuntimeError> {
        let state = self.lock();
        if let Some(message) = &state.list_failure {
            return Err(RuntimeError::List {
                message: message.clone(),
            });
        }
        Ok(state.containers.clone())
    }

    async fn pause(&self, id: &str) -> Result<(), RuntimeError> {
        self.record(Operation::Pause, id)
    }

    async fn unpause(&self, id: &str) -> Result<(), RuntimeError> {
        self.record(Operation::Unpause, id)
    }

    async fn start(&self, id: &str) -> Result<(), RuntimeError> {
        self.record(Operation::Start, id)
    }

    async fn stop(&self, id: &str) -> Result<(), RuntimeError> {
        self.record(Operation::Stop, id)
    }
}

/// Count calls per id, handy for "exactly once" assertions
pub fn tally(calls: &[(Operation, EntityId)]) -> BTreeMap<EntityId, usize> {
    let mut counts = BTreeMap::new();
    for (_, id) in calls {
        *counts.entry(id.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_are_recorded_and_applied() {
        let runtime = FakeRuntime::demo();

        runtime.pause("3f9a1c0e7b2d4c8a9e1f").await.unwrap();

        assert_eq!(
            runtime.calls(),
            vec![(Operation::Pause, "3f9a1c0e7b2d4c8a9e1f".to_string())]
        );
        let listed = runtime.list_entities().await.unwrap();
        assert_eq!(listed[0].state, LifecycleState::Paused);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let runtime = FakeRuntime::demo();
        runtime.fail_on("c41d7e9a2b5f8c0e3a6d");

        let err = runtime.stop("c41d7e9a2b5f8c0e3a6d").await.unwrap_err();
        assert!(matches!(err, RuntimeError::Operation { operation: Operation::Stop, .. }));

        let listed = runtime.list_entities().await.unwrap();
        assert_eq!(listed[2].state, LifecycleState::Running);
    }

    #[tokio::test]
    async fn test_unknown_id_fails() {
        let runtime = FakeRuntime::new(Vec::new());
        assert!(runtime.start("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_listing_failure() {
        let runtime = FakeRuntime::demo();
        runtime.fail_listing("daemon went away");

        let err = runtime.list_entities().await.unwrap_err();
        assert_eq!(
            err,
            RuntimeError::List {
                message: "daemon went away".to_string()
            }
        );
    }
}
