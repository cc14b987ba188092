use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{ListContainersOptions, StartContainerOptions, StopContainerOptions};
use bollard::models::ContainerSummary;
use tracing::info;

use laboon_core::entity::{EntitySnapshot, LifecycleState, Operation};
use laboon_core::runtime::{RuntimeClient, RuntimeError};

/// Runtime client backed by the local Docker daemon
pub struct DockerRuntime {
    client: Docker,
    stop_timeout: i64,
    running_only: bool,
}

impl DockerRuntime {
    /// Connect using the daemon's local defaults (`DOCKER_HOST` or the platform socket)
    pub async fn connect(stop_timeout: i64, running_only: bool) -> Result<Self, RuntimeError> {
        let client =
            Docker::connect_with_local_defaults().map_err(|e| RuntimeError::Connection {
                message: e.to_string(),
            })?;

        // Verify connection
        let version = client
            .version()
            .await
            .map_err(|e| RuntimeError::Connection {
                message: format!("Docker ping failed: {}", e),
            })?;

        info!(
            version = version.version.as_deref().unwrap_or("unknown"),
            api = version.api_version.as_deref().unwrap_or("unknown"),
            "connected to Docker"
        );

        Ok(Self {
            client,
            stop_timeout,
            running_only,
        })
    }

    fn operation_error(id: &str, operation: Operation, err: bollard::errors::Error) -> RuntimeError {
        RuntimeError::operation(id, operation, err.to_string())
    }
}

fn snapshot_from_summary(summary: ContainerSummary) -> Option<EntitySnapshot> {
    let id = summary.id?;
    let name = summary
        .names
        .and_then(|names| names.into_iter().next())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.chars().take(12).collect());

    Some(EntitySnapshot {
        id,
        name,
        image: summary.image.unwrap_or_default(),
        state: summary
            .state
            .as_deref()
            .map(LifecycleState::from_remote)
            .unwrap_or_default(),
    })
}

#[async_trait]
impl RuntimeClient for DockerRuntime {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn list_entities(&self) -> Result<Vec<EntitySnapshot>, RuntimeError> {
        let options = ListContainersOptions::<String> {
            all: !self.running_only,
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(options))
            .await
            .map_err(|e| RuntimeError::List {
                message: e.to_string(),
            })?;

        Ok(containers
            .into_iter()
            .filter_map(snapshot_from_summary)
            .collect())
    }

    async fn pause(&self, id: &str) -> Result<(), RuntimeError> {
        self.client
            .pause_container(id)
            .await
            .map_err(|e| Self::operation_error(id, Operation::Pause, e))
    }

    async fn unpause(&self, id: &str) -> Result<(), RuntimeError> {
        self.client
            .unpause_container(id)
            .await
            .map_err(|e| Self::operation_error(id, Operation::Unpause, e))
    }

    async fn start(&self, id: &str) -> Result<(), RuntimeError> {
        self.client
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| Self::operation_error(id, Operation::Start, e))
    }

    async fn stop(&self, id: &str) -> Result<(), RuntimeError> {
        let options = StopContainerOptions {
            t: self.stop_timeout,
        };

        self.client
            .stop_container(id, Some(options))
            .await
            .map_err(|e| Self::operation_error(id, Operation::Stop, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_conversion() {
        let summary = ContainerSummary {
            id: Some("4f1c2b9e8d7a6c5b4a39".to_string()),
            names: Some(vec!["/api".to_string()]),
            image: Some("nginx:1.27".to_string()),
            state: Some("running".to_string()),
            ..Default::default()
        };

        let snapshot = snapshot_from_summary(summary).unwrap();
        assert_eq!(snapshot.name, "api");
        assert_eq!(snapshot.image, "nginx:1.27");
        assert_eq!(snapshot.state, LifecycleState::Running);
    }

    #[test]
    fn test_summary_without_name_uses_short_id() {
        let summary = ContainerSummary {
            id: Some("4f1c2b9e8d7a6c5b4a39".to_string()),
            state: Some("exited".to_string()),
            ..Default::default()
        };

        let snapshot = snapshot_from_summary(summary).unwrap();
        assert_eq!(snapshot.name, "4f1c2b9e8d7a");
        assert_eq!(snapshot.state, LifecycleState::Exited);
        assert_eq!(snapshot.image, "");
    }

    #[test]
    fn test_summary_without_id_is_skipped() {
        assert!(snapshot_from_summary(ContainerSummary::default()).is_none());
    }
}
