//! Runtime client trait
//!
//! A runtime client is the backend that actually owns the containers. The
//! controller holds exactly one client handle and talks to it through this
//! trait, one call per container.

use async_trait::async_trait;
use thiserror::Error;

use crate::entity::{EntityId, EntitySnapshot, Operation};

/// Errors surfaced by runtime clients
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    /// The runtime daemon cannot be reached
    #[error("cannot connect to container runtime: {message}")]
    Connection { message: String },
    /// Listing containers failed
    #[error("failed to list containers: {message}")]
    List { message: String },
    /// A single lifecycle call failed for one container
    #[error("failed to {operation} {id}: {cause}")]
    Operation {
        id: EntityId,
        operation: Operation,
        cause: String,
    },
}

impl RuntimeError {
    pub fn operation(id: &str, operation: Operation, cause: impl Into<String>) -> Self {
        RuntimeError::Operation {
            id: id.to_string(),
            operation,
            cause: cause.into(),
        }
    }

    /// Short message suitable for a single row, without the id
    pub fn cause(&self) -> &str {
        match self {
            RuntimeError::Connection { message } | RuntimeError::List { message } => message,
            RuntimeError::Operation { cause, .. } => cause,
        }
    }
}

/// Backend that lists containers and changes their lifecycle state
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Human-readable name of this client
    fn name(&self) -> &'static str;

    /// Full snapshot of the containers this client can see
    async fn list_entities(&self) -> Result<Vec<EntitySnapshot>, RuntimeError>;

    async fn pause(&self, id: &str) -> Result<(), RuntimeError>;

    async fn unpause(&self, id: &str) -> Result<(), RuntimeError>;

    async fn start(&self, id: &str) -> Result<(), RuntimeError>;

    async fn stop(&self, id: &str) -> Result<(), RuntimeError>;

    /// Route an operation to the matching call
    async fn apply(&self, operation: Operation, id: &str) -> Result<(), RuntimeError> {
        match operation {
            Operation::Pause => self.pause(id).await,
            Operation::Unpause => self.unpause(id).await,
            Operation::Start => self.start(id).await,
            Operation::Stop => self.stop(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_display() {
        let err = RuntimeError::operation("a1", Operation::Stop, "no such container");
        assert_eq!(err.to_string(), "failed to stop a1: no such container");
        assert_eq!(err.cause(), "no such container");
    }

    #[test]
    fn test_connection_error_display() {
        let err = RuntimeError::Connection {
            message: "socket not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot connect to container runtime: socket not found"
        );
    }
}
