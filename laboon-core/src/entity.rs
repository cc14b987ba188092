//! Entity model for laboon
//!
//! An Entity is one container as the TUI knows it: the remote facts reported by
//! the runtime (id, name, image, state) plus a few local-only flags that never
//! travel back to the runtime (selection, in-flight operation, last failure).

use std::fmt;

/// Unique identifier for an entity (the runtime's container id)
pub type EntityId = String;

/// Lifecycle phase of a container
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Running,
    Paused,
    Exited,
    #[default]
    Unknown,
}

impl LifecycleState {
    /// Map a runtime state string ("running", "exited", ...) onto a lifecycle state
    pub fn from_remote(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "running" | "restarting" => LifecycleState::Running,
            "paused" => LifecycleState::Paused,
            "exited" | "created" | "dead" | "removing" => LifecycleState::Exited,
            _ => LifecycleState::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LifecycleState::Running => "running",
            LifecycleState::Paused => "paused",
            LifecycleState::Exited => "exited",
            LifecycleState::Unknown => "unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            LifecycleState::Running => "▶",
            LifecycleState::Exited => "⏹",
            LifecycleState::Paused => "⏸",
            LifecycleState::Unknown => "?",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle commands that can be issued against containers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Pause,
    Unpause,
    Start,
    Stop,
}

impl Operation {
    /// State a container ends up in once the operation succeeded
    pub fn target_state(&self) -> LifecycleState {
        match self {
            Operation::Pause => LifecycleState::Paused,
            Operation::Unpause | Operation::Start => LifecycleState::Running,
            Operation::Stop => LifecycleState::Exited,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Pause => "pause",
            Operation::Unpause => "unpause",
            Operation::Start => "start",
            Operation::Stop => "stop",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Operation::Pause => "paused",
            Operation::Unpause => "unpaused",
            Operation::Start => "started",
            Operation::Stop => "stopped",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// What the runtime reported about one container at listing time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
    pub image: String,
    pub state: LifecycleState,
}

/// A container row as tracked by the TUI
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub image: String,
    /// Cached remote state; only advanced once the runtime confirmed a call
    pub state: LifecycleState,
    pub selected: bool,
    /// Operation issued but not yet answered by the runtime
    pub pending: Option<Operation>,
    /// Message of the last failed operation on this entity
    pub failure: Option<String>,
}

impl Entity {
    /// Length of the id prefix shown in titles
    pub const SHORT_ID_LEN: usize = 12;

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(Self::SHORT_ID_LEN) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl From<EntitySnapshot> for Entity {
    fn from(snapshot: EntitySnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            image: snapshot.image,
            state: snapshot.state,
            selected: false,
            pending: None,
            failure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str) -> Entity {
        Entity::from(EntitySnapshot {
            id: id.to_string(),
            name: "web".to_string(),
            image: "nginx:latest".to_string(),
            state: LifecycleState::Running,
        })
    }

    #[test]
    fn test_remote_state_mapping() {
        assert_eq!(LifecycleState::from_remote("running"), LifecycleState::Running);
        assert_eq!(LifecycleState::from_remote("Paused"), LifecycleState::Paused);
        assert_eq!(LifecycleState::from_remote("exited"), LifecycleState::Exited);
        assert_eq!(LifecycleState::from_remote("created"), LifecycleState::Exited);
        assert_eq!(LifecycleState::from_remote(""), LifecycleState::Unknown);
    }

    #[test]
    fn test_operation_target_states() {
        assert_eq!(Operation::Pause.target_state(), LifecycleState::Paused);
        assert_eq!(Operation::Unpause.target_state(), LifecycleState::Running);
        assert_eq!(Operation::Start.target_state(), LifecycleState::Running);
        assert_eq!(Operation::Stop.target_state(), LifecycleState::Exited);
    }

    #[test]
    fn test_short_id() {
        let long = entity("4f1c2b9e8d7a6c5b4a39281706f5e4d3");
        assert_eq!(long.short_id(), "4f1c2b9e8d7a");

        let short = entity("a1");
        assert_eq!(short.short_id(), "a1");
    }

    #[test]
    fn test_snapshot_conversion_clears_local_flags() {
        let e = entity("a1");
        assert!(!e.selected);
        assert!(!e.is_pending());
        assert!(e.failure.is_none());
    }
}
