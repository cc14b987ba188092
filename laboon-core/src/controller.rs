//! Controller state machine
//!
//! Turns input events into selection changes and lifecycle batches. Lifecycle
//! commands run in two phases: [`Controller::handle`] marks every target as
//! pending and returns a [`Batch`], then [`Controller::dispatch`] issues one
//! runtime call per target and commits or reverts each target on its own
//! result. The event loop redraws between the two phases.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::entity::{Entity, EntityId, EntitySnapshot, Operation};
use crate::keymap::{Action, Key, KeyMap};
use crate::list::{EntityList, FilterState};
use crate::runtime::{RuntimeClient, RuntimeError};
use crate::selection::SelectionSet;

/// Margin around the whole UI: columns on each side, rows top and bottom
pub const FRAME_MARGIN: (u16, u16) = (2, 1);

/// Rows used by the title bar, status line and help footer
pub const CHROME_HEIGHT: u16 = 4;

/// How long a status message stays on screen
pub const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing a filter query; lifecycle and selection bindings are suspended
    Filtering,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize { width: u16, height: u16 },
}

/// What the event loop should do after an event was handled
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Handled,
    /// Targets are marked pending; redraw, then pass the batch to `dispatch`
    Dispatch(Batch),
    /// Re-fetch the container list
    Refresh,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub id: EntityId,
    pub position: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub operation: Operation,
    pub targets: Vec<Target>,
}

#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<EntityId>,
    pub failed: Vec<RuntimeError>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
    pub at: Instant,
}

pub struct Controller<R> {
    runtime: R,
    list: EntityList,
    selection: SelectionSet,
    keys: KeyMap,
    status: Option<StatusLine>,
    full_help: bool,
}

impl<R: RuntimeClient> Controller<R> {
    pub fn new(runtime: R, snapshot: Vec<EntitySnapshot>) -> Self {
        let items = snapshot.into_iter().map(Entity::from).collect();
        Self {
            runtime,
            list: EntityList::new(items),
            selection: SelectionSet::new(),
            keys: KeyMap::default(),
            status: None,
            full_help: false,
        }
    }

    /// Fetch the initial snapshot and build a controller around it
    pub async fn connect(runtime: R) -> Result<Self, RuntimeError> {
        let snapshot = runtime.list_entities().await?;
        info!(
            runtime = runtime.name(),
            containers = snapshot.len(),
            "loaded container list"
        );
        Ok(Self::new(runtime, snapshot))
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn list(&self) -> &EntityList {
        &self.list
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn full_help(&self) -> bool {
        self.full_help
    }

    pub fn mode(&self) -> Mode {
        if self.list.filter_state() == FilterState::Filtering {
            Mode::Filtering
        } else {
            Mode::Normal
        }
    }

    /// Drop the status line once it is older than `ttl`
    pub fn expire_status(&mut self, now: Instant, ttl: Duration) {
        if self
            .status
            .as_ref()
            .is_some_and(|s| now.duration_since(s.at) >= ttl)
        {
            self.status = None;
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status = Some(StatusLine {
            kind,
            text,
            at: Instant::now(),
        });
    }

    // ========== Event handling ==========

    pub fn handle(&mut self, event: InputEvent) -> Outcome {
        match event {
            InputEvent::Resize { width, height } => {
                let (margin_x, margin_y) = FRAME_MARGIN;
                self.list.set_size(
                    width.saturating_sub(margin_x * 2),
                    height.saturating_sub(margin_y * 2 + CHROME_HEIGHT),
                );
                Outcome::Handled
            }
            InputEvent::Key(key) => match self.mode() {
                Mode::Filtering => self.handle_filter_key(key),
                Mode::Normal => match self.keys.resolve(key) {
                    Some(action) => {
                        debug!(?key, ?action, "key");
                        self.handle_action(action)
                    }
                    None => Outcome::Ignored,
                },
            },
        }
    }

    fn handle_filter_key(&mut self, key: Key) -> Outcome {
        match key {
            Key::Ctrl('c') => return Outcome::Quit,
            Key::Esc => self.list.clear_filter(),
            Key::Enter => self.list.accept_filter(),
            Key::Backspace => self.list.pop_filter_char(),
            Key::Up => self.list.cursor_up(),
            Key::Down => self.list.cursor_down(),
            Key::Char(c) => self.list.push_filter_char(c),
            _ => return Outcome::Ignored,
        }
        Outcome::Handled
    }

    fn handle_action(&mut self, action: Action) -> Outcome {
        match action {
            Action::Lifecycle(operation) => {
                return match self.begin(operation) {
                    Some(batch) => Outcome::Dispatch(batch),
                    None => Outcome::Ignored,
                };
            }
            Action::ToggleSelect => {
                if !self.toggle_select() {
                    return Outcome::Ignored;
                }
            }
            Action::CursorUp => self.list.cursor_up(),
            Action::CursorDown => self.list.cursor_down(),
            Action::PageUp => self.list.page_up(),
            Action::PageDown => self.list.page_down(),
            Action::GotoTop => self.list.goto_top(),
            Action::GotoBottom => self.list.goto_bottom(),
            Action::Filter => self.list.start_filter(),
            Action::ClearFilter => {
                if self.list.filter_state() == FilterState::Unfiltered {
                    return Outcome::Ignored;
                }
                self.list.clear_filter();
            }
            Action::Refresh => return Outcome::Refresh,
            Action::ToggleHelp => self.full_help = !self.full_help,
            Action::Quit => return Outcome::Quit,
        }
        Outcome::Handled
    }

    /// Flip selection of the focused entity and redraw its row
    fn toggle_select(&mut self) -> bool {
        let Some(position) = self.list.current_position() else {
            return false;
        };
        let Some(mut entity) = self.list.get(position).cloned() else {
            return false;
        };

        entity.selected = self.selection.toggle(&entity.id, position);
        self.list.set_item(position, entity);
        true
    }

    /// Selected entities if any, otherwise the focused one
    fn targets(&self) -> Vec<Target> {
        if self.selection.is_empty() {
            return self
                .list
                .current_item()
                .zip(self.list.current_position())
                .map(|(entity, position)| Target {
                    id: entity.id.clone(),
                    position,
                })
                .into_iter()
                .collect();
        }

        self.selection
            .members()
            .into_iter()
            .filter_map(|(id, hint)| {
                let position = self.list.resolve(&id, hint)?;
                Some(Target { id, position })
            })
            .collect()
    }

    /// First phase: mark every target pending
    fn begin(&mut self, operation: Operation) -> Option<Batch> {
        let targets = self.targets();
        if targets.is_empty() {
            return None;
        }

        for target in &targets {
            self.selection.reposition(&target.id, target.position);
            if let Some(mut entity) = self.list.get(target.position).cloned() {
                entity.pending = Some(operation);
                self.list.set_item(target.position, entity);
            }
        }

        Some(Batch { operation, targets })
    }

    /// Second phase: one runtime call per target, then commit or revert it
    pub async fn dispatch(&mut self, batch: Batch) -> BatchReport {
        let operation = batch.operation;
        let mut report = BatchReport::default();
        let mut last_name = String::new();

        for target in batch.targets {
            let result = self.runtime.apply(operation, &target.id).await;

            let Some(position) = self.list.resolve(&target.id, target.position) else {
                continue;
            };
            let Some(mut entity) = self.list.get(position).cloned() else {
                continue;
            };

            entity.pending = None;
            match result {
                Ok(()) => {
                    entity.state = operation.target_state();
                    entity.failure = None;
                    report.succeeded.push(target.id);
                }
                Err(err) => {
                    warn!(id = %target.id, error = %err, "lifecycle call failed");
                    entity.failure = Some(err.cause().to_string());
                    report.failed.push(err);
                }
            }
            last_name = entity.name.clone();
            self.list.set_item(position, entity);
        }

        info!(
            operation = operation.verb(),
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "batch finished"
        );

        let text = match report.failed.first() {
            None if report.total() == 1 => format!("{} {}", operation.past_tense(), last_name),
            None => format!(
                "{} {} containers",
                operation.past_tense(),
                report.succeeded.len()
            ),
            Some(first) => format!(
                "{} failed for {} of {}: {}",
                operation.verb(),
                report.failed.len(),
                report.total(),
                first
            ),
        };
        let kind = if report.failed.is_empty() {
            StatusKind::Info
        } else {
            StatusKind::Error
        };
        self.set_status(kind, text);

        report
    }

    /// Replace the list with a fresh snapshot from the runtime.
    ///
    /// Selection survives for ids that are still present; everything else the
    /// runtime no longer reports is dropped from the selection set.
    pub async fn refresh(&mut self) -> Result<usize, RuntimeError> {
        let snapshot = self.runtime.list_entities().await?;

        let items: Vec<Entity> = snapshot
            .into_iter()
            .map(|s| {
                let mut entity = Entity::from(s);
                entity.selected = self.selection.contains(&entity.id);
                entity
            })
            .collect();
        let count = items.len();
        self.list.replace(items);

        self.selection
            .retain(|id| self.list.position_of(id).is_some());
        for (id, _) in self.selection.members() {
            if let Some(position) = self.list.position_of(&id) {
                self.selection.reposition(&id, position);
            }
        }

        Ok(count)
    }

    /// Refresh and report the result on the status line
    pub async fn reload(&mut self) {
        match self.refresh().await {
            Ok(count) => {
                info!(containers = count, "refreshed container list");
                self.set_status(StatusKind::Info, format!("refreshed {} containers", count));
            }
            Err(err) => {
                warn!(error = %err, "refresh failed");
                self.set_status(StatusKind::Error, err.to_string());
            }
        }
    }

    /// Handle an event and run whatever remote work it asks for
    pub async fn step(&mut self, event: InputEvent) -> Outcome {
        let outcome = self.handle(event);
        match &outcome {
            Outcome::Dispatch(batch) => {
                self.dispatch(batch.clone()).await;
            }
            Outcome::Refresh => self.reload().await,
            _ => {}
        }
        outcome
    }
}
