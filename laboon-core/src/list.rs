//! Navigable, filterable list of entities
//!
//! `EntityList` owns the ordered entity sequence, the cursor, the name filter
//! and the content-area size. Positions handed out by this type always index
//! into the full sequence, never into the filtered view, so they stay valid
//! while a filter is being typed.

use crate::entity::{Entity, LifecycleState};

/// Terminal rows taken by one entity: title, description, spacer
pub const ROW_HEIGHT: u16 = 3;

pub const SELECTED_GLYPH: &str = "✓";
pub const PENDING_GLYPH: &str = "…";
pub const FAILED_GLYPH: &str = "✗";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterState {
    #[default]
    Unfiltered,
    /// The user is typing a query
    Filtering,
    /// A query was accepted and still narrows the list
    FilterApplied,
}

/// Colour class of a row, resolved to concrete colours by the UI theme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Running containers
    Success,
    /// Exited containers
    Muted,
    /// Paused or unknown containers
    Warn,
}

impl Tone {
    pub fn for_state(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Running => Tone::Success,
            LifecycleState::Exited => Tone::Muted,
            LifecycleState::Paused | LifecycleState::Unknown => Tone::Warn,
        }
    }
}

/// Display strings for one entity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Selection marker, blank when not selected
    pub marker: &'static str,
    pub title: String,
    pub description: String,
    pub tone: Tone,
    pub failed: bool,
}

impl Row {
    pub fn from_entity(entity: &Entity) -> Self {
        let marker = if entity.selected { SELECTED_GLYPH } else { " " };

        let icon = if entity.is_pending() {
            PENDING_GLYPH
        } else if entity.failure.is_some() {
            FAILED_GLYPH
        } else {
            entity.state.icon()
        };

        let title = format!("{} ({}) {}", entity.name, entity.short_id(), icon);

        let state = match entity.pending {
            Some(op) => format!("{} → {}", entity.state, op.target_state()),
            None => entity.state.to_string(),
        };
        let description = match &entity.failure {
            Some(message) => format!("{} - {} ({})", entity.image, state, message),
            None => format!("{} - {}", entity.image, state),
        };

        Self {
            marker,
            title,
            description,
            tone: Tone::for_state(entity.state),
            failed: entity.failure.is_some(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EntityList {
    items: Vec<Entity>,
    /// Positions into `items` that pass the current filter
    visible: Vec<usize>,
    /// Index into `visible`
    cursor: usize,
    filter_state: FilterState,
    query: String,
    width: u16,
    height: u16,
}

impl EntityList {
    pub fn new(items: Vec<Entity>) -> Self {
        let mut list = Self {
            items,
            ..Default::default()
        };
        list.refilter(None);
        list
    }

    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Entity> {
        self.items.get(position)
    }

    /// Entities that pass the filter, with their positions
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.visible.iter().map(|&pos| (pos, &self.items[pos]))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Cursor index within the visible rows
    pub fn index(&self) -> usize {
        self.cursor
    }

    /// Position of the focused entity in the full sequence
    pub fn current_position(&self) -> Option<usize> {
        self.visible.get(self.cursor).copied()
    }

    pub fn current_item(&self) -> Option<&Entity> {
        self.current_position().and_then(|pos| self.items.get(pos))
    }

    /// Replace the entity at `position`. Out of range positions are ignored.
    pub fn set_item(&mut self, position: usize, entity: Entity) {
        if let Some(slot) = self.items.get_mut(position) {
            let renamed = slot.name != entity.name;
            *slot = entity;
            if renamed {
                let focused = self.current_position();
                self.refilter(focused);
            }
        }
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|e| e.id == id)
    }

    /// Use `hint` if it still points at `id`, otherwise look the id up
    pub fn resolve(&self, id: &str, hint: usize) -> Option<usize> {
        match self.items.get(hint) {
            Some(e) if e.id == id => Some(hint),
            _ => self.position_of(id),
        }
    }

    /// Swap in a fresh snapshot, keeping the cursor on the same id when it survived
    pub fn replace(&mut self, items: Vec<Entity>) {
        let focused_id = self.current_item().map(|e| e.id.clone());
        self.items = items;
        let focus = focused_id.and_then(|id| self.position_of(&id));
        self.refilter(focus);
    }

    // ========== Navigation ==========

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.page_size());
    }

    pub fn page_down(&mut self) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = (self.cursor + self.page_size()).min(last);
    }

    pub fn goto_top(&mut self) {
        self.cursor = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.cursor = self.visible.len().saturating_sub(1);
    }

    // ========== Sizing ==========

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Number of entities that fit in the content area (at least one)
    pub fn page_size(&self) -> usize {
        usize::from((self.height / ROW_HEIGHT).max(1))
    }

    // ========== Filtering ==========

    pub fn filter_state(&self) -> FilterState {
        self.filter_state
    }

    pub fn filter_query(&self) -> &str {
        &self.query
    }

    pub fn start_filter(&mut self) {
        self.filter_state = FilterState::Filtering;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.query.push(c);
        let focused = self.current_position();
        self.refilter(focused);
    }

    pub fn pop_filter_char(&mut self) {
        self.query.pop();
        let focused = self.current_position();
        self.refilter(focused);
    }

    /// Leave typing mode, keeping the query applied when it is non-empty
    pub fn accept_filter(&mut self) {
        self.filter_state = if self.query.is_empty() {
            FilterState::Unfiltered
        } else {
            FilterState::FilterApplied
        };
    }

    pub fn clear_filter(&mut self) {
        self.filter_state = FilterState::Unfiltered;
        self.query.clear();
        let focused = self.current_position();
        self.refilter(focused);
    }

    fn matches(&self, entity: &Entity) -> bool {
        self.query.is_empty()
            || entity
                .name
                .to_lowercase()
                .contains(&self.query.to_lowercase())
    }

    /// Rebuild the visible rows and put the cursor on `focus` if it is still visible
    fn refilter(&mut self, focus: Option<usize>) {
        self.visible = (0..self.items.len())
            .filter(|&pos| self.matches(&self.items[pos]))
            .collect();

        self.cursor = focus
            .and_then(|pos| self.visible.iter().position(|&v| v == pos))
            .unwrap_or_else(|| self.cursor.min(self.visible.len().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntitySnapshot, Operation};

    fn entity(id: &str, name: &str, state: LifecycleState) -> Entity {
        Entity::from(EntitySnapshot {
            id: id.to_string(),
            name: name.to_string(),
            image: "alpine:3".to_string(),
            state,
        })
    }

    fn sample() -> EntityList {
        EntityList::new(vec![
            entity("a1", "api", LifecycleState::Running),
            entity("b2", "postgres", LifecycleState::Exited),
            entity("c3", "redis", LifecycleState::Paused),
        ])
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut list = sample();
        list.cursor_up();
        assert_eq!(list.index(), 0);

        list.goto_bottom();
        list.cursor_down();
        assert_eq!(list.index(), 2);
        assert_eq!(list.current_item().map(|e| e.id.as_str()), Some("c3"));
    }

    #[test]
    fn test_page_size_from_height() {
        let mut list = sample();
        assert_eq!(list.page_size(), 1);

        list.set_size(80, 7);
        assert_eq!(list.page_size(), 2);

        list.page_down();
        assert_eq!(list.index(), 2);
        list.page_up();
        assert_eq!(list.index(), 0);
    }

    #[test]
    fn test_filter_narrows_and_keeps_positions() {
        let mut list = sample();
        list.start_filter();
        list.push_filter_char('D');
        list.push_filter_char('i');

        let visible: Vec<usize> = list.visible().map(|(pos, _)| pos).collect();
        assert_eq!(visible, vec![2]);
        assert_eq!(list.current_position(), Some(2));

        list.accept_filter();
        assert_eq!(list.filter_state(), FilterState::FilterApplied);

        list.clear_filter();
        assert_eq!(list.visible_len(), 3);
        assert_eq!(list.current_position(), Some(2));
    }

    #[test]
    fn test_accepting_empty_query_unfilters() {
        let mut list = sample();
        list.start_filter();
        list.accept_filter();
        assert_eq!(list.filter_state(), FilterState::Unfiltered);
    }

    #[test]
    fn test_resolve_falls_back_to_lookup() {
        let list = sample();
        assert_eq!(list.resolve("b2", 1), Some(1));
        assert_eq!(list.resolve("b2", 0), Some(1));
        assert_eq!(list.resolve("b2", 9), Some(1));
        assert_eq!(list.resolve("zz", 0), None);
    }

    #[test]
    fn test_replace_keeps_focus_on_same_id() {
        let mut list = sample();
        list.cursor_down();

        list.replace(vec![
            entity("n0", "new", LifecycleState::Running),
            entity("a1", "api", LifecycleState::Running),
            entity("b2", "postgres", LifecycleState::Running),
        ]);

        assert_eq!(list.current_item().map(|e| e.id.as_str()), Some("b2"));
    }

    #[test]
    fn test_set_item_out_of_range_is_ignored() {
        let mut list = sample();
        list.set_item(10, entity("x", "x", LifecycleState::Running));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_row_rendering() {
        let mut e = entity("4f1c2b9e8d7a6c5b", "api", LifecycleState::Running);
        let row = Row::from_entity(&e);
        assert_eq!(row.marker, " ");
        assert_eq!(row.title, "api (4f1c2b9e8d7a) ▶");
        assert_eq!(row.description, "alpine:3 - running");
        assert_eq!(row.tone, Tone::Success);

        e.selected = true;
        e.pending = Some(Operation::Pause);
        let row = Row::from_entity(&e);
        assert_eq!(row.marker, SELECTED_GLYPH);
        assert!(row.title.ends_with(PENDING_GLYPH));
        assert_eq!(row.description, "alpine:3 - running → paused");

        e.pending = None;
        e.failure = Some("permission denied".to_string());
        let row = Row::from_entity(&e);
        assert!(row.failed);
        assert!(row.title.ends_with(FAILED_GLYPH));
        assert_eq!(row.description, "alpine:3 - running (permission denied)");
    }

    #[test]
    fn test_tones() {
        assert_eq!(Tone::for_state(LifecycleState::Running), Tone::Success);
        assert_eq!(Tone::for_state(LifecycleState::Exited), Tone::Muted);
        assert_eq!(Tone::for_state(LifecycleState::Paused), Tone::Warn);
        assert_eq!(Tone::for_state(LifecycleState::Unknown), Tone::Warn);
    }
}
