use std::collections::BTreeMap;

use crate::entity::EntityId;

/// Containers marked for batch operations, keyed by id.
///
/// The stored position is where the entity sat in the list when it was marked.
/// It is only a hint: callers re-resolve by id when the hint goes stale.
#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
    members: BTreeMap<EntityId, usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` if present, otherwise insert it at `position`.
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str, position: usize) -> bool {
        if self.members.remove(id).is_some() {
            false
        } else {
            self.members.insert(id.to_string(), position);
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    /// Selected ids with their recorded positions, ordered by position
    pub fn members(&self) -> Vec<(EntityId, usize)> {
        let mut members: Vec<(EntityId, usize)> = self
            .members
            .iter()
            .map(|(id, pos)| (id.clone(), *pos))
            .collect();
        members.sort_by_key(|(_, pos)| *pos);
        members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Update the recorded position of an already selected id
    pub fn reposition(&mut self, id: &str, position: usize) {
        if let Some(pos) = self.members.get_mut(id) {
            *pos = position;
        }
    }

    /// Keep only the ids for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.members.retain(|id, _| keep(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut set = SelectionSet::new();
        set.toggle("a1", 0);

        let before: Vec<String> = set.members().into_iter().map(|(id, _)| id).collect();
        assert!(set.toggle("b2", 1));
        assert!(!set.toggle("b2", 3));
        let after: Vec<String> = set.members().into_iter().map(|(id, _)| id).collect();

        assert_eq!(before, after);
        assert_eq!(set.size(), 1);
    }

    #[test]
    fn test_members_ordered_by_position() {
        let mut set = SelectionSet::new();
        set.toggle("zz", 0);
        set.toggle("aa", 2);
        set.toggle("mm", 1);

        let ids: Vec<String> = set.members().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zz", "mm", "aa"]);
    }

    #[test]
    fn test_retain_prunes_missing_ids() {
        let mut set = SelectionSet::new();
        set.toggle("a1", 0);
        set.toggle("b2", 1);

        set.retain(|id| id != "a1");

        assert!(!set.contains("a1"));
        assert!(set.contains("b2"));
        assert_eq!(set.size(), 1);
    }

    #[test]
    fn test_reposition_ignores_unselected() {
        let mut set = SelectionSet::new();
        set.toggle("a1", 0);
        set.reposition("a1", 4);
        set.reposition("b2", 7);

        assert_eq!(set.members(), vec![("a1".to_string(), 4)]);
        assert!(!set.contains("b2"));
    }
}
