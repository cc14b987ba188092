//! Key binding table
//!
//! The controller never sees terminal-library key types. The binary translates
//! raw terminal events into [`Key`] and the static table below maps keys onto
//! [`Action`]s, with the help text shown in the footer.

use crate::entity::Operation;

/// Terminal-independent key press
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
}

/// Everything a key can trigger in normal mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Lifecycle(Operation),
    ToggleSelect,
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    Filter,
    ClearFilter,
    Refresh,
    ToggleHelp,
    Quit,
}

impl Action {
    /// Lifecycle and selection actions are suspended while filtering
    pub fn is_mutating(&self) -> bool {
        matches!(self, Action::Lifecycle(_) | Action::ToggleSelect)
    }
}

/// One declared binding
#[derive(Clone, Debug)]
pub struct Binding {
    pub keys: &'static [Key],
    /// Key label for the help footer
    pub help_key: &'static str,
    pub help: &'static str,
    pub action: Action,
    /// Shown in the short help line, otherwise only in full help
    pub short: bool,
}

const BINDINGS: &[Binding] = &[
    Binding {
        keys: &[Key::Up, Key::Char('k')],
        help_key: "↑/k",
        help: "up",
        action: Action::CursorUp,
        short: true,
    },
    Binding {
        keys: &[Key::Down, Key::Char('j')],
        help_key: "↓/j",
        help: "down",
        action: Action::CursorDown,
        short: true,
    },
    Binding {
        keys: &[Key::PageUp, Key::Char('b')],
        help_key: "pgup/b",
        help: "prev page",
        action: Action::PageUp,
        short: false,
    },
    Binding {
        keys: &[Key::PageDown, Key::Char('f')],
        help_key: "pgdn/f",
        help: "next page",
        action: Action::PageDown,
        short: false,
    },
    Binding {
        keys: &[Key::Home, Key::Char('g')],
        help_key: "g/home",
        help: "go to start",
        action: Action::GotoTop,
        short: false,
    },
    Binding {
        keys: &[Key::End, Key::Char('G')],
        help_key: "G/end",
        help: "go to end",
        action: Action::GotoBottom,
        short: false,
    },
    Binding {
        keys: &[Key::Char('/')],
        help_key: "/",
        help: "filter",
        action: Action::Filter,
        short: true,
    },
    Binding {
        keys: &[Key::Esc],
        help_key: "esc",
        help: "clear filter",
        action: Action::ClearFilter,
        short: false,
    },
    Binding {
        keys: &[Key::Char('p')],
        help_key: "p",
        help: "pause container",
        action: Action::Lifecycle(Operation::Pause),
        short: false,
    },
    Binding {
        keys: &[Key::Char('P')],
        help_key: "P",
        help: "unpause container",
        action: Action::Lifecycle(Operation::Unpause),
        short: false,
    },
    Binding {
        keys: &[Key::Char('s')],
        help_key: "s",
        help: "start container",
        action: Action::Lifecycle(Operation::Start),
        short: false,
    },
    Binding {
        keys: &[Key::Char('S')],
        help_key: "S",
        help: "stop container",
        action: Action::Lifecycle(Operation::Stop),
        short: false,
    },
    Binding {
        keys: &[Key::Char(' ')],
        help_key: "space",
        help: "toggle select",
        action: Action::ToggleSelect,
        short: false,
    },
    Binding {
        keys: &[Key::Char('r')],
        help_key: "r",
        help: "refresh",
        action: Action::Refresh,
        short: false,
    },
    Binding {
        keys: &[Key::Char('q'), Key::Ctrl('c')],
        help_key: "q",
        help: "quit",
        action: Action::Quit,
        short: true,
    },
    Binding {
        keys: &[Key::Char('?')],
        help_key: "?",
        help: "more",
        action: Action::ToggleHelp,
        short: true,
    },
];

#[derive(Clone, Debug)]
pub struct KeyMap {
    bindings: &'static [Binding],
}

impl Default for KeyMap {
    fn default() -> Self {
        Self { bindings: BINDINGS }
    }
}

impl KeyMap {
    pub fn resolve(&self, key: Key) -> Option<Action> {
        self.bindings
            .iter()
            .find(|b| b.keys.contains(&key))
            .map(|b| b.action)
    }

    pub fn bindings(&self) -> &'static [Binding] {
        self.bindings
    }

    pub fn short_help(&self) -> impl Iterator<Item = &'static Binding> {
        self.bindings.iter().filter(|b| b.short)
    }

    pub fn full_help(&self) -> impl Iterator<Item = &'static Binding> {
        self.bindings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lifecycle_keys() {
        let keys = KeyMap::default();
        assert_eq!(
            keys.resolve(Key::Char('p')),
            Some(Action::Lifecycle(Operation::Pause))
        );
        assert_eq!(
            keys.resolve(Key::Char('P')),
            Some(Action::Lifecycle(Operation::Unpause))
        );
        assert_eq!(
            keys.resolve(Key::Char('s')),
            Some(Action::Lifecycle(Operation::Start))
        );
        assert_eq!(
            keys.resolve(Key::Char('S')),
            Some(Action::Lifecycle(Operation::Stop))
        );
        assert_eq!(keys.resolve(Key::Char(' ')), Some(Action::ToggleSelect));
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(KeyMap::default().resolve(Key::Char('z')), None);
    }

    #[test]
    fn test_no_key_bound_twice() {
        let mut seen = HashSet::new();
        for binding in KeyMap::default().bindings() {
            for key in binding.keys {
                assert!(seen.insert(*key), "{:?} bound twice", key);
            }
        }
    }

    #[test]
    fn test_short_help_is_subset() {
        let keys = KeyMap::default();
        assert!(keys.short_help().count() < keys.full_help().count());
        assert!(keys.short_help().all(|b| !b.action.is_mutating()));
    }
}
