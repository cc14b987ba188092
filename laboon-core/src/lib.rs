pub mod controller;
pub mod entity;
pub mod keymap;
pub mod list;
pub mod runtime;
pub mod selection;

// In-memory runtime for demo mode and tests
pub mod fake;
