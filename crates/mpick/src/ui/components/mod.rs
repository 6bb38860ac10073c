//! Collection of reusable TUI components.

pub mod item_list;
pub mod prompt;
