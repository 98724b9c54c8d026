//! Domain models for todo lists.
//!
//! # Core Concepts
//!
//! - [`TodoList`]: A named, ordered collection of todos, returned with every todo
//!   populated and its derived counts attached.
//! - [`ListSummary`]: The same list without its todos, used for the overview.
//! - [`Todo`]: A single actionable item owned by exactly one list.
//!
//! Counts (`todos_count`, `todos_remaining_count`) and `is_complete` are derived
//! from the current todos on every read. They are never stored.

mod list;
mod todo;

pub use list::*;
pub use todo::*;
