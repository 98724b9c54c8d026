//! The persistence contract shared by both backing stores.
//!
//! [`ListStore`] is implemented by [`crate::db::Database`] (SQLite, one store
//! for every visitor) and [`SessionStore`] (in memory, one store per browser
//! session). Both must produce identical observable results for the same
//! sequence of operations. [`Backend`] picks one at startup and hands request
//! handlers a `&mut dyn ListStore` for the caller's scope.

mod session;

pub use session::*;

use thiserror::Error;

use crate::db::Database;
use crate::models::{ListSummary, Todo, TodoList};
use crate::validation::ValidationError;

/// Errors returned by [`ListStore`] operations.
///
/// Validation and not-found failures are recoverable and leave the store
/// untouched. Storage failures only come from the database store and are
/// fatal for the current request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("list {0} not found")]
    ListNotFound(i64),

    #[error("todo {todo_id} not found on list {list_id}")]
    TodoNotFound { list_id: i64, todo_id: i64 },

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ListNotFound(_) | Self::TodoNotFound { .. })
    }
}

/// CRUD over lists and their todos.
///
/// Names and todo text are expected to be trimmed already. Every mutating
/// operation validates its input before touching state, so a rejected call
/// never leaves a partial change behind.
pub trait ListStore {
    /// All lists in creation order, with derived counts and without todos.
    fn list_all(&self) -> Result<Vec<ListSummary>, StoreError>;

    /// One list with its todos in creation order.
    fn get_list(&self, id: i64) -> Result<TodoList, StoreError>;

    /// Create an empty list under the next free id.
    fn add_list(&mut self, name: &str) -> Result<ListSummary, StoreError>;

    /// Delete a list together with all of its todos.
    fn delete_list(&mut self, id: i64) -> Result<(), StoreError>;

    /// Rename a list. Keeping the current name is allowed; taking another
    /// list's name is not.
    fn update_list_name(&mut self, id: i64, name: &str) -> Result<(), StoreError>;

    fn add_todo(&mut self, list_id: i64, text: &str) -> Result<Todo, StoreError>;

    fn delete_todo(&mut self, list_id: i64, todo_id: i64) -> Result<(), StoreError>;

    fn toggle_todo(&mut self, list_id: i64, todo_id: i64, completed: bool)
        -> Result<(), StoreError>;

    /// Mark every todo on the list completed. Either all of them change or,
    /// on error, none do.
    fn complete_all_todos(&mut self, list_id: i64) -> Result<(), StoreError>;
}

/// The store selected at startup.
#[derive(Clone)]
pub enum Backend {
    /// One SQLite database shared by all visitors.
    Database(Database),
    /// A separate in-memory store for every session.
    Session(SessionRegistry),
}

impl Backend {
    /// Run `op` against the store that serves `session`.
    ///
    /// The database backend ignores the session id; every caller sees the
    /// same lists.
    pub fn with_store<T>(
        &self,
        session: SessionId,
        op: impl FnOnce(&mut dyn ListStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        match self {
            Self::Database(db) => {
                let mut db = db.clone();
                op(&mut db)
            }
            Self::Session(registry) => registry.with_session(session, |store| op(store)),
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Session(_) => "session",
        }
    }
}
