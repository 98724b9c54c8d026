use serde::{Deserialize, Serialize};

use super::todo::Todo;
use crate::aggregate;

/// A list as shown in the overview: identity, name and derived progress.
///
/// `is_complete` holds only when the list has at least one todo and none of
/// them remain open. An empty list is never complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: i64,
    pub name: String,
    pub todos_count: usize,
    pub todos_remaining_count: usize,
    pub is_complete: bool,
}

impl ListSummary {
    /// Build a summary from counts that were already aggregated elsewhere
    /// (e.g. by the database in a single grouped query).
    pub fn from_counts(
        id: i64,
        name: impl Into<String>,
        todos_count: usize,
        todos_remaining_count: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            todos_count,
            todos_remaining_count,
            is_complete: aggregate::is_complete(todos_count, todos_remaining_count),
        }
    }

    /// Build a summary by aggregating over the list's todos.
    pub fn from_todos(id: i64, name: impl Into<String>, todos: &[Todo]) -> Self {
        Self::from_counts(
            id,
            name,
            aggregate::count(todos),
            aggregate::remaining_count(todos),
        )
    }
}

/// A list with every todo populated, used for detailed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    #[serde(flatten)]
    pub summary: ListSummary,
    pub todos: Vec<Todo>,
}

impl TodoList {
    pub fn new(id: i64, name: impl Into<String>, todos: Vec<Todo>) -> Self {
        Self {
            summary: ListSummary::from_todos(id, name, &todos),
            todos,
        }
    }

    pub fn id(&self) -> i64 {
        self.summary.id
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }
}

/// Input for creating a new list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListInput {
    pub name: String,
}

/// Input for renaming an existing list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateListInput {
    pub name: String,
}
