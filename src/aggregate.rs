//! Derived list progress.
//!
//! These are pure functions over a list's todos. The in-memory store always
//! uses them; the database store gets its overview counts from SQL and uses
//! them only when it loads a single list with its todos.

use crate::models::{ListSummary, Todo};

/// Number of todos on the list.
pub fn count(todos: &[Todo]) -> usize {
    todos.len()
}

/// Number of todos not yet completed.
pub fn remaining_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| !todo.completed).count()
}

/// A list is complete when it has todos and none of them remain.
pub fn is_complete(count: usize, remaining: usize) -> bool {
    remaining == 0 && count > 0
}

/// Order lists for display: incomplete lists first, then complete ones.
/// Relative order within each group is preserved.
pub fn sort_lists(lists: Vec<ListSummary>) -> Vec<ListSummary> {
    let (complete, mut incomplete): (Vec<_>, Vec<_>) =
        lists.into_iter().partition(|list| list.is_complete);
    incomplete.extend(complete);
    incomplete
}

/// Order todos for display: open todos first, then completed ones.
/// Relative order within each group is preserved.
pub fn sort_todos(todos: Vec<Todo>) -> Vec<Todo> {
    let (completed, mut open): (Vec<_>, Vec<_>) =
        todos.into_iter().partition(|todo| todo.completed);
    open.extend(completed);
    open
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, completed: bool) -> Todo {
        Todo {
            id,
            name: format!("todo {id}"),
            completed,
        }
    }

    #[test]
    fn counts_open_and_total_todos() {
        let todos = vec![todo(1, false), todo(2, true), todo(3, false)];
        assert_eq!(count(&todos), 3);
        assert_eq!(remaining_count(&todos), 2);
    }

    #[test]
    fn remaining_never_exceeds_count() {
        let todos = vec![todo(1, false), todo(2, false)];
        assert!(remaining_count(&todos) <= count(&todos));
        assert!(remaining_count(&[]) <= count(&[]));
    }

    #[test]
    fn empty_list_is_not_complete() {
        assert!(!is_complete(0, 0));
    }

    #[test]
    fn list_with_all_todos_done_is_complete() {
        assert!(is_complete(2, 0));
        assert!(!is_complete(2, 1));
    }

    #[test]
    fn sort_todos_puts_open_items_first() {
        let sorted = sort_todos(vec![todo(1, true), todo(2, false), todo(3, true), todo(4, false)]);
        let ids: Vec<i64> = sorted.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn sort_lists_puts_incomplete_lists_first() {
        let lists = vec![
            ListSummary::from_counts(1, "Done", 1, 0),
            ListSummary::from_counts(2, "Empty", 0, 0),
            ListSummary::from_counts(3, "Open", 2, 1),
        ];

        let ids: Vec<i64> = sort_lists(lists).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
