use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use super::{ListStore, StoreError};
use crate::ids::IdAllocator;
use crate::models::{ListSummary, Todo, TodoList};
use crate::validation::{validate_list_name, validate_todo_text};

/// Identifies one browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone)]
struct SessionList {
    id: i64,
    name: String,
    todos: Vec<Todo>,
    todo_ids: IdAllocator,
}

impl SessionList {
    fn summary(&self) -> ListSummary {
        ListSummary::from_todos(self.id, &self.name, &self.todos)
    }

    fn todo_mut(&mut self, todo_id: i64) -> Result<&mut Todo, StoreError> {
        let list_id = self.id;
        self.todos
            .iter_mut()
            .find(|todo| todo.id == todo_id)
            .ok_or(StoreError::TodoNotFound { list_id, todo_id })
    }
}

/// In-memory lists for a single session.
///
/// Starts empty. Ids come from per-collection [`IdAllocator`]s so a deleted id
/// is never handed out again within the session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    lists: Vec<SessionList>,
    list_ids: IdAllocator,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first list is created. A store that created and then
    /// deleted a list is not untouched: its retired ids must be remembered.
    pub fn is_untouched(&self) -> bool {
        self.lists.is_empty() && self.list_ids.high_water() == 0
    }

    fn list(&self, id: i64) -> Result<&SessionList, StoreError> {
        self.lists
            .iter()
            .find(|list| list.id == id)
            .ok_or(StoreError::ListNotFound(id))
    }

    fn list_mut(&mut self, id: i64) -> Result<&mut SessionList, StoreError> {
        self.lists
            .iter_mut()
            .find(|list| list.id == id)
            .ok_or(StoreError::ListNotFound(id))
    }
}

impl ListStore for SessionStore {
    fn list_all(&self) -> Result<Vec<ListSummary>, StoreError> {
        Ok(self.lists.iter().map(SessionList::summary).collect())
    }

    fn get_list(&self, id: i64) -> Result<TodoList, StoreError> {
        let list = self.list(id)?;
        Ok(TodoList::new(list.id, &list.name, list.todos.clone()))
    }

    fn add_list(&mut self, name: &str) -> Result<ListSummary, StoreError> {
        validate_list_name(name, self.lists.iter().map(|list| list.name.as_str()))?;

        let id = self.list_ids.allocate(self.lists.iter().map(|list| list.id));
        let list = SessionList {
            id,
            name: name.to_string(),
            todos: Vec::new(),
            todo_ids: IdAllocator::new(),
        };
        let summary = list.summary();
        self.lists.push(list);

        tracing::debug!(list_id = id, "session list created");
        Ok(summary)
    }

    fn delete_list(&mut self, id: i64) -> Result<(), StoreError> {
        let index = self
            .lists
            .iter()
            .position(|list| list.id == id)
            .ok_or(StoreError::ListNotFound(id))?;
        self.lists.remove(index);
        Ok(())
    }

    fn update_list_name(&mut self, id: i64, name: &str) -> Result<(), StoreError> {
        self.list(id)?;
        validate_list_name(
            name,
            self.lists
                .iter()
                .filter(|list| list.id != id)
                .map(|list| list.name.as_str()),
        )?;

        self.list_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn add_todo(&mut self, list_id: i64, text: &str) -> Result<Todo, StoreError> {
        let list = self.list_mut(list_id)?;
        validate_todo_text(text)?;

        let id = list.todo_ids.allocate(list.todos.iter().map(|todo| todo.id));
        let todo = Todo::new(id, text);
        list.todos.push(todo.clone());
        Ok(todo)
    }

    fn delete_todo(&mut self, list_id: i64, todo_id: i64) -> Result<(), StoreError> {
        let list = self.list_mut(list_id)?;
        let index = list
            .todos
            .iter()
            .position(|todo| todo.id == todo_id)
            .ok_or(StoreError::TodoNotFound { list_id, todo_id })?;
        list.todos.remove(index);
        Ok(())
    }

    fn toggle_todo(
        &mut self,
        list_id: i64,
        todo_id: i64,
        completed: bool,
    ) -> Result<(), StoreError> {
        self.list_mut(list_id)?.todo_mut(todo_id)?.completed = completed;
        Ok(())
    }

    fn complete_all_todos(&mut self, list_id: i64) -> Result<(), StoreError> {
        for todo in &mut self.list_mut(list_id)?.todos {
            todo.completed = true;
        }
        Ok(())
    }
}

/// Session stores keyed by [`SessionId`], created lazily on first access.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SessionStore>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `op` against the store for `session`.
    ///
    /// An unknown session is served from a fresh empty store that is only
    /// kept once `op` has changed it, so reads and rejected writes from
    /// cookieless clients leave the registry as it was. The registry lock is
    /// held for the whole call and released on every exit path.
    // TODO: evict stores for sessions idle past a configurable TTL.
    pub fn with_session<T>(
        &self,
        session: SessionId,
        op: impl FnOnce(&mut SessionStore) -> T,
    ) -> T {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = sessions.get_mut(&session) {
            return op(store);
        }

        let mut store = SessionStore::new();
        let result = op(&mut store);
        if !store.is_untouched() {
            tracing::debug!(%session, "initializing session store");
            sessions.insert(session, store);
        }
        result
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_from_unknown_sessions_are_not_retained() {
        let registry = SessionRegistry::new();
        for _ in 0..100 {
            let lists = registry
                .with_session(SessionId::new(), |store| store.list_all())
                .unwrap();
            assert!(lists.is_empty());
        }

        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn rejected_write_does_not_create_a_session() {
        let registry = SessionRegistry::new();
        let err = registry
            .with_session(SessionId::new(), |store| store.add_list(""))
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn first_successful_write_creates_the_session() {
        let registry = SessionRegistry::new();
        let session = SessionId::new();
        registry
            .with_session(session, |store| store.add_list("Groceries"))
            .unwrap();
        registry
            .with_session(session, |store| store.add_list("Chores"))
            .unwrap();

        assert_eq!(registry.session_count(), 1);
        let lists = registry.with_session(session, |store| store.list_all()).unwrap();
        assert_eq!(lists.len(), 2);
    }

    #[test]
    fn session_that_deleted_its_only_list_keeps_its_ids() {
        let registry = SessionRegistry::new();
        let session = SessionId::new();
        registry
            .with_session(session, |store| {
                let list = store.add_list("Scratch")?;
                store.delete_list(list.id)
            })
            .unwrap();

        let next = registry
            .with_session(session, |store| store.add_list("Fresh"))
            .unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn sessions_do_not_see_each_other() {
        let registry = SessionRegistry::new();
        let alice = SessionId::new();
        let bob = SessionId::new();

        registry
            .with_session(alice, |store| store.add_list("Groceries"))
            .unwrap();

        let bobs = registry.with_session(bob, |store| store.list_all()).unwrap();
        let alices = registry.with_session(alice, |store| store.list_all()).unwrap();
        assert!(bobs.is_empty());
        assert_eq!(alices.len(), 1);
    }

    #[test]
    fn list_ids_are_not_reused_after_deleting_the_newest() {
        let mut store = SessionStore::new();
        store.add_list("One").unwrap();
        store.add_list("Two").unwrap();
        let three = store.add_list("Three").unwrap();

        store.delete_list(three.id).unwrap();
        let four = store.add_list("Four").unwrap();

        assert_eq!(four.id, 4);
    }

    #[test]
    fn todo_ids_are_scoped_to_their_list() {
        let mut store = SessionStore::new();
        let work = store.add_list("Work").unwrap();
        let home = store.add_list("Home").unwrap();

        let a = store.add_todo(work.id, "Email").unwrap();
        let b = store.add_todo(home.id, "Laundry").unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 1);
    }

    #[test]
    fn session_id_round_trips_through_text() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
