//! SQLite-backed list store.
//!
//! One database is shared by every visitor. Ids come from SQLite
//! `AUTOINCREMENT`, which never reuses a rowid, and overview counts are
//! computed by the database in a single grouped query.
//!
//! Every statement is logged with its parameters (target `todo_lists::sql`)
//! before it runs.

mod schema;

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Params, Row};

use crate::models::*;
use crate::store::{ListStore, StoreError};
use crate::validation::{validate_list_name, validate_todo_text, ValidationError};

const SQL_LOG_TARGET: &str = "todo_lists::sql";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::configure(conn)
    }

    pub fn open_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // SQLite leaves foreign keys off per connection; cascades depend on it
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        schema::run_migrations(&self.lock())
    }

    /// Scoped access to the connection. The guard is dropped on every exit
    /// path of the caller, including early `?` returns.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================================
    // List operations
    // ============================================================

    fn list_exists(conn: &Connection, id: i64) -> Result<bool, StoreError> {
        let found = query_rows(conn, "SELECT id FROM list WHERE id = ?1", [id], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(!found.is_empty())
    }

    fn ensure_list(conn: &Connection, id: i64) -> Result<(), StoreError> {
        if Self::list_exists(conn, id)? {
            Ok(())
        } else {
            Err(StoreError::ListNotFound(id))
        }
    }

    /// Names that would collide with `name`, ignoring the list `except` (if any).
    fn colliding_names(
        conn: &Connection,
        name: &str,
        except: Option<i64>,
    ) -> Result<Vec<String>, StoreError> {
        let names = query_rows(
            conn,
            "SELECT name FROM list WHERE name = ?1 AND id IS NOT ?2",
            (name, except),
            |row| row.get(0),
        )?;
        Ok(names)
    }

    fn todos_for(conn: &Connection, list_id: i64) -> Result<Vec<Todo>, StoreError> {
        let todos = query_rows(
            conn,
            "SELECT id, name, completed FROM todo WHERE list_id = ?1 ORDER BY id",
            [list_id],
            |row| {
                Ok(Todo {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    completed: row.get(2)?,
                })
            },
        )?;
        Ok(todos)
    }

    /// Work out which half of a `(list_id, todo_id)` pair is missing.
    fn missing_todo(conn: &Connection, list_id: i64, todo_id: i64) -> StoreError {
        match Self::list_exists(conn, list_id) {
            Ok(true) => StoreError::TodoNotFound { list_id, todo_id },
            Ok(false) => StoreError::ListNotFound(list_id),
            Err(e) => e,
        }
    }
}

impl ListStore for Database {
    fn list_all(&self) -> Result<Vec<ListSummary>, StoreError> {
        let conn = self.lock();
        let lists = query_rows(
            &conn,
            "SELECT list.id, list.name,
                    COUNT(todo.id) AS todos_count,
                    COUNT(NULLIF(todo.completed, 1)) AS todos_remaining_count
             FROM list
             LEFT OUTER JOIN todo ON todo.list_id = list.id
             GROUP BY list.id, list.name
             ORDER BY list.id",
            (),
            |row| {
                Ok(ListSummary::from_counts(
                    row.get(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)? as usize,
                    row.get::<_, i64>(3)? as usize,
                ))
            },
        )?;
        Ok(lists)
    }

    fn get_list(&self, id: i64) -> Result<TodoList, StoreError> {
        let conn = self.lock();
        let name = query_rows(&conn, "SELECT name FROM list WHERE id = ?1", [id], |row| {
            row.get::<_, String>(0)
        })?
        .into_iter()
        .next()
        .ok_or(StoreError::ListNotFound(id))?;

        let todos = Self::todos_for(&conn, id)?;
        Ok(TodoList::new(id, name, todos))
    }

    fn add_list(&mut self, name: &str) -> Result<ListSummary, StoreError> {
        let conn = self.lock();
        validate_list_name(name, Self::colliding_names(&conn, name, None)?)?;

        execute(&conn, "INSERT INTO list (name) VALUES (?1)", [name])
            .map_err(name_conflict)?;
        let id = conn.last_insert_rowid();

        Ok(ListSummary::from_counts(id, name, 0, 0))
    }

    fn delete_list(&mut self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock();
        let rows = execute(&conn, "DELETE FROM list WHERE id = ?1", [id])?;
        if rows == 0 {
            return Err(StoreError::ListNotFound(id));
        }
        Ok(())
    }

    fn update_list_name(&mut self, id: i64, name: &str) -> Result<(), StoreError> {
        let conn = self.lock();
        Self::ensure_list(&conn, id)?;
        validate_list_name(name, Self::colliding_names(&conn, name, Some(id))?)?;

        let rows = execute(&conn, "UPDATE list SET name = ?1 WHERE id = ?2", (name, id))
            .map_err(name_conflict)?;
        if rows == 0 {
            return Err(StoreError::ListNotFound(id));
        }
        Ok(())
    }

    fn add_todo(&mut self, list_id: i64, text: &str) -> Result<Todo, StoreError> {
        let conn = self.lock();
        Self::ensure_list(&conn, list_id)?;
        validate_todo_text(text)?;

        execute(
            &conn,
            "INSERT INTO todo (name, list_id) VALUES (?1, ?2)",
            (text, list_id),
        )
        .map_err(|e| list_vanished(e, list_id))?;

        Ok(Todo::new(conn.last_insert_rowid(), text))
    }

    fn delete_todo(&mut self, list_id: i64, todo_id: i64) -> Result<(), StoreError> {
        let conn = self.lock();
        let rows = execute(
            &conn,
            "DELETE FROM todo WHERE id = ?1 AND list_id = ?2",
            (todo_id, list_id),
        )?;
        if rows == 0 {
            return Err(Self::missing_todo(&conn, list_id, todo_id));
        }
        Ok(())
    }

    fn toggle_todo(
        &mut self,
        list_id: i64,
        todo_id: i64,
        completed: bool,
    ) -> Result<(), StoreError> {
        let conn = self.lock();
        let rows = execute(
            &conn,
            "UPDATE todo SET completed = ?1 WHERE id = ?2 AND list_id = ?3",
            (completed, todo_id, list_id),
        )?;
        if rows == 0 {
            return Err(Self::missing_todo(&conn, list_id, todo_id));
        }
        Ok(())
    }

    fn complete_all_todos(&mut self, list_id: i64) -> Result<(), StoreError> {
        let conn = self.lock();
        Self::ensure_list(&conn, list_id)?;

        // A single statement, so SQLite applies it to every row or none
        execute(
            &conn,
            "UPDATE todo SET completed = 1 WHERE list_id = ?1",
            [list_id],
        )?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn execute<P>(conn: &Connection, sql: &str, params: P) -> rusqlite::Result<usize>
where
    P: Params + Debug,
{
    tracing::info!(target: SQL_LOG_TARGET, "{}: {:?}", sql, params);
    conn.execute(sql, params)
}

fn query_rows<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> rusqlite::Result<Vec<T>>
where
    P: Params + Debug,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    tracing::info!(target: SQL_LOG_TARGET, "{}: {:?}", sql, params);
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?.collect();
    rows
}

/// A concurrent writer may claim a name between the validation query and the
/// write. The UNIQUE constraint catches that; report it like the validator.
fn name_conflict(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            ValidationError::ListNameTaken.into()
        }
        _ => e.into(),
    }
}

/// Another connection to the same file may delete the list after
/// `ensure_list` passed. The foreign key rejects the insert; report it as the
/// missing list it is.
fn list_vanished(e: rusqlite::Error, list_id: i64) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            StoreError::ListNotFound(list_id)
        }
        _ => e.into(),
    }
}
