//! Todo Repository
//!
//! SQLite-backed implementation for Todo CRUD operations.

use async_trait::async_trait;
use rusqlite::params;

use super::db::Db;
use super::traits::Repository;
use crate::domain::{DomainError, DomainResult, Todo};

#[derive(Clone)]
pub struct TodoRepository {
    conn: Db,
}

fn row_to_todo(row: &rusqlite::Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        list_id: row.get(1)?,
        task: row.get(2)?,
        completed: row.get::<_, i64>(3)? != 0,
        inserted_at: row.get(4)?,
    })
}

impl TodoRepository {
    pub fn new(conn: Db) -> Self {
        Self { conn }
    }

    /// All todos of one list, oldest first
    pub async fn list_for_list(&self, list_id: u32) -> DomainResult<Vec<Todo>> {
        let guard = self.conn.lock().await;
        let mut stmt = guard
            .prepare(
                "SELECT id, list_id, task, completed, inserted_at FROM todos
                 WHERE list_id = ? ORDER BY id",
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let rows = stmt
            .query_map(params![list_id], row_to_todo)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row.map_err(|e| DomainError::Internal(e.to_string()))?);
        }
        Ok(todos)
    }
}

#[async_trait]
impl Repository<Todo> for TodoRepository {
    async fn create(&self, entity: &Todo) -> DomainResult<Todo> {
        let guard = self.conn.lock().await;
        let now = chrono::Utc::now().timestamp_millis();
        guard
            .execute(
                "INSERT INTO todos (list_id, task, completed, inserted_at) VALUES (?, ?, ?, ?)",
                params![
                    entity.list_id,
                    entity.task,
                    entity.completed as i64,
                    now
                ],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let id = guard.last_insert_rowid() as u32;
        Ok(Todo {
            id,
            list_id: entity.list_id,
            task: entity.task.clone(),
            completed: entity.completed,
            inserted_at: now,
        })
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Todo>> {
        let guard = self.conn.lock().await;
        let mut stmt = guard
            .prepare("SELECT id, list_id, task, completed, inserted_at FROM todos WHERE id = ?")
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut rows = stmt
            .query_map(params![id], row_to_todo)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match rows.next() {
            Some(row) => Ok(Some(
                row.map_err(|e| DomainError::Internal(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<Todo>> {
        let guard = self.conn.lock().await;
        let mut stmt = guard
            .prepare("SELECT id, list_id, task, completed, inserted_at FROM todos ORDER BY id")
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let rows = stmt
            .query_map([], row_to_todo)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row.map_err(|e| DomainError::Internal(e.to_string()))?);
        }
        Ok(todos)
    }

    async fn update(&self, entity: &Todo) -> DomainResult<Todo> {
        let guard = self.conn.lock().await;
        let changed = guard
            .execute(
                "UPDATE todos SET task = ?, completed = ? WHERE id = ?",
                params![entity.task, entity.completed as i64, entity.id],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("todo {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let changed = guard
            .execute("DELETE FROM todos WHERE id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("todo {}", id)));
        }
        Ok(())
    }
}
