//! List Repository
//!
//! Handles all list-related database operations. Creating a list also
//! creates the owner membership in the same transaction, so a list can
//! never exist without its owner membership.

use rusqlite::params;

use super::db::Db;
use crate::domain::{DomainError, DomainResult, List};

#[derive(Clone)]
pub struct ListRepository {
    conn: Db,
}

fn row_to_list(row: &rusqlite::Row<'_>) -> rusqlite::Result<List> {
    Ok(List {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl ListRepository {
    pub fn new(conn: Db) -> Self {
        Self { conn }
    }

    /// Create a list and its owner membership atomically
    pub async fn create(&self, owner: &str, name: &str) -> DomainResult<List> {
        let mut guard = self.conn.lock().await;
        let tx = guard
            .transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let now = chrono::Utc::now().timestamp_millis();
        tx.execute(
            "INSERT INTO lists (owner, name, created_at) VALUES (?, ?, ?)",
            params![owner, name, now],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
        let list_id = tx.last_insert_rowid() as u32;

        tx.execute(
            "INSERT INTO list_members (list_id, user_id, role) VALUES (?, ?, 'owner')",
            params![list_id, owner],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        tx.commit()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(List::new(list_id, owner.to_string(), name.to_string(), now))
    }

    pub async fn find_by_id(&self, id: u32) -> DomainResult<Option<List>> {
        let guard = self.conn.lock().await;
        let mut stmt = guard
            .prepare("SELECT id, owner, name, created_at FROM lists WHERE id = ?")
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut rows = stmt
            .query_map(params![id], row_to_list)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match rows.next() {
            Some(row) => Ok(Some(
                row.map_err(|e| DomainError::Internal(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Lists the user can see, i.e. lists they hold any membership on
    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let mut stmt = guard
            .prepare(
                "SELECT l.id, l.owner, l.name, l.created_at FROM lists l
                 JOIN list_members m ON m.list_id = l.id
                 WHERE m.user_id = ? ORDER BY l.id",
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], row_to_list)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut lists = Vec::new();
        for row in rows {
            lists.push(row.map_err(|e| DomainError::Internal(e.to_string()))?);
        }
        Ok(lists)
    }

    pub async fn rename(&self, id: u32, name: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let changed = guard
            .execute("UPDATE lists SET name = ? WHERE id = ?", params![name, id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("list {}", id)));
        }
        Ok(())
    }

    /// Delete a list; todos and memberships cascade at the store level
    pub async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let changed = guard
            .execute("DELETE FROM lists WHERE id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("list {}", id)));
        }
        Ok(())
    }
}
