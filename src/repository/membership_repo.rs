//! Membership Repository
//!
//! Source of truth for access decisions: maps (list, user) to a role.
//! The UNIQUE (list_id, user_id) constraint enforces one role per user per
//! list even under concurrent inserts.

use rusqlite::params;

use super::db::Db;
use crate::domain::{DomainError, DomainResult, Membership, Role};

#[derive(Clone)]
pub struct MembershipRepository {
    conn: Db,
}

fn row_to_membership(row: &rusqlite::Row<'_>) -> rusqlite::Result<Membership> {
    let role: String = row.get(3)?;
    Ok(Membership {
        id: row.get(0)?,
        list_id: row.get(1)?,
        user_id: row.get(2)?,
        role: Role::parse(&role).unwrap_or_default(),
    })
}

impl MembershipRepository {
    pub fn new(conn: Db) -> Self {
        Self { conn }
    }

    /// Current membership for (list, user), if any
    pub async fn find(&self, list_id: u32, user_id: &str) -> DomainResult<Option<Membership>> {
        let guard = self.conn.lock().await;
        let mut stmt = guard
            .prepare(
                "SELECT id, list_id, user_id, role FROM list_members
                 WHERE list_id = ? AND user_id = ?",
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut rows = stmt
            .query_map(params![list_id, user_id], row_to_membership)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match rows.next() {
            Some(row) => Ok(Some(
                row.map_err(|e| DomainError::Internal(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Insert a membership row. A duplicate (list, user) pair surfaces as
    /// `Conflict` so callers can treat the race as "already a member".
    pub async fn insert(
        &self,
        list_id: u32,
        user_id: &str,
        role: Role,
    ) -> DomainResult<Membership> {
        let guard = self.conn.lock().await;
        guard
            .execute(
                "INSERT INTO list_members (list_id, user_id, role) VALUES (?, ?, ?)",
                params![list_id, user_id, role.as_str()],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    DomainError::Conflict(format!(
                        "user {} is already a member of list {}",
                        user_id, list_id
                    ))
                }
                e => DomainError::Internal(e.to_string()),
            })?;

        let id = guard.last_insert_rowid() as u32;
        Ok(Membership::new(id, list_id, user_id.to_string(), role))
    }

    pub async fn list_for_list(&self, list_id: u32) -> DomainResult<Vec<Membership>> {
        let guard = self.conn.lock().await;
        let mut stmt = guard
            .prepare(
                "SELECT id, list_id, user_id, role FROM list_members
                 WHERE list_id = ? ORDER BY id",
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let rows = stmt
            .query_map(params![list_id], row_to_membership)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row.map_err(|e| DomainError::Internal(e.to_string()))?);
        }
        Ok(members)
    }

    pub async fn update_role(
        &self,
        list_id: u32,
        user_id: &str,
        role: Role,
    ) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let changed = guard
            .execute(
                "UPDATE list_members SET role = ? WHERE list_id = ? AND user_id = ?",
                params![role.as_str(), list_id, user_id],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound("membership".to_string()));
        }
        Ok(())
    }

    pub async fn remove(&self, list_id: u32, user_id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let changed = guard
            .execute(
                "DELETE FROM list_members WHERE list_id = ? AND user_id = ?",
                params![list_id, user_id],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound("membership".to_string()));
        }
        Ok(())
    }
}
