//! # Member Repository
//!
//! Sellers ("integrantes"), each belonging to exactly one group.

use caja_core::Member;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for member database operations.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    /// Creates a new MemberRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MemberRepository { pool }
    }

    /// Adds a member to an existing group.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] if the group doesn't exist.
    pub async fn create(&self, name: String, group_id: &str) -> DbResult<Member> {
        debug!(name = %name, group_id = %group_id, "Creating member");

        let group_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM seller_groups WHERE id = ?1)")
                .bind(group_id)
                .fetch_one(&self.pool)
                .await?;

        if !group_exists {
            return Err(DbError::not_found("Group", group_id));
        }

        let member = Member {
            id: Uuid::new_v4().to_string(),
            name,
            group_id: group_id.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO group_members (id, name, group_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.group_id)
        .bind(member.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            // Group deleted between the check and the insert
            DbError::ForeignKeyViolation { .. } => DbError::not_found("Group", group_id),
            other => other,
        })?;

        info!(id = %member.id, group_id = %group_id, "Member created");
        Ok(member)
    }

    /// Lists members by name, optionally only those of one group.
    pub async fn list(&self, group_id: Option<&str>) -> DbResult<Vec<Member>> {
        debug!(group_id = ?group_id, "Listing members");

        let members = match group_id {
            Some(group_id) => {
                sqlx::query_as::<_, Member>(
                    r#"
                    SELECT id, name, group_id, created_at
                    FROM group_members
                    WHERE group_id = ?1
                    ORDER BY name ASC
                    "#,
                )
                .bind(group_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Member>(
                    "SELECT id, name, group_id, created_at FROM group_members ORDER BY name ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(members)
    }

    /// Deletes a member.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting member");

        let result = sqlx::query("DELETE FROM group_members WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Member", id));
        }

        Ok(())
    }
}
