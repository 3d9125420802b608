//! # Group Repository
//!
//! Named groups of sellers. Names are unique (case-sensitive). A group that
//! still has members cannot be deleted: the foreign key on
//! `group_members.group_id` has no cascade.

use caja_core::Group;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for group database operations.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    /// Creates a new GroupRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GroupRepository { pool }
    }

    /// Creates a group.
    ///
    /// ## Errors
    /// [`DbError::UniqueViolation`] when the name is already taken.
    pub async fn create(&self, name: String) -> DbResult<Group> {
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now(),
        };

        debug!(id = %group.id, name = %group.name, "Creating group");

        sqlx::query("INSERT INTO seller_groups (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&group.id)
            .bind(&group.name)
            .bind(group.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("nombre", &group.name),
                other => other,
            })?;

        info!(id = %group.id, name = %group.name, "Group created");
        Ok(group)
    }

    /// Lists groups by name.
    pub async fn list(&self) -> DbResult<Vec<Group>> {
        debug!("Listing groups");

        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, name, created_at FROM seller_groups ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Deletes a group.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] if the group doesn't exist
    /// - [`DbError::ForeignKeyViolation`] if members still reference it
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting group");

        let result = sqlx::query("DELETE FROM seller_groups WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Group", id));
        }

        info!(id = %id, "Group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_create_and_list_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.groups();

        repo.create("Tarde".to_string()).await.unwrap();
        let morning = repo.create("Mañana".to_string()).await.unwrap();

        let groups = repo.list().await.unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Mañana", "Tarde"]);
        assert_eq!(groups[0].id, morning.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.groups();

        repo.create("Tarde".to_string()).await.unwrap();
        let err = repo.create("Tarde".to_string()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "Tarde"));

        // Case-sensitive
        repo.create("tarde".to_string()).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_group() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let group = db.groups().create("Tarde".to_string()).await.unwrap();
        db.members()
            .create("Ivan".to_string(), &group.id)
            .await
            .unwrap();

        let err = db.groups().delete(&group.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let empty = db.groups().create("Noche".to_string()).await.unwrap();
        db.groups().delete(&empty.id).await.unwrap();
        assert!(db.groups().list().await.unwrap().iter().all(|g| g.id != empty.id));

        let err = db.groups().delete(&empty.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
