use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::model::{Email, Identity, UserRecord};

use super::SqliteRepository;
use super::mapping::{conn, map_user_row};
use crate::repository::{StorageError, UserRepository};

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn record_login(
        &self,
        identity: &Identity,
        at: DateTime<Utc>,
    ) -> Result<UserRecord, StorageError> {
        sqlx::query(
            r"
            INSERT INTO users (email, name, last_login)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(email) DO UPDATE SET
                name = excluded.name,
                last_login = excluded.last_login
            ",
        )
        .bind(identity.email().as_str())
        .bind(identity.display_name().as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(UserRecord::from_identity(identity, at))
    }

    async fn find_user(&self, email: &Email) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT email, name, last_login
            FROM users
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT email, name, last_login
            FROM users
            ORDER BY last_login DESC, email ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_user_row).collect()
    }
}
