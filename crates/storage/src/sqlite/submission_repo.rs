use async_trait::async_trait;
use exam_core::model::{SubmissionId, SubmissionRecord};

use super::SqliteRepository;
use super::mapping::{conn, map_submission_row, ser};
use crate::repository::{StorageError, SubmissionRepository};

#[async_trait]
impl SubmissionRepository for SqliteRepository {
    async fn append_submission(
        &self,
        record: &SubmissionRecord,
    ) -> Result<SubmissionId, StorageError> {
        let answers_json = serde_json::to_string(&record.answers).map_err(ser)?;

        let res = sqlx::query(
            r"
            INSERT INTO submissions (email, name, answers_json, submitted_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(record.email.as_str())
        .bind(record.name.as_str())
        .bind(answers_json)
        .bind(record.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("negative submission id".into()))?;
        Ok(SubmissionId::new(id))
    }

    async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, email, name, answers_json, submitted_at
            FROM submissions
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_submission_row).collect()
    }
}
