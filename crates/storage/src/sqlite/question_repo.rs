use async_trait::async_trait;
use exam_core::model::Question;

use super::SqliteRepository;
use super::mapping::{conn, id_to_i64, map_question_row, ser};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(
        &self,
        position: u32,
        question: &Question,
    ) -> Result<(), StorageError> {
        let options_json = serde_json::to_string(question.options()).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO questions (id, position, prompt, options_json)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                position = excluded.position,
                prompt = excluded.prompt,
                options_json = excluded.options_json
            ",
        )
        .bind(id_to_i64("question_id", question.id().value())?)
        .bind(i64::from(position))
        .bind(question.prompt())
        .bind(options_json)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, prompt, options_json
            FROM questions
            ORDER BY position ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }
}
