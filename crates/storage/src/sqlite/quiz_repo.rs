use korean_core::model::UserId;

use super::SqliteRepository;
use super::mapping::{answers_to_json, map_attempt_row};
use crate::repository::{QuizAttemptRecord, QuizAttemptRepository, StorageError};

#[async_trait::async_trait]
impl QuizAttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: QuizAttemptRecord) -> Result<i64, StorageError> {
        let answers = answers_to_json(&attempt.answers)?;

        let res = sqlx::query(
            r"
            INSERT INTO quiz_attempts (user_id, score, total_questions, answers, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(attempt.user_id.to_string())
        .bind(i64::from(attempt.score))
        .bind(i64::from(attempt.total_questions))
        .bind(answers)
        .bind(attempt.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn attempts_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<QuizAttemptRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, score, total_questions, answers, completed_at
            FROM quiz_attempts
            WHERE user_id = ?1
            ORDER BY completed_at DESC, id DESC
            ",
        )
        .bind(user.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut attempts = Vec::with_capacity(rows.len());
        for row in rows {
            attempts.push(map_attempt_row(&row)?);
        }
        Ok(attempts)
    }
}
