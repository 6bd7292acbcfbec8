use korean_core::model::{LevelId, UserId};

use super::SqliteRepository;
use super::mapping::{completed_lessons_to_json, id_to_i64, map_progress_row};
use crate::repository::{ProgressRecord, ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn fetch_for_user(&self, user: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, level_id, completed_lessons, current_lesson_id,
                   total_score, level_completed_at, created_at, updated_at
            FROM user_level_progress
            WHERE user_id = ?1
            ",
        )
        .bind(user.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(map_progress_row(&row)?);
        }
        Ok(records)
    }

    async fn get(
        &self,
        user: UserId,
        level: LevelId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, level_id, completed_lessons, current_lesson_id,
                   total_score, level_completed_at, created_at, updated_at
            FROM user_level_progress
            WHERE user_id = ?1 AND level_id = ?2
            ",
        )
        .bind(user.to_string())
        .bind(id_to_i64("level_id", level.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_progress_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: ProgressRecord) -> Result<(), StorageError> {
        let completed = completed_lessons_to_json(&record.completed_lessons)?;
        let current_lesson_id = record
            .current_lesson_id
            .map(|id| id_to_i64("current_lesson_id", id.value()))
            .transpose()?;
        let total_score = i64::from(record.total_score);

        // Single statement keyed on (user_id, level_id): either the whole row
        // lands or nothing does.
        sqlx::query(
            r"
            INSERT INTO user_level_progress
                (user_id, level_id, completed_lessons, current_lesson_id,
                 total_score, level_completed_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id, level_id) DO UPDATE SET
                completed_lessons = excluded.completed_lessons,
                current_lesson_id = excluded.current_lesson_id,
                total_score = excluded.total_score,
                level_completed_at = excluded.level_completed_at,
                updated_at = excluded.updated_at
            ",
        )
        .bind(record.user_id.to_string())
        .bind(id_to_i64("level_id", record.level_id.value())?)
        .bind(completed)
        .bind(current_lesson_id)
        .bind(total_score)
        .bind(record.level_completed_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
