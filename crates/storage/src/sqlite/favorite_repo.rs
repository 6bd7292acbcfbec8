use chrono::{DateTime, Utc};
use korean_core::model::{UserId, VocabularyId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{id_to_i64, ser, vocabulary_id_from_i64};
use crate::repository::{FavoriteRepository, StorageError};

#[async_trait::async_trait]
impl FavoriteRepository for SqliteRepository {
    async fn add_favorite(
        &self,
        user: UserId,
        vocabulary: VocabularyId,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        // The (user_id, vocabulary_id) primary key plus DO NOTHING makes a
        // repeated add a no-op instead of a constraint failure.
        sqlx::query(
            r"
            INSERT INTO user_favorites (user_id, vocabulary_id, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, vocabulary_id) DO NOTHING
            ",
        )
        .bind(user.to_string())
        .bind(id_to_i64("vocabulary_id", vocabulary.value())?)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn remove_favorite(
        &self,
        user: UserId,
        vocabulary: VocabularyId,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            DELETE FROM user_favorites
            WHERE user_id = ?1 AND vocabulary_id = ?2
            ",
        )
        .bind(user.to_string())
        .bind(id_to_i64("vocabulary_id", vocabulary.value())?)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn favorites_for_user(&self, user: UserId) -> Result<Vec<VocabularyId>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT vocabulary_id
            FROM user_favorites
            WHERE user_id = ?1
            ORDER BY created_at ASC
            ",
        )
        .bind(user.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut favorites = Vec::with_capacity(rows.len());
        for row in rows {
            favorites.push(vocabulary_id_from_i64(
                row.try_get::<i64, _>("vocabulary_id").map_err(ser)?,
            )?);
        }
        Ok(favorites)
    }
}
