use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use korean_core::model::{
    LessonId, LevelId, LevelProgress, ProgressError, QuizAnswer, UserId, VocabularyId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape of one user×level progress row.
///
/// Mirrors the domain `LevelProgress` so repositories can serialize without
/// leaking storage concerns into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub level_id: LevelId,
    pub completed_lessons: Vec<LessonId>,
    pub current_lesson_id: Option<LessonId>,
    pub total_score: u32,
    pub level_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &LevelProgress) -> Self {
        Self {
            user_id: progress.user_id(),
            level_id: progress.level_id(),
            completed_lessons: progress.completed_lessons().to_vec(),
            current_lesson_id: progress.current_lesson_id(),
            total_score: progress.total_score(),
            level_completed_at: progress.level_completed_at(),
            created_at: progress.created_at(),
            updated_at: progress.updated_at(),
        }
    }

    /// Convert the record back into a domain `LevelProgress`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the persisted completed set is malformed.
    pub fn into_progress(self) -> Result<LevelProgress, ProgressError> {
        LevelProgress::from_persisted(
            self.user_id,
            self.level_id,
            self.completed_lessons,
            self.current_lesson_id,
            self.total_score,
            self.level_completed_at,
            self.created_at,
            self.updated_at,
        )
    }
}

/// Persisted shape of one finished quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttemptRecord {
    /// Assigned by the store on append.
    pub id: Option<i64>,
    pub user_id: UserId,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<QuizAnswer>,
    pub completed_at: DateTime<Utc>,
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Repository contract for user×level progress rows.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch every progress row belonging to the user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn fetch_for_user(&self, user: UserId) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Fetch one row by its unique (user, level) key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn get(
        &self,
        user: UserId,
        level: LevelId,
    ) -> Result<Option<ProgressRecord>, StorageError>;

    /// Insert or replace the row keyed by (user, level) in one statement, so
    /// a failure leaves the previous row intact.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert(&self, record: ProgressRecord) -> Result<(), StorageError>;
}

/// Repository contract for quiz attempt history.
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Append a finished attempt, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn append_attempt(&self, attempt: QuizAttemptRecord) -> Result<i64, StorageError>;

    /// All attempts of the user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn attempts_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<QuizAttemptRecord>, StorageError>;
}

/// Repository contract for vocabulary favorites.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Mark a word as favorite. Adding an existing favorite is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn add_favorite(
        &self,
        user: UserId,
        vocabulary: VocabularyId,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove a favorite. Removing a missing favorite is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn remove_favorite(
        &self,
        user: UserId,
        vocabulary: VocabularyId,
    ) -> Result<(), StorageError>;

    /// The user's favorites in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn favorites_for_user(&self, user: UserId) -> Result<Vec<VocabularyId>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
///
/// `set_offline(true)` makes every call fail with a connection error, which
/// is how tests simulate an unreachable backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<(UserId, LevelId), ProgressRecord>>>,
    attempts: Arc<Mutex<Vec<QuizAttemptRecord>>>,
    favorites: Arc<Mutex<Vec<(UserId, VocabularyId, DateTime<Utc>)>>>,
    next_attempt_id: Arc<AtomicI64>,
    offline: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_attempt_id: Arc::new(AtomicI64::new(1)),
            ..Self::default()
        }
    }

    /// Toggle simulated connectivity.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn fetch_for_user(&self, user: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        self.check_online()?;
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .values()
            .filter(|record| record.user_id == user)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        user: UserId,
        level: LevelId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        self.check_online()?;
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(user, level)).cloned())
    }

    async fn upsert(&self, record: ProgressRecord) -> Result<(), StorageError> {
        self.check_online()?;
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((record.user_id, record.level_id), record);
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, mut attempt: QuizAttemptRecord) -> Result<i64, StorageError> {
        self.check_online()?;
        let id = self.next_attempt_id.fetch_add(1, Ordering::SeqCst);
        attempt.id = Some(id);
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(attempt);
        Ok(id)
    }

    async fn attempts_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<QuizAttemptRecord>, StorageError> {
        self.check_online()?;
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut attempts: Vec<QuizAttemptRecord> = guard
            .iter()
            .filter(|attempt| attempt.user_id == user)
            .cloned()
            .collect();
        attempts.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(attempts)
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryRepository {
    async fn add_favorite(
        &self,
        user: UserId,
        vocabulary: VocabularyId,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.check_online()?;
        let mut guard = self
            .favorites
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if !guard.iter().any(|(u, v, _)| *u == user && *v == vocabulary) {
            guard.push((user, vocabulary, now));
        }
        Ok(())
    }

    async fn remove_favorite(
        &self,
        user: UserId,
        vocabulary: VocabularyId,
    ) -> Result<(), StorageError> {
        self.check_online()?;
        let mut guard = self
            .favorites
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.retain(|(u, v, _)| !(*u == user && *v == vocabulary));
        Ok(())
    }

    async fn favorites_for_user(&self, user: UserId) -> Result<Vec<VocabularyId>, StorageError> {
        self.check_online()?;
        let guard = self
            .favorites
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|(u, _, _)| *u == user)
            .map(|(_, v, _)| *v)
            .collect())
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub quiz_attempts: Arc<dyn QuizAttemptRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self::from_in_memory(repo)
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let quiz_attempts: Arc<dyn QuizAttemptRepository> = Arc::new(repo.clone());
        let favorites: Arc<dyn FavoriteRepository> = Arc::new(repo);
        Self {
            progress,
            quiz_attempts,
            favorites,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use korean_core::time::fixed_now;

    fn record(user: UserId, level: u64, lessons: &[u64], score: u32) -> ProgressRecord {
        ProgressRecord {
            user_id: user,
            level_id: LevelId::new(level),
            completed_lessons: lessons.iter().map(|id| LessonId::new(*id)).collect(),
            current_lesson_id: None,
            total_score: score,
            level_completed_at: None,
            created_at: fixed_now(),
            updated_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn progress_round_trips_through_the_record() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        repo.upsert(record(user, 6, &[1, 2], 200)).await.unwrap();

        let fetched = repo.get(user, LevelId::new(6)).await.unwrap().unwrap();
        let progress = fetched.into_progress().unwrap();
        assert_eq!(progress.total_score(), 200);
        assert!(progress.is_completed(LessonId::new(2)));
    }

    #[tokio::test]
    async fn fetch_for_user_filters_other_learners() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let other = UserId::random();
        repo.upsert(record(user, 6, &[1], 100)).await.unwrap();
        repo.upsert(record(other, 6, &[1, 2], 200)).await.unwrap();

        let rows = repo.fetch_for_user(user).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, user);
    }

    #[tokio::test]
    async fn offline_repository_refuses_every_call() {
        let repo = InMemoryRepository::new();
        repo.set_offline(true);

        let user = UserId::random();
        let err = repo.upsert(record(user, 6, &[1], 100)).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        let err = repo.fetch_for_user(user).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));

        repo.set_offline(false);
        assert!(repo.fetch_for_user(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attempts_come_back_newest_first() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();

        for i in 0..3i64 {
            let attempt = QuizAttemptRecord {
                id: None,
                user_id: user,
                score: 3,
                total_questions: 5,
                answers: Vec::new(),
                completed_at: fixed_now() + chrono::Duration::hours(i),
            };
            repo.append_attempt(attempt).await.unwrap();
        }

        let attempts = repo.attempts_for_user(user).await.unwrap();
        assert_eq!(attempts.len(), 3);
        assert!(attempts[0].completed_at > attempts[2].completed_at);
    }

    #[tokio::test]
    async fn adding_a_favorite_twice_keeps_one_row() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let word = VocabularyId::new(7);

        repo.add_favorite(user, word, fixed_now()).await.unwrap();
        repo.add_favorite(user, word, fixed_now()).await.unwrap();
        assert_eq!(repo.favorites_for_user(user).await.unwrap(), vec![word]);

        repo.remove_favorite(user, word).await.unwrap();
        assert!(repo.favorites_for_user(user).await.unwrap().is_empty());
    }
}
