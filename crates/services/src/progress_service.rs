use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use korean_core::progression::{LessonStatus, ProgressSnapshot, ResumePoint};
use korean_core::model::{
    CompletionOutcome, LessonId, LevelId, LevelProgress,
};
use korean_core::{Catalog, Clock};
use storage::repository::{ProgressRecord, ProgressRepository};

use crate::auth::AuthSession;
use crate::error::ProgressServiceError;

/// Score granted for a completion when the caller does not say otherwise.
pub const DEFAULT_LESSON_SCORE: u32 = 100;

/// What `complete_lesson` reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReceipt {
    pub lesson_id: LessonId,
    pub level_id: LevelId,
    pub outcome: CompletionOutcome,
    /// The recomputed resume pointer within the level.
    pub current_lesson_id: Option<LessonId>,
    /// The level's accumulated score after this call.
    pub level_total_score: u32,
    /// When the row last changed; the original completion time on a
    /// repeated submit.
    pub recorded_at: DateTime<Utc>,
}

/// The progress engine: binds the static catalog, the progress store, and
/// one learner session, and keeps an in-memory snapshot of the learner's
/// rows for synchronous unlock/completion queries.
///
/// The snapshot follows a read-your-writes model: it is replaced by a
/// re-fetch after every successful mutation, never pushed to. A second
/// device's stale snapshot is an accepted limitation.
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<dyn ProgressRepository>,
    session: AuthSession,
    snapshot: Mutex<ProgressSnapshot>,
    /// Serializes completions so a double-submit cannot interleave with an
    /// in-flight read-modify-write.
    completion_gate: tokio::sync::Mutex<()>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        progress: Arc<dyn ProgressRepository>,
        session: AuthSession,
    ) -> Self {
        Self {
            clock,
            catalog,
            progress,
            session,
            snapshot: Mutex::new(ProgressSnapshot::empty()),
            completion_gate: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn session(&self) -> AuthSession {
        self.session
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ─── Snapshot management ───────────────────────────────────────────────

    /// Re-fetch the learner's rows and replace the cached snapshot.
    ///
    /// Anonymous sessions always resolve to an empty snapshot without
    /// touching the store.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store is unreachable,
    /// or `Progress` if a persisted row is malformed.
    pub async fn refresh(&self) -> Result<(), ProgressServiceError> {
        let snapshot = self.fetch_snapshot().await?;
        debug!(rows = snapshot.rows().len(), "refreshed progress snapshot");
        *self.lock_snapshot() = snapshot;
        Ok(())
    }

    async fn fetch_snapshot(&self) -> Result<ProgressSnapshot, ProgressServiceError> {
        let Some(user) = self.session.user_id() else {
            return Ok(ProgressSnapshot::empty());
        };

        let records = self.progress.fetch_for_user(user).await?;
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(record.into_progress()?);
        }
        Ok(ProgressSnapshot::new(rows))
    }

    /// A copy of the cached snapshot, for callers that want to run several
    /// pure queries against one consistent state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock_snapshot().clone()
    }

    fn lock_snapshot(&self) -> MutexGuard<'_, ProgressSnapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn patch_snapshot(&self, row: LevelProgress) {
        let mut guard = self.lock_snapshot();
        let mut rows = guard.rows().to_vec();
        match rows.iter().position(|r| r.level_id() == row.level_id()) {
            Some(idx) => rows[idx] = row,
            None => rows.push(row),
        }
        *guard = ProgressSnapshot::new(rows);
    }

    // ─── Queries ───────────────────────────────────────────────────────────

    /// True iff any cached row's completed set contains the lesson. Absent
    /// progress data yields `false`.
    #[must_use]
    pub fn is_lesson_completed(&self, lesson: LessonId) -> bool {
        self.lock_snapshot().is_lesson_completed(lesson)
    }

    /// Whether the learner may open the lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::UnknownLesson` for an id the catalog
    /// does not contain.
    pub fn is_lesson_unlocked(&self, lesson: LessonId) -> Result<bool, ProgressServiceError> {
        let lesson = self
            .catalog
            .lesson(lesson)
            .ok_or(ProgressServiceError::UnknownLesson(lesson))?;
        Ok(self.lock_snapshot().is_lesson_unlocked(&self.catalog, lesson))
    }

    /// The level's lessons in catalog order, flagged with the learner's
    /// completion and unlock state.
    #[must_use]
    pub fn lessons_for_level(&self, level: LevelId) -> Vec<LessonStatus<'_>> {
        self.lock_snapshot()
            .lessons_with_status(&self.catalog, level)
    }

    /// Where the learner should resume studying.
    #[must_use]
    pub fn resume_point(&self) -> ResumePoint<'_> {
        self.lock_snapshot().resume_point(&self.catalog)
    }

    /// The cached row for one level, if any.
    #[must_use]
    pub fn level_progress(&self, level: LevelId) -> Option<LevelProgress> {
        self.lock_snapshot().level_progress(level).cloned()
    }

    /// Score accumulated across every level.
    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.lock_snapshot().total_score()
    }

    // ─── Mutation ──────────────────────────────────────────────────────────

    /// Record the completion of a lesson.
    ///
    /// Resolves the lesson's level, lazily creates the level's row on first
    /// completion, applies the idempotent completion in the domain layer,
    /// and persists the whole row in a single upsert, so a store failure
    /// leaves no partial update and the lesson stays incomplete. On success
    /// the cached snapshot is refreshed before returning.
    ///
    /// Re-completing an already-completed lesson returns
    /// `CompletionOutcome::AlreadyCompleted` and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` for anonymous sessions, `UnknownLesson`
    /// for an id outside the catalog, and `Storage` when the store is
    /// unreachable.
    pub async fn complete_lesson(
        &self,
        lesson_id: LessonId,
        score: u32,
    ) -> Result<CompletionReceipt, ProgressServiceError> {
        let user = self
            .session
            .user_id()
            .ok_or(ProgressServiceError::NotAuthenticated)?;
        let lesson = self
            .catalog
            .lesson(lesson_id)
            .ok_or(ProgressServiceError::UnknownLesson(lesson_id))?;

        // One completion at a time; a double-submit waits here and then
        // lands on the idempotence guard instead of double-counting.
        let _gate = self.completion_gate.lock().await;

        let now = self.clock.now();
        let level_id = lesson.level_id();
        let mut row = match self.progress.get(user, level_id).await? {
            Some(record) => record.into_progress()?,
            None => LevelProgress::start(user, level_id, now),
        };

        let level_lessons = self.catalog.lessons_for_level(level_id);
        let outcome = row.record_completion(lesson, &level_lessons, score, now)?;

        if let CompletionOutcome::Recorded { level_completed } = outcome {
            self.progress
                .upsert(ProgressRecord::from_progress(&row))
                .await?;
            info!(
                lesson = %lesson_id,
                level = %level_id,
                level_completed,
                "recorded lesson completion"
            );

            // Read-your-writes: prefer a re-fetch, but the row we just wrote
            // is authoritative if that re-fetch fails.
            if let Err(err) = self.refresh().await {
                warn!(%err, "snapshot refresh after completion failed");
                self.patch_snapshot(row.clone());
            }
        }

        Ok(CompletionReceipt {
            lesson_id,
            level_id,
            outcome,
            current_lesson_id: row.current_lesson_id(),
            level_total_score: row.total_score(),
            recorded_at: row.updated_at(),
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use korean_core::model::{LevelState, UserId};
    use korean_core::time::{fixed_clock, fixed_now};
    use storage::repository::{InMemoryRepository, StorageError};

    fn service(repo: InMemoryRepository, session: AuthSession) -> ProgressService {
        ProgressService::new(
            fixed_clock(),
            Arc::new(Catalog::built_in()),
            Arc::new(repo),
            session,
        )
    }

    fn signed_in() -> AuthSession {
        AuthSession::SignedIn(UserId::random())
    }

    #[tokio::test]
    async fn fresh_learner_sees_first_level_and_no_lesson() {
        let service = service(InMemoryRepository::new(), signed_in());
        service.refresh().await.unwrap();

        let resume = service.resume_point();
        assert_eq!(resume.level.id(), LevelId::new(6));
        assert!(resume.lesson.is_none());

        let statuses = service.lessons_for_level(LevelId::new(6));
        assert!(statuses[0].is_unlocked);
        assert!(!statuses[1].is_unlocked);
        assert!(!statuses[2].is_unlocked);
    }

    #[tokio::test]
    async fn first_completion_creates_the_row() {
        let service = service(InMemoryRepository::new(), signed_in());
        service.refresh().await.unwrap();

        let receipt = service
            .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
            .await
            .unwrap();

        assert_eq!(
            receipt.outcome,
            CompletionOutcome::Recorded {
                level_completed: false
            }
        );
        assert_eq!(receipt.current_lesson_id, Some(LessonId::new(2)));
        assert_eq!(receipt.level_total_score, 100);
        assert_eq!(receipt.recorded_at, fixed_now());

        // Read-your-writes: the cached snapshot already reflects the change.
        assert!(service.is_lesson_completed(LessonId::new(1)));
        assert!(service.is_lesson_unlocked(LessonId::new(2)).unwrap());
        let row = service.level_progress(LevelId::new(6)).unwrap();
        assert_eq!(row.created_at(), fixed_now());
    }

    #[tokio::test]
    async fn double_submit_does_not_double_count() {
        let service = service(InMemoryRepository::new(), signed_in());

        service
            .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
            .await
            .unwrap();
        let receipt = service
            .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
            .await
            .unwrap();

        assert_eq!(receipt.outcome, CompletionOutcome::AlreadyCompleted);
        assert_eq!(receipt.level_total_score, 100);
        let row = service.level_progress(LevelId::new(6)).unwrap();
        assert_eq!(row.completed_lessons().len(), 1);
        assert_eq!(row.total_score(), 100);
    }

    #[tokio::test]
    async fn finishing_a_level_advances_the_resume_point() {
        let service = service(InMemoryRepository::new(), signed_in());

        for id in [1u64, 2, 3] {
            service
                .complete_lesson(LessonId::new(id), DEFAULT_LESSON_SCORE)
                .await
                .unwrap();
        }

        let row = service.level_progress(LevelId::new(6)).unwrap();
        assert_eq!(row.state(), LevelState::Completed);
        assert_eq!(row.level_completed_at(), Some(fixed_now()));

        let resume = service.resume_point();
        assert_eq!(resume.level.id(), LevelId::new(1));
        assert!(resume.lesson.is_none());
    }

    #[tokio::test]
    async fn store_outage_leaves_no_partial_update() {
        let repo = InMemoryRepository::new();
        let service = service(repo.clone(), signed_in());
        service.refresh().await.unwrap();

        repo.set_offline(true);
        let err = service
            .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Storage(StorageError::Connection(_))
        ));

        assert!(!service.is_lesson_completed(LessonId::new(1)));
        repo.set_offline(false);
        service.refresh().await.unwrap();
        assert!(!service.is_lesson_completed(LessonId::new(1)));
        assert_eq!(service.total_score(), 0);
    }

    #[tokio::test]
    async fn anonymous_session_reads_empty_and_cannot_mutate() {
        let service = service(InMemoryRepository::new(), AuthSession::Anonymous);
        service.refresh().await.unwrap();

        assert!(!service.is_lesson_completed(LessonId::new(1)));
        assert_eq!(service.total_score(), 0);

        let err = service
            .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::NotAuthenticated));
    }

    #[tokio::test]
    async fn unknown_lesson_is_rejected_before_the_store() {
        let repo = InMemoryRepository::new();
        // Offline store proves validation happens first.
        repo.set_offline(true);
        let service = service(repo, signed_in());

        let err = service
            .complete_lesson(LessonId::new(999), DEFAULT_LESSON_SCORE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::UnknownLesson(id) if id == LessonId::new(999)
        ));
    }

    #[tokio::test]
    async fn lessons_for_level_is_sorted_and_consistent() {
        let service = service(InMemoryRepository::new(), signed_in());
        service
            .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
            .await
            .unwrap();

        let statuses = service.lessons_for_level(LevelId::new(6));
        let numbers: Vec<u32> = statuses.iter().map(|s| s.lesson.lesson_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(statuses[0].is_completed);
        assert!(statuses[1].is_unlocked);
        assert!(!statuses[2].is_completed);
    }
}
