use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{LessonId, LevelId, UserId};
use crate::model::lesson::Lesson;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("lesson {lesson} does not belong to level {level}")]
    LessonOutsideLevel { lesson: LessonId, level: LevelId },

    #[error("persisted progress lists lesson {0} more than once")]
    DuplicateCompletedLesson(LessonId),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a learner stands within one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    NotStarted,
    InProgress,
    Completed,
}

/// Result of applying a lesson completion to a progress row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The lesson was already in the completed set; nothing changed.
    AlreadyCompleted,
    /// The completion was recorded.
    Recorded {
        /// True when this completion finished the whole level.
        level_completed: bool,
    },
}

//
// ─── LEVEL PROGRESS ────────────────────────────────────────────────────────────
//

/// One learner's persisted completion state for one level.
///
/// Rows are created lazily by the first completion in a level and are only
/// ever mutated by further completions. The completed set preserves append
/// order but holds each lesson at most once; `total_score` never decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelProgress {
    user_id: UserId,
    level_id: LevelId,
    completed_lessons: Vec<LessonId>,
    current_lesson_id: Option<LessonId>,
    total_score: u32,
    level_completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LevelProgress {
    /// Creates an empty row for a level the learner is about to start.
    #[must_use]
    pub fn start(user_id: UserId, level_id: LevelId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            level_id,
            completed_lessons: Vec::new(),
            current_lesson_id: None,
            total_score: 0,
            level_completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a row from storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::DuplicateCompletedLesson` if the persisted
    /// completed set lists a lesson twice.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        user_id: UserId,
        level_id: LevelId,
        completed_lessons: Vec<LessonId>,
        current_lesson_id: Option<LessonId>,
        total_score: u32,
        level_completed_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        for (i, id) in completed_lessons.iter().enumerate() {
            if completed_lessons[..i].contains(id) {
                return Err(ProgressError::DuplicateCompletedLesson(*id));
            }
        }

        Ok(Self {
            user_id,
            level_id,
            completed_lessons,
            current_lesson_id,
            total_score,
            level_completed_at,
            created_at,
            updated_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &[LessonId] {
        &self.completed_lessons
    }

    #[must_use]
    pub fn current_lesson_id(&self) -> Option<LessonId> {
        self.current_lesson_id
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn level_completed_at(&self) -> Option<DateTime<Utc>> {
        self.level_completed_at
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn is_completed(&self, lesson: LessonId) -> bool {
        self.completed_lessons.contains(&lesson)
    }

    #[must_use]
    pub fn state(&self) -> LevelState {
        if self.level_completed_at.is_some() {
            LevelState::Completed
        } else if self.completed_lessons.is_empty() {
            LevelState::NotStarted
        } else {
            LevelState::InProgress
        }
    }

    /// Records the completion of `lesson` with the given score.
    ///
    /// `level_lessons` must be the full lesson set of this row's level.
    /// Completing an already-completed lesson is a no-op: the set, the score
    /// and `updated_at` are left untouched. Otherwise the lesson is appended,
    /// the score added, and the resume pointer recomputed as the lowest
    /// not-yet-completed `lesson_number` above the completed one. When the
    /// set covers the whole level, `level_completed_at` is stamped.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::LessonOutsideLevel` when the lesson belongs to
    /// a different level.
    pub fn record_completion(
        &mut self,
        lesson: &Lesson,
        level_lessons: &[&Lesson],
        score: u32,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome, ProgressError> {
        if lesson.level_id() != self.level_id {
            return Err(ProgressError::LessonOutsideLevel {
                lesson: lesson.id(),
                level: self.level_id,
            });
        }

        if self.is_completed(lesson.id()) {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        self.completed_lessons.push(lesson.id());
        self.total_score = self.total_score.saturating_add(score);
        self.current_lesson_id = level_lessons
            .iter()
            .filter(|l| {
                l.lesson_number() > lesson.lesson_number() && !self.is_completed(l.id())
            })
            .min_by_key(|l| l.lesson_number())
            .map(|l| l.id());
        self.updated_at = now;

        let level_completed = level_lessons.iter().all(|l| self.is_completed(l.id()));
        if level_completed {
            self.level_completed_at = Some(now);
            self.current_lesson_id = None;
        }

        Ok(CompletionOutcome::Recorded { level_completed })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lesson::{ContentType, Difficulty};
    use crate::time::fixed_now;

    fn lesson(id: u64, number: u32) -> Lesson {
        Lesson::new(
            LessonId::new(id),
            LevelId::new(6),
            number,
            format!("Lesson {number}"),
            "desc",
            ContentType::Hangeul,
            Difficulty::Beginner,
            15,
            false,
            Vec::new(),
        )
        .unwrap()
    }

    fn level_lessons(lessons: &[Lesson]) -> Vec<&Lesson> {
        lessons.iter().collect()
    }

    #[test]
    fn first_completion_records_score_and_pointer() {
        let lessons = [lesson(1, 1), lesson(2, 2), lesson(3, 3)];
        let mut row = LevelProgress::start(UserId::random(), LevelId::new(6), fixed_now());

        let outcome = row
            .record_completion(&lessons[0], &level_lessons(&lessons), 100, fixed_now())
            .unwrap();

        assert_eq!(
            outcome,
            CompletionOutcome::Recorded {
                level_completed: false
            }
        );
        assert_eq!(row.completed_lessons(), &[LessonId::new(1)]);
        assert_eq!(row.total_score(), 100);
        assert_eq!(row.current_lesson_id(), Some(LessonId::new(2)));
        assert_eq!(row.state(), LevelState::InProgress);
    }

    #[test]
    fn repeat_completion_is_idempotent() {
        let lessons = [lesson(1, 1), lesson(2, 2)];
        let mut row = LevelProgress::start(UserId::random(), LevelId::new(6), fixed_now());
        row.record_completion(&lessons[0], &level_lessons(&lessons), 100, fixed_now())
            .unwrap();

        let later = fixed_now() + chrono::Duration::minutes(3);
        let outcome = row
            .record_completion(&lessons[0], &level_lessons(&lessons), 100, later)
            .unwrap();

        assert_eq!(outcome, CompletionOutcome::AlreadyCompleted);
        assert_eq!(row.total_score(), 100);
        assert_eq!(row.completed_lessons().len(), 1);
        assert_eq!(row.updated_at(), fixed_now());
    }

    #[test]
    fn pointer_skips_already_completed_lessons() {
        let lessons = [lesson(1, 1), lesson(2, 2), lesson(3, 3)];
        let mut row = LevelProgress::start(UserId::random(), LevelId::new(6), fixed_now());

        // Skip ahead: complete lesson 2 first, then lesson 1.
        row.record_completion(&lessons[1], &level_lessons(&lessons), 100, fixed_now())
            .unwrap();
        row.record_completion(&lessons[0], &level_lessons(&lessons), 100, fixed_now())
            .unwrap();

        assert_eq!(row.current_lesson_id(), Some(LessonId::new(3)));
    }

    #[test]
    fn pointer_is_none_when_no_later_lesson_remains() {
        let lessons = [lesson(1, 1), lesson(2, 2), lesson(3, 3)];
        let mut row = LevelProgress::start(UserId::random(), LevelId::new(6), fixed_now());

        row.record_completion(&lessons[2], &level_lessons(&lessons), 100, fixed_now())
            .unwrap();

        assert_eq!(row.current_lesson_id(), None);
        assert_eq!(row.state(), LevelState::InProgress);
    }

    #[test]
    fn completing_every_lesson_stamps_the_level() {
        let lessons = [lesson(1, 1), lesson(2, 2)];
        let mut row = LevelProgress::start(UserId::random(), LevelId::new(6), fixed_now());

        row.record_completion(&lessons[0], &level_lessons(&lessons), 100, fixed_now())
            .unwrap();
        let done_at = fixed_now() + chrono::Duration::minutes(20);
        let outcome = row
            .record_completion(&lessons[1], &level_lessons(&lessons), 90, done_at)
            .unwrap();

        assert_eq!(
            outcome,
            CompletionOutcome::Recorded {
                level_completed: true
            }
        );
        assert_eq!(row.level_completed_at(), Some(done_at));
        assert_eq!(row.current_lesson_id(), None);
        assert_eq!(row.total_score(), 190);
        assert_eq!(row.state(), LevelState::Completed);
    }

    #[test]
    fn completion_rejects_lesson_from_other_level() {
        let foreign = Lesson::new(
            LessonId::new(9),
            LevelId::new(3),
            1,
            "Complex Sentences",
            "desc",
            ContentType::Grammar,
            Difficulty::Advanced,
            35,
            false,
            Vec::new(),
        )
        .unwrap();
        let mut row = LevelProgress::start(UserId::random(), LevelId::new(6), fixed_now());

        let err = row
            .record_completion(&foreign, &[], 100, fixed_now())
            .unwrap_err();
        assert_eq!(
            err,
            ProgressError::LessonOutsideLevel {
                lesson: LessonId::new(9),
                level: LevelId::new(6),
            }
        );
    }

    #[test]
    fn from_persisted_rejects_duplicates() {
        let err = LevelProgress::from_persisted(
            UserId::random(),
            LevelId::new(6),
            vec![LessonId::new(1), LessonId::new(1)],
            None,
            200,
            None,
            fixed_now(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, ProgressError::DuplicateCompletedLesson(LessonId::new(1)));
    }
}
