//! Pure unlock/resume derivation over a learner's progress rows.
//!
//! Everything here is a function of the catalog plus a snapshot of progress
//! rows; no storage, no side effects. The service layer owns fetching and
//! refreshing the snapshot.

use crate::catalog::Catalog;
use crate::model::{Lesson, LessonId, Level, LevelId, LevelProgress, LevelState};

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// All progress rows of one learner, as last fetched from the store.
///
/// An anonymous learner simply has an empty snapshot; every query degrades
/// to "nothing completed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    rows: Vec<LevelProgress>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(rows: Vec<LevelProgress>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[LevelProgress] {
        &self.rows
    }

    #[must_use]
    pub fn level_progress(&self, level: LevelId) -> Option<&LevelProgress> {
        self.rows.iter().find(|row| row.level_id() == level)
    }

    /// True iff any row's completed set contains the lesson.
    #[must_use]
    pub fn is_lesson_completed(&self, lesson: LessonId) -> bool {
        self.rows.iter().any(|row| row.is_completed(lesson))
    }

    /// A level with no row is `NotStarted`.
    #[must_use]
    pub fn state_of(&self, level: LevelId) -> LevelState {
        self.level_progress(level)
            .map_or(LevelState::NotStarted, LevelProgress::state)
    }

    /// Score accumulated across every level.
    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.rows
            .iter()
            .map(|row| u64::from(row.total_score()))
            .sum()
    }

    /// Whether the learner may open `lesson`.
    ///
    /// Unlocked when the catalog marks it always-unlocked, when it is the
    /// first lesson of its level, or when the lesson one `lesson_number`
    /// earlier in the same level is completed. Gating is keyed off the
    /// declared lesson order, never off id adjacency.
    #[must_use]
    pub fn is_lesson_unlocked(&self, catalog: &Catalog, lesson: &Lesson) -> bool {
        if lesson.always_unlocked() || lesson.is_first_in_level() {
            return true;
        }
        catalog
            .predecessor(lesson)
            .is_some_and(|prev| self.is_lesson_completed(prev.id()))
    }

    /// The level's lessons in catalog order, each with completion and
    /// unlock flags.
    #[must_use]
    pub fn lessons_with_status<'a>(
        &self,
        catalog: &'a Catalog,
        level: LevelId,
    ) -> Vec<LessonStatus<'a>> {
        catalog
            .lessons_for_level(level)
            .into_iter()
            .map(|lesson| LessonStatus {
                is_completed: self.is_lesson_completed(lesson.id()),
                is_unlocked: self.is_lesson_unlocked(catalog, lesson),
                lesson,
            })
            .collect()
    }

    /// Where the learner should pick up.
    ///
    /// The first level in progression order that is not completed, paired
    /// with that level's resume pointer. A level without a row counts as not
    /// completed, so finishing one level advances here to the next even
    /// before it has a row. When everything is done, the last level is
    /// reported with no lesson.
    #[must_use]
    pub fn resume_point<'a>(&self, catalog: &'a Catalog) -> ResumePoint<'a> {
        for level in catalog.levels() {
            if self.state_of(level.id()) != LevelState::Completed {
                let lesson = self
                    .level_progress(level.id())
                    .and_then(LevelProgress::current_lesson_id)
                    .and_then(|id| catalog.lesson(id));
                return ResumePoint { level, lesson };
            }
        }

        ResumePoint {
            level: catalog.last_level(),
            lesson: None,
        }
    }
}

//
// ─── VIEW TYPES ────────────────────────────────────────────────────────────────
//

/// A catalog lesson augmented with the learner's flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonStatus<'a> {
    pub lesson: &'a Lesson,
    pub is_completed: bool,
    pub is_unlocked: bool,
}

/// The recommended place to resume studying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePoint<'a> {
    pub level: &'a Level,
    /// `None` when the level has no row yet or its pointer was cleared.
    pub lesson: Option<&'a Lesson>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, Difficulty, UserId};
    use crate::time::fixed_now;

    fn lesson(id: u64, level: u64, number: u32, always_unlocked: bool) -> Lesson {
        Lesson::new(
            LessonId::new(id),
            LevelId::new(level),
            number,
            format!("Lesson {id}"),
            "desc",
            ContentType::Vocabulary,
            Difficulty::Beginner,
            10,
            always_unlocked,
            Vec::new(),
        )
        .unwrap()
    }

    fn level(id: u64, order: u32) -> Level {
        Level::new(LevelId::new(id), order, format!("Level {id}"), "", "bg-blue-500").unwrap()
    }

    /// Two levels; ids shuffled so id arithmetic would misbehave.
    fn catalog() -> Catalog {
        Catalog::new(
            vec![level(6, 1), level(1, 2)],
            vec![
                lesson(1, 6, 1, false),
                lesson(2, 6, 2, false),
                lesson(3, 6, 3, false),
                lesson(4, 1, 1, false),
                lesson(5, 1, 2, false),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn completed(user: UserId, level: u64, lessons: &[u64]) -> LevelProgress {
        let catalog = catalog();
        let level_lessons = catalog.lessons_for_level(LevelId::new(level));
        let mut row = LevelProgress::start(user, LevelId::new(level), fixed_now());
        for id in lessons {
            let lesson = catalog.lesson(LessonId::new(*id)).unwrap();
            row.record_completion(lesson, &level_lessons, 100, fixed_now())
                .unwrap();
        }
        row
    }

    #[test]
    fn empty_snapshot_unlocks_only_first_lessons() {
        let catalog = catalog();
        let snapshot = ProgressSnapshot::empty();

        let statuses = snapshot.lessons_with_status(&catalog, LevelId::new(6));
        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].is_unlocked);
        assert!(!statuses[1].is_unlocked);
        assert!(!statuses[2].is_unlocked);
        assert!(statuses.iter().all(|s| !s.is_completed));
    }

    #[test]
    fn always_unlocked_flag_overrides_gating() {
        let catalog = Catalog::new(
            vec![level(6, 1)],
            vec![lesson(1, 6, 1, false), lesson(2, 6, 2, true)],
            Vec::new(),
        )
        .unwrap();
        let snapshot = ProgressSnapshot::empty();

        let second = catalog.lesson(LessonId::new(2)).unwrap();
        assert!(snapshot.is_lesson_unlocked(&catalog, second));
    }

    #[test]
    fn completing_a_lesson_unlocks_its_successor() {
        let catalog = catalog();
        let user = UserId::random();
        let snapshot = ProgressSnapshot::new(vec![completed(user, 6, &[1])]);

        let statuses = snapshot.lessons_with_status(&catalog, LevelId::new(6));
        assert!(statuses[0].is_completed);
        assert!(statuses[1].is_unlocked);
        assert!(!statuses[2].is_unlocked);
    }

    #[test]
    fn unlock_is_keyed_on_lesson_number_across_level_boundaries() {
        let catalog = catalog();
        let user = UserId::random();
        // Finishing the hangeul level must not be what unlocks lesson id 5;
        // only completing lesson id 4 (number 1 of its level) may do that.
        let snapshot = ProgressSnapshot::new(vec![completed(user, 6, &[1, 2, 3])]);

        let fifth = catalog.lesson(LessonId::new(5)).unwrap();
        assert!(!snapshot.is_lesson_unlocked(&catalog, fifth));

        let snapshot = ProgressSnapshot::new(vec![
            completed(user, 6, &[1, 2, 3]),
            completed(user, 1, &[4]),
        ]);
        assert!(snapshot.is_lesson_unlocked(&catalog, fifth));
    }

    #[test]
    fn resume_point_for_new_learner_is_first_level() {
        let catalog = catalog();
        let snapshot = ProgressSnapshot::empty();

        let resume = snapshot.resume_point(&catalog);
        assert_eq!(resume.level.id(), LevelId::new(6));
        assert!(resume.lesson.is_none());
    }

    #[test]
    fn resume_point_follows_the_row_pointer() {
        let catalog = catalog();
        let user = UserId::random();
        let snapshot = ProgressSnapshot::new(vec![completed(user, 6, &[1])]);

        let resume = snapshot.resume_point(&catalog);
        assert_eq!(resume.level.id(), LevelId::new(6));
        assert_eq!(resume.lesson.map(Lesson::id), Some(LessonId::new(2)));
    }

    #[test]
    fn resume_point_advances_past_completed_levels() {
        let catalog = catalog();
        let user = UserId::random();
        let snapshot = ProgressSnapshot::new(vec![completed(user, 6, &[1, 2, 3])]);

        let resume = snapshot.resume_point(&catalog);
        assert_eq!(resume.level.id(), LevelId::new(1));
        assert!(resume.lesson.is_none());
    }

    #[test]
    fn resume_point_terminal_state_is_last_level() {
        let catalog = catalog();
        let user = UserId::random();
        let snapshot = ProgressSnapshot::new(vec![
            completed(user, 6, &[1, 2, 3]),
            completed(user, 1, &[4, 5]),
        ]);

        let resume = snapshot.resume_point(&catalog);
        assert_eq!(resume.level.id(), LevelId::new(1));
        assert!(resume.lesson.is_none());
        assert_eq!(snapshot.state_of(LevelId::new(1)), LevelState::Completed);
    }

    #[test]
    fn total_score_sums_across_levels() {
        let user = UserId::random();
        let snapshot = ProgressSnapshot::new(vec![
            completed(user, 6, &[1, 2]),
            completed(user, 1, &[4]),
        ]);
        assert_eq!(snapshot.total_score(), 300);
    }
}
