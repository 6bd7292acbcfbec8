use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Lesson, LessonId, Level, LevelId, QuizQuestion, QuizQuestionId};

mod builtin;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog needs at least one level")]
    NoLevels,

    #[error("duplicate level id {0}")]
    DuplicateLevelId(LevelId),

    #[error("levels {first} and {second} share level_order {order}")]
    DuplicateLevelOrder {
        first: LevelId,
        second: LevelId,
        order: u32,
    },

    #[error("duplicate lesson id {0}")]
    DuplicateLessonId(LessonId),

    #[error("lesson {lesson} references unknown level {level}")]
    UnknownLevelForLesson { lesson: LessonId, level: LevelId },

    #[error("level {level} has two lessons numbered {number}")]
    DuplicateLessonNumber { level: LevelId, number: u32 },

    #[error("duplicate quiz question id {0}")]
    DuplicateQuizQuestionId(QuizQuestionId),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The static curriculum: levels, lessons, and the quiz bank.
///
/// Build-time data, validated once at construction. All lookups are pure and
/// synchronous; nothing here touches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Sorted ascending by `level_order`.
    levels: Vec<Level>,
    lessons: Vec<Lesson>,
    quiz_bank: Vec<QuizQuestion>,
}

impl Catalog {
    /// Assembles and validates a catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for duplicate ids, duplicate `level_order`
    /// values, duplicate lesson numbers within a level, or a lesson that
    /// points at a level the catalog does not contain.
    pub fn new(
        mut levels: Vec<Level>,
        lessons: Vec<Lesson>,
        quiz_bank: Vec<QuizQuestion>,
    ) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::NoLevels);
        }

        levels.sort_by_key(Level::level_order);

        let mut level_ids = HashSet::new();
        for level in &levels {
            if !level_ids.insert(level.id()) {
                return Err(CatalogError::DuplicateLevelId(level.id()));
            }
        }
        for pair in levels.windows(2) {
            if pair[0].level_order() == pair[1].level_order() {
                return Err(CatalogError::DuplicateLevelOrder {
                    first: pair[0].id(),
                    second: pair[1].id(),
                    order: pair[0].level_order(),
                });
            }
        }

        let mut lesson_ids = HashSet::new();
        let mut numbers = HashSet::new();
        for lesson in &lessons {
            if !lesson_ids.insert(lesson.id()) {
                return Err(CatalogError::DuplicateLessonId(lesson.id()));
            }
            if !level_ids.contains(&lesson.level_id()) {
                return Err(CatalogError::UnknownLevelForLesson {
                    lesson: lesson.id(),
                    level: lesson.level_id(),
                });
            }
            if !numbers.insert((lesson.level_id(), lesson.lesson_number())) {
                return Err(CatalogError::DuplicateLessonNumber {
                    level: lesson.level_id(),
                    number: lesson.lesson_number(),
                });
            }
        }

        let mut quiz_ids = HashSet::new();
        for question in &quiz_bank {
            if !quiz_ids.insert(question.id()) {
                return Err(CatalogError::DuplicateQuizQuestionId(question.id()));
            }
        }

        Ok(Self {
            levels,
            lessons,
            quiz_bank,
        })
    }

    /// The curriculum shipped with the app: four levels and ten lessons of
    /// Korean content, plus the built-in quiz bank.
    ///
    /// # Panics
    ///
    /// Never panics for the shipped data; covered by tests.
    #[must_use]
    pub fn built_in() -> Self {
        builtin::built_in_catalog()
    }

    // ─── Level lookups ─────────────────────────────────────────────────────

    /// All levels, ascending by `level_order`.
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id() == id)
    }

    /// The level a brand-new learner starts in.
    #[must_use]
    pub fn first_level(&self) -> &Level {
        // Invariant: `new` rejects empty level lists.
        &self.levels[0]
    }

    /// The terminal level, reported once everything is completed.
    #[must_use]
    pub fn last_level(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    /// The level following `id` in progression order, if any.
    #[must_use]
    pub fn next_level(&self, id: LevelId) -> Option<&Level> {
        let idx = self.levels.iter().position(|l| l.id() == id)?;
        self.levels.get(idx + 1)
    }

    // ─── Lesson lookups ────────────────────────────────────────────────────

    #[must_use]
    pub fn all_lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == id)
    }

    /// Lessons of one level, ascending by `lesson_number`.
    #[must_use]
    pub fn lessons_for_level(&self, level: LevelId) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.level_id() == level)
            .collect();
        lessons.sort_by_key(|l| l.lesson_number());
        lessons
    }

    /// The lesson immediately before `lesson` in its level, by
    /// `lesson_number`. `None` for the first lesson of a level.
    #[must_use]
    pub fn predecessor(&self, lesson: &Lesson) -> Option<&Lesson> {
        if lesson.is_first_in_level() {
            return None;
        }
        self.lessons.iter().find(|l| {
            l.level_id() == lesson.level_id()
                && l.lesson_number() == lesson.lesson_number() - 1
        })
    }

    // ─── Quiz lookups ──────────────────────────────────────────────────────

    #[must_use]
    pub fn quiz_bank(&self) -> &[QuizQuestion] {
        &self.quiz_bank
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
