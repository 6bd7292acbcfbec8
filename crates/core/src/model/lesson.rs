use thiserror::Error;

use crate::model::content::ContentBlock;
use crate::model::ids::{LessonId, LevelId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson number must be >= 1")]
    InvalidLessonNumber,

    #[error("estimated time must be > 0 minutes")]
    InvalidEstimatedTime,
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

/// Kind of instructional content a lesson carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Hangeul,
    Vocabulary,
    Grammar,
    Conversation,
    Quiz,
}

impl ContentType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Hangeul => "hangeul",
            ContentType::Vocabulary => "vocabulary",
            ContentType::Grammar => "grammar",
            ContentType::Conversation => "conversation",
            ContentType::Quiz => "quiz",
        }
    }
}

/// Difficulty band shown to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single unit of instructional content with a fixed position within its
/// level.
///
/// `lesson_number` is 1-based and orders lessons inside a level; the id is a
/// catalog-wide handle and says nothing about position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    level_id: LevelId,
    lesson_number: u32,
    title: String,
    description: String,
    content_type: ContentType,
    difficulty: Difficulty,
    estimated_time_minutes: u32,
    always_unlocked: bool,
    content: Vec<ContentBlock>,
}

impl Lesson {
    /// Creates a new Lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title is empty, the lesson number is
    /// zero, or the estimated time is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LessonId,
        level_id: LevelId,
        lesson_number: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        content_type: ContentType,
        difficulty: Difficulty,
        estimated_time_minutes: u32,
        always_unlocked: bool,
        content: Vec<ContentBlock>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if lesson_number == 0 {
            return Err(LessonError::InvalidLessonNumber);
        }
        if estimated_time_minutes == 0 {
            return Err(LessonError::InvalidEstimatedTime);
        }

        Ok(Self {
            id,
            level_id,
            lesson_number,
            title: title.trim().to_owned(),
            description: description.into(),
            content_type,
            difficulty,
            estimated_time_minutes,
            always_unlocked,
            content,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn lesson_number(&self) -> u32 {
        self.lesson_number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn estimated_time_minutes(&self) -> u32 {
        self.estimated_time_minutes
    }

    /// When true, the lesson is accessible regardless of progress.
    #[must_use]
    pub fn always_unlocked(&self) -> bool {
        self.always_unlocked
    }

    #[must_use]
    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    /// True for the first lesson of a level, which has no predecessor to
    /// gate on.
    #[must_use]
    pub fn is_first_in_level(&self) -> bool {
        self.lesson_number == 1
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
