pub mod content;
mod ids;
mod lesson;
mod level;
mod progress;
mod quiz;

pub use content::{
    AudioRef, AudioValidationError, Conjugation, ContentBlock, ConversationTurn, JamoEntry,
    Phrase, SpeechRegister, SyllableEntry, VocabularyEntry,
};
pub use ids::{LessonId, LevelId, ParseIdError, QuizQuestionId, UserId, VocabularyId};

pub use lesson::{ContentType, Difficulty, Lesson, LessonError};
pub use level::{Level, LevelError};
pub use progress::{CompletionOutcome, LevelProgress, LevelState, ProgressError};
pub use quiz::{grade_quiz, GradedQuiz, QuizAnswer, QuizError, QuizKind, QuizQuestion};
