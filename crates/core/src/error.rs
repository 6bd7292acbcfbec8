use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{
    AudioValidationError, LessonError, LevelError, ProgressError, QuizError,
};

/// Umbrella error for domain-layer construction and validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Audio(#[from] AudioValidationError),
}
