//! Shared error types for the services crate.

use thiserror::Error;

use korean_core::model::{LessonId, ProgressError, QuizError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `AuthClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("auth backend is not configured")]
    Disabled,
    #[error("auth request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("auth backend returned a malformed user")]
    MalformedUser,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ProgressService`.
///
/// Reads never produce `NotAuthenticated`; an anonymous session simply sees
/// an empty snapshot. Mutations short-circuit on it before touching the
/// store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("unknown lesson id {0}")]
    UnknownLesson(LessonId),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `FavoriteService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FavoriteServiceError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
