#![forbid(unsafe_code)]

//! Persistence layer: repository contracts over the learner's progress rows,
//! quiz attempts, and favorites, with an in-memory double for tests and a
//! `SQLite` implementation for local use.

pub mod repository;
pub mod sqlite;

pub use repository::{
    FavoriteRepository, InMemoryRepository, ProgressRecord, ProgressRepository,
    QuizAttemptRecord, QuizAttemptRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
