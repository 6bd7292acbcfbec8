#![forbid(unsafe_code)]

//! Orchestration layer: the progress engine, quiz runs, favorites, and the
//! auth collaborator, wired over the `storage` repositories.

pub mod app_services;
pub mod auth;
pub mod error;
pub mod favorite_service;
pub mod progress_service;
pub mod quiz_service;

pub use korean_core::Clock;

pub use app_services::AppServices;
pub use auth::{AuthClient, AuthConfig, AuthSession};
pub use error::{
    AppServicesError, AuthError, FavoriteServiceError, ProgressServiceError, QuizServiceError,
};
pub use favorite_service::FavoriteService;
pub use progress_service::{CompletionReceipt, DEFAULT_LESSON_SCORE, ProgressService};
pub use quiz_service::{QuizService, SubmittedQuiz};
