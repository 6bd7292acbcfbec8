use std::sync::Arc;

use korean_core::{Catalog, Clock};
use storage::repository::Storage;

use crate::auth::AuthSession;
use crate::error::AppServicesError;
use crate::favorite_service::FavoriteService;
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;

/// Assembles the app-facing services around one storage backend and one
/// learner session.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
    quizzes: Arc<QuizService>,
    favorites: Arc<FavoriteService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        session: AuthSession,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, session))
    }

    /// Build services over an already-constructed storage backend.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, session: AuthSession) -> Self {
        let catalog = Arc::new(Catalog::built_in());
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.progress),
            session,
        ));
        let quizzes = Arc::new(QuizService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.quiz_attempts),
            session,
        ));
        let favorites = Arc::new(FavoriteService::new(
            clock,
            Arc::clone(&storage.favorites),
            session,
        ));

        Self {
            catalog,
            progress,
            quizzes,
            favorites,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn favorites(&self) -> Arc<FavoriteService> {
        Arc::clone(&self.favorites)
    }
}
