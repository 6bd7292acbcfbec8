use std::sync::Arc;

use tracing::debug;

use korean_core::Clock;
use korean_core::model::VocabularyId;
use storage::repository::FavoriteRepository;

use crate::auth::AuthSession;
use crate::error::FavoriteServiceError;

/// Manages the learner's starred vocabulary words.
pub struct FavoriteService {
    clock: Clock,
    favorites: Arc<dyn FavoriteRepository>,
    session: AuthSession,
}

impl FavoriteService {
    #[must_use]
    pub fn new(
        clock: Clock,
        favorites: Arc<dyn FavoriteRepository>,
        session: AuthSession,
    ) -> Self {
        Self {
            clock,
            favorites,
            session,
        }
    }

    /// Star or unstar a word. Returns whether the word is a favorite after
    /// the call.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` for anonymous sessions, or `Storage` when
    /// the store cannot be reached.
    pub async fn toggle(&self, word: VocabularyId) -> Result<bool, FavoriteServiceError> {
        let user = self
            .session
            .user_id()
            .ok_or(FavoriteServiceError::NotAuthenticated)?;

        let current = self.favorites.favorites_for_user(user).await?;
        let now_favorite = if current.contains(&word) {
            self.favorites.remove_favorite(user, word).await?;
            false
        } else {
            self.favorites
                .add_favorite(user, word, self.clock.now())
                .await?;
            true
        };
        debug!(%word, now_favorite, "toggled favorite");
        Ok(now_favorite)
    }

    /// Whether the word is starred. Anonymous sessions always see `false`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the store cannot be reached.
    pub async fn is_favorite(&self, word: VocabularyId) -> Result<bool, FavoriteServiceError> {
        let Some(user) = self.session.user_id() else {
            return Ok(false);
        };
        Ok(self.favorites.favorites_for_user(user).await?.contains(&word))
    }

    /// The starred words in insertion order. Anonymous sessions get an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the store cannot be reached.
    pub async fn list(&self) -> Result<Vec<VocabularyId>, FavoriteServiceError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        Ok(self.favorites.favorites_for_user(user).await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use korean_core::model::UserId;
    use korean_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service(session: AuthSession) -> FavoriteService {
        FavoriteService::new(fixed_clock(), Arc::new(InMemoryRepository::new()), session)
    }

    #[tokio::test]
    async fn toggle_round_trips() {
        let service = service(AuthSession::SignedIn(UserId::random()));
        let word = VocabularyId::new(3);

        assert!(service.toggle(word).await.unwrap());
        assert!(service.is_favorite(word).await.unwrap());
        assert_eq!(service.list().await.unwrap(), vec![word]);

        assert!(!service.toggle(word).await.unwrap());
        assert!(!service.is_favorite(word).await.unwrap());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_session_reads_empty_and_cannot_toggle() {
        let service = service(AuthSession::Anonymous);
        let word = VocabularyId::new(3);

        assert!(!service.is_favorite(word).await.unwrap());
        assert!(service.list().await.unwrap().is_empty());
        let err = service.toggle(word).await.unwrap_err();
        assert!(matches!(err, FavoriteServiceError::NotAuthenticated));
    }
}
