use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::debug;

use korean_core::model::{GradedQuiz, QuizQuestion, grade_quiz};
use korean_core::{Catalog, Clock};
use storage::repository::{QuizAttemptRecord, QuizAttemptRepository};

use crate::auth::AuthSession;
use crate::error::QuizServiceError;

/// A graded, persisted quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedQuiz {
    pub attempt_id: i64,
    pub graded: GradedQuiz,
}

/// Runs practice quizzes over the catalog's question bank and keeps the
/// learner's attempt history.
pub struct QuizService {
    clock: Clock,
    catalog: Arc<Catalog>,
    attempts: Arc<dyn QuizAttemptRepository>,
    session: AuthSession,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        attempts: Arc<dyn QuizAttemptRepository>,
        session: AuthSession,
    ) -> Self {
        Self {
            clock,
            catalog,
            attempts,
            session,
        }
    }

    /// Up to `count` questions from the bank in shuffled order, so repeated
    /// practice runs do not drill the same sequence.
    #[must_use]
    pub fn practice_set(&self, count: usize) -> Vec<&QuizQuestion> {
        let mut questions: Vec<&QuizQuestion> = self.catalog.quiz_bank().iter().collect();
        questions.shuffle(&mut rand::rng());
        questions.truncate(count);
        questions
    }

    /// Grade a finished run and append it to the learner's history.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` for anonymous sessions, `Quiz` when the
    /// selections do not line up with the questions, and `Storage` when the
    /// attempt cannot be persisted.
    pub async fn submit(
        &self,
        questions: &[QuizQuestion],
        selections: &[Option<usize>],
    ) -> Result<SubmittedQuiz, QuizServiceError> {
        let user = self
            .session
            .user_id()
            .ok_or(QuizServiceError::NotAuthenticated)?;

        let graded = grade_quiz(questions, selections)?;
        let attempt = QuizAttemptRecord {
            id: None,
            user_id: user,
            score: graded.score,
            total_questions: graded.total_questions,
            answers: graded.answers.clone(),
            completed_at: self.clock.now(),
        };
        let attempt_id = self.attempts.append_attempt(attempt).await?;
        debug!(attempt_id, score = graded.score, "recorded quiz attempt");

        Ok(SubmittedQuiz { attempt_id, graded })
    }

    /// The learner's attempts, most recent first. Anonymous sessions get an
    /// empty history without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the store cannot be reached.
    pub async fn history(&self) -> Result<Vec<QuizAttemptRecord>, QuizServiceError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        Ok(self.attempts.attempts_for_user(user).await?)
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

    fn service(session: AuthSession) -> QuizService {
        QuizService::new(
            fixed_clock(),
            Arc::new(Catalog::built_in()),
            Arc::new(InMemoryRepository::new()),
            session,
        )
    }

    #[test]
    fn practice_set_is_bounded_by_the_bank() {
        let service = service(AuthSession::SignedIn(UserId::random()));
        let bank_size = service.catalog.quiz_bank().len();

        assert_eq!(service.practice_set(3).len(), 3);
        assert_eq!(service.practice_set(100).len(), bank_size);
        assert!(service.practice_set(0).is_empty());
    }

    #[tokio::test]
    async fn submit_grades_and_persists_the_attempt() {
        let service = service(AuthSession::SignedIn(UserId::random()));
        let questions: Vec<QuizQuestion> = service.catalog.quiz_bank().to_vec();
        let selections: Vec<Option<usize>> = questions
            .iter()
            .map(|q| Some(q.correct_index()))
            .collect();

        let submitted = service.submit(&questions, &selections).await.unwrap();
        assert_eq!(submitted.graded.score, submitted.graded.total_questions);

        let history = service.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, Some(submitted.attempt_id));
        assert_eq!(history[0].score, submitted.graded.score);
    }

    #[tokio::test]
    async fn anonymous_session_cannot_submit_but_sees_empty_history() {
        let service = service(AuthSession::Anonymous);
        let questions: Vec<QuizQuestion> = service.catalog.quiz_bank().to_vec();
        let selections: Vec<Option<usize>> = questions.iter().map(|_| None).collect();

        let err = service.submit(&questions, &selections).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::NotAuthenticated));
        assert!(service.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mismatched_selections_are_rejected() {
        let service = service(AuthSession::SignedIn(UserId::random()));
        let questions: Vec<QuizQuestion> = service.catalog.quiz_bank().to_vec();

        let err = service.submit(&questions, &[Some(0)]).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::Quiz(_)));
    }
}
