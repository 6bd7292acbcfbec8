//! End-to-end flow over the in-memory backend: a learner works through the
//! curriculum, unlocks advance lesson by lesson, levels complete in
//! progression order, and a store outage never half-applies a completion.

use std::sync::Arc;

use korean_core::Catalog;
use korean_core::model::{CompletionOutcome, LessonId, LevelId, LevelState, UserId};
use korean_core::time::{fixed_clock, fixed_now};
use services::auth::AuthSession;
use services::progress_service::{DEFAULT_LESSON_SCORE, ProgressService};
use services::quiz_service::QuizService;
use storage::repository::{InMemoryRepository, Storage};

fn build_progress(repo: &InMemoryRepository, user: UserId) -> ProgressService {
    ProgressService::new(
        fixed_clock(),
        Arc::new(Catalog::built_in()),
        Arc::new(repo.clone()),
        AuthSession::SignedIn(user),
    )
}

#[tokio::test]
async fn learner_walks_the_whole_curriculum() {
    let repo = InMemoryRepository::new();
    let user = UserId::random();
    let service = build_progress(&repo, user);
    let catalog = Catalog::built_in();

    let mut completed = 0usize;
    for level in catalog.levels() {
        // Entering a new level: its first lesson must already be unlocked.
        let first = catalog.lessons_for_level(level.id())[0];
        assert!(service.is_lesson_unlocked(first.id()).unwrap());

        for lesson in catalog.lessons_for_level(level.id()) {
            let receipt = service
                .complete_lesson(lesson.id(), DEFAULT_LESSON_SCORE)
                .await
                .unwrap();
            completed += 1;
            assert!(matches!(receipt.outcome, CompletionOutcome::Recorded { .. }));
        }

        let row = service.level_progress(level.id()).unwrap();
        assert_eq!(row.state(), LevelState::Completed);
        assert_eq!(row.level_completed_at(), Some(fixed_now()));
    }

    assert_eq!(completed, catalog.all_lessons().len());
    assert_eq!(service.total_score(), 100 * completed as u64);

    // Terminal state: everything done, last level with no lesson.
    let resume = service.resume_point();
    assert_eq!(resume.level.id(), catalog.last_level().id());
    assert!(resume.lesson.is_none());
}

#[tokio::test]
async fn completion_drives_the_unlock_chain() {
    let repo = InMemoryRepository::new();
    let service = build_progress(&repo, UserId::random());

    // Hangeul level: [1, 2, 3]. Only lesson 1 is open at first.
    let statuses = service.lessons_for_level(LevelId::new(6));
    assert_eq!(
        statuses.iter().map(|s| s.is_unlocked).collect::<Vec<_>>(),
        vec![true, false, false]
    );

    service
        .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
        .await
        .unwrap();

    let statuses = service.lessons_for_level(LevelId::new(6));
    assert_eq!(
        statuses.iter().map(|s| s.is_unlocked).collect::<Vec<_>>(),
        vec![true, true, false]
    );
    assert_eq!(
        statuses.iter().map(|s| s.is_completed).collect::<Vec<_>>(),
        vec![true, false, false]
    );

    let resume = service.resume_point();
    assert_eq!(resume.level.id(), LevelId::new(6));
    assert_eq!(resume.lesson.map(|l| l.id()), Some(LessonId::new(2)));
}

#[tokio::test]
async fn a_second_service_instance_sees_persisted_progress() {
    let repo = InMemoryRepository::new();
    let user = UserId::random();

    let first = build_progress(&repo, user);
    first
        .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
        .await
        .unwrap();

    // A fresh instance (new session, same learner) starts empty until it
    // refreshes from the store.
    let second = build_progress(&repo, user);
    assert!(!second.is_lesson_completed(LessonId::new(1)));
    second.refresh().await.unwrap();
    assert!(second.is_lesson_completed(LessonId::new(1)));
}

#[tokio::test]
async fn outage_mid_curriculum_is_recoverable() {
    let repo = InMemoryRepository::new();
    let user = UserId::random();
    let service = build_progress(&repo, user);

    service
        .complete_lesson(LessonId::new(1), DEFAULT_LESSON_SCORE)
        .await
        .unwrap();

    repo.set_offline(true);
    assert!(
        service
            .complete_lesson(LessonId::new(2), DEFAULT_LESSON_SCORE)
            .await
            .is_err()
    );
    // The failed call changed nothing.
    assert!(!service.is_lesson_completed(LessonId::new(2)));
    assert_eq!(service.total_score(), 100);

    // The caller retries once the store is back.
    repo.set_offline(false);
    let receipt = service
        .complete_lesson(LessonId::new(2), DEFAULT_LESSON_SCORE)
        .await
        .unwrap();
    assert!(matches!(receipt.outcome, CompletionOutcome::Recorded { .. }));
    assert_eq!(service.total_score(), 200);
}

#[tokio::test]
async fn quiz_attempts_accumulate_alongside_progress() {
    let storage = Storage::in_memory();
    let user = UserId::random();
    let session = AuthSession::SignedIn(user);
    let catalog = Arc::new(Catalog::built_in());

    let quizzes = QuizService::new(
        fixed_clock(),
        Arc::clone(&catalog),
        Arc::clone(&storage.quiz_attempts),
        session,
    );

    let questions = catalog.quiz_bank().to_vec();
    let all_right: Vec<Option<usize>> =
        questions.iter().map(|q| Some(q.correct_index())).collect();
    let all_wrong: Vec<Option<usize>> = questions.iter().map(|_| None).collect();

    quizzes.submit(&questions, &all_wrong).await.unwrap();
    let best = quizzes.submit(&questions, &all_right).await.unwrap();
    assert_eq!(best.graded.score, best.graded.total_questions);

    let history = quizzes.history().await.unwrap();
    assert_eq!(history.len(), 2);
}
