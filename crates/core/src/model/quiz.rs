use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuizQuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz question text cannot be empty")]
    EmptyQuestion,

    #[error("quiz question needs at least 2 options")]
    NotEnoughOptions,

    #[error("correct answer index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange { index: usize, options: usize },

    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// What a quiz question tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKind {
    Hangeul,
    Vocabulary,
    Pronunciation,
}

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    id: QuizQuestionId,
    kind: QuizKind,
    question: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: Option<String>,
    korean: Option<String>,
    romanization: Option<String>,
}

impl QuizQuestion {
    /// Creates a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` for empty text, fewer than two options, or a
    /// correct index outside the option list.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuizQuestionId,
        kind: QuizKind,
        question: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: Option<String>,
        korean: Option<String>,
        romanization: Option<String>,
    ) -> Result<Self, QuizError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuizError::EmptyQuestion);
        }
        if options.len() < 2 {
            return Err(QuizError::NotEnoughOptions);
        }
        if correct_index >= options.len() {
            return Err(QuizError::CorrectIndexOutOfRange {
                index: correct_index,
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            kind,
            question: question.trim().to_owned(),
            options,
            correct_index,
            explanation,
            korean,
            romanization,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuizQuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn korean(&self) -> Option<&str> {
        self.korean.as_deref()
    }

    #[must_use]
    pub fn romanization(&self) -> Option<&str> {
        self.romanization.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// One graded answer, persisted alongside the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: QuizQuestionId,
    /// Index the learner picked; `None` when the question timed out.
    pub selected: Option<u32>,
    pub correct: bool,
}

/// Outcome of grading a full question set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedQuiz {
    pub answers: Vec<QuizAnswer>,
    pub score: u32,
    pub total_questions: u32,
}

/// Grades a set of selections against the question list, position by
/// position. Unanswered questions count as wrong.
///
/// # Errors
///
/// Returns `QuizError::AnswerCountMismatch` when the selection list does not
/// line up with the questions.
pub fn grade_quiz(
    questions: &[QuizQuestion],
    selections: &[Option<usize>],
) -> Result<GradedQuiz, QuizError> {
    if questions.len() != selections.len() {
        return Err(QuizError::AnswerCountMismatch {
            expected: questions.len(),
            actual: selections.len(),
        });
    }

    let mut answers = Vec::with_capacity(questions.len());
    let mut score = 0u32;
    for (question, selection) in questions.iter().zip(selections) {
        let correct = selection.is_some_and(|s| question.is_correct(s));
        if correct {
            score += 1;
        }
        answers.push(QuizAnswer {
            question_id: question.id(),
            selected: selection.and_then(|s| u32::try_from(s).ok()),
            correct,
        });
    }

    Ok(GradedQuiz {
        answers,
        score,
        total_questions: u32::try_from(questions.len()).unwrap_or(u32::MAX),
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
