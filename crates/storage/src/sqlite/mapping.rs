use korean_core::model::{LessonId, LevelId, QuizAnswer, UserId, VocabularyId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{ProgressRecord, QuizAttemptRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn level_id_from_i64(v: i64) -> Result<LevelId, StorageError> {
    Ok(LevelId::new(i64_to_u64("level_id", v)?))
}

pub(crate) fn lesson_id_from_i64(v: i64) -> Result<LessonId, StorageError> {
    Ok(LessonId::new(i64_to_u64("lesson_id", v)?))
}

pub(crate) fn vocabulary_id_from_i64(v: i64) -> Result<VocabularyId, StorageError> {
    Ok(VocabularyId::new(i64_to_u64("vocabulary_id", v)?))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn user_id_from_str(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>().map_err(ser)
}

/// Encodes the completed set as a JSON array of lesson ids, matching the
/// array column the hosted table used.
pub(crate) fn completed_lessons_to_json(lessons: &[LessonId]) -> Result<String, StorageError> {
    serde_json::to_string(lessons).map_err(ser)
}

pub(crate) fn completed_lessons_from_json(raw: &str) -> Result<Vec<LessonId>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn answers_to_json(answers: &[QuizAnswer]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn answers_from_json(raw: &str) -> Result<Vec<QuizAnswer>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let completed_raw: String = row.try_get("completed_lessons").map_err(ser)?;
    let current_lesson_id = row
        .try_get::<Option<i64>, _>("current_lesson_id")
        .map_err(ser)?
        .map(lesson_id_from_i64)
        .transpose()?;

    let total_score_i64: i64 = row.try_get("total_score").map_err(ser)?;
    let total_score = u32::try_from(total_score_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid total_score: {total_score_i64}"))
    })?;

    Ok(ProgressRecord {
        user_id: user_id_from_str(row.try_get::<String, _>("user_id").map_err(ser)?.as_str())?,
        level_id: level_id_from_i64(row.try_get::<i64, _>("level_id").map_err(ser)?)?,
        completed_lessons: completed_lessons_from_json(&completed_raw)?,
        current_lesson_id,
        total_score,
        level_completed_at: row.try_get("level_completed_at").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_attempt_row(row: &SqliteRow) -> Result<QuizAttemptRecord, StorageError> {
    let answers_raw: String = row.try_get("answers").map_err(ser)?;

    let score_i64: i64 = row.try_get("score").map_err(ser)?;
    let score = u32::try_from(score_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid score: {score_i64}")))?;
    let total_i64: i64 = row.try_get("total_questions").map_err(ser)?;
    let total_questions = u32::try_from(total_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid total_questions: {total_i64}"))
    })?;

    Ok(QuizAttemptRecord {
        id: Some(row.try_get("id").map_err(ser)?),
        user_id: user_id_from_str(row.try_get::<String, _>("user_id").map_err(ser)?.as_str())?,
        score,
        total_questions,
        answers: answers_from_json(&answers_raw)?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}
