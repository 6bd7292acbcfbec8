use thiserror::Error;

use crate::model::ids::LevelId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level name cannot be empty")]
    EmptyName,

    #[error("level order must be >= 1")]
    InvalidOrder,
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// A named stage of the curriculum containing an ordered set of lessons.
///
/// `level_order` determines progression across levels. Ids are stable but
/// carry no ordering meaning; the shipped catalog inherits ids from the
/// hosted table, where the first stage happens to have the highest id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    level_order: u32,
    level_name: String,
    description: String,
    color: String,
}

impl Level {
    /// Creates a new Level.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::EmptyName` if the name is empty or whitespace,
    /// or `LevelError::InvalidOrder` if `level_order` is zero.
    pub fn new(
        id: LevelId,
        level_order: u32,
        level_name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, LevelError> {
        let level_name = level_name.into();
        if level_name.trim().is_empty() {
            return Err(LevelError::EmptyName);
        }
        if level_order == 0 {
            return Err(LevelError::InvalidOrder);
        }

        Ok(Self {
            id,
            level_order,
            level_name: level_name.trim().to_owned(),
            description: description.into(),
            color: color.into(),
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn level_order(&self) -> u32 {
        self.level_order
    }

    #[must_use]
    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Presentation hint only; never feeds progression logic.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_new_rejects_empty_name() {
        let err = Level::new(LevelId::new(1), 1, "  ", "desc", "bg-green-500").unwrap_err();
        assert_eq!(err, LevelError::EmptyName);
    }

    #[test]
    fn level_new_rejects_zero_order() {
        let err = Level::new(LevelId::new(1), 0, "Beginner", "desc", "bg-green-500").unwrap_err();
        assert_eq!(err, LevelError::InvalidOrder);
    }

    #[test]
    fn level_new_trims_name() {
        let level =
            Level::new(LevelId::new(6), 1, "  Hangeul  ", "Hangeul basics", "bg-blue-500")
                .unwrap();
        assert_eq!(level.level_name(), "Hangeul");
        assert_eq!(level.level_order(), 1);
    }
}
