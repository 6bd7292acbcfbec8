use serde::{Deserialize, Serialize};

use super::audio::AudioRef;

//
// ─── ENTRY TYPES ───────────────────────────────────────────────────────────────
//

/// A single consonant or vowel with its sound and an example word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JamoEntry {
    pub character: String,
    pub sound: String,
    pub example_word: String,
}

/// A composed syllable with the jamo it is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllableEntry {
    pub syllable: String,
    pub components: String,
    pub meaning: String,
}

/// A vocabulary item; bundled lessons may attach a pronunciation clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub korean: String,
    pub romanization: String,
    pub english: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl VocabularyEntry {
    /// Resolves the attached clip name into a validated audio reference.
    ///
    /// # Errors
    ///
    /// Returns `AudioValidationError` if the clip name is empty.
    pub fn audio_ref(&self) -> Result<Option<AudioRef>, super::audio::AudioValidationError> {
        self.audio.as_deref().map(AudioRef::from_file).transpose()
    }
}

/// A Korean phrase with romanization and translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub korean: String,
    pub romanization: String,
    pub english: String,
}

/// One line of a scripted dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: String,
    pub korean: String,
    pub romanization: String,
    pub english: String,
}

/// Politeness register of a conjugated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechRegister {
    Formal,
    Polite,
    Casual,
}

/// A conjugation of the pattern in one politeness register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conjugation {
    pub register: SpeechRegister,
    pub form: String,
}

//
// ─── CONTENT BLOCK ─────────────────────────────────────────────────────────────
//

/// One block of lesson content.
///
/// The catalog carries a small closed set of shapes, so the payload is a
/// tagged enum rather than free-form JSON. The progress engine treats blocks
/// as opaque; only presentation walks into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Table of consonants or vowels with sounds and example words.
    JamoTable {
        title: String,
        intro: String,
        entries: Vec<JamoEntry>,
    },
    /// Practice rows for combining jamo into syllables.
    SyllableDrill {
        title: String,
        intro: String,
        entries: Vec<SyllableEntry>,
    },
    /// Word list with romanization, translation, and optional audio.
    VocabularyList {
        title: String,
        intro: String,
        entries: Vec<VocabularyEntry>,
    },
    /// A grammar pattern with example sentences and conjugations.
    GrammarPattern {
        title: String,
        intro: String,
        pattern: String,
        examples: Vec<Phrase>,
        conjugations: Vec<Conjugation>,
    },
    /// A scripted dialogue.
    Conversation {
        title: String,
        intro: String,
        turns: Vec<ConversationTurn>,
    },
    /// Set phrases for a situation (e.g. business Korean).
    Expressions {
        title: String,
        intro: String,
        entries: Vec<Phrase>,
    },
}

impl ContentBlock {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            ContentBlock::JamoTable { title, .. }
            | ContentBlock::SyllableDrill { title, .. }
            | ContentBlock::VocabularyList { title, .. }
            | ContentBlock::GrammarPattern { title, .. }
            | ContentBlock::Conversation { title, .. }
            | ContentBlock::Expressions { title, .. } => title,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
