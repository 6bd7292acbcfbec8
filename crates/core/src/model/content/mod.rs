mod audio;
mod block;

pub use audio::{AudioRef, AudioValidationError};
pub use block::{
    Conjugation, ContentBlock, ConversationTurn, JamoEntry, Phrase, SpeechRegister,
    SyllableEntry, VocabularyEntry,
};
