use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioValidationError {
    #[error("Audio reference cannot be empty.")]
    EmptyAudioRef,

    #[error("Audio URL is not valid.")]
    InvalidAudioUrl,
}

//
// ─── AUDIO REFERENCE ───────────────────────────────────────────────────────────
//

/// Reference to a pronunciation clip attached to catalog content.
///
/// Catalog data ships file names for bundled clips; remote clips use a full
/// URL. Playback itself is outside the domain layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioRef {
    FilePath(PathBuf),
    Url(Url),
}

impl AudioRef {
    /// Builds a reference to a bundled audio file.
    ///
    /// # Errors
    ///
    /// Returns `AudioValidationError::EmptyAudioRef` for an empty path.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, AudioValidationError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(AudioValidationError::EmptyAudioRef);
        }
        Ok(AudioRef::FilePath(p))
    }

    /// Builds a reference to a remote audio clip.
    ///
    /// # Errors
    ///
    /// Returns `AudioValidationError` when the URL is empty or unparseable.
    pub fn from_url(url: impl AsRef<str>) -> Result<Self, AudioValidationError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(AudioValidationError::EmptyAudioRef);
        }
        let u = Url::parse(s).map_err(|_| AudioValidationError::InvalidAudioUrl)?;
        Ok(AudioRef::Url(u))
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            AudioRef::FilePath(p) => Some(p.as_path()),
            AudioRef::Url(_) => None,
        }
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            AudioRef::Url(u) => Some(u),
            AudioRef::FilePath(_) => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ref_rejects_empty_path() {
        let err = AudioRef::from_file("").unwrap_err();
        assert_eq!(err, AudioValidationError::EmptyAudioRef);
    }

    #[test]
    fn file_ref_accepts_clip_name() {
        let audio = AudioRef::from_file("annyeonghaseyo.mp3").unwrap();
        assert_eq!(
            audio.as_path(),
            Some(Path::new("annyeonghaseyo.mp3"))
        );
        assert!(audio.as_url().is_none());
    }

    #[test]
    fn url_ref_rejects_garbage() {
        let err = AudioRef::from_url("not a url").unwrap_err();
        assert_eq!(err, AudioValidationError::InvalidAudioUrl);
    }

    #[test]
    fn url_ref_accepts_https() {
        let audio = AudioRef::from_url("https://cdn.example.com/audio/ne.mp3").unwrap();
        assert!(audio.as_url().is_some());
    }
}
