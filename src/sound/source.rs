//! Alert sound sources.
//!
//! The warning either plays a user-supplied audio file or a generated tone,
//! so the timer works without shipping any audio assets.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Default alarm pitch in hertz.
pub const DEFAULT_TONE_HZ: u32 = 880;

/// Default alarm length in milliseconds.
pub const DEFAULT_TONE_MS: u64 = 1200;

/// Extensions rodio's default decoders (wav, mp3, flac, vorbis) can play.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Display name (the file stem).
        name: String,
        /// Full path to the file.
        path: PathBuf,
    },
    /// A generated sine tone.
    Tone {
        /// Display name.
        name: String,
        /// Pitch in hertz.
        frequency_hz: u32,
        /// Length in milliseconds.
        duration_ms: u64,
    },
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::tone("alarm", DEFAULT_TONE_HZ, DEFAULT_TONE_MS)
    }
}

impl SoundSource {
    /// Creates a file source without checking the path.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a file source after checking that the file exists and has a
    /// supported extension.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::FileNotFound` for a missing file and
    /// `SoundError::UnsupportedFormat` for an unknown extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SoundError> {
        let path = path.as_ref();

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(SoundError::UnsupportedFormat(path.display().to_string()));
        }
        if !path.is_file() {
            return Err(SoundError::FileNotFound(path.display().to_string()));
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "alarm".to_string());
        Ok(Self::file(name, path))
    }

    /// Creates a tone source.
    #[must_use]
    pub fn tone(name: impl Into<String>, frequency_hz: u32, duration_ms: u64) -> Self {
        Self::Tone {
            name: name.into(),
            frequency_hz,
            duration_ms,
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Tone { name, .. } => name,
        }
    }

    /// Returns true if this is a file source.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns true if this is a generated tone.
    #[must_use]
    pub fn is_tone(&self) -> bool {
        matches!(self, Self::Tone { .. })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }
}
