//! Error types for the acoustic channel.

use std::path::PathBuf;

use thiserror::Error;
use wordrdm_spec::RdmError;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while reading recordings or computing distances.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A WAV file could not be decoded.
    #[error("failed to read '{}': {message}", path.display())]
    Wav {
        /// Recording path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// A recording holds no samples.
    #[error("recording '{}' contains no samples", path.display())]
    EmptyRecording {
        /// Recording path.
        path: PathBuf,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Not a single recording was found for any speaker or session.
    #[error("no recordings found under '{}'", root.display())]
    NoRecordings {
        /// Audio root directory.
        root: PathBuf,
    },

    /// Matrix or word-set error from the core crate.
    #[error(transparent)]
    Rdm(#[from] RdmError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a WAV decoding error.
    pub fn wav(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Wav {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::Wav { .. } => "AUDIO_001",
            AudioError::EmptyRecording { .. } => "AUDIO_002",
            AudioError::InvalidParameter { .. } => "AUDIO_003",
            AudioError::NoRecordings { .. } => "AUDIO_004",
            AudioError::Rdm(err) => err.code().code(),
            AudioError::Io(_) => "AUDIO_005",
        }
    }
}
