//! Error types for matrix construction and asset loading.

use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, printed alongside messages so operators can grep logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// R001: Word list is empty
    EmptyWordList,
    /// R002: Word absent from a lookup table or corpus
    LookupMiss,
    /// R003: Asset file missing or unreadable
    AssetLoad,
    /// R004: Audio recording missing
    RecordingMissing,
    /// R005: Study configuration is invalid
    InvalidConfig,
    /// R006: Malformed delimited text
    Parse,
    /// R007: I/O failure
    Io,
    /// R008: Vectors or matrices of incompatible shape
    DimensionMismatch,
    /// R009: Nothing to aggregate
    NoMatrices,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "R001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::EmptyWordList => "R001",
            ErrorCode::LookupMiss => "R002",
            ErrorCode::AssetLoad => "R003",
            ErrorCode::RecordingMissing => "R004",
            ErrorCode::InvalidConfig => "R005",
            ErrorCode::Parse => "R006",
            ErrorCode::Io => "R007",
            ErrorCode::DimensionMismatch => "R008",
            ErrorCode::NoMatrices => "R009",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The main error type for RDM construction.
#[derive(Debug, Error)]
pub enum RdmError {
    /// A matrix over zero words is undefined.
    #[error("word list is empty")]
    EmptyWordList,

    /// A word was not found in a lookup required by a channel.
    #[error("{channel}: word '{word}' not found in {source_name}")]
    LookupMiss {
        /// Channel that performed the lookup.
        channel: String,
        /// The missing word.
        word: String,
        /// Human-readable name of the lookup (corpus, table, model).
        source_name: String,
    },

    /// An asset could not be loaded.
    #[error("failed to load asset '{}': {message}", path.display())]
    AssetLoad {
        /// Path of the asset.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A recording required by the acoustic channel does not exist.
    #[error("recording not found: {}", path.display())]
    RecordingMissing {
        /// Expected recording path.
        path: PathBuf,
    },

    /// The study configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed delimited text.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vectors or matrices of incompatible shape.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Actual size.
        found: usize,
    },

    /// An aggregate was requested over zero matrices.
    #[error("no matrices to aggregate")]
    NoMatrices,
}

impl RdmError {
    /// Returns the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RdmError::EmptyWordList => ErrorCode::EmptyWordList,
            RdmError::LookupMiss { .. } => ErrorCode::LookupMiss,
            RdmError::AssetLoad { .. } => ErrorCode::AssetLoad,
            RdmError::RecordingMissing { .. } => ErrorCode::RecordingMissing,
            RdmError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            RdmError::Parse { .. } => ErrorCode::Parse,
            RdmError::Io(_) => ErrorCode::Io,
            RdmError::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            RdmError::NoMatrices => ErrorCode::NoMatrices,
        }
    }

    /// Convenience constructor for lookup misses.
    pub fn lookup_miss(
        channel: impl Into<String>,
        word: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        RdmError::LookupMiss {
            channel: channel.into(),
            word: word.into(),
            source_name: source_name.into(),
        }
    }

    /// Convenience constructor for asset load failures.
    pub fn asset_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RdmError::AssetLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for RDM operations.
pub type RdmResult<T> = Result<T, RdmError>;
