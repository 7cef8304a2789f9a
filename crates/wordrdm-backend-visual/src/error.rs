//! Error types for the visual backend.

use thiserror::Error;
use wordrdm_spec::RdmError;

/// Result type for visual operations.
pub type VisualResult<T> = Result<T, VisualError>;

/// Errors from rendering or mask export.
#[derive(Debug, Error)]
pub enum VisualError {
    /// Rendering failed (unsupported character, bad canvas).
    #[error(transparent)]
    Render(#[from] RdmError),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisualError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            VisualError::Render(err) => err.code().code(),
            VisualError::Encoding(_) => "VISUAL_001",
            VisualError::Io(_) => "VISUAL_002",
        }
    }
}
