//! Error types for port operations.

/// User directory lookup errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// Directory backend could not be read.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// Directory data could not be parsed.
    #[error("Directory data invalid: {0}")]
    Invalid(String),
}

impl DirectoryError {
    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable(message.to_string())
    }

    pub fn invalid(message: impl ToString) -> Self {
        Self::Invalid(message.to_string())
    }
}
