use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem or terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid starting path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid name entered for a new file or directory.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Unusable configuration value.
    #[error("Config error: {0}")]
    Config(String),
}
