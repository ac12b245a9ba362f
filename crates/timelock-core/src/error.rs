use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelockError {
    #[error("Prime generation failed: {0}")]
    Generation(String),

    #[error("Invalid puzzle: {0}")]
    InvalidPuzzle(String),

    #[error("Value out of range: {0}")]
    Range(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Puzzle solving was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, TimelockError>;
