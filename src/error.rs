use thiserror::Error;

/// Errors reported by the sorter, the BWT codec, the MTF coder and the framing layer.
#[derive(Error, Debug)]
pub enum BwtError {
    /// Empty or oversized block, out-of-range key, rank outside [0, 256), truncated framing.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Caller supplied a key/last-column pair whose lengths disagree.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// Propagated I/O error from the stream entry points.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BwtError>;
