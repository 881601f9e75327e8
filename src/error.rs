use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Result alias for errors emitted by pq-outline internals.
pub type OutlineResult<T> = Result<T, OutlineError>;

/// Structured error type for the loading and configuration boundary.
///
/// Formatting and reference extraction never fail; only turning bytes into
/// a document (or reading a config file) can.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("invalid AST JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input is not an AST: {0}")]
    NotATree(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl OutlineError {
    pub fn not_a_tree(msg: impl Into<String>) -> Self {
        Self::NotATree(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Convert to anyhow::Error for interop with anyhow-based code.
    pub fn into_anyhow(self) -> AnyhowError {
        AnyhowError::new(self)
    }
}

impl From<AnyhowError> for OutlineError {
    fn from(err: AnyhowError) -> Self {
        OutlineError::other(err.to_string())
    }
}

/// Convenience macro mirroring `anyhow::bail!` but returning a typed error.
///
/// With a leading `config:` or `not_a_tree:` marker the matching variant is
/// produced; otherwise `OutlineError::Other`.
#[macro_export]
macro_rules! outline_bail {
    (config: $($arg:tt)*) => {
        return Err($crate::error::OutlineError::config(format!($($arg)*)));
    };
    (not_a_tree: $($arg:tt)*) => {
        return Err($crate::error::OutlineError::not_a_tree(format!($($arg)*)));
    };
    ($($arg:tt)*) => {
        return Err($crate::error::OutlineError::other(format!($($arg)*)));
    };
}

/// Convenience macro mirroring `anyhow::ensure!`.
#[macro_export]
macro_rules! outline_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::outline_bail!($($arg)*);
        }
    };
}
