//! Engine error kinds.
//!
//! ## Validation
//!
//! A rejected input: insufficient resources, wrong turn, a continuation that
//! does not match the pending decision, a selection outside its bounds. The
//! caller's state is never touched and the caller may retry.
//!
//! ## Invariant
//!
//! A programmer error or corrupted data: catalog lookup miss, an unreachable
//! branch, a snapshot that does not decode. Never retried.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type GameResult<T> = Result<T, GameError>;

/// The two error kinds the engine can produce.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Input rejected by a legality check.
    #[error("{0}")]
    Validation(String),

    /// Internal consistency failure.
    #[error("internal error: {0}")]
    Invariant(String),
}

impl GameError {
    /// Build a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        GameError::Validation(reason.into())
    }

    /// Build an invariant error.
    pub fn invariant(reason: impl Into<String>) -> Self {
        GameError::Invariant(reason.into())
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, GameError::Validation(_))
    }

    #[must_use]
    pub fn is_invariant(&self) -> bool {
        matches!(self, GameError::Invariant(_))
    }

    /// The human-readable reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            GameError::Validation(r) | GameError::Invariant(r) => r,
        }
    }
}

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        GameError::Invariant(format!("corrupted snapshot: {err}"))
    }
}

/// Return early with a validation error when `cond` is false.
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::GameError::validation(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure;
