// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

/// Errors raised by the reward engine, the tracker and their collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Location provider error: {0}")]
    Location(String),

    #[error("Score provider error: {0}")]
    Score(String),

    #[error("Worker pool '{0}' is shut down")]
    PoolClosed(&'static str),

    #[error("Worker pool '{0}' needs at least one worker")]
    InvalidPoolSize(&'static str),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for faults that belong to a single user and must not stop a batch.
    pub fn is_per_user_fault(&self) -> bool {
        matches!(
            self,
            AppError::Location(_) | AppError::Score(_) | AppError::TaskFailed(_)
        )
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_user_faults() {
        assert!(AppError::Location("timeout".to_string()).is_per_user_fault());
        assert!(AppError::Score("unavailable".to_string()).is_per_user_fault());
        assert!(AppError::TaskFailed("panicked".to_string()).is_per_user_fault());
        assert!(!AppError::PoolClosed("rewards").is_per_user_fault());
        assert!(!AppError::InvalidPoolSize("tracking").is_per_user_fault());
    }

    #[test]
    fn test_pool_closed_message() {
        let err = AppError::PoolClosed("tracking");
        assert_eq!(err.to_string(), "Worker pool 'tracking' is shut down");
    }
}
