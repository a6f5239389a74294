// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Core error types
//!
//! Absent entities, rename conflicts and no-op requests are outcomes, not
//! errors. Only contract violations and collaborator failures end up here.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The caller sent an analysis action outside `start`/`stop`
    #[error("Unsupported branch analysis action: {0:?}")]
    UnsupportedAction(String),

    /// An effect referenced a branch the planned repository no longer has
    #[error("Branch '{0}' is missing from the repository being updated")]
    MissingBranch(String),

    /// Persistence, propagation, analysis and other collaborator failures
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl CoreError {
    /// Contract violations abort the request instead of producing a result
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::UnsupportedAction(_) | CoreError::MissingBranch(_))
    }
}
