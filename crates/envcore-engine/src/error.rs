// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds for the provisioner and migration engine (§7). Both are
//! terminal — a single user-visible message per failure, never partial
//! progress leaked across a component boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("runtime version {found} is not in the supported range {supported}")]
    RuntimeVersionUnsupported { found: String, supported: String },

    #[error("failed to create virtual environment: {0}")]
    VenvCreationFailed(String),

    #[error("dependency install failed: {0}")]
    DependencyInstallFailed(String),

    #[error("verification failed after install: {0}")]
    VerificationFailed(String),

    #[error("interpreter not runnable: {0}")]
    InterpreterNotRunnable(String),

    #[error("quiescence not reached within budget: {0}")]
    QuiescenceFailed(String),

    #[error("rename failed after retry protocol: {0}")]
    RenameFailed(String),

    #[error(transparent)]
    Metadata(#[from] envcore::ModelError),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("schema marker unreadable for a non-ENOENT reason: {0}")]
    MigrationDetectionIoError(std::io::Error),

    #[error("quiescence not reached within budget: {0}")]
    QuiescenceFailed(String),

    #[error("rename failed after retry protocol: {0}")]
    RenameFailed(String),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
