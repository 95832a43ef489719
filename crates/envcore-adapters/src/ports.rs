// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host collaborator ports. Every way this core touches the surrounding
//! editor extension — status UI, background job scheduling, the daemon
//! process, on-disk global storage, and the human-facing modal/info
//! surfaces — is abstracted behind a trait here so the engine crate never
//! depends on a concrete host.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use envcore::SessionId;

/// States the status sink can be told to transition to (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTransition {
    Initializing,
    Ready,
    UpdateRequired,
    Error { message: String },
}

/// Accepts status-bar state transitions. Implementations never block the
/// caller on host UI work beyond enqueuing it.
pub trait StatusSink: Send + Sync {
    fn transition(&self, state: StatusTransition);
}

/// Pauses and resumes whatever background job scheduler the host runs
/// during a destructive migration (§4.8.2).
#[async_trait]
pub trait BackgroundOperationManager: Send + Sync {
    /// Request a pause, waiting up to `timeout` for in-flight operations to
    /// quiesce. Returns `true` if quiescence was reached within budget.
    async fn pause(&self, timeout: Duration) -> bool;

    /// Resume background operations after migration completes or aborts.
    async fn resume(&self);
}

/// Errors from daemon control operations.
#[derive(Debug, thiserror::Error)]
pub enum DaemonControlError {
    #[error("daemon stop failed: {0}")]
    StopFailed(String),
}

/// Controls the long-running daemon process that may hold the legacy
/// environment open (§4.8.2).
#[async_trait]
pub trait DaemonController: Send + Sync {
    /// Ask the daemon to stop. Callers are responsible for bounding this
    /// with their own timeout; this trait makes no promise about how long
    /// a graceful stop takes.
    async fn stop(&self) -> Result<(), DaemonControlError>;
}

/// Host-provided identity and storage facts this core cannot derive on its
/// own (§4.1, §4.3).
pub trait HostStorageProvider: Send + Sync {
    fn session_id(&self) -> SessionId;
    fn process_id(&self) -> u32;
    fn extension_version(&self) -> String;
    /// Stable per-install directory used for the audit log and anything
    /// else that must outlive a single workspace.
    fn global_storage_dir(&self) -> PathBuf;
}

/// A user's response to a two-choice modal warning (§4.8.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    ProceedWithBackup,
    Ignore,
}

/// Human-facing messaging surfaces: modal warnings and fire-and-forget
/// information messages. Progress reporting is intentionally not part of
/// this port — it is folded into `StatusSink` transitions.
#[async_trait]
pub trait PromptPort: Send + Sync {
    /// Shows a modal with "Proceed with Backup" / "Ignore" choices.
    async fn warn_modal(&self, message: &str) -> PromptChoice;

    /// Shows a non-blocking informational message.
    fn info(&self, message: &str);
}

/// Host-sourced configuration values (§4.9).
pub trait ConfigPort: Send + Sync {
    /// Explicit interpreter path override, if the user set one.
    fn interpreter_path(&self) -> Option<String>;

    /// Whether verbose/debug logging is enabled.
    fn debug_logging(&self) -> bool;

    /// Host-configured override for the background pause budget.
    fn background_pause_timeout_ms(&self) -> Option<u64>;
}

#[cfg(test)]
#[path = "ports_tests.rs"]
mod tests;
