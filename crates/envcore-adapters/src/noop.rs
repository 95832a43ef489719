// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op port implementations, for hosts or deployments that don't wire up
//! a real status bar, scheduler, daemon, or prompt surface.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::ports::{
    BackgroundOperationManager, ConfigPort, DaemonControlError, DaemonController,
    HostStorageProvider, PromptChoice, PromptPort, StatusSink, StatusTransition,
};
use envcore::SessionId;

/// Status sink that discards every transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStatusSink;

impl StatusSink for NoOpStatusSink {
    fn transition(&self, _state: StatusTransition) {}
}

/// Background operation manager for hosts with no scheduler to pause —
/// quiescence is reported immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpBackgroundOperationManager;

#[async_trait]
impl BackgroundOperationManager for NoOpBackgroundOperationManager {
    async fn pause(&self, _timeout: Duration) -> bool {
        true
    }

    async fn resume(&self) {}
}

/// Daemon controller for hosts with no daemon process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDaemonController;

#[async_trait]
impl DaemonController for NoOpDaemonController {
    async fn stop(&self) -> Result<(), DaemonControlError> {
        Ok(())
    }
}

/// Storage provider that generates a fresh session id and reports the
/// process's own pid. Useful for CLI contexts where there is no host
/// extension to ask.
pub struct ProcessHostStorageProvider {
    session_id: SessionId,
    extension_version: String,
    global_storage_dir: PathBuf,
}

impl ProcessHostStorageProvider {
    pub fn new(extension_version: impl Into<String>, global_storage_dir: PathBuf) -> Self {
        Self {
            session_id: SessionId::new(uuid::Uuid::new_v4().to_string()),
            extension_version: extension_version.into(),
            global_storage_dir,
        }
    }
}

impl HostStorageProvider for ProcessHostStorageProvider {
    fn session_id(&self) -> SessionId {
        self.session_id.clone()
    }

    fn process_id(&self) -> u32 {
        std::process::id()
    }

    fn extension_version(&self) -> String {
        self.extension_version.clone()
    }

    fn global_storage_dir(&self) -> PathBuf {
        self.global_storage_dir.clone()
    }
}

/// Prompt port for non-interactive hosts: always proceeds with backup
/// (the safe choice) and logs info messages via `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPromptPort;

#[async_trait]
impl PromptPort for NoOpPromptPort {
    async fn warn_modal(&self, message: &str) -> PromptChoice {
        tracing::warn!(message, "modal warning shown with no interactive host");
        PromptChoice::ProceedWithBackup
    }

    fn info(&self, message: &str) {
        tracing::info!(message);
    }
}

/// Config port backed by fixed defaults — no interpreter override, debug
/// logging off, default pause timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpConfigPort;

impl ConfigPort for NoOpConfigPort {
    fn interpreter_path(&self) -> Option<String> {
        None
    }

    fn debug_logging(&self) -> bool {
        false
    }

    fn background_pause_timeout_ms(&self) -> Option<u64> {
        None
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
