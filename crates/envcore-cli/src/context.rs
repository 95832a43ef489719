// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the engine's ports to real or no-op adapters for a standalone CLI
//! invocation: there is no hosting editor extension to supply a status bar,
//! scheduler, or settings store.

use anyhow::{Context as _, Result};
use envcore_adapters::{
    ConfigPort, NoOpBackgroundOperationManager, NoOpDaemonController, NoOpPromptPort,
    NoOpStatusSink, ProcessHostStorageProvider,
};
use envcore_engine::PreflightVerifier;
use envcore_storage::{AuditLog, MetadataStore};
use std::path::PathBuf;
use std::time::Duration;

/// Config port backed by CLI flags, standing in for a host's settings store.
pub struct CliConfigPort {
    interpreter_path: Option<String>,
    debug_logging: bool,
    background_pause_timeout_ms: Option<u64>,
}

impl ConfigPort for CliConfigPort {
    fn interpreter_path(&self) -> Option<String> {
        self.interpreter_path.clone()
    }

    fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    fn background_pause_timeout_ms(&self) -> Option<u64> {
        self.background_pause_timeout_ms
    }
}

/// Everything a subcommand needs: resolved paths and the engine's
/// collaborators, all non-interactive stand-ins for a real host.
pub struct Context {
    pub store: MetadataStore,
    pub audit: AuditLog,
    pub config: CliConfigPort,
    pub host: ProcessHostStorageProvider,
    pub background: NoOpBackgroundOperationManager,
    pub daemon: NoOpDaemonController,
    pub prompt: NoOpPromptPort,
    pub status: NoOpStatusSink,
    pub preflight: PreflightVerifier,
}

impl Context {
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        workspace: Option<PathBuf>,
        global_storage: Option<PathBuf>,
        interpreter: Option<String>,
        debug_logging: bool,
        background_pause_timeout_ms: Option<u64>,
    ) -> Result<Self> {
        let workspace = match workspace {
            Some(dir) => dir,
            None => std::env::current_dir().context("resolving current directory")?,
        };
        let global_storage = global_storage.unwrap_or_else(default_global_storage_dir);

        let store = MetadataStore::new(&workspace);
        let audit = AuditLog::new(&global_storage, &workspace);
        let config = CliConfigPort {
            interpreter_path: interpreter,
            debug_logging,
            background_pause_timeout_ms,
        };
        let host = ProcessHostStorageProvider::new(env!("CARGO_PKG_VERSION"), global_storage);
        let preflight = PreflightVerifier::new(
            envcore_adapters::env::preflight_timeout_ms(),
            envcore_engine::env::preflight_cache_ttl(),
        );

        Ok(Self {
            store,
            audit,
            config,
            host,
            background: NoOpBackgroundOperationManager,
            daemon: NoOpDaemonController,
            prompt: NoOpPromptPort,
            status: NoOpStatusSink,
            preflight,
        })
    }

    /// Host-configured override (§6 `backgroundPauseTimeoutMs`) takes
    /// precedence over the environment-variable-tunable default.
    pub fn background_pause_timeout(&self) -> Duration {
        match self.config.background_pause_timeout_ms() {
            Some(ms) => Duration::from_millis(ms),
            None => envcore_adapters::env::background_pause_timeout_ms(),
        }
    }

    pub fn daemon_stop_timeout(&self) -> Duration {
        envcore_adapters::env::daemon_stop_timeout_ms()
    }

    pub fn windows_settle(&self) -> Duration {
        envcore_adapters::env::windows_settle_ms()
    }
}

fn default_global_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("envcore")
}
