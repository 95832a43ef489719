// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment Provisioner (C6): creates and maintains the managed virtual
//! environment, and answers whether its dependency set has drifted.

use envcore::{AuditEvent, EventType, Ownership};
use envcore_adapters::{
    BackgroundOperationManager, ConfigPort, DaemonController, HostStorageProvider, PromptChoice,
    PromptPort, ProcessError, ProcessRunner, RunOptions, StatusSink, StatusTransition,
};
use envcore_storage::{AuditLog, MetadataStore};
use serde_json::json;
use std::time::Duration;

use crate::error::ProvisionError;
use crate::preflight::PreflightVerifier;

/// Lowest and highest supported host runtime minor version, inclusive.
pub const SUPPORTED_RUNTIME_RANGE: &str = "3.10-3.12";

fn parse_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().splitn(3, '.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next()?.parse().ok()?;
    Some((major, minor))
}

fn check_runtime_version(found: &str) -> Result<(), ProvisionError> {
    let (major, minor) = parse_minor(found).ok_or_else(|| ProvisionError::RuntimeVersionUnsupported {
        found: found.to_string(),
        supported: SUPPORTED_RUNTIME_RANGE.to_string(),
    })?;
    let in_range = (major, minor) >= (3, 10) && (major, minor) <= (3, 12);
    if in_range {
        Ok(())
    } else {
        Err(ProvisionError::RuntimeVersionUnsupported {
            found: found.to_string(),
            supported: SUPPORTED_RUNTIME_RANGE.to_string(),
        })
    }
}

/// Canonicalize a dependency set as a sorted, newline-joined byte manifest —
/// the single representation hashed for the dependency-set fingerprint.
pub fn canonical_manifest(packages: &[String]) -> Vec<u8> {
    let mut sorted = packages.to_vec();
    sorted.sort();
    sorted.join("\n").into_bytes()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintStatus {
    Match,
    Mismatch,
    Unknown,
}

/// Host collaborators the provisioner needs beyond storage and the process
/// runner, grouped so call sites don't thread five separate references
/// through every method.
pub struct ProvisionerPorts<'a> {
    pub status: &'a dyn StatusSink,
    pub host: &'a dyn HostStorageProvider,
    pub background: &'a dyn BackgroundOperationManager,
    pub daemon: &'a dyn DaemonController,
    pub prompt: &'a dyn PromptPort,
}

fn audit_event(event_type: EventType, ports: &ProvisionerPorts<'_>, store: &MetadataStore, data: Option<serde_json::Value>) -> AuditEvent {
    AuditEvent {
        event_type,
        timestamp: chrono::Utc::now(),
        session_id: ports.host.session_id().to_string(),
        workspace_path: store.workspace_root().to_string_lossy().into_owned(),
        extension_version: ports.host.extension_version(),
        data,
    }
}

pub struct Provisioner {
    runner: ProcessRunner,
    provision_timeout: Duration,
}

impl Provisioner {
    pub fn new(provision_timeout: Duration) -> Self {
        Self {
            runner: ProcessRunner::new(),
            provision_timeout,
        }
    }

    /// The canonical flow (§4.6): version check, schema marker first, venv
    /// creation, dependency install, verification, then `env.json`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_managed(
        &self,
        store: &MetadataStore,
        config: &dyn ConfigPort,
        audit: &AuditLog,
        preflight: &PreflightVerifier,
        ports: &ProvisionerPorts<'_>,
        base_interpreter: &str,
        runtime_version: &str,
        dependency_packages: &[String],
    ) -> Result<envcore::EnvMetadata, ProvisionError> {
        audit.log(audit_event(EventType::ProvisionStarted, ports, store, None));
        ports.status.transition(StatusTransition::Initializing);

        if let Err(err) = check_runtime_version(runtime_version) {
            self.fail(store, audit, ports, &err);
            return Err(err);
        }

        std::fs::create_dir_all(store.hidden_dir())?;
        store.write_schema_marker(envcore::CURRENT_SCHEMA_VERSION)?;

        if let Err(err) = self.create_venv(base_interpreter, store).await {
            self.rollback_venv(store);
            self.fail(store, audit, ports, &err);
            return Err(err);
        }

        if let Err(err) = self
            .run_pip_install(&store.managed_interpreter_path(), dependency_packages)
            .await
        {
            self.rollback_venv(store);
            self.fail(store, audit, ports, &err);
            return Err(err);
        }

        preflight.invalidate_cache();
        let clock = envcore::SystemClock;
        let result = preflight
            .verify(store, config, &clock, config.debug_logging(), audit, ports.host)
            .await;
        if result.status != envcore::PreflightStatus::Healthy {
            self.rollback_venv(store);
            let err = ProvisionError::VerificationFailed(
                result.error.unwrap_or_else(|| "module not importable after install".to_string()),
            );
            self.fail(store, audit, ports, &err);
            return Err(err);
        }

        let metadata = envcore::EnvMetadata {
            interpreter_path: store.managed_interpreter_path().to_string_lossy().into_owned(),
            ownership: Ownership::Managed,
            dependency_set_fingerprint: envcore::dependency_fingerprint(&canonical_manifest(dependency_packages)),
            created_at: chrono::Utc::now(),
            platform: std::env::consts::OS.to_string(),
        };
        store.write_env_metadata(&metadata)?;

        ports.status.transition(StatusTransition::Ready);
        audit.log(audit_event(EventType::ProvisionCompleted, ports, store, None));
        Ok(metadata)
    }

    /// `initialize()` (§4.6): adopts an externally managed interpreter —
    /// schema marker first, then `env.json` with `ownership = External`, no
    /// venv created and no packages installed. The companion write path to
    /// `create_managed` for the marker-before-metadata invariant (§4.8.4).
    pub async fn initialize(
        &self,
        store: &MetadataStore,
        audit: &AuditLog,
        ports: &ProvisionerPorts<'_>,
        interpreter_path: &str,
        dependency_packages: &[String],
    ) -> Result<envcore::EnvMetadata, ProvisionError> {
        audit.log(audit_event(EventType::ProvisionStarted, ports, store, None));
        ports.status.transition(StatusTransition::Initializing);

        std::fs::create_dir_all(store.hidden_dir())?;
        store.write_schema_marker(envcore::CURRENT_SCHEMA_VERSION)?;

        let metadata = envcore::EnvMetadata {
            interpreter_path: interpreter_path.to_string(),
            ownership: Ownership::External,
            dependency_set_fingerprint: envcore::dependency_fingerprint(&canonical_manifest(dependency_packages)),
            created_at: chrono::Utc::now(),
            platform: std::env::consts::OS.to_string(),
        };
        store.write_env_metadata(&metadata)?;

        ports.status.transition(StatusTransition::Ready);
        audit.log(audit_event(EventType::ProvisionCompleted, ports, store, None));
        Ok(metadata)
    }

    /// `installDependencies()` (§4.6): install a package set into an
    /// already-provisioned interpreter, managed or externally adopted,
    /// without touching the venv directory or `env.json`. Invalidates the
    /// preflight cache so the next `verify()` re-probes against the new
    /// dependency set.
    pub async fn install_dependencies(
        &self,
        store: &MetadataStore,
        audit: &AuditLog,
        preflight: &PreflightVerifier,
        ports: &ProvisionerPorts<'_>,
        interpreter_path: &std::path::Path,
        dependency_packages: &[String],
    ) -> Result<(), ProvisionError> {
        if let Err(err) = self.run_pip_install(interpreter_path, dependency_packages).await {
            self.fail(store, audit, ports, &err);
            return Err(err);
        }
        preflight.invalidate_cache();
        Ok(())
    }

    async fn create_venv(&self, base_interpreter: &str, store: &MetadataStore) -> Result<(), ProvisionError> {
        let venv_dir = store.venv_dir();
        let args = vec!["-m".to_string(), "venv".to_string(), venv_dir.to_string_lossy().into_owned()];
        self.runner
            .run(base_interpreter, &args, store.workspace_root(), RunOptions::new(self.provision_timeout))
            .await
            .map(|_| ())
            .map_err(|err| ProvisionError::VenvCreationFailed(describe_process_error(&err)))
    }

    async fn run_pip_install(&self, interpreter: &std::path::Path, packages: &[String]) -> Result<(), ProvisionError> {
        let mut args = vec!["-m".to_string(), "pip".to_string(), "install".to_string()];
        args.extend(packages.iter().cloned());
        self.runner
            .run(
                &interpreter.to_string_lossy(),
                &args,
                std::path::Path::new("."),
                RunOptions::new(self.provision_timeout),
            )
            .await
            .map(|_| ())
            .map_err(|err| ProvisionError::DependencyInstallFailed(describe_process_error(&err)))
    }

    fn rollback_venv(&self, store: &MetadataStore) {
        let venv_dir = store.venv_dir();
        if venv_dir.exists() {
            if let Err(err) = std::fs::remove_dir_all(&venv_dir) {
                tracing::error!(path = %venv_dir.display(), error = %err, "failed to roll back partial venv");
            }
        }
    }

    fn fail(&self, store: &MetadataStore, audit: &AuditLog, ports: &ProvisionerPorts<'_>, err: &ProvisionError) {
        ports.status.transition(StatusTransition::Error { message: err.to_string() });
        audit.log(audit_event(
            EventType::ProvisionFailed,
            ports,
            store,
            Some(json!({ "errorCode": err.to_string() })),
        ));
    }

    /// `refresh()` (§4.6): quiesce, rename venv to a backup sibling,
    /// recreate and reinstall, verify, then delete the backup — or restore
    /// it on any failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn refresh(
        &self,
        store: &MetadataStore,
        config: &dyn ConfigPort,
        audit: &AuditLog,
        preflight: &PreflightVerifier,
        ports: &ProvisionerPorts<'_>,
        base_interpreter: &str,
        dependency_packages: &[String],
        background_pause_timeout: Duration,
        daemon_stop_timeout: Duration,
        windows_settle: Duration,
    ) -> Result<(), ProvisionError> {
        audit.log(audit_event(EventType::RefreshStarted, ports, store, None));

        if !ports.background.pause(background_pause_timeout).await {
            let choice = ports
                .prompt
                .warn_modal("Background operations are still running. Proceed anyway, or abort the refresh?")
                .await;
            if choice == PromptChoice::Ignore {
                ports.background.resume().await;
                let err = ProvisionError::QuiescenceFailed("background operations did not quiesce".to_string());
                self.fail_refresh(store, audit, ports, &err);
                return Err(err);
            }
        }

        if let Err(stop_err) = tokio::time::timeout(daemon_stop_timeout, ports.daemon.stop()).await.map_err(|_| {
            envcore_adapters::DaemonControlError::StopFailed("daemon stop timed out".to_string())
        }).and_then(|inner| inner) {
            ports.background.resume().await;
            let err = ProvisionError::QuiescenceFailed(stop_err.to_string());
            self.fail_refresh(store, audit, ports, &err);
            return Err(err);
        }

        if cfg!(windows) {
            tokio::time::sleep(windows_settle).await;
        }

        let venv_dir = store.venv_dir();
        let backup_dir = store.hidden_dir().join("venv.backup");
        if let Err(err) = crate::retry::rename_with_retry(&venv_dir, &backup_dir).await {
            ports.background.resume().await;
            let err = ProvisionError::RenameFailed(err.to_string());
            self.fail_refresh(store, audit, ports, &err);
            return Err(err);
        }

        let recreate_result = self
            .recreate_and_verify(store, config, audit, preflight, ports.host, base_interpreter, dependency_packages)
            .await;
        ports.background.resume().await;

        match recreate_result {
            Ok(metadata) => {
                if let Err(err) = std::fs::remove_dir_all(&backup_dir) {
                    tracing::warn!(path = %backup_dir.display(), error = %err, "failed to delete refresh backup");
                }
                store.write_env_metadata(&metadata)?;
                audit.log(audit_event(EventType::RefreshCompleted, ports, store, None));
                Ok(())
            }
            Err(err) => {
                self.rollback_venv(store);
                if let Err(restore_err) = crate::retry::rename_with_retry(&backup_dir, &venv_dir).await {
                    tracing::error!(error = %restore_err, "failed to restore backup venv after failed refresh");
                }
                self.fail_refresh(store, audit, ports, &err);
                Err(err)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn recreate_and_verify(
        &self,
        store: &MetadataStore,
        config: &dyn ConfigPort,
        audit: &AuditLog,
        preflight: &PreflightVerifier,
        host: &dyn HostStorageProvider,
        base_interpreter: &str,
        dependency_packages: &[String],
    ) -> Result<envcore::EnvMetadata, ProvisionError> {
        self.create_venv(base_interpreter, store).await?;
        self.run_pip_install(&store.managed_interpreter_path(), dependency_packages).await?;

        preflight.invalidate_cache();
        let clock = envcore::SystemClock;
        let result = preflight
            .verify(store, config, &clock, config.debug_logging(), audit, host)
            .await;
        if result.status != envcore::PreflightStatus::Healthy {
            return Err(ProvisionError::VerificationFailed(
                result.error.unwrap_or_else(|| "module not importable after refresh".to_string()),
            ));
        }

        Ok(envcore::EnvMetadata {
            interpreter_path: store.managed_interpreter_path().to_string_lossy().into_owned(),
            ownership: Ownership::Managed,
            dependency_set_fingerprint: envcore::dependency_fingerprint(&canonical_manifest(dependency_packages)),
            created_at: chrono::Utc::now(),
            platform: std::env::consts::OS.to_string(),
        })
    }

    fn fail_refresh(&self, store: &MetadataStore, audit: &AuditLog, ports: &ProvisionerPorts<'_>, err: &ProvisionError) {
        ports.status.transition(StatusTransition::Error { message: err.to_string() });
        audit.log(audit_event(
            EventType::RefreshFailed,
            ports,
            store,
            Some(json!({ "errorCode": err.to_string() })),
        ));
    }

    /// `checkDependencyFingerprint()` (§4.6): compares the recomputed
    /// fingerprint of `dependency_packages` against the one stamped in
    /// `env.json`. A mismatch flips the status sink to update-required
    /// without prompting; that decision belongs to activation policy.
    pub fn check_dependency_fingerprint(
        &self,
        store: &MetadataStore,
        status: &dyn StatusSink,
        dependency_packages: &[String],
    ) -> FingerprintStatus {
        let Some(metadata) = store.read_env_metadata() else {
            return FingerprintStatus::Unknown;
        };
        let current = envcore::dependency_fingerprint(&canonical_manifest(dependency_packages));
        if current == metadata.dependency_set_fingerprint {
            FingerprintStatus::Match
        } else {
            status.transition(StatusTransition::UpdateRequired);
            FingerprintStatus::Mismatch
        }
    }
}

fn describe_process_error(err: &ProcessError) -> String {
    match err {
        ProcessError::ExitCode { stderr_tail, .. } => stderr_tail.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;
