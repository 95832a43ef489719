// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand implementations. Each returns `Ok(true)` on success and
//! `Ok(false)` on a documented failure, mirroring the provision routine's
//! `true`/`false` exit semantics (§6) rather than raising for expected,
//! user-facing outcomes.

use anyhow::Result;
use envcore::SystemClock;
use envcore_engine::{MigrationOutcome, MigrationPorts, Provisioner, ProvisionerPorts};

use crate::context::Context;

pub async fn diagnose(ctx: &Context) -> Result<bool> {
    let clock = SystemClock;
    let report = envcore_engine::generate_report(
        &ctx.store,
        &ctx.config,
        &clock,
        &ctx.preflight,
        &ctx.audit,
        &ctx.host,
    )
    .await;
    println!("{}", report.markdown);
    Ok(report.healthy)
}

pub async fn migrate_check(ctx: &Context) -> Result<bool> {
    let ports = MigrationPorts {
        host: &ctx.host,
        background: &ctx.background,
        daemon: &ctx.daemon,
        prompt: &ctx.prompt,
    };

    let outcome = envcore_engine::check_pre_upgrade_migration(
        &ctx.store,
        &ctx.audit,
        &ports,
        ctx.background_pause_timeout(),
        ctx.daemon_stop_timeout(),
        ctx.windows_settle(),
    )
    .await;

    let ok = match &outcome {
        MigrationOutcome::None => {
            println!("no legacy layout detected, nothing to do");
            true
        }
        MigrationOutcome::UserDeclined => {
            println!("migration declined");
            true
        }
        MigrationOutcome::RevalidationAborted => {
            println!("another window already migrated this workspace");
            true
        }
        MigrationOutcome::BackupSuccess { backup_path } => {
            println!("backed up legacy layout to {}", backup_path.display());
            true
        }
        MigrationOutcome::IoError { error } => {
            eprintln!("migration detection failed: {error}");
            false
        }
        MigrationOutcome::BackupFailed { error } => {
            eprintln!("backup failed: {error}");
            false
        }
    };

    Ok(ok)
}

pub async fn provision(
    ctx: &Context,
    base_interpreter: &str,
    runtime_version: &str,
    packages: &[String],
) -> Result<bool> {
    let provisioner = Provisioner::new(envcore_adapters::env::provision_timeout_ms());
    let ports = ProvisionerPorts {
        status: &ctx.status,
        host: &ctx.host,
        background: &ctx.background,
        daemon: &ctx.daemon,
        prompt: &ctx.prompt,
    };

    match provisioner
        .create_managed(&ctx.store, &ctx.config, &ctx.audit, &ctx.preflight, &ports, base_interpreter, runtime_version, packages)
        .await
    {
        Ok(metadata) => {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            Ok(true)
        }
        Err(err) => {
            eprintln!("provision failed: {err}");
            Ok(false)
        }
    }
}

pub async fn adopt(ctx: &Context, interpreter_path: &str, packages: &[String]) -> Result<bool> {
    let provisioner = Provisioner::new(envcore_adapters::env::provision_timeout_ms());
    let ports = ProvisionerPorts {
        status: &ctx.status,
        host: &ctx.host,
        background: &ctx.background,
        daemon: &ctx.daemon,
        prompt: &ctx.prompt,
    };

    match provisioner.initialize(&ctx.store, &ctx.audit, &ports, interpreter_path, packages).await {
        Ok(metadata) => {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            Ok(true)
        }
        Err(err) => {
            eprintln!("adopt failed: {err}");
            Ok(false)
        }
    }
}

pub async fn install(ctx: &Context, packages: &[String]) -> Result<bool> {
    let provisioner = Provisioner::new(envcore_adapters::env::provision_timeout_ms());
    let ports = ProvisionerPorts {
        status: &ctx.status,
        host: &ctx.host,
        background: &ctx.background,
        daemon: &ctx.daemon,
        prompt: &ctx.prompt,
    };

    let resolved = envcore_engine::resolve(&ctx.store, &ctx.config, &ctx.audit, &ctx.host);
    let interpreter_path = std::path::Path::new(&resolved.interpreter_path);

    match provisioner
        .install_dependencies(&ctx.store, &ctx.audit, &ctx.preflight, &ports, interpreter_path, packages)
        .await
    {
        Ok(()) => {
            println!("dependencies installed");
            Ok(true)
        }
        Err(err) => {
            eprintln!("install failed: {err}");
            Ok(false)
        }
    }
}

pub async fn refresh(ctx: &Context, base_interpreter: &str, packages: &[String]) -> Result<bool> {
    let provisioner = Provisioner::new(envcore_adapters::env::provision_timeout_ms());
    let ports = ProvisionerPorts {
        status: &ctx.status,
        host: &ctx.host,
        background: &ctx.background,
        daemon: &ctx.daemon,
        prompt: &ctx.prompt,
    };

    match provisioner
        .refresh(
            &ctx.store,
            &ctx.config,
            &ctx.audit,
            &ctx.preflight,
            &ports,
            base_interpreter,
            packages,
            ctx.background_pause_timeout(),
            ctx.daemon_stop_timeout(),
            ctx.windows_settle(),
        )
        .await
    {
        Ok(()) => {
            println!("refresh complete");
            Ok(true)
        }
        Err(err) => {
            eprintln!("refresh failed: {err}");
            Ok(false)
        }
    }
}
