// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! envctl - operator CLI for the workspace environment lifecycle core.
//!
//! A small wrapper around `envcore-engine` for manual diagnosis and
//! maintenance outside a hosting editor extension: every subcommand wires
//! the real `ProcessRunner`/`MetadataStore`/`AuditLog` plus no-op or
//! process-backed stand-ins for the host ports a real extension would
//! supply.

mod commands;
mod context;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use context::Context;

#[derive(Parser)]
#[command(name = "envctl", version, about = "Workspace environment lifecycle core, from the command line")]
struct Cli {
    /// Workspace root to operate on (default: current directory)
    #[arg(short = 'C', long = "workspace", global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Directory for audit logs and guard files (default: platform data dir)
    #[arg(long = "global-storage", global = true, value_name = "DIR")]
    global_storage: Option<PathBuf>,

    /// Explicit interpreter path override (tier 3 of the resolver)
    #[arg(long = "interpreter", global = true)]
    interpreter: Option<String>,

    /// Include redacted stderr excerpts in preflight output
    #[arg(long = "debug", global = true)]
    debug_logging: bool,

    /// Override the background-operation quiescence budget (§6)
    #[arg(long = "background-pause-timeout-ms", global = true)]
    background_pause_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify workspace health, check for a pending legacy migration, and
    /// run a fresh preflight probe, printing a combined report
    Diagnose,
    /// Run only the legacy-layout detection and backup confirmation flow
    MigrateCheck,
    /// Create a new managed virtual environment for this workspace
    Provision {
        /// Interpreter to build the managed venv from
        #[arg(long, default_value = "python3")]
        base_interpreter: String,
        /// Host runtime version string, e.g. "3.11.4"
        #[arg(long)]
        runtime_version: String,
        /// Dependency packages to install, comma-separated
        #[arg(long, value_delimiter = ',')]
        packages: Vec<String>,
    },
    /// Rebuild the managed virtual environment in place
    Refresh {
        #[arg(long, default_value = "python3")]
        base_interpreter: String,
        #[arg(long, value_delimiter = ',')]
        packages: Vec<String>,
    },
    /// Adopt an externally managed interpreter without creating a venv
    Adopt {
        /// Path to the interpreter the user already manages
        #[arg(long)]
        interpreter_path: String,
        /// Dependency packages the adopted interpreter is expected to have
        #[arg(long, value_delimiter = ',')]
        packages: Vec<String>,
    },
    /// Install packages into the currently resolved interpreter
    Install {
        #[arg(long, value_delimiter = ',')]
        packages: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::resolve(
        cli.workspace,
        cli.global_storage,
        cli.interpreter,
        cli.debug_logging,
        cli.background_pause_timeout_ms,
    )?;

    let ok = match cli.command {
        Commands::Diagnose => commands::diagnose(&ctx).await?,
        Commands::MigrateCheck => commands::migrate_check(&ctx).await?,
        Commands::Provision { base_interpreter, runtime_version, packages } => {
            commands::provision(&ctx, &base_interpreter, &runtime_version, &packages).await?
        }
        Commands::Refresh { base_interpreter, packages } => {
            commands::refresh(&ctx, &base_interpreter, &packages).await?
        }
        Commands::Adopt { interpreter_path, packages } => {
            commands::adopt(&ctx, &interpreter_path, &packages).await?
        }
        Commands::Install { packages } => commands::install(&ctx, &packages).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
