// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process Runner (C1): spawns a child with an explicit argument vector,
//! bounded by a timeout, with raw argument passing and no shell
//! interpolation.

use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Options for a single `run()` call.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub capture_output: bool,
    pub timeout: Duration,
}

impl RunOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            capture_output: true,
            timeout,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    /// The child exited with a non-zero (or signal-terminated) status.
    #[error("{program} exited with {code:?}: {stderr_tail}")]
    ExitCode {
        program: String,
        code: Option<i32>,
        stderr_tail: String,
        stdout_tail: Option<String>,
    },

    /// Spawn failed because the interpreter/binary could not be found.
    /// Distinguished from other spawn failures so the resolver/preflight
    /// layers can classify it as `InterpreterNotRunnable` (§4.5) without
    /// string-matching the error text.
    #[error("{program} not found: {source}")]
    NotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Spawn failed for a reason other than "not found" (e.g. permission
    /// denied on the binary itself).
    #[error("failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
}

/// Spawns child processes with bounded timeout and raw argument passing.
///
/// All argument passing goes straight through to `tokio::process::Command`;
/// the runner never reconstructs a shell command line and never applies its
/// own platform-specific quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `program args...` in `cwd`, returning captured stdout on success.
    ///
    /// The child is killed automatically if the timeout elapses: tokio's
    /// `Child` carries `kill_on_drop`, so dropping the in-flight future on
    /// timeout tears down the process tree without an explicit kill call.
    pub async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        opts: RunOptions,
    ) -> Result<String, ProcessError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.current_dir(cwd);
        cmd.kill_on_drop(true);

        if !opts.capture_output {
            cmd.stdout(std::process::Stdio::inherit());
            cmd.stderr(std::process::Stdio::inherit());
        }

        let spawn_result = cmd.spawn();
        let child = match spawn_result {
            Ok(child) => child,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProcessError::NotFound {
                    program: program.to_string(),
                    source,
                });
            }
            Err(source) => {
                return Err(ProcessError::SpawnFailed {
                    program: program.to_string(),
                    source,
                });
            }
        };

        match tokio::time::timeout(opts.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
                } else {
                    Err(ProcessError::ExitCode {
                        program: program.to_string(),
                        code: output.status.code(),
                        stderr_tail: tail(&String::from_utf8_lossy(&output.stderr), 4096),
                        stdout_tail: opts
                            .capture_output
                            .then(|| tail(&String::from_utf8_lossy(&output.stdout), 4096)),
                    })
                }
            }
            Ok(Err(source)) => Err(ProcessError::SpawnFailed {
                program: program.to_string(),
                source,
            }),
            Err(_elapsed) => Err(ProcessError::Timeout {
                program: program.to_string(),
                timeout: opts.timeout,
            }),
        }
    }
}

fn tail(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        s.to_string()
    } else {
        let start = s.len() - max_bytes;
        // Avoid splitting in the middle of a UTF-8 code point.
        let start = (start..s.len()).find(|&i| s.is_char_boundary(i)).unwrap_or(s.len());
        s[start..].to_string()
    }
}

#[cfg(test)]
#[path = "process_runner_tests.rs"]
mod tests;
