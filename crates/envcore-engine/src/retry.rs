// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The directory-rename retry protocol shared by the provisioner's
//! `refresh()` and the migration engine's backup rename (§4.6).

use std::io;
use std::path::Path;
use std::time::Duration;

fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::WouldBlock
    ) || err.raw_os_error().is_some_and(|code| {
        // EBUSY is 16 on Linux, EACCES 13, EPERM 1; WouldBlock/PermissionDenied
        // above already cover most platforms' ErrorKind mapping, this catches
        // the rest portably.
        matches!(code, 1 | 13 | 16)
    })
}

fn max_attempts() -> u32 {
    if cfg!(windows) {
        6
    } else {
        2
    }
}

fn backoff_base() -> Duration {
    if cfg!(windows) {
        Duration::from_millis(250)
    } else {
        Duration::from_millis(50)
    }
}

/// Rename `from` to `to`, retrying only on `EPERM`/`EBUSY`/`EACCES` with
/// linear backoff (Windows: 6 attempts at 250ms*attempt; elsewhere: 2
/// attempts at 50ms*attempt). Any other error surfaces immediately.
pub async fn rename_with_retry(from: &Path, to: &Path) -> io::Result<()> {
    let attempts = max_attempts();
    let base = backoff_base();
    let mut last_err = None;

    for attempt in 1..=attempts {
        match std::fs::rename(from, to) {
            Ok(()) => return Ok(()),
            Err(err) if is_retryable(&err) && attempt < attempts => {
                tracing::warn!(attempt, error = %err, "rename attempt failed, retrying");
                last_err = Some(err);
                tokio::time::sleep(base * attempt).await;
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("rename failed with no recorded error")))
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
