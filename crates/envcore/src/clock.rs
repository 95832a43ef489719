// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so audit timestamps and TTL checks are testable without
//! sleeping real wall-clock time.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

/// Supplies the current time. Abstracted so preflight cache TTLs and audit
/// timestamps can be driven deterministically in tests.
pub trait Clock: Send + Sync {
    /// Wall-clock time for timestamps written to disk.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Monotonic instant for interval/TTL comparisons.
    fn monotonic(&self) -> Instant;
}

/// Production clock backed by the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Instant {
        Instant::now()
    }
}

/// Deterministic clock for tests: `now_utc` is settable; `monotonic` always
/// returns the instant captured at construction plus an offset advanced by
/// `advance`.
pub struct FakeClock {
    utc_millis: AtomicI64,
    base: Instant,
    offset_millis: AtomicI64,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            utc_millis: AtomicI64::new(start.timestamp_millis()),
            base: Instant::now(),
            offset_millis: AtomicI64::new(0),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.utc_millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.utc_millis.fetch_add(millis, Ordering::SeqCst);
        self.offset_millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for FakeClock {
    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.utc_millis.load(Ordering::SeqCst))
            .unwrap_or_else(Utc::now)
    }

    fn monotonic(&self) -> Instant {
        let offset = self.offset_millis.load(Ordering::SeqCst).max(0) as u64;
        self.base + std::time::Duration::from_millis(offset)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
