// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the process runner, path redaction, host
//! collaborator ports, and the environment-variable layer that tunes them.

pub mod env;
pub mod noop;
pub mod ports;
pub mod process_runner;
pub mod redact;

pub use noop::{
    NoOpBackgroundOperationManager, NoOpConfigPort, NoOpDaemonController, NoOpPromptPort,
    NoOpStatusSink, ProcessHostStorageProvider,
};
pub use ports::{
    BackgroundOperationManager, ConfigPort, DaemonControlError, DaemonController,
    HostStorageProvider, PromptChoice, PromptPort, StatusSink, StatusTransition,
};
pub use process_runner::{ProcessError, ProcessRunner, RunOptions};
pub use redact::redact_paths;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fakes;
#[cfg(any(test, feature = "test-support"))]
pub use fakes::{
    FakeBackgroundOperationManager, FakeConfigPort, FakeDaemonController, FakeHostStorageProvider,
    FakePromptPort, FakeStatusSink,
};
