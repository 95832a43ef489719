// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fakes for the host ports, used by the engine crate's own
//! tests. Gated behind `test-support` so production builds never link
//! them in.
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{
    BackgroundOperationManager, ConfigPort, DaemonControlError, DaemonController,
    HostStorageProvider, PromptChoice, PromptPort, StatusSink, StatusTransition,
};
use envcore::SessionId;

struct FakeStatusSinkState {
    transitions: Vec<StatusTransition>,
}

/// Records every transition it's handed.
#[derive(Clone)]
pub struct FakeStatusSink {
    inner: Arc<Mutex<FakeStatusSinkState>>,
}

impl Default for FakeStatusSink {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeStatusSinkState {
                transitions: Vec::new(),
            })),
        }
    }
}

impl FakeStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<StatusTransition> {
        self.inner.lock().transitions.clone()
    }

    pub fn last(&self) -> Option<StatusTransition> {
        self.inner.lock().transitions.last().cloned()
    }
}

impl StatusSink for FakeStatusSink {
    fn transition(&self, state: StatusTransition) {
        self.inner.lock().transitions.push(state);
    }
}

struct FakeBackgroundOperationManagerState {
    pause_calls: u32,
    resume_calls: u32,
    pause_succeeds: bool,
}

/// Background operation manager whose `pause()` outcome is configurable,
/// so migration orchestration tests can exercise both the quiescence and
/// pause-timeout paths (§4.8.2, §8).
#[derive(Clone)]
pub struct FakeBackgroundOperationManager {
    inner: Arc<Mutex<FakeBackgroundOperationManagerState>>,
}

impl Default for FakeBackgroundOperationManager {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeBackgroundOperationManagerState {
                pause_calls: 0,
                resume_calls: 0,
                pause_succeeds: true,
            })),
        }
    }
}

impl FakeBackgroundOperationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn never_quiesces() -> Self {
        let fake = Self::default();
        fake.inner.lock().pause_succeeds = false;
        fake
    }

    pub fn pause_calls(&self) -> u32 {
        self.inner.lock().pause_calls
    }

    pub fn resume_calls(&self) -> u32 {
        self.inner.lock().resume_calls
    }
}

#[async_trait]
impl BackgroundOperationManager for FakeBackgroundOperationManager {
    async fn pause(&self, _timeout: Duration) -> bool {
        let mut state = self.inner.lock();
        state.pause_calls += 1;
        state.pause_succeeds
    }

    async fn resume(&self) {
        self.inner.lock().resume_calls += 1;
    }
}

struct FakeDaemonControllerState {
    stop_calls: u32,
    stop_result: Result<(), String>,
}

/// Daemon controller whose `stop()` outcome is configurable.
#[derive(Clone)]
pub struct FakeDaemonController {
    inner: Arc<Mutex<FakeDaemonControllerState>>,
}

impl Default for FakeDaemonController {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeDaemonControllerState {
                stop_calls: 0,
                stop_result: Ok(()),
            })),
        }
    }
}

impl FakeDaemonController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        let fake = Self::default();
        fake.inner.lock().stop_result = Err(reason.into());
        fake
    }

    pub fn stop_calls(&self) -> u32 {
        self.inner.lock().stop_calls
    }
}

#[async_trait]
impl DaemonController for FakeDaemonController {
    async fn stop(&self) -> Result<(), DaemonControlError> {
        let mut state = self.inner.lock();
        state.stop_calls += 1;
        state
            .stop_result
            .clone()
            .map_err(DaemonControlError::StopFailed)
    }
}

/// Host storage provider with fixed, test-chosen values.
#[derive(Clone)]
pub struct FakeHostStorageProvider {
    pub session_id: SessionId,
    pub process_id: u32,
    pub extension_version: String,
    pub global_storage_dir: PathBuf,
}

impl Default for FakeHostStorageProvider {
    fn default() -> Self {
        Self {
            session_id: SessionId::new("fake-session"),
            process_id: 4242,
            extension_version: "0.0.0-test".to_string(),
            global_storage_dir: PathBuf::from("/tmp/envcore-fake-global"),
        }
    }
}

impl HostStorageProvider for FakeHostStorageProvider {
    fn session_id(&self) -> SessionId {
        self.session_id.clone()
    }

    fn process_id(&self) -> u32 {
        self.process_id
    }

    fn extension_version(&self) -> String {
        self.extension_version.clone()
    }

    fn global_storage_dir(&self) -> PathBuf {
        self.global_storage_dir.clone()
    }
}

struct FakePromptPortState {
    choice: PromptChoice,
    modal_calls: Vec<String>,
    info_calls: Vec<String>,
}

/// Prompt port whose modal answer is fixed ahead of time and whose calls
/// are recorded for assertions.
#[derive(Clone)]
pub struct FakePromptPort {
    inner: Arc<Mutex<FakePromptPortState>>,
}

impl FakePromptPort {
    pub fn answering(choice: PromptChoice) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakePromptPortState {
                choice,
                modal_calls: Vec::new(),
                info_calls: Vec::new(),
            })),
        }
    }

    pub fn modal_calls(&self) -> Vec<String> {
        self.inner.lock().modal_calls.clone()
    }

    pub fn info_calls(&self) -> Vec<String> {
        self.inner.lock().info_calls.clone()
    }
}

#[async_trait]
impl PromptPort for FakePromptPort {
    async fn warn_modal(&self, message: &str) -> PromptChoice {
        let mut state = self.inner.lock();
        state.modal_calls.push(message.to_string());
        state.choice
    }

    fn info(&self, message: &str) {
        self.inner.lock().info_calls.push(message.to_string());
    }
}

/// Config port with test-chosen fixed values.
#[derive(Clone, Default)]
pub struct FakeConfigPort {
    pub interpreter_path: Option<String>,
    pub debug_logging: bool,
    pub background_pause_timeout_ms: Option<u64>,
}

impl ConfigPort for FakeConfigPort {
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

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
