// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace Health Classifier (C7): a pure function of filesystem state,
//! no I/O beyond `exists()` checks (§4.7).

use envcore_storage::MetadataStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceHealth {
    Fresh,
    Broken,
    Valid,
}

/// Classify `store`'s workspace by the six ordered checks in §4.7. Never
/// touches anything beyond `exists()` — no reads, no parsing.
pub fn classify(store: &MetadataStore) -> WorkspaceHealth {
    if !store.hidden_dir().exists() {
        return WorkspaceHealth::Fresh;
    }
    if store.migration_marker_exists() {
        return WorkspaceHealth::Broken;
    }
    if !store.env_json_exists() {
        return WorkspaceHealth::Fresh;
    }

    let Some(metadata) = store.read_env_metadata() else {
        return WorkspaceHealth::Broken;
    };
    let interpreter_path = std::path::Path::new(&metadata.interpreter_path);
    let Some(venv_parent) = interpreter_path.parent() else {
        return WorkspaceHealth::Broken;
    };
    if !venv_parent.exists() {
        return WorkspaceHealth::Broken;
    }
    if !interpreter_path.exists() {
        return WorkspaceHealth::Broken;
    }

    WorkspaceHealth::Valid
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
