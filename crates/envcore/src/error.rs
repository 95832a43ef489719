// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data-model-level error kinds (§7). Errors that originate further up the
//! stack (process spawn, quiescence, rename) are defined at their own crate
//! boundary instead of being duplicated here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("env.json present but unparseable or missing required fields: {0}")]
    MetadataCorrupt(String),

    #[error("schema marker at {path} unreadable: {source}")]
    SchemaMarkerUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
