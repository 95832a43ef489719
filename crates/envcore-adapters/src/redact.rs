// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path redaction for stderr excerpts (§4.5). This is a narrower cousin of
//! the audit log's allowlist-based redaction filter: it has one job, strip
//! absolute filesystem paths out of raw process output before it is ever
//! logged.

use regex::Regex;
use std::sync::OnceLock;

fn unix_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/[^\s:]+(?:/[^\s:]+)+").expect("static regex is valid"))
}

fn windows_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z]:\\[^\s:]+(?:\\[^\s:]+)*").expect("static regex is valid")
    })
}

/// Replaces every absolute Unix (`/a/b/c`) or Windows (`X:\a\b\`) path in
/// `text` with the literal `<path>`.
pub fn redact_paths(text: &str) -> String {
    let replaced = windows_path_re().replace_all(text, "<path>");
    unix_path_re().replace_all(&replaced, "<path>").into_owned()
}

#[cfg(test)]
#[path = "redact_tests.rs"]
mod tests;
