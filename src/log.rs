// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Logging setup for the `nexusmap` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is up to the binary.
//! Output goes to stderr so stdout stays machine-readable.
//!
//! ## Environment Variables
//!
//! 1. **`NEXUSMAP_LOG`** (highest priority): a bare level such as `debug` applies to this crate
//!    only; anything with `=`, `:` or `,` is used as a full filter.
//! 2. **`RUST_LOG`**: standard tracing filter.
//! 3. **Default**: `warn` globally, `info` for this crate.

use std::env;
use std::error::Error;
use std::io;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NEXUSMAP_LOG";

const DEFAULT_FILTER: &str = "warn,nexusmap=info";

/// Installs the global stderr subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(create_filter())
        .with_writer(io::stderr)
        .try_init()
}

/// Initializer for tests. Safe to call repeatedly.
pub fn test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn create_filter() -> EnvFilter {
    EnvFilter::new(filter_directives(
        env::var(LOG_ENV).ok().as_deref(),
        env::var("RUST_LOG").ok().as_deref(),
    ))
}

fn filter_directives(crate_log: Option<&str>, rust_log: Option<&str>) -> String {
    if let Some(crate_log) = crate_log.filter(|value| !value.trim().is_empty()) {
        return expand_crate_log(crate_log.trim());
    }
    if let Some(rust_log) = rust_log {
        return rust_log.to_owned();
    }
    DEFAULT_FILTER.to_owned()
}

fn expand_crate_log(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_owned();
    }
    format!("warn,nexusmap={value}")
}
