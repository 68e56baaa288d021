// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text buffers the outline is read from and committed to.
//!
//! A [`TextBuffer`] stands in for the shared CRDT text: it hands out the materialized string
//! with a revision, and accepts whole-buffer replacements as one transaction guarded by that
//! revision.

use std::fmt;
use std::io;
use std::path::PathBuf;

mod memory;
mod snapshot;
mod text_file;

pub use memory::MemoryBuffer;
pub use snapshot::Snapshot;
pub use text_file::TextFile;

/// One read of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRead {
    pub rev: u64,
    pub text: String,
}

pub trait TextBuffer {
    /// Returns the current text and its revision.
    fn read(&mut self) -> Result<BufferRead, BufferError>;

    /// Replaces the whole text if the buffer is still at `base_rev`. Returns the new revision.
    fn transact(&mut self, base_rev: u64, text: &str) -> Result<u64, BufferError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place without syncing.
    #[default]
    BestEffort,

    /// Additionally syncs the written file and its parent directory.
    ///
    /// Exact guarantees are platform/filesystem-dependent.
    Durable,
}

#[derive(Debug)]
pub enum BufferError {
    Conflict { base_rev: u64, current_rev: u64 },
    Io { path: PathBuf, source: io::Error },
    SymlinkRefused { path: PathBuf },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                base_rev,
                current_rev,
            } => write!(
                f,
                "stale base_rev (base_rev={base_rev}, current_rev={current_rev})"
            ),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Conflict { .. } | Self::SymlinkRefused { .. } => None,
        }
    }
}
