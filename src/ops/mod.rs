// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations on outline buffers.
//!
//! Every operation captures a fresh snapshot from the buffer, plans line edits against it and
//! commits the rewritten text as one transaction guarded by the snapshot's revision. Targets that
//! vanished or changed since the caller's snapshot make the operation a no-op.

use std::fmt;

mod common;
mod rewrite;

pub use common::{plan_mark_common, plan_unmark_common};
pub use rewrite::{apply_line_edits, LineEdit, LineEditError};

use crate::model::NodeId;
use crate::store::{BufferError, Snapshot, TextBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonToggle {
    Mark,
    Unmark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to do: the target is gone, stale, or already in the requested state.
    Unchanged,
    Committed { rev: u64, edits: Vec<LineEdit> },
}

impl SyncOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

#[derive(Debug)]
pub enum SyncError {
    Buffer(BufferError),
    Edit(LineEditError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(err) => write!(f, "buffer error: {err}"),
            Self::Edit(err) => write!(f, "cannot apply line edits: {err}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Buffer(err) => Some(err),
            Self::Edit(err) => Some(err),
        }
    }
}

impl From<BufferError> for SyncError {
    fn from(err: BufferError) -> Self {
        Self::Buffer(err)
    }
}

impl From<LineEditError> for SyncError {
    fn from(err: LineEditError) -> Self {
        Self::Edit(err)
    }
}

/// Tags `target` as common and mirrors its chain into the sibling variants.
pub fn mark_common<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    snapshot: Snapshot,
    target: NodeId,
) -> Result<SyncOutcome, SyncError> {
    sync_common(buffer, snapshot, target, Some(CommonToggle::Mark))
}

/// Untags `target` and removes its mirrored copies; the target itself is never deleted.
pub fn unmark_common<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    snapshot: Snapshot,
    target: NodeId,
) -> Result<SyncOutcome, SyncError> {
    sync_common(buffer, snapshot, target, Some(CommonToggle::Unmark))
}

/// Marks or unmarks `target` depending on its current state in the buffer.
pub fn toggle_common<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    snapshot: Snapshot,
    target: NodeId,
) -> Result<SyncOutcome, SyncError> {
    sync_common(buffer, snapshot, target, None)
}

fn sync_common<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    prior: Snapshot,
    target: NodeId,
    toggle: Option<CommonToggle>,
) -> Result<SyncOutcome, SyncError> {
    let fresh = Snapshot::capture(buffer)?;
    let Some(node) = fresh.resolve(&prior, target) else {
        tracing::debug!(node = %target, "target not found in current buffer");
        return Ok(SyncOutcome::Unchanged);
    };
    drop(prior);

    let toggle = toggle.unwrap_or(if node.is_common() {
        CommonToggle::Unmark
    } else {
        CommonToggle::Mark
    });
    let edits = match toggle {
        CommonToggle::Mark => plan_mark_common(&fresh, target),
        CommonToggle::Unmark => plan_unmark_common(&fresh, target),
    };
    if edits.is_empty() {
        tracing::debug!(node = %target, ?toggle, "nothing to change");
        return Ok(SyncOutcome::Unchanged);
    }

    let lines: Vec<&str> = fresh.lines().collect();
    let text = apply_line_edits(&lines, &edits)?.join("\n");
    if text == fresh.text() {
        return Ok(SyncOutcome::Unchanged);
    }

    let rev = buffer.transact(fresh.rev(), &text)?;
    tracing::info!(node = %target, ?toggle, edits = edits.len(), rev, "committed common sync");
    Ok(SyncOutcome::Committed { rev, edits })
}

#[cfg(test)]
mod tests;
