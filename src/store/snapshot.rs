// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::Range;

use super::{BufferError, TextBuffer};
use crate::format::outline::{normalize_newlines, parse_document};
use crate::model::{NexusNode, NodeId, OutlineTree};

/// Parsed view of one buffer revision.
///
/// Line indices and node ids are only meaningful against the snapshot that produced them.
/// Mutating entry points take a snapshot by value and capture a fresh one before editing.
#[derive(Debug, Clone)]
pub struct Snapshot {
    rev: u64,
    text: String,
    lines: Vec<Range<usize>>,
    tree: OutlineTree,
}

impl Snapshot {
    pub fn capture<B: TextBuffer + ?Sized>(buffer: &mut B) -> Result<Self, BufferError> {
        let read = buffer.read()?;
        Ok(Self::from_text(read.rev, &read.text))
    }

    pub fn from_text(rev: u64, text: &str) -> Self {
        let text = normalize_newlines(text).into_owned();
        let mut lines = Vec::new();
        let mut start = 0usize;
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                lines.push(start..idx);
                start = idx + 1;
            }
        }
        lines.push(start..text.len());

        let tree = parse_document(&text);
        Self {
            rev,
            text,
            lines,
            tree,
        }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Buffer text with line endings normalized to `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &OutlineTree {
        &self.tree
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|range| &self.text[range.clone()])
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(|range| &self.text[range.clone()])
    }

    pub fn node(&self, id: NodeId) -> Option<&NexusNode> {
        self.tree.node(id)
    }

    /// Finds the node that `prior` knew as `id`, provided it still sits on the same line with
    /// the same raw content.
    pub fn resolve(&self, prior: &Snapshot, id: NodeId) -> Option<&NexusNode> {
        let before = prior.node(id)?;
        let now = self.node(id)?;
        (now.raw_content() == before.raw_content()).then_some(now)
    }
}
