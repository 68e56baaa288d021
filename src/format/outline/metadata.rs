// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed fenced blocks holding JSON side data (`tag-store`, `data-objects`, swimlanes, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::parser::{is_fence, normalize_newlines};

/// One ```` ```<kind> ```` block with its raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub kind: String,
    /// Line index of the opening fence.
    pub line_index: usize,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataError {
    pub kind: String,
    pub line_index: usize,
    pub message: String,
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid JSON in ```{}``` block at line {}: {}",
            self.kind,
            self.line_index + 1,
            self.message
        )
    }
}

impl std::error::Error for MetadataError {}

/// Result of scanning a document for fenced blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceScan {
    pub blocks: Vec<FencedBlock>,
    /// Line index of a fence that is never closed.
    pub unclosed: Option<usize>,
}

/// Collects every closed fenced block of `text`, typed or not.
pub fn fenced_blocks(text: &str) -> FenceScan {
    let text = normalize_newlines(text);
    let mut scan = FenceScan::default();
    let mut open: Option<(usize, String, Vec<&str>)> = None;

    for (line_index, line) in text.split('\n').enumerate() {
        if is_fence(line) {
            match open.take() {
                Some((start, kind, body)) => scan.blocks.push(FencedBlock {
                    kind,
                    line_index: start,
                    body: body.join("\n"),
                }),
                None => {
                    let kind = line.trim()[3..].trim().to_owned();
                    open = Some((line_index, kind, Vec::new()));
                }
            }
            continue;
        }
        if let Some((_, _, body)) = open.as_mut() {
            body.push(line);
        }
    }

    scan.unclosed = open.map(|(start, _, _)| start);
    scan
}

/// Parses every typed block as JSON. Later blocks of the same kind replace earlier ones.
pub fn metadata_blocks_with_errors(text: &str) -> (BTreeMap<String, Value>, Vec<MetadataError>) {
    let mut blocks = BTreeMap::new();
    let mut errors = Vec::new();

    for block in fenced_blocks(text).blocks {
        if block.kind.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&block.body) {
            Ok(value) => {
                blocks.insert(block.kind, value);
            }
            Err(err) => {
                tracing::debug!(kind = %block.kind, line = block.line_index + 1, "ignoring invalid metadata block");
                errors.push(MetadataError {
                    kind: block.kind,
                    line_index: block.line_index,
                    message: err.to_string(),
                });
            }
        }
    }

    (blocks, errors)
}

/// Typed blocks that hold valid JSON; invalid blocks are skipped.
pub fn metadata_blocks(text: &str) -> BTreeMap<String, Value> {
    metadata_blocks_with_errors(text).0
}
