// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Indentation-based outline parser.

use std::borrow::Cow;

use memchr::memchr;
use smol_str::SmolStr;

use super::annotate::{annotate_line, unescape_newlines};
use super::marker::strip_markers;
use crate::model::{Conditions, NexusNode, NodeId, NodeMetadata, OutlineTree};

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 2;

const VISUAL_INDENT: &str = ">>";
const FENCE: &str = "```";
const SEPARATOR: &str = "---";

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if memchr(b'\r', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

pub(crate) fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

/// Index of the first `---` line outside a fenced region.
pub fn find_separator(text: &str) -> Option<usize> {
    let text = normalize_newlines(text);
    let mut in_fence = false;
    for (index, line) in text.split('\n').enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && line.trim() == SEPARATOR {
            return Some(index);
        }
    }
    None
}

/// Parses the structural region of `text` into a tree without variant grouping.
pub fn parse_outline(text: &str) -> OutlineTree {
    let text = normalize_newlines(text);
    let mut tree = OutlineTree::default();
    let mut stack: Vec<(NodeId, usize)> = Vec::new();
    let mut in_fence = false;

    for (line_index, line) in text.split('\n').enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if line.trim() == SEPARATOR {
            break;
        }

        let Some(mut node) = parse_line(line_index, line) else {
            if !line.trim().is_empty() {
                tracing::debug!(line = line_index + 1, "dropping line without content");
            }
            continue;
        };

        while stack.last().is_some_and(|(_, level)| *level >= node.level) {
            stack.pop();
        }
        let id = node.id;
        match stack.last() {
            Some((parent, _)) => {
                node.parent_id = Some(*parent);
                if let Some(parent) = tree.nodes.get_mut(parent) {
                    parent.children.push(id);
                }
            }
            None => {
                if node.level > 0 {
                    tracing::debug!(
                        line = line_index + 1,
                        level = node.level,
                        "orphaned line promoted to root"
                    );
                }
                stack.clear();
                tree.roots.push(id);
            }
        }
        stack.push((id, node.level));
        tree.nodes.insert(id, node);
    }

    tree
}

/// Parses `text` and collapses same-content siblings into hubs.
pub fn parse_document(text: &str) -> OutlineTree {
    let mut tree = parse_outline(text);
    crate::query::group_variants(&mut tree);
    tree
}

/// Builds the node for one buffer line, or `None` if nothing remains after stripping.
pub fn parse_line(line_index: usize, line: &str) -> Option<NexusNode> {
    let (mut visual_level, body) = split_visual_prefix(line);
    let indent = body.bytes().take_while(|b| *b == b' ').count();
    let annotated = annotate_line(&body[indent..]);

    let mut rest = annotated.text.as_str();
    loop {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix(VISUAL_INDENT) {
            Some(after) => {
                visual_level += 1;
                rest = after;
            }
            None => {
                rest = trimmed;
                break;
            }
        }
    }

    let (text, conditions) = parse_conditions(rest);
    let (text, markers) = strip_markers(&text);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut node = NexusNode::new(line_index, indent / INDENT_WIDTH, unescape_newlines(text));
    node.raw_content = line.trim().to_owned();
    node.visual_level = visual_level;
    node.conditions = conditions;
    node.metadata = NodeMetadata::from_attributes(annotated.attributes);
    node.set_markers(markers);
    Some(node)
}

/// Splits the `>>` run that opens `line` (tokens may be separated by single spaces) from the
/// structural indentation behind it.
fn split_visual_prefix(line: &str) -> (usize, &str) {
    let mut count = 0usize;
    let mut rest = line;
    while let Some(after) = rest.strip_prefix(VISUAL_INDENT) {
        count += 1;
        rest = after;
        if let Some(next) = rest.strip_prefix(' ').filter(|next| next.starts_with(VISUAL_INDENT)) {
            rest = next;
        }
    }
    (count, rest)
}

/// Consumes leading-first `(key=value, ...)` groups.
///
/// Scanning stops at the first parenthesized group that holds no `=`; that group stays part of
/// the content.
pub fn parse_conditions(text: &str) -> (String, Conditions) {
    let mut out = text.to_owned();
    let mut conditions = Conditions::new();

    loop {
        let Some(open) = out.find('(') else {
            break;
        };
        let Some(close_rel) = out[open + 1..].find(')') else {
            break;
        };
        let close = open + 1 + close_rel;
        let inner = &out[open + 1..close];
        if !inner.contains('=') {
            break;
        }

        for pair in inner.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            conditions
                .entry(SmolStr::new(key))
                .or_insert_with(|| value.trim().to_owned());
        }

        let head = out[..open].trim_end();
        let tail = out[close + 1..].trim_start();
        out = match (head.is_empty(), tail.is_empty()) {
            (false, false) => format!("{head} {tail}"),
            (false, true) => head.to_owned(),
            (true, _) => tail.to_owned(),
        };
    }

    (out, conditions)
}
