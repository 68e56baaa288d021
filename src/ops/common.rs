// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Planning of common-node propagation across the variants of a hub.

use std::collections::BTreeSet;

use super::rewrite::{coalesce_deletions, LineEdit};
use crate::format::outline::{add_marker, remove_marker, strip_identity_comments, INDENT_WIDTH};
use crate::model::{Marker, NodeId, OutlineTree};
use crate::query::{find_in_subtree, locate_hub, match_common_chain, normalize_content};
use crate::store::Snapshot;

/// Edits that tag `target` as common and mirror its chain into every other variant of the
/// enclosing hub.
pub fn plan_mark_common(snapshot: &Snapshot, target: NodeId) -> Vec<LineEdit> {
    let tree = snapshot.tree();
    let Some(node) = tree.node(target) else {
        return Vec::new();
    };

    let mut tagged = BTreeSet::new();
    let mut edits = Vec::new();

    let Some(location) = locate_hub(tree, target) else {
        tagged.insert(node.line_index());
        return tag_lines(snapshot, &tagged, edits);
    };
    let Some(hub) = tree.node(location.hub) else {
        return Vec::new();
    };

    tagged.extend(line_indices(tree, &location.path));
    let expected = expected_contents(tree, &location.path);

    for &variant in hub.variants() {
        if variant == location.variant {
            continue;
        }

        let matched = match_common_chain(tree, variant, &expected);
        tagged.extend(line_indices(tree, &matched));

        let mut parent = matched.last().copied().unwrap_or(variant);
        let mut start = matched.len();
        for (offset, content) in expected.iter().enumerate().skip(matched.len()) {
            if let Some(anchor) = find_in_subtree(tree, variant, content) {
                tagged.extend(line_indices(tree, &[anchor]));
                parent = anchor;
                start = offset + 1;
            }
        }
        if start >= location.path.len() {
            continue;
        }

        let (Some(parent_node), Some(after)) = (tree.node(parent), tree.subtree_end(parent))
        else {
            continue;
        };
        let lines: Vec<String> = location.path[start..]
            .iter()
            .enumerate()
            .filter_map(|(depth, id)| {
                let source = snapshot.line(tree.node(*id)?.line_index())?;
                Some(copy_line(source, parent_node.level() + 1 + depth))
            })
            .collect();

        tracing::debug!(variant = %variant, parent = %parent, lines = lines.len(), "propagating common chain");
        edits.push(LineEdit::InsertLines { after, lines });
    }

    tag_lines(snapshot, &tagged, edits)
}

/// Edits that untag `target` and delete the copies mirrored into the other variants.
///
/// The target's own line is only stripped of its marker. In every other variant the full
/// common chain must match; its deepest node goes together with its common-tagged descendants,
/// and chain ancestors follow only once nothing else hangs below them.
pub fn plan_unmark_common(snapshot: &Snapshot, target: NodeId) -> Vec<LineEdit> {
    let tree = snapshot.tree();
    let Some(node) = tree.node(target) else {
        return Vec::new();
    };
    if !node.is_common() {
        tracing::debug!(node = %target, "node is not common");
        return Vec::new();
    }

    let mut edits = Vec::new();
    if let Some(text) = snapshot
        .line(node.line_index())
        .and_then(|line| remove_marker(line, Marker::Common))
    {
        edits.push(LineEdit::ReplaceLine {
            line_index: node.line_index(),
            text,
        });
    }

    let Some(location) = locate_hub(tree, target) else {
        return edits;
    };
    let Some(hub) = tree.node(location.hub) else {
        return edits;
    };
    let expected = expected_contents(tree, &location.path);

    let mut doomed = BTreeSet::new();
    for &variant in hub.variants() {
        if variant == location.variant {
            continue;
        }
        let matched = match_common_chain(tree, variant, &expected);
        if matched.len() != expected.len() {
            continue;
        }
        let Some(&deepest) = matched.last() else {
            continue;
        };

        doomed.extend(line_indices(tree, &[deepest]));
        for desc in tree.descendants(deepest) {
            if let Some(desc) = tree.node(desc).filter(|desc| desc.is_common()) {
                doomed.insert(desc.line_index());
            }
        }

        for &ancestor in matched.iter().rev().skip(1) {
            let all_doomed = tree.descendants(ancestor).into_iter().all(|desc| {
                tree.node(desc)
                    .is_some_and(|desc| doomed.contains(&desc.line_index()))
            });
            if !all_doomed {
                break;
            }
            doomed.extend(line_indices(tree, &[ancestor]));
        }
    }

    doomed.remove(&node.line_index());
    edits.extend(coalesce_deletions(&doomed));
    edits
}

fn expected_contents(tree: &OutlineTree, path: &[NodeId]) -> Vec<String> {
    path.iter()
        .filter_map(|id| tree.node(*id))
        .map(|node| normalize_content(node.content()))
        .collect()
}

fn line_indices<'a>(
    tree: &'a OutlineTree,
    ids: &'a [NodeId],
) -> impl Iterator<Item = usize> + 'a {
    ids.iter()
        .filter_map(|id| tree.node(*id).map(|node| node.line_index()))
}

/// Re-indents a source line at `level`, tagged common and without node-identity comments.
fn copy_line(source: &str, level: usize) -> String {
    let body = strip_identity_comments(source.trim_start());
    let body = add_marker(&body, Marker::Common).unwrap_or(body);
    let mut line = " ".repeat(level * INDENT_WIDTH);
    line.push_str(&body);
    line
}

fn tag_lines(snapshot: &Snapshot, lines: &BTreeSet<usize>, mut edits: Vec<LineEdit>) -> Vec<LineEdit> {
    for &line_index in lines {
        if let Some(text) = snapshot
            .line(line_index)
            .and_then(|line| add_marker(line, Marker::Common))
        {
            edits.push(LineEdit::ReplaceLine { line_index, text });
        }
    }
    edits
}
