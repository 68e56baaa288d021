// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use crate::model::{NexusNode, NodeId, OutlineTree};

/// Collapses same-key siblings into hubs, children before parents.
///
/// A group of siblings sharing a [`group_key`] becomes a hub only when at least one member carries
/// conditions. The first member is the hub and takes the group's slot in the sibling list; the
/// other members are dropped from the list but stay in the tree.
pub fn group_variants(tree: &mut OutlineTree) {
    let parents: Vec<NodeId> = tree.nodes.keys().rev().copied().collect();
    for parent in parents {
        let Some(children) = tree.nodes.get(&parent).map(|node| node.children.clone()) else {
            continue;
        };
        if children.len() < 2 {
            continue;
        }
        let grouped = group_siblings(tree, &children);
        if let Some(node) = tree.nodes.get_mut(&parent) {
            node.children = grouped;
        }
    }

    let roots = tree.roots.clone();
    tree.roots = group_siblings(tree, &roots);
}

fn group_siblings(tree: &mut OutlineTree, siblings: &[NodeId]) -> Vec<NodeId> {
    let mut buckets: Vec<Vec<NodeId>> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();
    for id in siblings {
        let Some(node) = tree.nodes.get(id) else {
            continue;
        };
        let slot = *by_key.entry(group_key(node)).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(*id);
    }

    let mut out = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let collapses = bucket.len() > 1
            && bucket
                .iter()
                .any(|id| tree.nodes.get(id).is_some_and(|node| !node.conditions.is_empty()));
        if !collapses {
            out.extend_from_slice(&bucket);
            continue;
        }

        let hub = bucket[0];
        tracing::trace!(hub = %hub, variants = bucket.len(), "collapsed variants");
        if let Some(node) = tree.nodes.get_mut(&hub) {
            node.is_hub = true;
            node.variants = bucket;
        }
        out.push(hub);
    }

    out.sort_unstable();
    out
}

/// Grouping key: content, icon and the sorted marker/flow-id list.
pub fn group_key(node: &NexusNode) -> String {
    let mut markers: Vec<String> = Vec::new();
    if node.is_flow() {
        markers.push("#flow#".to_owned());
    }
    if node.is_common() {
        markers.push("#common#".to_owned());
    }
    if node.is_flow_tab() {
        markers.push("#flowtab#".to_owned());
    }
    if let Some(fid) = node.fid() {
        markers.push(format!("fid:{fid}"));
    }
    if node.is_system_flow() {
        markers.push("#systemflow#".to_owned());
    }
    if let Some(sfid) = node.sfid() {
        markers.push(format!("sfid:{sfid}"));
    }
    markers.sort();

    let mut key = node.content().to_owned();
    if let Some(icon) = node.icon() {
        key.push_str("|icon:");
        key.push_str(icon);
    }
    key.push(' ');
    key.push_str(&markers.join(","));
    key
}
