// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::Serialize;

use super::ids::NodeId;
use super::node::NexusNode;

/// Parsed outline: every node keyed by id plus the grouped root list.
///
/// Variants that were collapsed into a hub stay in `nodes` and keep their `parent_id`; they are
/// only reachable from the sibling list through the hub's `variants`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineTree {
    pub(crate) nodes: BTreeMap<NodeId, NexusNode>,
    pub(crate) roots: Vec<NodeId>,
}

impl OutlineTree {
    pub fn node(&self, id: NodeId) -> Option<&NexusNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, NexusNode> {
        &self.nodes
    }

    /// Nodes in line order, collapsed variants included.
    pub fn iter(&self) -> impl Iterator<Item = &NexusNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn hubs(&self) -> impl Iterator<Item = &NexusNode> {
        self.nodes.values().filter(|node| node.is_hub())
    }

    /// Root list with hubs expanded back into their variants, in line order.
    pub fn structural_roots(&self) -> Vec<NodeId> {
        self.expand(&self.roots)
    }

    /// Children of `id` with hubs expanded back into their variants, in line order.
    pub fn structural_children(&self, id: NodeId) -> Vec<NodeId> {
        match self.nodes.get(&id) {
            Some(node) => self.expand(node.children()),
            None => Vec::new(),
        }
    }

    fn expand(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            match self.nodes.get(id) {
                Some(node) if node.is_hub() => out.extend_from_slice(node.variants()),
                Some(_) => out.push(*id),
                None => {}
            }
        }
        out.sort_unstable();
        out
    }

    /// Every structural descendant of `id` in line order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = self.structural_children(id);
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children = self.structural_children(next);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Line index of the last line owned by `id`'s subtree.
    pub fn subtree_end(&self, id: NodeId) -> Option<usize> {
        let own = self.nodes.get(&id)?.line_index();
        Some(
            self.descendants(id)
                .into_iter()
                .filter_map(|desc| self.nodes.get(&desc).map(NexusNode::line_index))
                .fold(own, usize::max),
        )
    }

    /// `id` followed by its parents up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &NexusNode> {
        std::iter::successors(self.nodes.get(&id), move |node| {
            node.parent_id().and_then(|parent| self.nodes.get(&parent))
        })
    }

    /// Nested view of the grouped tree for serialization.
    pub fn view(&self) -> Vec<NodeView<'_>> {
        self.roots
            .iter()
            .filter_map(|id| self.node_view(*id, true))
            .collect()
    }

    fn node_view(&self, id: NodeId, expand_variants: bool) -> Option<NodeView<'_>> {
        let node = self.nodes.get(&id)?;
        let child_nodes = node
            .children()
            .iter()
            .filter_map(|child| self.node_view(*child, true))
            .collect();
        let variant_nodes = if expand_variants && node.is_hub() {
            node.variants()
                .iter()
                .filter_map(|variant| self.node_view(*variant, false))
                .collect()
        } else {
            Vec::new()
        };
        Some(NodeView {
            node,
            child_nodes,
            variant_nodes,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView<'a> {
    #[serde(flatten)]
    node: &'a NexusNode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    child_nodes: Vec<NodeView<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    variant_nodes: Vec<NodeView<'a>>,
}

impl<'a> NodeView<'a> {
    pub fn node(&self) -> &'a NexusNode {
        self.node
    }

    pub fn child_nodes(&self) -> &[NodeView<'a>] {
        &self.child_nodes
    }

    pub fn variant_nodes(&self) -> &[NodeView<'a>] {
        &self.variant_nodes
    }
}
