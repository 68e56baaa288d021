// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Hub/variant lookups used by the common-node synchronizer.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::format::outline::strip_markers;
use crate::model::{NodeId, OutlineTree};

/// Chain of node ids below a variant, outermost first.
pub type NodePath = SmallVec<[NodeId; 8]>;

/// Where a node sits relative to the innermost enclosing hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubLocation {
    pub hub: NodeId,
    /// The variant whose subtree holds the node.
    pub variant: NodeId,
    /// From the variant's child down to the node itself.
    pub path: NodePath,
}

/// Maps every variant (hub representative included) to its hub.
pub fn variant_index(tree: &OutlineTree) -> BTreeMap<NodeId, NodeId> {
    let mut index = BTreeMap::new();
    for hub in tree.hubs() {
        for variant in hub.variants() {
            index.insert(*variant, hub.id());
        }
    }
    index
}

/// Finds the innermost hub whose variant is a strict ancestor of `target`.
pub fn locate_hub(tree: &OutlineTree, target: NodeId) -> Option<HubLocation> {
    let index = variant_index(tree);
    let mut path = NodePath::new();
    path.push(target);

    let mut current = tree.node(target)?;
    while let Some(parent) = current.parent_id() {
        if let Some(hub) = index.get(&parent) {
            path.reverse();
            return Some(HubLocation {
                hub: *hub,
                variant: parent,
                path,
            });
        }
        path.push(parent);
        current = tree.node(parent)?;
    }
    None
}

/// Content with markers removed and whitespace collapsed, for cross-variant matching.
pub fn normalize_content(content: &str) -> String {
    let (stripped, _) = strip_markers(content);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Follows `expected` down from `variant` through common-tagged children, one level per entry,
/// stopping at the first entry without a match.
pub fn match_common_chain(tree: &OutlineTree, variant: NodeId, expected: &[String]) -> NodePath {
    let mut matched = NodePath::new();
    let mut current = variant;
    for content in expected {
        let next = tree.structural_children(current).into_iter().find(|child| {
            tree.node(*child)
                .is_some_and(|node| node.is_common() && normalize_content(node.content()) == *content)
        });
        match next {
            Some(child) => {
                matched.push(child);
                current = child;
            }
            None => break,
        }
    }
    matched
}

/// First descendant of `root` in line order whose normalized content equals `content`.
pub fn find_in_subtree(tree: &OutlineTree, root: NodeId, content: &str) -> Option<NodeId> {
    tree.descendants(root).into_iter().find(|id| {
        tree.node(*id)
            .is_some_and(|node| normalize_content(node.content()) == content)
    })
}

#[cfg(test)]
mod tests {
    use super::{find_in_subtree, locate_hub, match_common_chain, normalize_content};
    use crate::format::outline::parse_document;
    use crate::model::fixtures::{HUB_TWO_VARIANTS, NESTED_HUB};
    use crate::model::NodeId;

    fn id(line_index: usize) -> NodeId {
        NodeId::from_line_index(line_index)
    }

    #[test]
    fn locates_hub_variant_and_path() {
        let tree = parse_document(NESTED_HUB);
        let location = locate_hub(&tree, id(3)).unwrap();

        assert_eq!(location.hub, id(1));
        assert_eq!(location.variant, id(1));
        assert_eq!(location.path.as_slice(), [id(2), id(3)]);

        let location = locate_hub(&tree, id(5)).unwrap();
        assert_eq!(location.hub, id(1));
        assert_eq!(location.variant, id(4));
        assert_eq!(location.path.as_slice(), [id(5)]);
    }

    #[test]
    fn nodes_outside_hubs_have_no_location() {
        let tree = parse_document(NESTED_HUB);
        assert_eq!(locate_hub(&tree, id(0)), None);
        assert_eq!(locate_hub(&tree, id(1)), None);
        assert_eq!(locate_hub(&tree, id(99)), None);
    }

    #[test]
    fn innermost_hub_wins() {
        let text = "A (v=1)\n  B (w=1)\n    C\n  B (w=2)\nA (v=2)\n";
        let tree = parse_document(text);
        let location = locate_hub(&tree, id(2)).unwrap();
        assert_eq!(location.hub, id(1));
        assert_eq!(location.variant, id(1));
        assert_eq!(location.path.as_slice(), [id(2)]);
    }

    #[test]
    fn chain_matching_requires_common_tags() {
        let tree = parse_document("A (x=1)\n  B\nA (x=2)\n  B #common#\n    C\n");
        let expected = vec!["B".to_owned(), "C".to_owned()];

        assert_eq!(match_common_chain(&tree, id(2), &expected).as_slice(), [id(3)]);
        assert!(match_common_chain(&tree, id(0), &expected).is_empty());
        assert_eq!(find_in_subtree(&tree, id(2), "C"), Some(id(4)));
        assert_eq!(find_in_subtree(&tree, id(2), "A"), None);
    }

    #[test]
    fn normalization_ignores_markers_and_spacing() {
        assert_eq!(normalize_content("  Pay   now #common#"), "Pay now");
    }
}
