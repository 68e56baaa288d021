// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::Serialize;
use smol_str::SmolStr;

use super::attribute::{IdList, Marker, MarkerSet, NodeAttribute};
use super::ids::NodeId;

/// Condition attributes parsed from `(key=value, ...)` groups, ordered by key.
pub type Conditions = BTreeMap<SmolStr, String>;

/// Sidecar payload decoded from a line's comments.
///
/// The parser carries these values through untouched; only `icon`, `fid` and `sfid` take part
/// in variant grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_object_id: Option<String>,
    #[serde(skip_serializing_if = "IdList::is_empty")]
    pub data_object_attribute_ids: IdList,
    #[serde(skip_serializing_if = "IdList::is_empty")]
    pub tags: IdList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sfid: Option<String>,
    #[serde(skip_serializing_if = "IdList::is_empty")]
    pub do_status_attr_ids: IdList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_id: Option<u32>,
}

impl NodeMetadata {
    /// Folds decoded attributes into metadata. The first comment of each key wins.
    pub fn from_attributes(attributes: impl IntoIterator<Item = NodeAttribute>) -> Self {
        let mut meta = Self::default();
        for attribute in attributes {
            match attribute {
                NodeAttribute::Icon(value) => {
                    meta.icon.get_or_insert(value);
                }
                NodeAttribute::DataObject(value) => {
                    meta.data_object_id.get_or_insert(value);
                }
                NodeAttribute::DataObjectAttributes(ids) => {
                    if meta.data_object_attribute_ids.is_empty() {
                        meta.data_object_attribute_ids = ids;
                    }
                }
                NodeAttribute::Tags(ids) => {
                    if meta.tags.is_empty() {
                        meta.tags = ids;
                    }
                }
                NodeAttribute::Annotation(value) => {
                    meta.annotation.get_or_insert(value);
                }
                NodeAttribute::FlowTabId(value) => {
                    meta.fid.get_or_insert(value);
                }
                NodeAttribute::SystemFlowId(value) => {
                    meta.sfid.get_or_insert(value);
                }
                NodeAttribute::StatusAttributes(ids) => {
                    if meta.do_status_attr_ids.is_empty() {
                        meta.do_status_attr_ids = ids;
                    }
                }
                NodeAttribute::ExpandedId(value) => {
                    meta.expanded_id.get_or_insert(value);
                }
            }
        }
        meta
    }
}

/// One parsed content line of an outline document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusNode {
    pub(crate) id: NodeId,
    pub(crate) content: String,
    pub(crate) raw_content: String,
    pub(crate) level: usize,
    pub(crate) visual_level: usize,
    pub(crate) line_index: usize,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) conditions: Conditions,
    #[serde(flatten)]
    pub(crate) metadata: NodeMetadata,
    #[serde(skip)]
    pub(crate) markers: MarkerSet,
    pub(crate) is_common: bool,
    pub(crate) flow: bool,
    pub(crate) flow_tab: bool,
    pub(crate) system_flow: bool,
    pub(crate) is_hub: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) variants: Vec<NodeId>,
}

impl NexusNode {
    pub fn new(line_index: usize, level: usize, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: NodeId::from_line_index(line_index),
            raw_content: content.clone(),
            content,
            level,
            visual_level: 0,
            line_index,
            parent_id: None,
            children: Vec::new(),
            conditions: Conditions::new(),
            metadata: NodeMetadata::default(),
            markers: MarkerSet::default(),
            is_common: false,
            flow: false,
            flow_tab: false,
            system_flow: false,
            is_hub: false,
            variants: Vec::new(),
        }
    }

    pub(crate) fn set_markers(&mut self, markers: MarkerSet) {
        self.markers = markers;
        self.is_common = markers.contains(Marker::Common);
        self.flow = markers.contains(Marker::Flow);
        self.flow_tab = markers.contains(Marker::FlowTab);
        self.system_flow = markers.contains(Marker::SystemFlow);
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn visual_level(&self) -> usize {
        self.visual_level
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    /// Children after variant grouping: collapsed variants appear only through their hub.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn icon(&self) -> Option<&str> {
        self.metadata.icon.as_deref()
    }

    pub fn tags(&self) -> &[SmolStr] {
        &self.metadata.tags
    }

    pub fn annotation(&self) -> Option<&str> {
        self.metadata.annotation.as_deref()
    }

    pub fn data_object_id(&self) -> Option<&str> {
        self.metadata.data_object_id.as_deref()
    }

    pub fn data_object_attribute_ids(&self) -> &[SmolStr] {
        &self.metadata.data_object_attribute_ids
    }

    pub fn fid(&self) -> Option<&str> {
        self.metadata.fid.as_deref()
    }

    pub fn sfid(&self) -> Option<&str> {
        self.metadata.sfid.as_deref()
    }

    pub fn do_status_attr_ids(&self) -> &[SmolStr] {
        &self.metadata.do_status_attr_ids
    }

    pub fn markers(&self) -> MarkerSet {
        self.markers
    }

    pub fn has_marker(&self, marker: Marker) -> bool {
        self.markers.contains(marker)
    }

    pub fn is_common(&self) -> bool {
        self.is_common
    }

    pub fn is_flow(&self) -> bool {
        self.flow
    }

    pub fn is_flow_tab(&self) -> bool {
        self.flow_tab
    }

    pub fn is_system_flow(&self) -> bool {
        self.system_flow
    }

    pub fn is_hub(&self) -> bool {
        self.is_hub
    }

    /// Every member of the collapsed group, the hub itself included. Empty unless `is_hub`.
    pub fn variants(&self) -> &[NodeId] {
        &self.variants
    }
}
