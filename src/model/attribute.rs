// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inline node attributes: `<!-- key:value -->` sidecar comments and `#marker#` tokens.

use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;
use smol_str::SmolStr;

/// Short list of opaque ids (tags, data-object attribute ids, status attribute ids).
pub type IdList = SmallVec<[SmolStr; 4]>;

/// Inline `#name#` marker tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    Common,
    Flow,
    FlowTab,
    SystemFlow,
}

impl Marker {
    /// All markers in the order they are stripped from a line.
    pub const ALL: [Marker; 4] = [Marker::Common, Marker::Flow, Marker::FlowTab, Marker::SystemFlow];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Common => "#common#",
            Self::Flow => "#flow#",
            Self::FlowTab => "#flowtab#",
            Self::SystemFlow => "#systemflow#",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Common => 1,
            Self::Flow => 1 << 1,
            Self::FlowTab => 1 << 2,
            Self::SystemFlow => 1 << 3,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkerSet(u8);

impl MarkerSet {
    pub fn insert(&mut self, marker: Marker) {
        self.0 |= marker.bit();
    }

    pub fn remove(&mut self, marker: Marker) {
        self.0 &= !marker.bit();
    }

    pub fn contains(self, marker: Marker) -> bool {
        self.0 & marker.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Marker> {
        Marker::ALL.into_iter().filter(move |marker| self.contains(*marker))
    }
}

impl FromIterator<Marker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        let mut set = Self::default();
        for marker in iter {
            set.insert(marker);
        }
        set
    }
}

/// Comment keys understood by the line annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Icon,
    DataObject,
    DataObjectAttributes,
    Tags,
    Annotation,
    FlowTabId,
    SystemFlowId,
    StatusAttributes,
    ExpandedId,
}

impl AttributeKey {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "icon" => Self::Icon,
            "do" => Self::DataObject,
            "doattrs" => Self::DataObjectAttributes,
            "tags" => Self::Tags,
            "ann" => Self::Annotation,
            "fid" => Self::FlowTabId,
            "sfid" => Self::SystemFlowId,
            "dostatus" => Self::StatusAttributes,
            "expid" => Self::ExpandedId,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::DataObject => "do",
            Self::DataObjectAttributes => "doattrs",
            Self::Tags => "tags",
            Self::Annotation => "ann",
            Self::FlowTabId => "fid",
            Self::SystemFlowId => "sfid",
            Self::StatusAttributes => "dostatus",
            Self::ExpandedId => "expid",
        }
    }

    /// Keys whose values identify a single node and must not be duplicated onto copies.
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::FlowTabId | Self::SystemFlowId | Self::ExpandedId)
    }
}

/// One decoded sidecar comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
pub enum NodeAttribute {
    Icon(String),
    DataObject(String),
    DataObjectAttributes(IdList),
    Tags(IdList),
    Annotation(String),
    FlowTabId(String),
    SystemFlowId(String),
    StatusAttributes(IdList),
    ExpandedId(u32),
}

impl NodeAttribute {
    pub fn key(&self) -> AttributeKey {
        match self {
            Self::Icon(_) => AttributeKey::Icon,
            Self::DataObject(_) => AttributeKey::DataObject,
            Self::DataObjectAttributes(_) => AttributeKey::DataObjectAttributes,
            Self::Tags(_) => AttributeKey::Tags,
            Self::Annotation(_) => AttributeKey::Annotation,
            Self::FlowTabId(_) => AttributeKey::FlowTabId,
            Self::SystemFlowId(_) => AttributeKey::SystemFlowId,
            Self::StatusAttributes(_) => AttributeKey::StatusAttributes,
            Self::ExpandedId(_) => AttributeKey::ExpandedId,
        }
    }
}
