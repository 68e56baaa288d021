// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const NODE_ID_PREFIX: &str = "node-";

/// Identifier of a parsed outline node.
///
/// Derived from the 0-based index of the node's line in the unfiltered buffer and rendered as
/// `node-<lineIndex>`. It is only meaningful for the text snapshot it was parsed from: any
/// insertion or removal of lines above the node shifts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn from_line_index(line_index: usize) -> Self {
        Self(line_index)
    }

    /// Builds an id from a 1-based line number as shown by editors.
    pub fn from_line_number(line_number: usize) -> Result<Self, IdError> {
        line_number
            .checked_sub(1)
            .map(Self)
            .ok_or(IdError::LineNumberZero)
    }

    pub const fn line_index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        f.write_str(NODE_ID_PREFIX)?;
        f.write_str(buf.format(self.0))
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        let digits = s.strip_prefix(NODE_ID_PREFIX).ok_or(IdError::MissingPrefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidLineIndex);
        }
        digits
            .parse::<usize>()
            .map(Self)
            .map_err(|_| IdError::InvalidLineIndex)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    MissingPrefix,
    InvalidLineIndex,
    LineNumberZero,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("node id must not be empty"),
            Self::MissingPrefix => write!(f, "node id must start with '{NODE_ID_PREFIX}'"),
            Self::InvalidLineIndex => f.write_str("node id must end in a decimal line index"),
            Self::LineNumberZero => f.write_str("line numbers start at 1"),
        }
    }
}

impl std::error::Error for IdError {}
