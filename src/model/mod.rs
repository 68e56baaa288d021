// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model for outline documents.
//!
//! A document parses into an [`OutlineTree`] of [`NexusNode`]s, one per content line, keyed by
//! [`NodeId`]s derived from line indices.

pub mod attribute;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod tree;

pub use attribute::{AttributeKey, IdList, Marker, MarkerSet, NodeAttribute};
pub use ids::{IdError, NodeId};
pub use node::{Conditions, NexusNode, NodeMetadata};
pub use tree::{NodeView, OutlineTree};
