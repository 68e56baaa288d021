// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over parsed outlines.
//!
//! Variant grouping runs once per parse; hub lookups power the common-node synchronizer.

pub mod hub;
pub mod variants;

pub use hub::{
    find_in_subtree, locate_hub, match_common_chain, normalize_content, variant_index,
    HubLocation, NodePath,
};
pub use variants::{group_key, group_variants};
