// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Nexusmap: the outline document model behind the collaborative map editor.
//!
//! An outline is an indentation-based markdown bullet list. This crate turns it into a
//! tree of [`model::NexusNode`]s (annotating each line's inline comments and markers),
//! groups conditional sibling variants under hubs, and keeps `#common#` nodes in sync across
//! every variant of a hub by rewriting the shared text buffer.

pub mod format;
pub mod log;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
pub mod verify;
