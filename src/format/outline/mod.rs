// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The indentation-based outline dialect: sidecar comments, markers, conditions, fenced side
//! data and the `---` separator.

pub mod annotate;
mod export;
pub mod marker;
pub mod metadata;
mod parser;

pub use annotate::{annotate_line, strip_identity_comments, AnnotatedLine};
pub use export::export_outline;
pub use marker::{add_marker, remove_marker, strip_markers};
pub use metadata::{fenced_blocks, metadata_blocks, metadata_blocks_with_errors, MetadataError};
pub use parser::{
    find_separator, normalize_newlines, parse_conditions, parse_document, parse_line,
    parse_outline, INDENT_WIDTH,
};
pub(crate) use parser::is_fence;
