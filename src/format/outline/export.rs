// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::annotate::escape_newlines;
use super::parser::INDENT_WIDTH;
use crate::model::OutlineTree;

/// Writes every node back as an indented line of its content.
///
/// Collapsed variants are emitted in line order like any other node; sidecar comments, markers
/// and conditions are not written.
pub fn export_outline(tree: &OutlineTree) -> String {
    let mut out = String::new();
    for node in tree.iter() {
        for _ in 0..node.level() * INDENT_WIDTH {
            out.push(' ');
        }
        out.push_str(&escape_newlines(node.content()));
        out.push('\n');
    }
    out
}
