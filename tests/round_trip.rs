// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use nexusmap::format::outline::{export_outline, parse_document, parse_outline};
use nexusmap::ops::{apply_line_edits, LineEdit};
use proptest::prelude::*;

fn label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,8}( [A-Za-z0-9]{1,8}){0,2}"
}

/// Plain outline text whose levels never jump by more than one.
fn plain_outline() -> impl Strategy<Value = String> {
    proptest::collection::vec((0usize..4, label()), 1..40).prop_map(|rows| {
        let mut out = String::new();
        let mut previous: Option<usize> = None;
        for (raw_level, label) in rows {
            let level = match previous {
                None => 0,
                Some(previous) => raw_level.min(previous + 1),
            };
            previous = Some(level);
            out.push_str(&"  ".repeat(level));
            out.push_str(&label);
            out.push('\n');
        }
        out
    })
}

proptest! {
    #[test]
    fn prop_plain_outline_exports_verbatim(text in plain_outline()) {
        let tree = parse_outline(&text);
        prop_assert_eq!(tree.len(), text.lines().count());
        prop_assert_eq!(export_outline(&tree), text);
    }

    #[test]
    fn prop_variant_grouping_keeps_every_node(
        text in plain_outline(),
        conditions in proptest::collection::vec(0u8..3, 1..40),
    ) {
        // Attach `(v=n)` to some lines so same-content siblings collapse into hubs.
        let conditioned: String = text
            .lines()
            .zip(conditions.iter().cycle())
            .map(|(line, condition)| match condition {
                0 => format!("{line}\n"),
                n => format!("{line} (v={n})\n"),
            })
            .collect();

        let grouped = parse_document(&conditioned);
        let flat = parse_outline(&conditioned);
        prop_assert_eq!(grouped.len(), flat.len());
        prop_assert_eq!(export_outline(&grouped), text);
        for hub in grouped.hubs() {
            prop_assert!(hub.variants().len() > 1);
            prop_assert_eq!(hub.variants()[0], hub.id());
        }
    }

    #[test]
    fn prop_replace_line_touches_only_its_line(
        lines in proptest::collection::vec(label(), 1..30),
        index in 0usize..30,
        replacement in label(),
    ) {
        let index = index % lines.len();
        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        let edits = [LineEdit::ReplaceLine { line_index: index, text: replacement.clone() }];
        let out = apply_line_edits(&borrowed, &edits).expect("in range");
        prop_assert_eq!(out.len(), lines.len());
        for (i, line) in out.iter().enumerate() {
            if i == index {
                prop_assert_eq!(line, &replacement);
            } else {
                prop_assert_eq!(line, &lines[i]);
            }
        }
    }
}
