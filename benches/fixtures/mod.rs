// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use nexusmap::model::OutlineTree;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("nexusmap_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn ascii_repeat_to_len(prefix: &str, fill: char, target_len: usize) -> String {
    if prefix.len() >= target_len {
        return prefix[..target_len].to_owned();
    }

    let mut out = String::with_capacity(target_len);
    out.push_str(prefix);
    while out.len() < target_len {
        out.push(fill);
    }
    out
}

pub fn checksum_tree(tree: &OutlineTree) -> u64 {
    let mut acc = 0u64;
    for node in tree.iter() {
        acc = acc.wrapping_mul(131).wrapping_add(node.line_index() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.level() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.content().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.variants().len() as u64);
    }
    acc = acc.wrapping_mul(131).wrapping_add(tree.roots().len() as u64);
    acc
}

pub mod outline {
    use super::ascii_repeat_to_len;

    #[derive(Debug, Clone, Copy)]
    pub struct Params {
        pub hubs: usize,
        pub variants: usize,
        pub steps: usize,
        pub details: usize,
        pub label_len: usize,
    }

    impl Params {
        pub const fn new(
            hubs: usize,
            variants: usize,
            steps: usize,
            details: usize,
            label_len: usize,
        ) -> Self {
            Self {
                hubs,
                variants,
                steps,
                details,
                label_len,
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub enum Case {
        Small,
        MediumWide,
        LargeLongLabels,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::MediumWide => "medium_wide",
                Self::LargeLongLabels => "large_long_labels",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params::new(4, 2, 3, 2, 12),
                Self::MediumWide => Params::new(16, 4, 6, 3, 16),
                Self::LargeLongLabels => Params::new(48, 6, 8, 4, 64),
            }
        }
    }

    pub struct Document {
        pub text: String,
        pub lines: usize,
        /// First step of the first hub's first variant; every other variant has a matching step.
        pub matching_target: usize,
        /// A step only the first hub's first variant carries.
        pub copy_target: usize,
    }

    pub fn fixture(case: Case) -> Document {
        let params = case.params();
        let mut lines: Vec<String> = Vec::new();
        let mut copy_target = 0usize;

        for hub in 0..params.hubs {
            for variant in 0..params.variants {
                let actor = if variant % 2 == 0 { "actor-user" } else { "actor-staff" };
                lines.push(format!("Hub {hub:03} (variant=v{variant}) <!-- tags:{actor} -->"));
                for step in 0..params.steps {
                    let label = ascii_repeat_to_len(
                        &format!("Step {hub:03}-{step:02} "),
                        '.',
                        params.label_len,
                    );
                    let marker = if step % 3 == 0 { " #common#" } else { "" };
                    lines.push(format!("  {label}{marker} <!-- fid:f{hub}-{step} -->"));
                    for detail in 0..params.details {
                        lines.push(format!("    Detail {hub:03}-{step:02}-{detail:02}"));
                    }
                }
                if hub == 0 && variant == 0 {
                    copy_target = lines.len();
                    lines.push("  Only in the first variant".to_owned());
                    lines.push("    With a child".to_owned());
                }
            }
        }

        let node_lines = lines.len();
        lines.push("---".to_owned());
        lines.push("```tag-store".to_owned());
        lines.push(
            r#"{"groups":[{"id":"tg-actors"},{"id":"tg-uiSurface"}],"tags":[{"id":"actor-user","groupId":"tg-actors"},{"id":"actor-staff","groupId":"tg-actors"}]}"#
                .to_owned(),
        );
        lines.push("```".to_owned());

        let mut text = lines.join("\n");
        text.push('\n');
        Document {
            text,
            lines: node_lines,
            matching_target: 1,
            copy_target,
        }
    }
}
