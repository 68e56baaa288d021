// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

/// One line-level change against a snapshot's line array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    ReplaceLine { line_index: usize, text: String },
    /// Inserts `lines` directly below `after`.
    InsertLines { after: usize, lines: Vec<String> },
    DeleteLines { line_index: usize, count: usize },
}

impl LineEdit {
    /// Index at which the edit starts changing the line array.
    fn position(&self) -> usize {
        match self {
            Self::ReplaceLine { line_index, .. } | Self::DeleteLines { line_index, .. } => {
                *line_index
            }
            Self::InsertLines { after, .. } => after.saturating_add(1),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::ReplaceLine { .. } | Self::DeleteLines { .. } => 0,
            Self::InsertLines { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditError {
    OutOfRange { line_index: usize, line_count: usize },
    Overlap { line_index: usize },
}

impl fmt::Display for LineEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                line_index,
                line_count,
            } => write!(
                f,
                "line edit out of range (line_index={line_index}, line_count={line_count})"
            ),
            Self::Overlap { line_index } => {
                write!(f, "line {line_index} is changed by more than one edit")
            }
        }
    }
}

impl std::error::Error for LineEditError {}

/// Applies `edits` to a copy of `lines`.
///
/// Every edit addresses the original line array. Edits run from the bottom up so earlier indices
/// stay valid; at the same position a replacement or deletion runs before an insertion, and
/// insertions below the same line keep their queue order.
pub fn apply_line_edits(lines: &[&str], edits: &[LineEdit]) -> Result<Vec<String>, LineEditError> {
    let line_count = lines.len();
    let mut touched = BTreeSet::new();
    for edit in edits {
        match edit {
            LineEdit::ReplaceLine { line_index, .. } => {
                check_range(*line_index, 1, line_count)?;
                if !touched.insert(*line_index) {
                    return Err(LineEditError::Overlap {
                        line_index: *line_index,
                    });
                }
            }
            LineEdit::DeleteLines { line_index, count } => {
                check_range(*line_index, *count, line_count)?;
                for index in *line_index..line_index + count {
                    if !touched.insert(index) {
                        return Err(LineEditError::Overlap { line_index: index });
                    }
                }
            }
            LineEdit::InsertLines { after, .. } => check_range(*after, 1, line_count)?,
        }
    }

    let mut order: Vec<usize> = (0..edits.len()).collect();
    order.sort_by(|a, b| {
        let (ea, eb) = (&edits[*a], &edits[*b]);
        eb.position()
            .cmp(&ea.position())
            .then_with(|| ea.rank().cmp(&eb.rank()))
            .then_with(|| b.cmp(a))
    });

    let mut out: Vec<String> = lines.iter().map(|line| (*line).to_owned()).collect();
    for idx in order {
        match &edits[idx] {
            LineEdit::ReplaceLine { line_index, text } => out[*line_index] = text.clone(),
            LineEdit::InsertLines { after, lines } => {
                let at = after + 1;
                out.splice(at..at, lines.iter().cloned());
            }
            LineEdit::DeleteLines { line_index, count } => {
                out.drain(*line_index..line_index + count);
            }
        }
    }
    Ok(out)
}

fn check_range(line_index: usize, count: usize, line_count: usize) -> Result<(), LineEditError> {
    match line_index.checked_add(count) {
        Some(end) if end <= line_count => Ok(()),
        _ => Err(LineEditError::OutOfRange {
            line_index,
            line_count,
        }),
    }
}

/// Collapses sorted line indices into contiguous deletions.
pub(crate) fn coalesce_deletions(indices: &BTreeSet<usize>) -> Vec<LineEdit> {
    let mut edits = Vec::new();
    let mut run: Option<(usize, usize)> = None;
    for &index in indices {
        run = match run {
            Some((start, count)) if start + count == index => Some((start, count + 1)),
            Some((start, count)) => {
                edits.push(LineEdit::DeleteLines {
                    line_index: start,
                    count,
                });
                Some((index, 1))
            }
            None => Some((index, 1)),
        };
    }
    if let Some((start, count)) = run {
        edits.push(LineEdit::DeleteLines {
            line_index: start,
            count,
        });
    }
    edits
}
