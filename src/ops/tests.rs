// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::fixtures::{HUB_TWO_VARIANTS, NESTED_HUB};
use crate::model::NodeId;
use crate::store::{BufferError, BufferRead, MemoryBuffer, Snapshot, TextBuffer};

use super::{mark_common, toggle_common, unmark_common, LineEdit, SyncError, SyncOutcome};

fn id(line_index: usize) -> NodeId {
    NodeId::from_line_index(line_index)
}

fn mark(buffer: &mut MemoryBuffer, line_index: usize) -> SyncOutcome {
    crate::log::test();
    let snapshot = Snapshot::capture(buffer).expect("capture");
    mark_common(buffer, snapshot, id(line_index)).expect("mark")
}

fn unmark(buffer: &mut MemoryBuffer, line_index: usize) -> SyncOutcome {
    let snapshot = Snapshot::capture(buffer).expect("capture");
    unmark_common(buffer, snapshot, id(line_index)).expect("unmark")
}

#[test]
fn mark_copies_node_into_sibling_variant() {
    let mut buffer = MemoryBuffer::new(HUB_TWO_VARIANTS);

    let outcome = mark(&mut buffer, 1);
    let SyncOutcome::Committed { rev, edits } = outcome else {
        panic!("expected commit");
    };
    assert_eq!(rev, 1);
    assert!(edits.contains(&LineEdit::InsertLines {
        after: 3,
        lines: vec!["  B #common#".to_owned()],
    }));
    assert_eq!(buffer.text(), "A (x=1)\n  B #common#\nA (x=2)\n  C\n  B #common#\n");
}

#[test]
fn marking_twice_is_a_no_op() {
    let mut buffer = MemoryBuffer::new(HUB_TWO_VARIANTS);
    assert!(mark(&mut buffer, 1).is_committed());
    let after_first = buffer.text().to_owned();

    assert_eq!(mark(&mut buffer, 1), SyncOutcome::Unchanged);
    assert_eq!(buffer.text(), after_first);
    assert_eq!(buffer.rev(), 1);
}

#[test]
fn unmarking_a_plain_node_is_a_no_op() {
    let mut buffer = MemoryBuffer::new(HUB_TWO_VARIANTS);
    assert_eq!(unmark(&mut buffer, 1), SyncOutcome::Unchanged);
    assert_eq!(buffer.text(), HUB_TWO_VARIANTS);
}

#[test]
fn unmark_restores_text_and_mark_again_reproduces_copies() {
    let mut buffer = MemoryBuffer::new(HUB_TWO_VARIANTS);
    assert!(mark(&mut buffer, 1).is_committed());
    let marked = buffer.text().to_owned();

    assert!(unmark(&mut buffer, 1).is_committed());
    assert_eq!(buffer.text(), HUB_TWO_VARIANTS);

    assert!(mark(&mut buffer, 1).is_committed());
    assert_eq!(buffer.text(), marked);
}

#[test]
fn mark_propagates_ancestor_chain_with_deeper_indentation() {
    let mut buffer = MemoryBuffer::new(NESTED_HUB);
    assert!(mark(&mut buffer, 3).is_committed());

    assert_eq!(
        buffer.text(),
        "Root\n  Step (mode=fast)\n    Group #common#\n      Leaf #common#\n  Step (mode=slow)\n    Other\n    Group #common#\n      Leaf #common#\n"
    );

    let snapshot = Snapshot::from_text(0, buffer.text());
    let hub = snapshot.node(id(1)).unwrap();
    assert_eq!(hub.variants(), [id(1), id(4)]);
    assert_eq!(snapshot.node(id(7)).unwrap().parent_id(), Some(id(6)));
    assert_eq!(snapshot.node(id(6)).unwrap().parent_id(), Some(id(4)));
}

#[test]
fn unmark_keeps_owner_and_removes_copied_chain() {
    let mut buffer = MemoryBuffer::new(NESTED_HUB);
    assert!(mark(&mut buffer, 3).is_committed());

    let outcome = unmark(&mut buffer, 3);
    let SyncOutcome::Committed { edits, .. } = outcome else {
        panic!("expected commit");
    };
    assert!(edits.contains(&LineEdit::DeleteLines {
        line_index: 6,
        count: 2
    }));
    assert_eq!(
        buffer.text(),
        "Root\n  Step (mode=fast)\n    Group #common#\n      Leaf\n  Step (mode=slow)\n    Other\n"
    );
}

#[test]
fn unmark_keeps_copied_ancestor_with_other_children() {
    let text = "A (x=1)\n  B\n    C\n    D\nA (x=2)\n";
    let mut buffer = MemoryBuffer::new(text);
    assert!(mark(&mut buffer, 2).is_committed());
    assert!(mark(&mut buffer, 4).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common#\n    C #common#\n    D #common#\nA (x=2)\n  B #common#\n    C #common#\n    D #common#\n"
    );

    assert!(unmark(&mut buffer, 2).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common#\n    C\n    D #common#\nA (x=2)\n  B #common#\n    D #common#\n"
    );
}

#[test]
fn partially_propagated_chain_is_completed() {
    let mut buffer = MemoryBuffer::new("A (x=1)\n  B\n    C\nA (x=2)\n  B #common#\n");
    assert!(mark(&mut buffer, 2).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common#\n    C #common#\nA (x=2)\n  B #common#\n    C #common#\n"
    );
}

#[test]
fn existing_node_elsewhere_in_variant_becomes_anchor() {
    let mut buffer = MemoryBuffer::new("A (x=1)\n  B\n    C\nA (x=2)\n  D\n    B\n");
    assert!(mark(&mut buffer, 2).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common#\n    C #common#\nA (x=2)\n  D\n    B #common#\n      C #common#\n"
    );
}

#[test]
fn unrelated_duplicate_content_is_taken_as_anchor() {
    let mut buffer = MemoryBuffer::new("A (x=1)\n  B\n    C\nA (x=2)\n  X\n    C\n");
    assert!(mark(&mut buffer, 2).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common#\n    C #common#\nA (x=2)\n  X\n    C #common#\n"
    );
}

#[test]
fn mark_reaches_every_other_variant() {
    let mut buffer = MemoryBuffer::new("A (x=1)\n  B\nA (x=2)\nA (x=3)\n  C\n");
    assert!(mark(&mut buffer, 1).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common#\nA (x=2)\n  B #common#\nA (x=3)\n  C\n  B #common#\n"
    );
}

#[test]
fn copies_drop_identity_comments_but_keep_tags() {
    let mut buffer = MemoryBuffer::new("A (x=1)\n  B <!-- fid:f1 --> <!-- tags:t -->\nA (x=2)\n");
    assert!(mark(&mut buffer, 1).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common# <!-- fid:f1 --> <!-- tags:t -->\nA (x=2)\n  B #common# <!-- tags:t -->\n"
    );
}

#[test]
fn node_outside_hub_only_toggles_its_own_marker() {
    let mut buffer = MemoryBuffer::new("A\n  B\n");

    let snapshot = Snapshot::capture(&mut buffer).unwrap();
    assert!(toggle_common(&mut buffer, snapshot, id(1)).unwrap().is_committed());
    assert_eq!(buffer.text(), "A\n  B #common#\n");

    let snapshot = Snapshot::capture(&mut buffer).unwrap();
    assert!(toggle_common(&mut buffer, snapshot, id(1)).unwrap().is_committed());
    assert_eq!(buffer.text(), "A\n  B\n");
}

#[test]
fn crlf_buffer_is_committed_with_unix_newlines() {
    let mut buffer = MemoryBuffer::new("A (x=1)\r\n  B\r\nA (x=2)\r\n");
    assert!(mark(&mut buffer, 1).is_committed());
    assert_eq!(buffer.text(), "A (x=1)\n  B #common#\nA (x=2)\n  B #common#\n");
}

#[test]
fn stale_snapshot_target_is_ignored() {
    let mut buffer = MemoryBuffer::new(HUB_TWO_VARIANTS);
    let snapshot = Snapshot::capture(&mut buffer).unwrap();

    buffer.set_text(format!("Intro\n{HUB_TWO_VARIANTS}"));
    let outcome = mark_common(&mut buffer, snapshot, id(1)).unwrap();
    assert_eq!(outcome, SyncOutcome::Unchanged);
    assert_eq!(buffer.text(), format!("Intro\n{HUB_TWO_VARIANTS}"));
}

#[test]
fn missing_target_is_ignored() {
    let mut buffer = MemoryBuffer::new(HUB_TWO_VARIANTS);
    let snapshot = Snapshot::capture(&mut buffer).unwrap();
    assert_eq!(
        mark_common(&mut buffer, snapshot, id(42)).unwrap(),
        SyncOutcome::Unchanged
    );
}

/// Buffer whose text is replaced by a peer right before every commit.
struct RacingBuffer {
    inner: MemoryBuffer,
}

impl TextBuffer for RacingBuffer {
    fn read(&mut self) -> Result<BufferRead, BufferError> {
        self.inner.read()
    }

    fn transact(&mut self, base_rev: u64, text: &str) -> Result<u64, BufferError> {
        let peer = format!("{}\n", self.inner.text().trim_end());
        self.inner.set_text(peer);
        self.inner.transact(base_rev, text)
    }
}

#[test]
fn concurrent_change_surfaces_as_conflict() {
    let mut buffer = RacingBuffer {
        inner: MemoryBuffer::new(HUB_TWO_VARIANTS),
    };
    let snapshot = Snapshot::capture(&mut buffer).unwrap();

    let err = mark_common(&mut buffer, snapshot, id(1)).unwrap_err();
    assert!(matches!(
        err,
        SyncError::Buffer(BufferError::Conflict {
            base_rev: 0,
            current_rev: 1
        })
    ));
    assert_eq!(buffer.inner.text(), HUB_TWO_VARIANTS);
}

#[test]
fn marker_text_inside_a_comment_does_not_count_as_tagged() {
    let mut buffer = MemoryBuffer::new("A (x=1)\n  B <!-- ann:see #common# -->\nA (x=2)\n");
    assert!(mark(&mut buffer, 1).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B #common# <!-- ann:see #common# -->\nA (x=2)\n  B #common# <!-- ann:see #common# -->\n"
    );

    let snapshot = Snapshot::capture(&mut buffer).expect("capture");
    assert!(snapshot.node(id(1)).expect("owner").is_common());
    assert!(snapshot.node(id(3)).expect("copy").is_common());

    assert!(unmark(&mut buffer, 1).is_committed());
    assert_eq!(
        buffer.text(),
        "A (x=1)\n  B <!-- ann:see #common# -->\nA (x=2)\n"
    );
}

#[test]
fn hub_nested_in_a_variant_syncs_only_its_own_variants() {
    let text = "A (v=1)\n  B (w=1)\n    C\n  B (w=2)\nA (v=2)\n";
    let mut buffer = MemoryBuffer::new(text);

    assert!(mark(&mut buffer, 2).is_committed());
    assert_eq!(
        buffer.text(),
        "A (v=1)\n  B (w=1)\n    C #common#\n  B (w=2)\n    C #common#\nA (v=2)\n"
    );

    assert!(unmark(&mut buffer, 2).is_committed());
    assert_eq!(buffer.text(), text);
}
