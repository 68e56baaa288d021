// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inline `#marker#` tokens.

use memchr::memmem;

use crate::model::attribute::{Marker, MarkerSet};

const COMMENT_OPEN: &str = "<!--";

/// Removes every marker token from `text` and reports which markers were present.
pub fn strip_markers(text: &str) -> (String, MarkerSet) {
    let mut markers = MarkerSet::default();
    let mut out = text.to_owned();
    for marker in Marker::ALL {
        if let Some(stripped) = remove_token(&out, marker.token()) {
            markers.insert(marker);
            out = stripped;
        }
    }
    (out, markers)
}

/// Adds `marker` to a raw buffer line, in front of its trailing comments.
///
/// Returns `None` when the line already carries the marker outside its comments.
pub fn add_marker(line: &str, marker: Marker) -> Option<String> {
    let token = marker.token();
    let (head, comments) = split_at_comments(line);
    if memmem::find(head.as_bytes(), token.as_bytes()).is_some() {
        return None;
    }

    let mut out = String::with_capacity(line.len() + token.len() + 2);
    let head = head.trim_end();
    out.push_str(head);
    if comments.is_empty() {
        out.push(' ');
        out.push_str(token);
        return Some(out);
    }
    if !head.trim().is_empty() {
        out.push(' ');
    }
    out.push_str(token);
    out.push(' ');
    out.push_str(comments);
    Some(out)
}

/// Removes `marker` from a raw buffer line, keeping indentation and comments.
///
/// Returns `None` when the line does not carry the marker outside its comments.
pub fn remove_marker(line: &str, marker: Marker) -> Option<String> {
    let (head, comments) = split_at_comments(line);
    let head = remove_token(head, marker.token())?;
    let mut out = head.trim_end().to_owned();
    if !comments.is_empty() {
        if !out.trim().is_empty() {
            out.push(' ');
        }
        out.push_str(comments.trim_end());
    }
    Some(out)
}

/// Splits `line` at its first `<!--`.
fn split_at_comments(line: &str) -> (&str, &str) {
    match memmem::find(line.as_bytes(), COMMENT_OPEN.as_bytes()) {
        Some(at) => line.split_at(at),
        None => (line, ""),
    }
}

/// Drops every occurrence of `token` together with one separating space.
fn remove_token(text: &str, token: &str) -> Option<String> {
    let finder = memmem::Finder::new(token);
    let bytes = text.as_bytes();
    let mut hits = finder.find_iter(bytes).peekable();
    hits.peek()?;

    let mut out = String::with_capacity(text.len());
    let mut pos = 0usize;
    for start in hits {
        if start < pos {
            continue;
        }
        let mut end = start + token.len();
        let mut head = &text[pos..start];
        if head.ends_with(' ') {
            head = &head[..head.len() - 1];
        } else if bytes.get(end) == Some(&b' ') {
            end += 1;
        }
        out.push_str(head);
        pos = end;
    }
    out.push_str(&text[pos..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::{add_marker, remove_marker, strip_markers};
    use crate::model::attribute::Marker;

    #[test]
    fn strips_all_markers_and_collapses_spacing() {
        let (text, markers) = strip_markers("Pay #flow# now #common#");
        assert_eq!(text, "Pay now");
        assert!(markers.contains(Marker::Flow));
        assert!(markers.contains(Marker::Common));
        assert!(!markers.contains(Marker::FlowTab));
    }

    #[test]
    fn flow_token_does_not_eat_flowtab() {
        let (text, markers) = strip_markers("Tabs #flowtab#");
        assert_eq!(text, "Tabs");
        assert!(markers.contains(Marker::FlowTab));
        assert!(!markers.contains(Marker::Flow));
    }

    #[test]
    fn add_marker_goes_before_comments() {
        assert_eq!(
            add_marker("  Task <!-- icon:x -->", Marker::Common).as_deref(),
            Some("  Task #common# <!-- icon:x -->")
        );
        assert_eq!(
            add_marker("  Task  ", Marker::Common).as_deref(),
            Some("  Task #common#")
        );
        assert_eq!(add_marker("  Task #common#", Marker::Common), None);
    }

    #[test]
    fn remove_marker_keeps_indentation() {
        assert_eq!(
            remove_marker("    Task #common# <!-- icon:x -->", Marker::Common).as_deref(),
            Some("    Task <!-- icon:x -->")
        );
        assert_eq!(
            remove_marker("    Task #common#", Marker::Common).as_deref(),
            Some("    Task")
        );
        assert_eq!(remove_marker("    Task", Marker::Common), None);
    }

    #[test]
    fn tokens_inside_comments_do_not_count() {
        let line = "  B <!-- ann:see #common# -->";
        assert_eq!(
            add_marker(line, Marker::Common).as_deref(),
            Some("  B #common# <!-- ann:see #common# -->")
        );
        assert_eq!(remove_marker(line, Marker::Common), None);
        assert_eq!(
            remove_marker("  B #common# <!-- ann:see #common# -->", Marker::Common).as_deref(),
            Some("  B <!-- ann:see #common# -->")
        );
    }
}
