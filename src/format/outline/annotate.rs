// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sidecar comment scanning.
//!
//! A line carries its metadata as trailing `<!-- key:value -->` comments. Recognized comments are
//! decoded into [`NodeAttribute`]s and removed from the text; anything else inside `<!-- -->`
//! stays literal.

use memchr::memmem;
use smol_str::SmolStr;

use crate::model::attribute::{AttributeKey, IdList, NodeAttribute};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Maximum length of a data-object attribute id.
pub const MAX_ATTRIBUTE_ID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedLine {
    pub text: String,
    pub attributes: Vec<NodeAttribute>,
}

/// Decodes and strips every recognized comment of `line`.
pub fn annotate_line(line: &str) -> AnnotatedLine {
    let mut attributes = Vec::new();
    let text = split_comments(line, |attribute| {
        attributes.push(attribute);
        true
    });
    AnnotatedLine { text, attributes }
}

/// Removes comments whose key identifies a single node (`fid`, `sfid`, `expid`).
pub fn strip_identity_comments(line: &str) -> String {
    split_comments(line, |attribute| attribute.key().is_identity())
}

/// Single pass over `line`: every recognized comment is handed to `strip`, which decides whether
/// it is removed from the returned text.
pub(crate) fn split_comments(line: &str, mut strip: impl FnMut(NodeAttribute) -> bool) -> String {
    let open_finder = memmem::Finder::new(COMMENT_OPEN);
    let close_finder = memmem::Finder::new(COMMENT_CLOSE);

    let mut out = String::with_capacity(line.len());
    let mut pos = 0usize;
    let mut skip_leading_ws = false;

    while let Some(found) = open_finder.find(&line.as_bytes()[pos..]) {
        let open = pos + found;
        let body_start = open + COMMENT_OPEN.len();
        let Some(close_rel) = close_finder.find(&line.as_bytes()[body_start..]) else {
            break;
        };
        let body_end = body_start + close_rel;
        let end = body_end + COMMENT_CLOSE.len();

        push_segment(&mut out, &line[pos..open], skip_leading_ws);
        skip_leading_ws = false;

        let removed = match parse_comment(&line[body_start..body_end]) {
            Some(attribute) => strip(attribute),
            None => false,
        };
        if removed {
            if out.trim().is_empty() {
                skip_leading_ws = true;
            } else {
                let kept = out.trim_end().len();
                out.truncate(kept);
            }
        } else {
            out.push_str(&line[open..end]);
        }
        pos = end;
    }

    push_segment(&mut out, &line[pos..], skip_leading_ws);
    out
}

fn push_segment(out: &mut String, segment: &str, skip_leading_ws: bool) {
    if skip_leading_ws {
        out.push_str(segment.trim_start());
    } else {
        out.push_str(segment);
    }
}

/// Decodes the body of one `<!-- ... -->` comment. Unknown keys and unusable values yield `None`.
pub fn parse_comment(body: &str) -> Option<NodeAttribute> {
    let (key, value) = body.trim().split_once(':')?;
    let key = AttributeKey::from_key(key.trim())?;
    let value = value.trim();

    let attribute = match key {
        AttributeKey::Icon => NodeAttribute::Icon(non_empty(value)?),
        AttributeKey::DataObject => NodeAttribute::DataObject(non_empty(value)?),
        AttributeKey::DataObjectAttributes => NodeAttribute::DataObjectAttributes(non_empty_list(
            sanitize_id_list(value, Some(MAX_ATTRIBUTE_ID_LEN)),
        )?),
        AttributeKey::Tags => NodeAttribute::Tags(non_empty_list(sanitize_id_list(value, None))?),
        AttributeKey::Annotation => NodeAttribute::Annotation(decode_annotation(value)),
        AttributeKey::FlowTabId => NodeAttribute::FlowTabId(non_empty(value)?),
        AttributeKey::SystemFlowId => NodeAttribute::SystemFlowId(non_empty(value)?),
        AttributeKey::StatusAttributes => {
            NodeAttribute::StatusAttributes(non_empty_list(sanitize_id_list(value, None))?)
        }
        AttributeKey::ExpandedId => {
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            NodeAttribute::ExpandedId(value.parse().ok()?)
        }
    };
    Some(attribute)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn non_empty_list(list: IdList) -> Option<IdList> {
    (!list.is_empty()).then_some(list)
}

/// Splits a comma-separated id list, drops characters that could break the surrounding comment,
/// and removes duplicates while keeping first occurrences.
pub fn sanitize_id_list(raw: &str, max_len: Option<usize>) -> IdList {
    let mut out = IdList::new();
    for part in raw.split(',') {
        let cleaned: String = part
            .chars()
            .filter(|ch| !matches!(ch, '\n' | '\r' | '<' | '>'))
            .collect::<String>()
            .replace("--", "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }
        let id: SmolStr = match max_len {
            Some(max) => cleaned.chars().take(max).collect::<String>().into(),
            None => cleaned.into(),
        };
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Percent-decodes an annotation (falling back to the raw text when it is not valid UTF-8 after
/// decoding) and turns literal `\n` escapes into newlines.
pub fn decode_annotation(raw: &str) -> String {
    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    };
    unescape_newlines(&decoded)
}

pub(crate) fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

pub(crate) fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}
