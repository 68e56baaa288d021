// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural and linkage checks for outline documents.
//!
//! Verification reads the tree region line by line plus the JSON side data blocks
//! (`tag-store`, `data-objects`, `expanded-*`, `flowtab-swimlane-*`) and reports issues without
//! touching the document.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use serde_json::Value;
use smol_str::SmolStr;

use crate::format::outline::{
    annotate_line, fenced_blocks, find_separator, is_fence, metadata_blocks_with_errors,
    normalize_newlines,
};
use crate::model::{Marker, NodeId, NodeMetadata};

pub const ACTORS_GROUP: &str = "tg-actors";
pub const UI_SURFACE_GROUP: &str = "tg-uiSurface";
pub const OBJECT_NAME_ATTR_ID: &str = "__objectName__";

const ACTOR_TAG_PREFIX: &str = "actor-";
const SWIMLANE_BLOCK_PREFIX: &str = "flowtab-swimlane-";
const EXPANDED_METADATA_PREFIX: &str = "expanded-metadata-";
const EXPANDED_GRID_PREFIX: &str = "expanded-grid-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    UnclosedCodeBlock,
    InvalidJson,
    ActorPrefixInTitle,
    MissingTagStore,
    UnknownTagId,
    MissingRequiredTagGroup,
    MissingActorTag,
    MultipleActorTags,
    DoattrsWithoutDo,
    UnknownDataObjectAttributeId,
    MissingUiSurfaceTag,
    CrossTimeframeSignal,
    SwimlaneNodeMissingActorTag,
    SwimlaneActorMismatch,
}

impl IssueCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnclosedCodeBlock => "UNCLOSED_CODE_BLOCK",
            Self::InvalidJson => "INVALID_JSON",
            Self::ActorPrefixInTitle => "ACTOR_PREFIX_IN_TITLE",
            Self::MissingTagStore => "MISSING_TAG_STORE",
            Self::UnknownTagId => "UNKNOWN_TAG_ID",
            Self::MissingRequiredTagGroup => "MISSING_REQUIRED_TAG_GROUP",
            Self::MissingActorTag => "MISSING_ACTOR_TAG",
            Self::MultipleActorTags => "MULTIPLE_ACTOR_TAGS",
            Self::DoattrsWithoutDo => "DOATTRS_WITHOUT_DO",
            Self::UnknownDataObjectAttributeId => "UNKNOWN_DATA_OBJECT_ATTRIBUTE_ID",
            Self::MissingUiSurfaceTag => "MISSING_UI_SURFACE_TAG",
            Self::CrossTimeframeSignal => "CROSS_TIMEFRAME_SIGNAL",
            Self::SwimlaneNodeMissingActorTag => "SWIMLANE_NODE_MISSING_ACTOR_TAG",
            Self::SwimlaneActorMismatch => "SWIMLANE_ACTOR_MISMATCH",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::UnknownDataObjectAttributeId
            | Self::CrossTimeframeSignal
            | Self::SwimlaneNodeMissingActorTag
            | Self::SwimlaneActorMismatch => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
}

impl Issue {
    fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:7} {}: {}", self.severity.to_string(), self.code, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    issues: Vec<Issue>,
}

impl VerifyReport {
    /// Issues in discovery order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Errors first, then warnings, each in discovery order.
    pub fn sorted(&self) -> Vec<&Issue> {
        let mut sorted: Vec<&Issue> = self.issues.iter().collect();
        sorted.sort_by_key(|issue| issue.severity);
        sorted
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    fn push(&mut self, code: IssueCode, message: impl Into<String>) {
        self.issues.push(Issue::new(code, message));
    }
}

#[derive(Debug, Default)]
struct TagStore {
    groups: HashSet<String>,
    tag_groups: HashMap<String, String>,
}

impl TagStore {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut store = Self::default();
        for group in object.get("groups").and_then(Value::as_array).into_iter().flatten() {
            if let Some(id) = group.get("id").and_then(Value::as_str) {
                store.groups.insert(id.to_owned());
            }
        }
        for tag in object.get("tags").and_then(Value::as_array).into_iter().flatten() {
            let id = tag.get("id").and_then(Value::as_str);
            let group = tag.get("groupId").and_then(Value::as_str);
            if let (Some(id), Some(group)) = (id, group) {
                store.tag_groups.insert(id.to_owned(), group.to_owned());
            }
        }
        Some(store)
    }

    fn group_of(&self, tag: &str) -> Option<&str> {
        self.tag_groups.get(tag).map(String::as_str)
    }
}

fn actor_tags<'a>(tags: &'a [SmolStr], store: Option<&TagStore>) -> Vec<&'a str> {
    tags.iter()
        .map(|tag| tag.as_str())
        .filter(|tag| {
            store.and_then(|store| store.group_of(tag)) == Some(ACTORS_GROUP)
                || tag.starts_with(ACTOR_TAG_PREFIX)
        })
        .collect()
}

/// Data object id to the attribute ids it defines (`__objectName__` always included).
fn data_object_attributes(value: Option<&Value>) -> HashMap<String, HashSet<String>> {
    let mut out = HashMap::new();
    let objects = value
        .and_then(|value| value.get("objects"))
        .and_then(Value::as_array);
    for object in objects.into_iter().flatten() {
        let Some(id) = object.get("id").and_then(Value::as_str).map(str::trim) else {
            continue;
        };
        if id.is_empty() {
            continue;
        }
        let mut attributes = HashSet::from([OBJECT_NAME_ATTR_ID.to_owned()]);
        let declared = object
            .get("data")
            .and_then(|data| data.get("attributes"))
            .and_then(Value::as_array);
        for attribute in declared.into_iter().flatten() {
            if let Some(attr_id) = attribute.get("id").and_then(Value::as_str).map(str::trim) {
                if !attr_id.is_empty() {
                    attributes.insert(attr_id.to_owned());
                }
            }
        }
        out.insert(id.to_owned(), attributes);
    }
    out
}

fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("valid verifier regex")
    })
}

fn comment_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"<!--[\s\S]*?-->")
}

fn actor_prefix_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"^(system|staff|applicant|partner)\s*:")
}

fn timeframe_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(
        &CELL,
        r"\b(await|waiting|wait|queued|queue|2-4\s*weeks|weeks?|months?|within\s+one\s+month|mail|postal|partner\s+assessment|assessment|ica)\b",
    )
}

fn staff_lane_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"\b(staff|admin|reviewer|operator|agent)\b")
}

fn applicant_lane_re() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"\b(applicant|customer|user|visitor|student)\b")
}

/// Title text used for the actor-prefix check: comments and markers removed, spacing collapsed.
fn title_for_prefix_check(line: &str) -> String {
    let mut title = comment_re().replace_all(line.trim_start(), "").into_owned();
    for marker in [Marker::FlowTab, Marker::Flow, Marker::Common] {
        title = title.replace(marker.token(), " ");
    }
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Actor tag a swimlane label implies, if any.
pub fn expected_actor_for_lane(label: &str) -> Option<&'static str> {
    let label = label.to_lowercase();
    if label.is_empty() {
        return None;
    }
    if label.contains("system") {
        return Some("actor-system");
    }
    if staff_lane_re().is_match(&label) {
        return Some("actor-staff");
    }
    if label.contains("partner") {
        return Some("actor-partner");
    }
    if applicant_lane_re().is_match(&label) {
        return Some("actor-applicant");
    }
    None
}

fn line_metadata(line: &str) -> NodeMetadata {
    NodeMetadata::from_attributes(annotate_line(line).attributes)
}

pub fn verify_document(text: &str) -> VerifyReport {
    let text = normalize_newlines(text);
    let lines: Vec<&str> = text.split('\n').collect();
    let mut report = VerifyReport::default();

    if let Some(start) = fenced_blocks(&text).unclosed {
        report.push(
            IssueCode::UnclosedCodeBlock,
            format!("Unclosed fenced code block starting near line {}.", start + 1),
        );
    }

    let (blocks, errors) = metadata_blocks_with_errors(&text);
    for err in errors {
        report.push(
            IssueCode::InvalidJson,
            format!("Invalid JSON in ```{}```: {}", err.kind, err.message),
        );
    }

    let tag_store = blocks.get("tag-store").and_then(TagStore::from_value);
    let attributes_by_object = data_object_attributes(blocks.get("data-objects"));

    let tree_end = find_separator(&text).unwrap_or(lines.len());
    let mut reported_missing_store = false;
    let mut reported_groups: HashSet<&'static str> = HashSet::new();
    let mut require_tag_store = |report: &mut VerifyReport| {
        if tag_store.is_none() && !reported_missing_store {
            reported_missing_store = true;
            report.push(
                IssueCode::MissingTagStore,
                "Missing ```tag-store``` block (required when using tags and for actor enforcement).",
            );
        }
    };
    let mut require_group = |report: &mut VerifyReport, group: &'static str| {
        if let Some(store) = tag_store.as_ref() {
            if !store.groups.contains(group) && reported_groups.insert(group) {
                report.push(
                    IssueCode::MissingRequiredTagGroup,
                    format!("tag-store missing required group \"{group}\"."),
                );
            }
        }
    };

    let mut in_fence = false;
    for (index, line) in lines[..tree_end].iter().enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;

        if actor_prefix_re().is_match(&title_for_prefix_check(line)) {
            report.push(
                IssueCode::ActorPrefixInTitle,
                format!(
                    "Line {line_no} encodes an actor in the title ('System:/Staff:/Applicant:/Partner:'). Use actor tags + swimlanes instead."
                ),
            );
        }

        let meta = line_metadata(line);
        if !meta.tags.is_empty() {
            require_tag_store(&mut report);
            if let Some(store) = tag_store.as_ref() {
                for tag in &meta.tags {
                    if store.group_of(tag).is_none() {
                        report.push(
                            IssueCode::UnknownTagId,
                            format!("Line {line_no} references unknown tag id \"{tag}\" (not present in tag-store)."),
                        );
                    }
                }
            }
        }

        let is_flow = line.contains(Marker::Flow.token());
        if is_flow {
            require_tag_store(&mut report);
            require_group(&mut report, ACTORS_GROUP);
            let actors = actor_tags(&meta.tags, tag_store.as_ref());
            match actors.len() {
                0 => report.push(
                    IssueCode::MissingActorTag,
                    format!("Line {line_no} is #flow# but has no actor tag (group {ACTORS_GROUP})."),
                ),
                1 => {}
                _ => report.push(
                    IssueCode::MultipleActorTags,
                    format!(
                        "Line {line_no} is #flow# but has multiple actor tags: {}",
                        actors.join(", ")
                    ),
                ),
            }
        }

        if !meta.data_object_attribute_ids.is_empty() {
            match meta.data_object_id.as_deref() {
                None => report.push(
                    IssueCode::DoattrsWithoutDo,
                    format!("Line {line_no} uses <!-- doattrs:... --> but has no <!-- do:... --> on the same line."),
                ),
                Some(object_id) => {
                    if let Some(allowed) = attributes_by_object.get(object_id) {
                        for attr in &meta.data_object_attribute_ids {
                            if !allowed.contains(attr.as_str()) {
                                report.push(
                                    IssueCode::UnknownDataObjectAttributeId,
                                    format!("Line {line_no} references unknown attribute \"{attr}\" for data object \"{object_id}\"."),
                                );
                            }
                        }
                    }
                }
            }
        }

        if meta.expanded_id.is_some() {
            require_tag_store(&mut report);
            require_group(&mut report, UI_SURFACE_GROUP);
            let has_surface = meta.tags.iter().any(|tag| {
                tag_store.as_ref().and_then(|store| store.group_of(tag)) == Some(UI_SURFACE_GROUP)
            });
            if !has_surface {
                report.push(
                    IssueCode::MissingUiSurfaceTag,
                    format!("Line {line_no} has expid but no ui-surface tag (group {UI_SURFACE_GROUP})."),
                );
            }
        }
    }

    for (index, line) in lines[..tree_end].iter().enumerate() {
        if line.contains(Marker::Flow.token()) && timeframe_re().is_match(line) {
            report.push(
                IssueCode::CrossTimeframeSignal,
                format!(
                    "Line {} (#flow#) contains a cross-timeframe/async signal. Non-swimlane #flow# processes should be session-scoped; consider splitting via Flowtab/lifecycle hubs.",
                    index + 1
                ),
            );
        }
    }

    if !attributes_by_object.is_empty() {
        for (kind, value) in &blocks {
            if kind.starts_with(EXPANDED_METADATA_PREFIX) {
                check_expanded_links(&mut report, &attributes_by_object, value, &format!("```{kind}```"));
            } else if kind.starts_with(EXPANDED_GRID_PREFIX) {
                for (idx, grid_node) in value.as_array().into_iter().flatten().enumerate() {
                    let context = format!("```{kind}``` grid node #{}", idx + 1);
                    check_expanded_links(&mut report, &attributes_by_object, grid_node, &context);
                }
            }
        }
    }

    for (kind, value) in &blocks {
        if kind.starts_with(SWIMLANE_BLOCK_PREFIX) {
            check_swimlane(&mut report, kind, value, &lines, tag_store.as_ref());
        }
    }

    report
}

fn check_expanded_links(
    report: &mut VerifyReport,
    attributes_by_object: &HashMap<String, HashSet<String>>,
    value: &Value,
    context: &str,
) {
    let Some(object) = value.as_object() else {
        return;
    };
    let attrs: Vec<&str> = object
        .get("dataObjectAttributeIds")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|attr| !attr.is_empty())
        .collect();
    let has_list = object
        .get("dataObjectAttributeIds")
        .and_then(Value::as_array)
        .is_some_and(|list| !list.is_empty());
    if !has_list {
        return;
    }

    let object_id = object
        .get("dataObjectId")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let Some(object_id) = object_id else {
        report.push(
            IssueCode::DoattrsWithoutDo,
            format!("{context} includes dataObjectAttributeIds but has no dataObjectId."),
        );
        return;
    };
    let Some(allowed) = attributes_by_object.get(object_id) else {
        return;
    };
    for attr in attrs {
        if !allowed.contains(attr) {
            report.push(
                IssueCode::UnknownDataObjectAttributeId,
                format!("{context} references unknown attribute \"{attr}\" for data object \"{object_id}\"."),
            );
        }
    }
}

fn check_swimlane(
    report: &mut VerifyReport,
    kind: &str,
    value: &Value,
    lines: &[&str],
    tag_store: Option<&TagStore>,
) {
    let Some(object) = value.as_object() else {
        return;
    };
    let mut labels: HashMap<&str, &str> = HashMap::new();
    for lane in object.get("lanes").and_then(Value::as_array).into_iter().flatten() {
        let id = lane.get("id").and_then(Value::as_str);
        let label = lane.get("label").and_then(Value::as_str);
        if let (Some(id), Some(label)) = (id, label) {
            labels.insert(id, label);
        }
    }

    let Some(placement) = object.get("placement").and_then(Value::as_object) else {
        return;
    };
    for (node_id, place) in placement {
        let Some(lane_id) = place.get("laneId").and_then(Value::as_str) else {
            continue;
        };
        let label = labels.get(lane_id).copied().unwrap_or("");
        let Some(expected) = expected_actor_for_lane(label) else {
            continue;
        };
        let Ok(id) = node_id.parse::<NodeId>() else {
            continue;
        };
        let Some(line) = lines.get(id.line_index()) else {
            continue;
        };

        let meta = line_metadata(line);
        let actors = actor_tags(&meta.tags, tag_store);
        match actors.as_slice() {
            [] => report.push(
                IssueCode::SwimlaneNodeMissingActorTag,
                format!("{kind} places {node_id} in lane \"{label}\" but node has no actor tag."),
            ),
            [actor] if *actor != expected => report.push(
                IssueCode::SwimlaneActorMismatch,
                format!("{kind} places {node_id} in lane \"{label}\" (implies {expected}) but node actor tag is \"{actor}\"."),
            ),
            _ => {}
        }
    }
}
