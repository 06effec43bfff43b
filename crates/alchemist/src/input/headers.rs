//! Header normalization: loosely named sheet columns to canonical fields.
//!
//! Matching is on a folded form of the header (lower-case, with whitespace,
//! `_` and `-` removed) against a fixed synonym table per entity kind.
//! Unknown headers pass through unchanged; normalization never fails.

use crate::entity::fields::*;
use crate::entity::{EntityKind, RawRow};

/// Synonym table: folded header -> canonical field.
type SynonymTable = &'static [(&'static str, &'static str)];

const CLIENT_SYNONYMS: SynonymTable = &[
    ("clientid", CLIENT_ID),
    ("client", CLIENT_ID),
    ("clientname", CLIENT_NAME),
    ("name", CLIENT_NAME),
    ("prioritylevel", PRIORITY_LEVEL),
    ("priority", PRIORITY_LEVEL),
    ("requestedtaskids", REQUESTED_TASK_IDS),
    ("requestedtasks", REQUESTED_TASK_IDS),
    ("taskids", REQUESTED_TASK_IDS),
    ("grouptag", GROUP_TAG),
    ("group", GROUP_TAG),
    ("attributesjson", ATTRIBUTES_JSON),
    ("attributes", ATTRIBUTES_JSON),
];

const WORKER_SYNONYMS: SynonymTable = &[
    ("workerid", WORKER_ID),
    ("worker", WORKER_ID),
    ("workername", WORKER_NAME),
    ("name", WORKER_NAME),
    ("skills", SKILLS),
    ("skill", SKILLS),
    ("availableslots", AVAILABLE_SLOTS),
    ("slots", AVAILABLE_SLOTS),
    ("maxloadperphase", MAX_LOAD_PER_PHASE),
    ("maxload", MAX_LOAD_PER_PHASE),
    ("workergroup", WORKER_GROUP),
    ("group", WORKER_GROUP),
    ("qualificationlevel", QUALIFICATION_LEVEL),
    ("qualification", QUALIFICATION_LEVEL),
];

const TASK_SYNONYMS: SynonymTable = &[
    ("taskid", TASK_ID),
    ("task", TASK_ID),
    ("taskname", TASK_NAME),
    ("name", TASK_NAME),
    ("category", CATEGORY),
    ("duration", DURATION),
    ("requiredskills", REQUIRED_SKILLS),
    ("skills", REQUIRED_SKILLS),
    ("preferredphases", PREFERRED_PHASES),
    ("phases", PREFERRED_PHASES),
    ("maxconcurrent", MAX_CONCURRENT),
];

fn synonyms(kind: EntityKind) -> SynonymTable {
    match kind {
        EntityKind::Client => CLIENT_SYNONYMS,
        EntityKind::Worker => WORKER_SYNONYMS,
        EntityKind::Task => TASK_SYNONYMS,
    }
}

fn fold(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map one raw header to its canonical name for `kind`.
pub fn normalize_header(raw: &str, kind: EntityKind) -> String {
    let folded = fold(raw);
    synonyms(kind)
        .iter()
        .find(|(synonym, _)| *synonym == folded)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Map a header sequence to canonical names; output has the same length.
pub fn normalize_headers<S: AsRef<str>>(raw: &[S], kind: EntityKind) -> Vec<String> {
    raw.iter()
        .map(|header| normalize_header(header.as_ref(), kind))
        .collect()
}

/// Rename the keys of a raw row to canonical names.
///
/// If two raw headers fold onto the same canonical field, the first one wins
/// and the later cell is kept under its original header.
pub fn normalize_row(row: RawRow, kind: EntityKind) -> RawRow {
    let mut normalized = RawRow::with_capacity(row.len());
    for (header, cell) in row {
        let canonical = normalize_header(&header, kind);
        if normalized.contains_key(&canonical) {
            normalized.insert(header, cell);
        } else {
            normalized.insert(canonical, cell);
        }
    }
    normalized
}
