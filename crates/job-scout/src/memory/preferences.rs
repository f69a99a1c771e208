//! Interpreting search hits as the user's current preference.
//!
//! Two passes, in order:
//!
//! 1. **Structured**: hits whose metadata (or raw text) decodes as a
//!    `job_preference` fact. The newest by `updated_at`/`created_at` wins;
//!    without timestamps the first hit wins.
//! 2. **Heuristic**: free-text hits mentioning "preferred job role" and
//!    "preferred location". This depends on how the memory service phrases
//!    what it stored, so it only runs when no structured fact was found.

use chrono::{DateTime, FixedOffset};

use super::MemorySnippet;
use crate::model::{PreferenceRecord, StoredFact};

const ROLE_LEAD_IN: &str = "preferred job role";
const LOCATION_LEAD_IN: &str = "preferred location";

pub fn resolve_preference(snippets: &[MemorySnippet]) -> Option<PreferenceRecord> {
    extract_structured(snippets).or_else(|| extract_from_text(snippets))
}

pub fn extract_structured(snippets: &[MemorySnippet]) -> Option<PreferenceRecord> {
    let mut best: Option<(Option<DateTime<FixedOffset>>, PreferenceRecord)> = None;

    for snippet in snippets {
        let Some(pref) = decode_preference(snippet) else {
            continue;
        };
        let stamp = timestamp(snippet);

        let replace = match &best {
            None => true,
            Some((best_stamp, _)) => stamp.is_some() && stamp >= *best_stamp,
        };
        if replace {
            best = Some((stamp, pref));
        }
    }

    best.map(|(_, pref)| pref)
}

/// Substring heuristic over free text. Later hits override earlier ones.
pub fn extract_from_text(snippets: &[MemorySnippet]) -> Option<PreferenceRecord> {
    let mut role = None;
    let mut location = None;

    for snippet in snippets {
        if let Some(found) = after_lead_in(&snippet.memory, ROLE_LEAD_IN) {
            role = Some(found);
        }
        if let Some(found) = after_lead_in(&snippet.memory, LOCATION_LEAD_IN) {
            location = Some(found);
        }
    }

    Some(PreferenceRecord::new(role?, location?))
}

fn decode_preference(snippet: &MemorySnippet) -> Option<PreferenceRecord> {
    let fact = snippet
        .metadata
        .clone()
        .and_then(|meta| serde_json::from_value::<StoredFact>(meta).ok())
        .or_else(|| serde_json::from_str::<StoredFact>(&snippet.memory).ok())?;

    match fact {
        StoredFact::JobPreference { role, location } if !role.is_empty() && !location.is_empty() => {
            Some(PreferenceRecord { role, location })
        }
        _ => None,
    }
}

fn timestamp(snippet: &MemorySnippet) -> Option<DateTime<FixedOffset>> {
    snippet
        .updated_at
        .as_deref()
        .or(snippet.created_at.as_deref())
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}

/// Text following `lead_in` (case-insensitive), minus a leading "is" or ":"
/// and a trailing period. `None` if absent or empty.
fn after_lead_in(text: &str, lead_in: &str) -> Option<String> {
    // ASCII lowering keeps byte offsets aligned with `text`.
    let start = text.to_ascii_lowercase().find(lead_in)? + lead_in.len();
    let mut rest = text[start..].trim_start();

    if let Some(stripped) = rest.strip_prefix(':') {
        rest = stripped;
    } else if rest.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("is ")) {
        rest = &rest[3..];
    }

    let value = rest.trim().trim_end_matches('.').trim_end();
    (!value.is_empty()).then(|| value.to_string())
}
