//! Ternary status extraction from remote responses
//!
//! The service reports its status under one of several field names. The
//! first field present wins; a value that does not clearly say success or
//! failure resolves to Pending rather than to an error.

use serde_json::Value;
use ternion_core::Trit;
use tracing::debug;

/// Candidate status keys, tried in order: localized, English, generic.
pub const STATUS_KEYS: &[&str] = &["상태", "state", "status"];

/// Korean markers match anywhere in the text.
const SUCCESS_MARKERS: &[&str] = &["성공"];
const FAILURE_MARKERS: &[&str] = &["실패"];

/// English stems match at the start of a word not preceded by a negation,
/// so "unsuccessful" and "not successful" say nothing.
const SUCCESS_STEMS: &[&str] = &["success", "succeed"];
const FAILURE_STEMS: &[&str] = &["fail"];
const NEGATIONS: &[&str] = &["not", "no", "non", "never"];

/// Read the ternary state out of a decoded response body.
pub fn state_from_response(body: &Value) -> Trit {
    let Some((key, value)) = STATUS_KEYS
        .iter()
        .find_map(|key| body.get(*key).map(|v| (*key, v)))
    else {
        debug!("response carries no status field, defaulting to pending");
        return Trit::Pending;
    };

    match parse_status(value) {
        Some(trit) => trit,
        None => {
            debug!(key, value = %value, "ambiguous status, defaulting to pending");
            Trit::Pending
        }
    }
}

/// Interpret one status value. `None` when it is ambiguous.
pub fn parse_status(value: &Value) -> Option<Trit> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some(Trit::Success),
        Value::Bool(false) => Some(Trit::Failed),
        Value::Number(n) => n
            .as_i64()
            .map(Trit::from_signed)
            .or_else(|| n.as_f64().map(float_trit)),
        Value::String(s) => parse_status_text(s),
        other => parse_status_text(&other.to_string()),
    }
}

fn float_trit(f: f64) -> Trit {
    if f > 0.0 {
        Trit::Success
    } else if f < 0.0 {
        Trit::Failed
    } else {
        Trit::Pending
    }
}

fn parse_status_text(raw: &str) -> Option<Trit> {
    let text = raw.trim();
    match text {
        "P" | "+" | "+1" | "1" => return Some(Trit::Success),
        "O" | "0" => return Some(Trit::Pending),
        "T" | "-" | "-1" => return Some(Trit::Failed),
        _ => {}
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let success = SUCCESS_MARKERS.iter().any(|m| lowered.contains(m))
        || has_stem(&words, SUCCESS_STEMS);
    let failure = FAILURE_MARKERS.iter().any(|m| lowered.contains(m))
        || has_stem(&words, FAILURE_STEMS);
    match (success, failure) {
        (true, false) => Some(Trit::Success),
        (false, true) => Some(Trit::Failed),
        _ => None,
    }
}

fn has_stem(words: &[&str], stems: &[&str]) -> bool {
    words.iter().enumerate().any(|(i, word)| {
        stems.iter().any(|stem| word.starts_with(stem))
            && !(i > 0 && NEGATIONS.contains(&words[i - 1]))
    })
}
