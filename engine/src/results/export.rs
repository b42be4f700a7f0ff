//! CSV export of stored attempts.
//!
//! Every field is quoted, rows are joined with `\n` and the document starts
//! with a UTF-8 byte-order mark so spreadsheet tools pick the encoding.

use crate::core::format::format_seconds_comma;
use crate::tasks::dot_probe::{Attempt, Phase};
use crate::tasks::stimulus::Side;
use crate::tasks::StroopAttempt;

const BOM: char = '\u{feff}';

pub const DOT_PROBE_HEADERS: [&str; 10] = [
    "ConditionID",
    "Round",
    "EmotionalWord",
    "NeutralWord",
    "EmotionCategory",
    "DotPosition",
    "EmotionalWordSide",
    "CorrectResponse",
    "TimeOut",
    "ResponseTime",
];

pub const STROOP_HEADERS: [&str; 8] = [
    "AttemptID",
    "Round",
    "Condition",
    "Word",
    "Ink",
    "CorrectInk",
    "CorrectResponse",
    "ResponseTimeMs",
];

fn escape_csv(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| escape_csv(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn document(header: String, rows: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&header);
    for row in rows {
        out.push('\n');
        out.push_str(&row);
    }
    out
}

fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// First six characters of an attempt id.
pub fn short_token(id: &str) -> &str {
    match id.char_indices().nth(6) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn dot_position(phase: Phase) -> &'static str {
    match phase {
        Phase::Threat => "Emotional",
        Phase::Neutral => "Neutral",
    }
}

pub fn dot_probe_csv(attempt: &Attempt) -> String {
    let token = short_token(&attempt.id);
    let rows = attempt.results.iter().enumerate().map(|(i, r)| {
        let round = (i + 1).to_string();
        let rt = format_seconds_comma(r.rt_ms);
        csv_line([
            token,
            round.as_str(),
            r.threat_word.as_str(),
            r.neutral_word.as_str(),
            "Threat",
            dot_position(r.phase),
            r.threat_side.map(Side::label).unwrap_or("-"),
            bool_label(r.correct),
            bool_label(r.timed_out),
            rt.as_str(),
        ])
    });
    document(csv_line(DOT_PROBE_HEADERS), rows)
}

pub fn stroop_csv(attempt: &StroopAttempt) -> String {
    let rows = attempt.results.iter().enumerate().map(|(i, r)| {
        let round = (i + 1).to_string();
        let rt = r.rt_ms.to_string();
        csv_line([
            attempt.id.as_str(),
            round.as_str(),
            r.condition.key(),
            r.word.as_str(),
            r.ink.key(),
            r.correct_ink.key(),
            bool_label(r.correct),
            rt.as_str(),
        ])
    });
    document(csv_line(STROOP_HEADERS), rows)
}

/// `<prefix>_<created_at with ':' and '.' replaced by '-'>_<token>.csv`.
pub fn export_file_name(prefix: &str, id: &str, created_at: &str) -> String {
    let stamp = created_at.replace([':', '.'], "-");
    format!("{prefix}_{stamp}_{}.csv", short_token(id))
}

pub fn dot_probe_file_name(attempt: &Attempt) -> String {
    export_file_name("dotprobe", &attempt.id, &attempt.created_at)
}

pub fn stroop_file_name(attempt: &StroopAttempt) -> String {
    export_file_name("stroop", &attempt.id, &attempt.created_at)
}
