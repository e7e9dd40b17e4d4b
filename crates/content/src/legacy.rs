//! Parsers for the older string-encoded payloads.
//!
//! Before sections carried nested records, the backend sent recall notes, a single quiz
//! question and the glossary as opaque strings. Courses generated back then still come
//! through this path. Every entry gets a fresh [`LocalId`] since none of these payloads
//! carry identifiers.

use crate::config::ContentConfig;
use crate::model::{GlossaryTerm, QuizQuestion, RecallNote};
use crate::normalize::{
    option_placeholder, resolve_correct_answer_index, truthy_text, value_text, NO_QUESTION,
    OPTION_KEYS,
};
use mc_uuid::LocalId;
use serde_json::Value;

/// Parse recall notes from either a JSON array or a bulleted list.
///
/// A JSON array yields one note per entry: strings are trimmed, anything else is kept as
/// its JSON text. Otherwise every line that starts with one or more `-` becomes a note,
/// with the dashes and the whitespace after them removed.
pub fn parse_recall_notes(text: &str, config: &ContentConfig) -> Vec<RecallNote> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => {
            return items
                .iter()
                .map(|item| match item {
                    Value::String(s) => new_note(s.trim(), config),
                    other => new_note(&other.to_string(), config),
                })
                .collect();
        }
        Ok(_) => tracing::debug!("recall notes are JSON but not an array, reading bullets"),
        Err(err) => tracing::debug!("recall notes are not JSON ({err}), reading bullets"),
    }

    text.lines()
        .filter_map(|line| {
            let rest = line.trim_start_matches('-');
            (rest.len() < line.len()).then(|| new_note(rest.trim(), config))
        })
        .collect()
}

fn new_note(content: &str, config: &ContentConfig) -> RecallNote {
    RecallNote {
        id: LocalId::new().to_string(),
        content: content.to_owned(),
        timestamp: config.render_now(),
    }
}

/// Parse a single quiz question object `{question, options: {A..D}, correct_answer}`.
///
/// The answer letter defaults to `"A"`, and only its first character counts (`"B)"` is
/// option B). A non-string answer goes through [`resolve_correct_answer_index`].
/// Returns an empty list if the text is not a JSON object or has no `options`.
pub fn parse_quiz(text: &str) -> Vec<QuizQuestion> {
    let quiz = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(quiz)) => quiz,
        Ok(_) => {
            tracing::debug!("quiz payload is not a JSON object");
            return Vec::new();
        }
        Err(err) => {
            tracing::debug!("quiz payload is not JSON: {err}");
            return Vec::new();
        }
    };

    let options = match quiz.get("options") {
        None | Some(Value::Null) => return Vec::new(),
        Some(options) => OPTION_KEYS
            .iter()
            .map(|key| {
                options
                    .get(*key)
                    .and_then(truthy_text)
                    .unwrap_or_else(|| option_placeholder(key))
            })
            .collect(),
    };

    let correct_answer_index = match quiz.get("correct_answer") {
        Some(Value::String(letter)) if !letter.is_empty() => first_letter_offset(letter),
        None | Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::String(_)) => 0,
        Some(other) => resolve_correct_answer_index(other),
    };

    let text = quiz
        .get("question")
        .and_then(truthy_text)
        .unwrap_or_else(|| NO_QUESTION.to_owned());

    vec![QuizQuestion {
        id: LocalId::new().to_string(),
        text,
        options,
        correct_answer_index,
    }]
}

fn first_letter_offset(letter: &str) -> i64 {
    letter
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .map(|c| i64::from(u32::from(c)) - i64::from(u32::from('A')))
        .unwrap_or(0)
}

/// Parse a glossary object `{term: definition, ...}` in document order.
///
/// Non-string definitions are kept as their JSON text. Arrays and strings are read
/// entry-wise with their index as the term, so `["x"]` gives the term `"0"`. Any other
/// value yields an empty list.
pub fn parse_glossary(text: &str) -> Vec<GlossaryTerm> {
    let entries: Vec<(String, String)> = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(entries)) => entries
            .into_iter()
            .map(|(term, definition)| (term, value_text(&definition)))
            .collect(),
        Ok(Value::Array(items)) => {
            tracing::debug!("glossary payload is an array, keying entries by index");
            items
                .iter()
                .enumerate()
                .map(|(i, definition)| (i.to_string(), value_text(definition)))
                .collect()
        }
        Ok(Value::String(s)) => {
            tracing::debug!("glossary payload is a string, keying characters by index");
            s.chars()
                .enumerate()
                .map(|(i, c)| (i.to_string(), c.to_string()))
                .collect()
        }
        Ok(_) => {
            tracing::debug!("glossary payload has no entries");
            Vec::new()
        }
        Err(err) => {
            tracing::debug!("glossary payload is not JSON: {err}");
            Vec::new()
        }
    };

    entries
        .into_iter()
        .map(|(term, definition)| GlossaryTerm {
            id: LocalId::new().to_string(),
            term,
            definition,
        })
        .collect()
}
