//! Normalization of backend payloads into view models.
//!
//! Every operation here is total: malformed input degrades to an empty collection or a
//! placeholder string and is reported to the [`FallbackObserver`] held by the
//! [`Normalizer`]. The free functions at the bottom of the module use a silent observer.
//!
//! Text fallbacks follow JavaScript truthiness, since that is what the backend contract
//! was written against: `""`, `0` and `null` fall back, `"   "` does not.

use crate::model::{
    CodeExample, Course, GlossaryTerm, MathExpression, QuizQuestion, RecallNote, Section,
};
use crate::observer::{Fallback, FallbackKind, FallbackObserver, SilentObserver};
use crate::wire::{
    RawCourse, RawGlossaryTerm, RawPayload, RawQuizQuestion, RawRecallNote, RawSection,
};
use mc_uuid::LocalId;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const UNTITLED_COURSE: &str = "Untitled Microcourse";
pub const UNTITLED_SECTION: &str = "Untitled Section";
pub const NO_CONTENT: &str = "No content provided.";
pub const NO_QUESTION: &str = "No question provided.";

/// Letter keys of an options map, in slot order.
pub const OPTION_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// Placeholder label for an empty option slot, e.g. `"Option C"`.
pub fn option_placeholder(key: &str) -> String {
    format!("Option {key}")
}

/// Normalizer facade that reports degraded fields to an observer.
///
/// ```rust
/// # use mc_content::{Normalizer, TracingObserver};
/// let observer = TracingObserver;
/// let normalizer = Normalizer::new(&observer);
/// let options = normalizer.quiz_options(&serde_json::json!({"A": "x"}));
/// assert_eq!(options, ["x", "Option B", "Option C", "Option D"]);
/// ```
#[derive(Clone, Copy)]
pub struct Normalizer<'a> {
    observer: &'a dyn FallbackObserver,
}

impl Default for Normalizer<'static> {
    fn default() -> Self {
        Self::silent()
    }
}

impl<'a> Normalizer<'a> {
    pub fn new(observer: &'a dyn FallbackObserver) -> Self {
        Self { observer }
    }

    /// A normalizer that absorbs every fallback without reporting it.
    pub fn silent() -> Normalizer<'static> {
        static SILENT: SilentObserver = SilentObserver;
        Normalizer { observer: &SILENT }
    }

    fn report(&self, field: &'static str, kind: FallbackKind, detail: impl Into<String>) {
        self.observer.on_fallback(&Fallback::new(field, kind, detail));
    }

    // ------------------------------------------------------------------------
    // Field-level operations
    // ------------------------------------------------------------------------

    /// Read an array-valued field that may also arrive JSON-encoded.
    ///
    /// - array: each element is read as `T`; elements that do not fit are skipped
    /// - string: decoded as JSON; an array is read as above, anything else gives `[]`
    /// - anything else: `[]`
    ///
    /// With `T = serde_json::Value` a well-formed array comes back unchanged.
    pub fn array_field<T: DeserializeOwned>(&self, field: &'static str, raw: &Value) -> Vec<T> {
        match RawPayload::classify(raw) {
            RawPayload::Array(items) => self.typed_elements(field, items),
            RawPayload::Encoded(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(items)) => self.typed_elements(field, &items),
                Ok(other) => {
                    self.report(
                        field,
                        FallbackKind::UnexpectedShape,
                        format!(
                            "decoded {} where an array was expected",
                            RawPayload::classify(&other).shape_name()
                        ),
                    );
                    Vec::new()
                }
                Err(err) => {
                    // The backend stores "" for sections without examples.
                    if !text.is_empty() {
                        self.report(field, FallbackKind::MalformedJson, err.to_string());
                    }
                    Vec::new()
                }
            },
            RawPayload::Absent => Vec::new(),
            other => {
                self.report(
                    field,
                    FallbackKind::UnexpectedShape,
                    format!("got {} where an array was expected", other.shape_name()),
                );
                Vec::new()
            }
        }
    }

    fn typed_elements<T: DeserializeOwned>(&self, field: &'static str, items: &[Value]) -> Vec<T> {
        items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| match T::deserialize(item) {
                Ok(value) => Some(value),
                Err(err) => {
                    self.report(field, FallbackKind::SkippedElement, format!("[{idx}]: {err}"));
                    None
                }
            })
            .collect()
    }

    /// Read quiz options into display strings.
    ///
    /// Arrays are kept at their own length. Options maps always yield the four slots
    /// `A..D`, with `"Option X"` standing in for a missing or empty key.
    pub fn quiz_options(&self, raw: &Value) -> Vec<String> {
        match RawPayload::classify(raw) {
            RawPayload::Encoded(text) => match serde_json::from_str::<Value>(text) {
                Ok(decoded) => match RawPayload::classify(&decoded) {
                    RawPayload::Array(_) | RawPayload::OptionsMap(_) => {
                        self.decoded_quiz_options(&decoded)
                    }
                    other => {
                        self.report(
                            "options",
                            FallbackKind::UnexpectedShape,
                            format!("decoded {} where options were expected", other.shape_name()),
                        );
                        Vec::new()
                    }
                },
                Err(err) => {
                    self.report("options", FallbackKind::MalformedJson, err.to_string());
                    Vec::new()
                }
            },
            _ => self.decoded_quiz_options(raw),
        }
    }

    fn decoded_quiz_options(&self, raw: &Value) -> Vec<String> {
        match RawPayload::classify(raw) {
            RawPayload::Array(items) => items.iter().map(value_text).collect(),
            RawPayload::OptionsMap(map) => OPTION_KEYS
                .iter()
                .map(|key| match map.get(*key).and_then(truthy_text) {
                    Some(text) => text,
                    None => {
                        let placeholder = option_placeholder(key);
                        self.report(
                            "options",
                            FallbackKind::Placeholder,
                            format!("missing key {key}, using '{placeholder}'"),
                        );
                        placeholder
                    }
                })
                .collect(),
            RawPayload::Absent => Vec::new(),
            other => {
                self.report(
                    "options",
                    FallbackKind::UnexpectedShape,
                    format!("got {} where options were expected", other.shape_name()),
                );
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------------
    // Record-level operations
    // ------------------------------------------------------------------------

    pub fn quiz_question(&self, raw: &RawQuizQuestion) -> QuizQuestion {
        QuizQuestion {
            id: self.record_id("quiz_questions", &raw.id),
            text: self.text_or("question", &raw.question, NO_QUESTION),
            options: self.quiz_options(&raw.options),
            correct_answer_index: resolve_correct_answer_index(&raw.correct_answer),
        }
    }

    pub fn section(&self, raw: &RawSection) -> Section {
        Section {
            id: coerce_id(&raw.id).unwrap_or_default(),
            title: self.text_or("section_title", &raw.section_title, UNTITLED_SECTION),
            content: self.text_or("content", &raw.content, NO_CONTENT),
            code_examples: self.array_field::<CodeExample>("code_examples", &raw.code_examples),
            math_expressions: self
                .array_field::<MathExpression>("math_expressions", &raw.math_expressions),
            glossary_terms: self
                .records::<RawGlossaryTerm>("glossary_terms", &raw.glossary_terms)
                .iter()
                .map(|term| self.glossary_term(term))
                .collect(),
            quiz_questions: self
                .records::<RawQuizQuestion>("quiz_questions", &raw.quiz_questions)
                .iter()
                .map(|question| self.quiz_question(question))
                .collect(),
            recall_notes: self
                .records::<RawRecallNote>("recall_notes", &raw.recall_notes)
                .iter()
                .map(|note| self.recall_note(note))
                .collect(),
        }
    }

    /// Normalize every section and aggregate their records in section order.
    pub fn course(&self, raw: &RawCourse) -> Course {
        let sections: Vec<Section> = raw.sections.iter().map(|s| self.section(s)).collect();

        let glossary_terms = sections
            .iter()
            .flat_map(|s| s.glossary_terms.iter().cloned())
            .collect();
        let quiz_questions = sections
            .iter()
            .flat_map(|s| s.quiz_questions.iter().cloned())
            .collect();
        let recall_notes = sections
            .iter()
            .flat_map(|s| s.recall_notes.iter().cloned())
            .collect();

        Course {
            id: coerce_id(&raw.id).unwrap_or_default(),
            title: self.text_or("title", &raw.title, UNTITLED_COURSE),
            sections,
            glossary_terms,
            quiz_questions,
            recall_notes,
        }
    }

    fn glossary_term(&self, raw: &RawGlossaryTerm) -> GlossaryTerm {
        GlossaryTerm {
            id: self.record_id("glossary_terms", &raw.id),
            term: value_text(&raw.term),
            definition: value_text(&raw.definition),
        }
    }

    fn recall_note(&self, raw: &RawRecallNote) -> RecallNote {
        RecallNote {
            id: self.record_id("recall_notes", &raw.id),
            content: value_text(&raw.content),
            timestamp: value_text(&raw.timestamp),
        }
    }

    /// Nested records are array-shaped on the wire; there is no string-decoding path.
    fn records<T: DeserializeOwned>(&self, field: &'static str, raw: &Value) -> Vec<T> {
        match RawPayload::classify(raw) {
            RawPayload::Array(items) => self.typed_elements(field, items),
            RawPayload::Absent => Vec::new(),
            other => {
                self.report(
                    field,
                    FallbackKind::UnexpectedShape,
                    format!("got {} where an array was expected", other.shape_name()),
                );
                Vec::new()
            }
        }
    }

    fn record_id(&self, field: &'static str, raw: &Value) -> String {
        coerce_id(raw).unwrap_or_else(|| {
            let id = LocalId::new().to_string();
            self.report(field, FallbackKind::Placeholder, format!("missing id, assigned {id}"));
            id
        })
    }

    fn text_or(&self, field: &'static str, raw: &Value, fallback: &str) -> String {
        truthy_text(raw).unwrap_or_else(|| {
            if !raw.is_null() {
                self.report(field, FallbackKind::Placeholder, format!("using '{fallback}'"));
            }
            fallback.to_owned()
        })
    }
}

// ============================================================================
// Answer resolution
// ============================================================================

/// Resolve the backend's `correct_answer` into a zero-based option index.
///
/// - number: used as-is (fractions truncate toward zero)
/// - string with a leading integer (`"1"`, `" 2 "`, `"3rd"`): that integer
/// - any other single character: its upper-case offset from `'A'`
/// - anything else: `0`
///
/// Letters outside `A..D` and other odd single characters are *not* range-checked and can
/// resolve to indexes that match no option; callers that need a valid slot should go
/// through [`QuizQuestion::correct_option`].
pub fn resolve_correct_answer_index(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(text) => leading_integer(text)
            .or_else(|| letter_offset(text))
            .unwrap_or(0),
        _ => 0,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn letter_offset(text: &str) -> Option<i64> {
    let mut chars = text.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let upper = letter.to_uppercase().next().unwrap_or(letter);
    Some(i64::from(u32::from(upper)) - i64::from(u32::from('A')))
}

// ============================================================================
// Value coercion helpers
// ============================================================================

/// Identifier as a string: strings are kept, numbers are rendered, empty/other is `None`.
fn coerce_id(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Display text for a value that counts as present: `null`, `false`, `0` and `""` do not.
pub(crate) fn truthy_text(raw: &Value) -> Option<String> {
    match raw {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(value_text(other)),
    }
}

/// Display text for any value; strings unquoted, `null` empty, the rest as JSON.
pub(crate) fn value_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// Silent free-function API
// ============================================================================

/// See [`Normalizer::array_field`].
pub fn normalize_array_field<T: DeserializeOwned>(raw: &Value) -> Vec<T> {
    Normalizer::silent().array_field("field", raw)
}

/// See [`Normalizer::quiz_options`].
pub fn normalize_quiz_options(raw: &Value) -> Vec<String> {
    Normalizer::silent().quiz_options(raw)
}

/// See [`Normalizer::quiz_question`].
pub fn normalize_quiz_question(raw: &RawQuizQuestion) -> QuizQuestion {
    Normalizer::silent().quiz_question(raw)
}

/// See [`Normalizer::section`].
pub fn normalize_section(raw: &RawSection) -> Section {
    Normalizer::silent().section(raw)
}

/// See [`Normalizer::course`].
pub fn normalize_course(raw: &RawCourse) -> Course {
    Normalizer::silent().course(raw)
}
