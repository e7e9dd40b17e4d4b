//! Backend wire models for the microcourse resource.
//!
//! The course envelope is read strictly: it must be a JSON object and `sections` must be an
//! array of objects. Everything inside a section is kept as raw [`serde_json::Value`] because
//! the backend has emitted the same field as an array, a JSON-encoded string, an options map
//! or nothing at all. [`RawPayload`] is the discriminator the normalizer matches on.

use crate::{ContentError, ContentResult};
use serde::Deserialize;
use serde_json::{Map, Value};

// ============================================================================
// Wire types
// ============================================================================

/// Wire representation of `GET /api/microcourses/{id}/`.
///
/// Unknown keys (`topic`, `complexity`, `pdf`, ...) are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawCourse {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub sections: Vec<RawSection>,
}

/// Wire representation of one course section.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawSection {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub section_title: Value,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub code_examples: Value,
    #[serde(default)]
    pub math_expressions: Value,
    #[serde(default)]
    pub glossary_terms: Value,
    #[serde(default)]
    pub quiz_questions: Value,
    #[serde(default)]
    pub recall_notes: Value,
}

/// Wire representation of a quiz question.
///
/// `options` may be an array, an `{A, B, C, D}` map or a JSON string of either.
/// `correct_answer` may be a letter, a digit string or a number.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawQuizQuestion {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub question: Value,
    #[serde(default)]
    pub options: Value,
    #[serde(default)]
    pub correct_answer: Value,
}

/// Wire representation of a glossary term.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawGlossaryTerm {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub term: Value,
    #[serde(default)]
    pub definition: Value,
}

/// Wire representation of a recall note.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawRecallNote {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub timestamp: Value,
}

// ============================================================================
// Shape discriminator
// ============================================================================

/// The closed set of shapes a loosely typed payload field can take.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawPayload<'a> {
    /// An already-decoded array.
    Array(&'a [Value]),
    /// A string that may hold JSON.
    Encoded(&'a str),
    /// An object, read as an options map keyed by letter.
    OptionsMap(&'a Map<String, Value>),
    /// A number or boolean: present, but not a shape any field accepts.
    Scalar(&'a Value),
    /// `null` or a missing field.
    Absent,
}

impl<'a> RawPayload<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(items),
            Value::String(text) => Self::Encoded(text),
            Value::Object(map) => Self::OptionsMap(map),
            Value::Null => Self::Absent,
            Value::Bool(_) | Value::Number(_) => Self::Scalar(value),
        }
    }

    /// Short shape name for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Encoded(_) => "string",
            Self::OptionsMap(_) => "object",
            Self::Scalar(Value::Bool(_)) => "boolean",
            Self::Scalar(_) => "number",
            Self::Absent => "null",
        }
    }
}

// ============================================================================
// Envelope parsing
// ============================================================================

/// Parse a course document from JSON text.
///
/// This uses `serde_path_to_error` to report the failing path (e.g. `sections[2]`) when the
/// envelope does not match [`RawCourse`]. Section fields never cause a failure here.
///
/// # Errors
///
/// Returns [`ContentError::Schema`] if the text is not JSON, is not an object, or has a
/// `sections` value that is not an array of objects.
pub fn read_course_json(text: &str) -> ContentResult<RawCourse> {
    let mut deserializer = serde_json::Deserializer::from_str(text);

    match serde_path_to_error::deserialize::<_, RawCourse>(&mut deserializer) {
        Ok(course) => {
            deserializer.end().map_err(|source| ContentError::Schema {
                path: "<root>".into(),
                source,
            })?;
            Ok(course)
        }
        Err(err) => {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_owned()
            } else {
                path
            };
            Err(ContentError::Schema {
                path,
                source: err.into_inner(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_covers_every_json_shape() {
        assert!(matches!(RawPayload::classify(&json!([1])), RawPayload::Array(items) if items.len() == 1));
        assert!(matches!(RawPayload::classify(&json!("[]")), RawPayload::Encoded("[]")));
        assert!(matches!(RawPayload::classify(&json!({"A": "x"})), RawPayload::OptionsMap(_)));
        assert!(matches!(RawPayload::classify(&json!(3)), RawPayload::Scalar(_)));
        assert!(matches!(RawPayload::classify(&json!(true)), RawPayload::Scalar(_)));
        assert_eq!(RawPayload::classify(&Value::Null), RawPayload::Absent);
    }

    #[test]
    fn shape_names_are_stable() {
        assert_eq!(RawPayload::classify(&json!(false)).shape_name(), "boolean");
        assert_eq!(RawPayload::classify(&json!(1.5)).shape_name(), "number");
        assert_eq!(RawPayload::classify(&Value::Null).shape_name(), "null");
    }

    #[test]
    fn reads_backend_section_names() {
        let course = read_course_json(
            r#"{
                "id": 7,
                "title": "Rust",
                "topic": "ignored",
                "sections": [{
                    "id": 1,
                    "section_title": "Intro",
                    "content": "Hello",
                    "code_examples": "[]",
                    "quiz_questions": []
                }]
            }"#,
        )
        .expect("valid course");

        assert_eq!(course.id, json!(7));
        assert_eq!(course.sections.len(), 1);
        assert_eq!(course.sections[0].section_title, json!("Intro"));
        assert_eq!(course.sections[0].math_expressions, Value::Null);
    }

    #[test]
    fn missing_sections_read_as_empty() {
        let course = read_course_json(r#"{"title": "Empty"}"#).expect("valid");
        assert!(course.sections.is_empty());
    }

    #[test]
    fn reports_path_of_non_object_section() {
        let err = read_course_json(r#"{"sections": [{}, 42]}"#).expect_err("bad section");
        match err {
            ContentError::Schema { path, .. } => assert_eq!(path, "sections[1]"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_scalar_document() {
        let err = read_course_json("42").expect_err("scalar document");
        assert!(matches!(err, ContentError::Schema { path, .. } if path == "<root>"));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let err = read_course_json(r#"{"sections": []} trailing"#).expect_err("trailing");
        assert!(matches!(err, ContentError::Schema { .. }));
    }

    #[test]
    fn extra_title_and_text_keys_are_ignored() {
        let course = read_course_json(
            r#"{"sections": [{
                "title": "A",
                "section_title": "B",
                "quiz_questions": [{"question": "Q", "text": "T", "correctAnswer": "C"}]
            }]}"#,
        )
        .expect("duplicate spellings are not a schema error");
        assert_eq!(course.sections[0].section_title, json!("B"));

        let question: RawQuizQuestion =
            serde_json::from_value(course.sections[0].quiz_questions[0].clone())
                .expect("question");
        assert_eq!(question.question, json!("Q"));
        assert_eq!(question.correct_answer, Value::Null);
    }
}
