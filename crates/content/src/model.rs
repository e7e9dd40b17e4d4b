//! Canonical view models.
//!
//! These are the only shapes a renderer ever sees. Every collection is present (possibly
//! empty) and every text field holds a displayable string. Field names serialise in
//! camelCase to match the rendering layer.

use crate::normalize::value_text;
use mc_uuid::LocalId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A normalized microcourse with its records aggregated across sections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub sections: Vec<Section>,

    /// Glossary terms of every section, in section order.
    pub glossary_terms: Vec<GlossaryTerm>,

    /// Quiz questions of every section, in section order.
    pub quiz_questions: Vec<QuizQuestion>,

    /// Recall notes of every section, in section order.
    pub recall_notes: Vec<RecallNote>,
}

/// One chapter of a microcourse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
    pub code_examples: Vec<CodeExample>,
    pub math_expressions: Vec<MathExpression>,
    pub glossary_terms: Vec<GlossaryTerm>,
    pub quiz_questions: Vec<QuizQuestion>,
    pub recall_notes: Vec<RecallNote>,
}

/// A code snippet. Fields read leniently: `null` becomes `""` and any other non-string
/// value is kept as its JSON text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub code: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathExpression {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub expression: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|raw| value_text(&raw))
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|raw| match raw {
        Value::Null => None,
        other => Some(value_text(&other)),
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub id: String,
    pub term: String,
    pub definition: String,
}

impl GlossaryTerm {
    /// True while the term only exists locally and has no backend id yet.
    pub fn is_pending(&self) -> bool {
        LocalId::is_local(&self.id)
    }
}

/// A multiple-choice question.
///
/// `options` usually has four entries. Questions whose options arrived as an array keep
/// that array's length, so renderers must not assume exactly four.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,

    /// Zero-based index into `options`. Not range-checked; see
    /// [`crate::normalize::resolve_correct_answer_index`].
    pub correct_answer_index: i64,
}

impl QuizQuestion {
    /// The text of the correct option, if the resolved index points at one.
    pub fn correct_option(&self) -> Option<&str> {
        usize::try_from(self.correct_answer_index)
            .ok()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Whether choosing option `index` answers this question correctly.
    pub fn is_correct(&self, index: usize) -> bool {
        i64::try_from(index).is_ok_and(|i| i == self.correct_answer_index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecallNote {
    pub id: String,
    pub content: String,

    /// Display string. Locally created notes carry a client-local rendering of their
    /// creation time; backend notes carry whatever the backend sent.
    pub timestamp: String,
}

impl RecallNote {
    /// True while the note only exists locally and has no backend id yet.
    pub fn is_pending(&self) -> bool {
        LocalId::is_local(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct: i64) -> QuizQuestion {
        QuizQuestion {
            id: "1".into(),
            text: "Q?".into(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_index: correct,
        }
    }

    #[test]
    fn correct_option_follows_index() {
        let q = question(&["a", "b", "c", "d"], 2);
        assert_eq!(q.correct_option(), Some("c"));
        assert!(q.is_correct(2));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn out_of_range_index_has_no_correct_option() {
        assert_eq!(question(&["a", "b"], 3).correct_option(), None);
        assert_eq!(question(&["a", "b"], -1).correct_option(), None);
        assert!(!question(&["a", "b"], -1).is_correct(0));
    }

    #[test]
    fn question_serialises_camel_case() {
        let json = serde_json::to_value(question(&["x"], 0)).expect("serialize");
        assert_eq!(json["correctAnswerIndex"], 0);
        assert!(json.get("correct_answer_index").is_none());
    }

    #[test]
    fn pending_entries_are_recognised_by_local_id() {
        let local = GlossaryTerm {
            id: LocalId::new().to_string(),
            term: "t".into(),
            definition: "d".into(),
        };
        let persisted = GlossaryTerm {
            id: "17".into(),
            ..local.clone()
        };
        assert!(local.is_pending());
        assert!(!persisted.is_pending());
    }

    #[test]
    fn code_example_omits_missing_language() {
        let example = CodeExample {
            description: "d".into(),
            code: "c".into(),
            language: None,
        };
        let json = serde_json::to_value(&example).expect("serialize");
        assert_eq!(json, serde_json::json!({"description": "d", "code": "c"}));
    }

    #[test]
    fn code_and_math_fields_read_leniently() {
        let example: CodeExample = serde_json::from_value(serde_json::json!({
            "description": null,
            "code": "fn main() {}",
            "language": 2
        }))
        .expect("lenient code example");
        assert_eq!(example.description, "");
        assert_eq!(example.language.as_deref(), Some("2"));

        let expression: MathExpression =
            serde_json::from_value(serde_json::json!({"description": "area", "expression": 3}))
                .expect("lenient math expression");
        assert_eq!(expression.expression, "3");
    }
}
