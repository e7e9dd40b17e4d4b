//! Glossary terms and recall notes of an open course view.
//!
//! The notebook starts from a normalized [`Course`] and lets the user search, add and
//! delete entries. Added entries are optimistic: they get a [`LocalId`] and stay
//! [`pending`](GlossaryTerm::is_pending) until the caller replaces them with the backend's
//! copy. The request payloads for that round trip are [`NewRecallNote`] and
//! [`NewGlossaryTerm`].

use crate::config::ContentConfig;
use crate::model::{Course, GlossaryTerm, RecallNote};
use crate::ContentResult;
use mc_types::NonEmptyText;
use mc_uuid::LocalId;
use serde::Serialize;

/// Body of `POST /api/add_note/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewRecallNote {
    pub content: NonEmptyText,
    pub section_id: String,
}

impl NewRecallNote {
    pub fn new(content: &str, section_id: impl Into<String>) -> ContentResult<Self> {
        Ok(Self {
            content: NonEmptyText::for_field("content", content)?,
            section_id: section_id.into(),
        })
    }
}

/// Body of `POST /api/add_glossary_term/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewGlossaryTerm {
    pub term: NonEmptyText,
    pub definition: NonEmptyText,
    pub microcourse_id: String,
}

impl NewGlossaryTerm {
    pub fn new(
        term: &str,
        definition: &str,
        microcourse_id: impl Into<String>,
    ) -> ContentResult<Self> {
        Ok(Self {
            term: NonEmptyText::for_field("term", term)?,
            definition: NonEmptyText::for_field("definition", definition)?,
            microcourse_id: microcourse_id.into(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct Notebook {
    config: ContentConfig,
    glossary_terms: Vec<GlossaryTerm>,
    recall_notes: Vec<RecallNote>,
}

impl Notebook {
    pub fn new(config: ContentConfig) -> Self {
        Self {
            config,
            glossary_terms: Vec::new(),
            recall_notes: Vec::new(),
        }
    }

    /// Seed the notebook with the course's aggregated glossary terms and recall notes.
    pub fn from_course(course: &Course, config: ContentConfig) -> Self {
        Self {
            config,
            glossary_terms: course.glossary_terms.clone(),
            recall_notes: course.recall_notes.clone(),
        }
    }

    pub fn glossary_terms(&self) -> &[GlossaryTerm] {
        &self.glossary_terms
    }

    pub fn recall_notes(&self) -> &[RecallNote] {
        &self.recall_notes
    }

    /// Notes whose content contains `query`, ignoring case. An empty query matches all.
    pub fn search_notes(&self, query: &str) -> Vec<&RecallNote> {
        let needle = query.to_lowercase();
        self.recall_notes
            .iter()
            .filter(|note| note.content.to_lowercase().contains(&needle))
            .collect()
    }

    /// Terms whose term or definition contains `query`, ignoring case.
    pub fn search_terms(&self, query: &str) -> Vec<&GlossaryTerm> {
        let needle = query.to_lowercase();
        self.glossary_terms
            .iter()
            .filter(|term| {
                term.term.to_lowercase().contains(&needle)
                    || term.definition.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Append a locally created note stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ContentError::Text`] if `content` is blank after trimming.
    pub fn add_note(&mut self, content: &str) -> ContentResult<&RecallNote> {
        let content = NonEmptyText::for_field("content", content)?;
        let note = RecallNote {
            id: LocalId::new().to_string(),
            content: content.into_string(),
            timestamp: self.config.render_now(),
        };
        tracing::debug!(note_id = %note.id, "added local recall note");
        self.recall_notes.push(note);
        Ok(&self.recall_notes[self.recall_notes.len() - 1])
    }

    /// Append a locally created glossary term.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ContentError::Text`] if either field is blank after trimming.
    pub fn add_term(&mut self, term: &str, definition: &str) -> ContentResult<&GlossaryTerm> {
        let term = NonEmptyText::for_field("term", term)?;
        let definition = NonEmptyText::for_field("definition", definition)?;
        let entry = GlossaryTerm {
            id: LocalId::new().to_string(),
            term: term.into_string(),
            definition: definition.into_string(),
        };
        tracing::debug!(term_id = %entry.id, "added local glossary term");
        self.glossary_terms.push(entry);
        Ok(&self.glossary_terms[self.glossary_terms.len() - 1])
    }

    /// Remove the note with `id`. Returns whether a note was removed.
    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.recall_notes.len();
        self.recall_notes.retain(|note| note.id != id);
        before != self.recall_notes.len()
    }

    /// Remove the term with `id`. Returns whether a term was removed.
    pub fn delete_term(&mut self, id: &str) -> bool {
        let before = self.glossary_terms.len();
        self.glossary_terms.retain(|term| term.id != id);
        before != self.glossary_terms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentError;
    use mc_types::TextError;

    fn seeded() -> Notebook {
        let course = Course {
            id: "1".into(),
            title: "Biology".into(),
            sections: Vec::new(),
            glossary_terms: vec![
                GlossaryTerm {
                    id: "10".into(),
                    term: "Mitochondria".into(),
                    definition: "Powerhouse of the cell".into(),
                },
                GlossaryTerm {
                    id: "11".into(),
                    term: "Osmosis".into(),
                    definition: "Water moving across a membrane".into(),
                },
            ],
            quiz_questions: Vec::new(),
            recall_notes: vec![RecallNote {
                id: "5".into(),
                content: "Cells divide by Mitosis".into(),
                timestamp: "2025-02-01T09:00:00Z".into(),
            }],
        };
        Notebook::from_course(&course, ContentConfig::default())
    }

    #[test]
    fn search_terms_matches_term_or_definition_case_insensitively() {
        let notebook = seeded();
        let hits: Vec<&str> = notebook
            .search_terms("CELL")
            .iter()
            .map(|t| t.term.as_str())
            .collect();
        assert_eq!(hits, ["Mitochondria"]);
        assert_eq!(notebook.search_terms("membrane")[0].term, "Osmosis");
        assert_eq!(notebook.search_terms("").len(), 2);
    }

    #[test]
    fn search_notes_matches_content() {
        let notebook = seeded();
        assert_eq!(notebook.search_notes("mitosis").len(), 1);
        assert!(notebook.search_notes("meiosis").is_empty());
    }

    #[test]
    fn add_note_trims_and_assigns_local_identity() {
        let mut notebook = seeded();
        let note = notebook.add_note("  Review the Krebs cycle ").expect("valid note").clone();
        assert_eq!(note.content, "Review the Krebs cycle");
        assert!(note.is_pending());
        assert!(!note.timestamp.is_empty());
        assert_eq!(notebook.recall_notes().len(), 2);
        assert!(!notebook.recall_notes()[0].is_pending());
    }

    #[test]
    fn add_note_rejects_blank_content() {
        let mut notebook = seeded();
        let err = notebook.add_note("   ").expect_err("blank note");
        assert!(matches!(
            err,
            ContentError::Text(TextError::Empty { field: "content" })
        ));
        assert_eq!(notebook.recall_notes().len(), 1);
    }

    #[test]
    fn add_term_requires_both_fields() {
        let mut notebook = seeded();
        let err = notebook.add_term("Enzyme", " ").expect_err("blank definition");
        assert!(matches!(
            err,
            ContentError::Text(TextError::Empty { field: "definition" })
        ));

        let term = notebook.add_term(" Enzyme ", "Biological catalyst").expect("valid");
        assert_eq!(term.term, "Enzyme");
        assert!(term.is_pending());
    }

    #[test]
    fn delete_removes_only_matching_ids() {
        let mut notebook = seeded();
        assert!(notebook.delete_term("10"));
        assert!(!notebook.delete_term("10"));
        assert_eq!(notebook.glossary_terms().len(), 1);

        let id = notebook.add_note("temporary").expect("valid").id.clone();
        assert!(notebook.delete_note(&id));
        assert!(notebook.delete_note("5"));
        assert!(notebook.recall_notes().is_empty());
    }

    #[test]
    fn request_payloads_serialise_trimmed_text() {
        let note = NewRecallNote::new(" recap ", "3").expect("valid");
        assert_eq!(
            serde_json::to_value(&note).expect("serialize"),
            serde_json::json!({"content": "recap", "section_id": "3"})
        );

        let term = NewGlossaryTerm::new("Gene", " Unit of heredity", "8").expect("valid");
        assert_eq!(
            serde_json::to_value(&term).expect("serialize"),
            serde_json::json!({"term": "Gene", "definition": "Unit of heredity", "microcourse_id": "8"})
        );

        assert!(NewGlossaryTerm::new("", "x", "8").is_err());
    }
}
