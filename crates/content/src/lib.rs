//! # Microcourse content
//!
//! Converts loosely typed course payloads from the backend into stable view models.
//!
//! This crate covers:
//! - Wire models for the backend course resource ([`wire`])
//! - Canonical view models handed to the renderer ([`model`])
//! - The normalizer that maps one onto the other without ever failing ([`normalize`])
//! - An optional diagnostic hook for degraded fields ([`observer`])
//! - Parsers for the older string-encoded notes, quiz and glossary payloads ([`legacy`])
//! - The glossary/recall-notes notebook of an open course view ([`notebook`])
//! - The quiz-taking session ([`quiz`])
//!
//! **No transport concerns**: fetching the course, posting notes and rendering belong to the
//! caller. The only fallible entry point is [`read_course_json`], which checks the course
//! envelope; everything inside a section degrades to placeholders or empty collections.

pub mod config;
pub mod legacy;
pub mod model;
pub mod normalize;
pub mod notebook;
pub mod observer;
pub mod quiz;
pub mod wire;

pub use config::ContentConfig;
pub use model::{CodeExample, Course, GlossaryTerm, MathExpression, QuizQuestion, RecallNote, Section};
pub use normalize::{
    normalize_array_field, normalize_course, normalize_quiz_options, normalize_quiz_question,
    normalize_section, resolve_correct_answer_index, Normalizer,
};
pub use notebook::{NewGlossaryTerm, NewRecallNote, Notebook};
pub use observer::{Fallback, FallbackKind, FallbackObserver, SilentObserver, TracingObserver};
pub use quiz::{AnswerOutcome, QuizSession};
pub use wire::{read_course_json, RawCourse, RawPayload, RawQuizQuestion, RawSection};

/// Errors returned by the `mc-content` crate.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid text: {0}")]
    Text(#[from] mc_types::TextError),

    #[error("course document schema mismatch at {path}: {source}")]
    Schema {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for Results that can fail with a [`ContentError`].
pub type ContentResult<T> = Result<T, ContentError>;
