//! Diagnostic hook for degraded payload fields.
//!
//! The normalizer never fails: a malformed field becomes an empty collection or a
//! placeholder. By default that happens silently. Callers that want to notice backend
//! data-quality regressions can pass a [`FallbackObserver`] to [`crate::Normalizer`].

use std::fmt;

/// Why a field was degraded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackKind {
    /// A string field did not contain valid JSON.
    MalformedJson,
    /// The value (or the decoded JSON) had a shape the field does not accept.
    UnexpectedShape,
    /// One element of an array could not be read as the expected record.
    SkippedElement,
    /// A missing or empty value was replaced with a placeholder.
    Placeholder,
}

impl FallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedJson => "malformed_json",
            Self::UnexpectedShape => "unexpected_shape",
            Self::SkippedElement => "skipped_element",
            Self::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single degraded field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fallback {
    /// Backend field name, e.g. `code_examples` or `options`.
    pub field: &'static str,
    pub kind: FallbackKind,
    /// Human-readable detail (parser message, offending shape, placeholder used).
    pub detail: String,
}

impl Fallback {
    pub fn new(field: &'static str, kind: FallbackKind, detail: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            detail: detail.into(),
        }
    }
}

/// Receives a notification each time the normalizer degrades a field.
///
/// Implementations must not panic; the normalizer calls them inline.
pub trait FallbackObserver {
    fn on_fallback(&self, fallback: &Fallback);
}

/// Observer that ignores every fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentObserver;

impl FallbackObserver for SilentObserver {
    fn on_fallback(&self, _fallback: &Fallback) {}
}

/// Observer that emits one `tracing` warning per fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl FallbackObserver for TracingObserver {
    fn on_fallback(&self, fallback: &Fallback) {
        tracing::warn!(
            field = fallback.field,
            kind = %fallback.kind,
            "course payload field degraded: {}",
            fallback.detail
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Collects fallbacks so tests can assert on them.
    #[derive(Default)]
    pub(crate) struct RecordingObserver {
        pub(crate) seen: RefCell<Vec<Fallback>>,
    }

    impl RecordingObserver {
        pub(crate) fn kinds(&self) -> Vec<(&'static str, FallbackKind)> {
            self.seen.borrow().iter().map(|f| (f.field, f.kind)).collect()
        }
    }

    impl FallbackObserver for RecordingObserver {
        fn on_fallback(&self, fallback: &Fallback) {
            self.seen.borrow_mut().push(fallback.clone());
        }
    }
}
