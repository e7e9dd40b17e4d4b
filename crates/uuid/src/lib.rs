//! Identifiers for optimistic local entries.
//!
//! Glossary terms and recall notes persisted by the backend carry the backend's own
//! (numeric) primary key. Entries created on the client before the backend has answered
//! need an identity of their own so they can be listed and deleted in the meantime.
//!
//! This crate provides [`LocalId`], a random version 4 UUID rendered in the usual
//! hyphenated lowercase form (`550e8400-e29b-41d4-a716-446655440000`).
//!
//! ## Telling local and backend ids apart
//!
//! Backend ids are decimal integers, so a string that is a canonical hyphenated UUID is
//! always a local id. [`LocalId::is_local`] performs that purely syntactic check.

use std::fmt;

use ::uuid::Uuid;

/// A client-generated identifier for an entry that has not been round-tripped yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalId(Uuid);

impl Default for LocalId {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalId {
    /// Generates a new random local identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns true if `input` looks like a canonical local identifier.
    ///
    /// The check is syntactic: 36 bytes, hyphens at positions 8, 13, 18 and 23, and
    /// lowercase hex digits everywhere else. Braced, URN, simple or uppercase renderings
    /// are not local ids, so a given entry always has exactly one string identity.
    pub fn is_local(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
