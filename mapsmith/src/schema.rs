//! Data model for validated backend output.
//!
//! Instances are only ever created from raw text that has already passed the
//! structural checks in [`crate::validation`], and live no longer than the
//! response that carries them.

use serde::{Deserialize, Serialize};

/// A topic outline paired with quizzed subtopics.
///
/// Invariants (enforced by the validator, the only gate that admits
/// instances): `topic` is non-blank and `subtopics` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMap {
    pub topic: String,
    pub subtopics: Vec<Subtopic>,
}

/// One subtopic of a knowledge map.
///
/// `status` is an opaque mastery marker (`"unmastered"`, `"mastered"`, …)
/// carried through verbatim and not otherwise validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtopic {
    pub title: String,
    pub description: String,
    pub key_concepts: Vec<String>,
    pub status: String,
    pub quiz: Vec<QuizQuestion>,
}

/// A multiple-choice quiz question.
///
/// Every field is required and non-blank after trimming; `explanation` is
/// never optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}
