//! Structural validation of raw backend output.
//!
//! Validation is structural, not semantic: the raw text must parse as JSON
//! and carry the expected keys with non-blank values. It is also total:
//! every subtopic and every question is inspected, and a single violation
//! anywhere invalidates the whole unit. A malformed subtopic cannot be
//! safely trimmed out of a conceptually linked map without risking dangling
//! references, so there is no partial acceptance inside one generation
//! attempt; loss is only tolerated at the batch level, one whole unit at a
//! time.
//!
//! The diagnostic trail exists for observability (structured `tracing`
//! events at each rejection decision), never for control flow.

use serde_json::Value;

/// Fields every subtopic object must carry.
const SUBTOPIC_FIELDS: [&str; 5] = ["title", "description", "key_concepts", "status", "quiz"];

/// Fields every quiz question object must carry, non-blank after trimming.
const QUESTION_FIELDS: [&str; 4] = ["question", "options", "answer", "explanation"];

/// Outcome of one validation pass.
///
/// `valid` is the only bit callers may branch on; `diagnostics` is a
/// human-readable trail of every violation found.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<String>,
}

impl ValidationReport {
    /// True when no violation was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn reject(&mut self, diagnostic: impl Into<String>) {
        self.diagnostics.push(diagnostic.into());
    }

    fn finish(self, shape: &'static str) -> Self {
        if self.is_valid() {
            tracing::debug!(shape, "validation passed");
        } else {
            tracing::warn!(
                shape,
                violations = self.diagnostics.len(),
                first = self.diagnostics.first().map(String::as_str),
                "validation rejected unit"
            );
        }
        self
    }
}

/// Validates raw text against the knowledge-map shape.
///
/// Requires `topic` (non-blank) and `subtopics` (non-empty sequence); each
/// subtopic must carry all of `title`, `description`, `key_concepts`,
/// `status`, `quiz`, and each quiz entry must be a fully non-blank question
/// object. `status` is opaque and not otherwise validated.
pub fn validate_knowledge_map(raw: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            report.reject(format!("response is not valid JSON: {err}"));
            return report.finish("knowledge_map");
        }
    };

    let Some(map) = value.as_object() else {
        report.reject("response is not a JSON object");
        return report.finish("knowledge_map");
    };

    match map.get("topic") {
        None => report.reject("missing required field 'topic'"),
        Some(topic) => {
            if !topic.as_str().is_some_and(|s| !s.trim().is_empty()) {
                report.reject("'topic' must be a non-blank string");
            }
        }
    }

    match map.get("subtopics") {
        None => report.reject("missing required field 'subtopics'"),
        Some(Value::Array(subtopics)) => {
            if subtopics.is_empty() {
                report.reject("'subtopics' must not be empty");
            }
            for (index, subtopic) in subtopics.iter().enumerate() {
                check_subtopic(subtopic, index, &mut report);
            }
        }
        Some(_) => report.reject("'subtopics' is not a sequence"),
    }

    report.finish("knowledge_map")
}

/// Validates raw text against the bare question-list shape: a sequence of
/// question objects, each fully non-blank.
pub fn validate_question_list(raw: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            report.reject(format!("response is not valid JSON: {err}"));
            return report.finish("question_list");
        }
    };

    let Some(questions) = value.as_array() else {
        report.reject("response is not a JSON sequence");
        return report.finish("question_list");
    };

    for (index, question) in questions.iter().enumerate() {
        check_question(question, &format!("question {index}"), &mut report);
    }

    report.finish("question_list")
}

fn check_subtopic(subtopic: &Value, index: usize, report: &mut ValidationReport) {
    let Some(fields) = subtopic.as_object() else {
        report.reject(format!("subtopic {index} is not an object"));
        return;
    };

    for field in SUBTOPIC_FIELDS {
        if !fields.contains_key(field) {
            report.reject(format!("subtopic {index} missing '{field}' field"));
        }
    }

    match fields.get("quiz") {
        Some(Value::Array(quiz)) => {
            for (question_index, question) in quiz.iter().enumerate() {
                check_question(
                    question,
                    &format!("subtopic {index} question {question_index}"),
                    report,
                );
            }
        }
        Some(_) => report.reject(format!("subtopic {index} 'quiz' is not a sequence")),
        None => {}
    }
}

fn check_question(question: &Value, path: &str, report: &mut ValidationReport) {
    let Some(fields) = question.as_object() else {
        report.reject(format!("{path} is not an object"));
        return;
    };

    for field in QUESTION_FIELDS {
        let Some(value) = fields.get(field) else {
            report.reject(format!("{path} missing '{field}' field"));
            continue;
        };

        match (field, value) {
            ("options", Value::Array(options)) => {
                if options.is_empty() {
                    report.reject(format!("{path} has empty 'options'"));
                }
                for (option_index, option) in options.iter().enumerate() {
                    if !option.as_str().is_some_and(|s| !s.trim().is_empty()) {
                        report.reject(format!(
                            "{path} option {option_index} must be a non-blank string"
                        ));
                    }
                }
            }
            ("options", _) => {
                report.reject(format!("{path} 'options' is not a sequence"));
            }
            (_, value) => {
                if !value.as_str().is_some_and(|s| !s.trim().is_empty()) {
                    report.reject(format!("{path} has blank '{field}' field"));
                }
            }
        }
    }
}
