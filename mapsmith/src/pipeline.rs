//! Orchestrates generation attempts and reduces them to clean result sets.
//!
//! Two usage patterns with different failure policies:
//!
//! - **Batch of independent units** ([`generate_map_batch`]): one attempt
//!   per chunk, no retry. A chunk whose output fails generation or
//!   validation is dropped from the batch and its siblings continue; total
//!   failure of one chunk never aborts the rest. An all-failed batch is
//!   still a successful (empty) batch.
//! - **Single unit with retry** ([`generate_with_retry`]): up to
//!   `max_attempts` attempts at the *same* unit of work, no backoff, no
//!   jitter. The first `Ok` is accepted; schema validation happens
//!   afterward, in the caller. Exhaustion returns the last observed failure.
//!
//! One retryable unit moves through
//! `Pending → Attempting → {Accepted | Pending | Exhausted}`; the terminal
//! states are `Accepted` and `Exhausted`. Each transition is surfaced as a
//! structured tracing event rather than being interleaved with the loop's
//! business logic.

use crate::client::{GenerateError, Generator};
use crate::prompt::knowledge_map_prompt;
use crate::schema::KnowledgeMap;
use crate::validation::validate_knowledge_map;

/// Aggregated outcome of one batch run.
///
/// `maps` preserves input chunk order. `rejected` counts dropped chunks;
/// the HTTP surface does not expose per-chunk failure reasons, so the
/// count exists for logs and tests.
#[derive(Debug, Default)]
pub struct MapBatch {
    pub maps: Vec<KnowledgeMap>,
    pub chunks_processed: usize,
    pub rejected: usize,
}

/// Runs one generation + validation attempt per chunk, strictly in input
/// order, and keeps every unit that survives both.
pub async fn generate_map_batch(generator: &dyn Generator, chunks: &[String]) -> MapBatch {
    let mut batch = MapBatch {
        chunks_processed: chunks.len(),
        ..Default::default()
    };

    for (index, chunk) in chunks.iter().enumerate() {
        tracing::info!(chunk = index, total = chunks.len(), "processing chunk");
        let prompt = knowledge_map_prompt(chunk);

        let raw = match generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(
                    chunk = index,
                    kind = err.kind(),
                    error = %err,
                    "chunk generation failed, dropping from batch"
                );
                batch.rejected += 1;
                continue;
            }
        };

        let report = validate_knowledge_map(&raw);
        if !report.is_valid() {
            tracing::warn!(
                chunk = index,
                violations = report.diagnostics.len(),
                "chunk output failed validation, dropping from batch"
            );
            batch.rejected += 1;
            continue;
        }

        match serde_json::from_str::<KnowledgeMap>(&raw) {
            Ok(map) => batch.maps.push(map),
            Err(err) => {
                // Structurally valid but not decodable into the model
                // (e.g. a key concept that is not a string).
                tracing::warn!(chunk = index, error = %err, "chunk output failed decode, dropping from batch");
                batch.rejected += 1;
            }
        }
    }

    tracing::info!(
        processed = batch.chunks_processed,
        kept = batch.maps.len(),
        rejected = batch.rejected,
        "batch complete"
    );
    batch
}

/// Makes up to `max_attempts` attempts at the same prompt and returns the
/// first success, or the last observed failure once attempts are exhausted.
pub async fn generate_with_retry(
    generator: &dyn Generator,
    prompt: &str,
    max_attempts: usize,
) -> Result<String, GenerateError> {
    let mut last_failure = None;

    for attempt in 1..=max_attempts {
        tracing::debug!(attempt, max_attempts, "attempting generation");
        match generator.generate(prompt).await {
            Ok(raw) => {
                tracing::debug!(attempt, "attempt accepted");
                return Ok(raw);
            }
            Err(err) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    kind = err.kind(),
                    error = %err,
                    "generation attempt failed"
                );
                last_failure = Some(err);
            }
        }
    }

    tracing::warn!(max_attempts, "attempts exhausted");
    Err(last_failure.unwrap_or(GenerateError::Unexpected {
        detail: "all generation attempts failed".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generator scripted with one canned outcome per call, cycling if the
    /// calls outnumber the script.
    struct ScriptedGenerator {
        script: Vec<Result<String, GenerateError>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<String, GenerateError>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script[call % self.script.len()] {
                Ok(raw) => Ok(raw.clone()),
                Err(GenerateError::Backend { status, body }) => Err(GenerateError::Backend {
                    status: *status,
                    body: body.clone(),
                }),
                Err(other) => Err(GenerateError::Unexpected {
                    detail: other.to_string(),
                }),
            }
        }
    }

    fn valid_map(topic: &str) -> String {
        json!({
            "topic": topic,
            "subtopics": [{
                "title": "Overview",
                "description": "High-level summary.",
                "key_concepts": ["a", "b"],
                "status": "unmastered",
                "quiz": [{
                    "question": "Why?",
                    "options": ["A", "B"],
                    "answer": "A",
                    "explanation": "Because A."
                }]
            }]
        })
        .to_string()
    }

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chunk body {i}")).collect()
    }

    #[tokio::test]
    async fn malformed_chunk_is_dropped_but_siblings_survive() {
        let generator = ScriptedGenerator::new(vec![
            Ok(valid_map("first")),
            Ok("{not even json".to_string()),
            Ok(valid_map("third")),
        ]);

        let batch = generate_map_batch(&generator, &chunks(3)).await;
        assert_eq!(batch.chunks_processed, 3);
        assert_eq!(batch.rejected, 1);
        assert_eq!(batch.maps.len(), 2);
        // Output order matches input order, not completion order.
        assert_eq!(batch.maps[0].topic, "first");
        assert_eq!(batch.maps[1].topic, "third");
    }

    #[tokio::test]
    async fn transport_failure_drops_only_the_failing_chunk() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerateError::Backend {
                status: 500,
                body: "boom".to_string(),
            }),
            Ok(valid_map("survivor")),
        ]);

        let batch = generate_map_batch(&generator, &chunks(2)).await;
        assert_eq!(batch.chunks_processed, 2);
        assert_eq!(batch.maps.len(), 1);
        assert_eq!(batch.maps[0].topic, "survivor");
    }

    #[tokio::test]
    async fn all_failed_batch_is_still_a_successful_empty_batch() {
        let generator = ScriptedGenerator::new(vec![Ok("garbage".to_string())]);
        let batch = generate_map_batch(&generator, &chunks(3)).await;
        assert!(batch.maps.is_empty());
        assert_eq!(batch.chunks_processed, 3);
        assert_eq!(batch.rejected, 3);
    }

    #[tokio::test]
    async fn empty_chunk_list_yields_empty_batch_without_calls() {
        let generator = ScriptedGenerator::new(vec![Ok(valid_map("unused"))]);
        let batch = generate_map_batch(&generator, &[]).await;
        assert!(batch.maps.is_empty());
        assert_eq!(batch.chunks_processed, 0);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn retry_accepts_the_first_success() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerateError::Backend {
                status: 502,
                body: "bad gateway".to_string(),
            }),
            Ok("raw output".to_string()),
        ]);

        let raw = generate_with_retry(&generator, "prompt", 3).await.unwrap();
        assert_eq!(raw, "raw output");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn retry_exhaustion_makes_exactly_max_attempts_and_returns_last_failure() {
        let generator = ScriptedGenerator::new(vec![Err(GenerateError::Backend {
            status: 500,
            body: "always down".to_string(),
        })]);

        let err = generate_with_retry(&generator, "prompt", 3).await.unwrap_err();
        assert_eq!(generator.calls(), 3);
        assert!(
            matches!(err, GenerateError::Backend { status: 500, .. }),
            "expected the last observed failure, got {err:?}"
        );
    }

    #[tokio::test]
    async fn zero_attempts_returns_a_generic_failure() {
        let generator = ScriptedGenerator::new(vec![Ok("never reached".to_string())]);
        let err = generate_with_retry(&generator, "prompt", 0).await.unwrap_err();
        assert_eq!(generator.calls(), 0);
        assert!(matches!(err, GenerateError::Unexpected { .. }));
    }
}
