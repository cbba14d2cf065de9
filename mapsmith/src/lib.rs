//! ```text
//! Document text ──► chunking::chunk_text ──► ordered chunks
//!                                               │
//!                 prompt::knowledge_map_prompt ◄┘
//!                                               │
//! pipeline::generate_map_batch ──► client (Ollama) ──► raw text
//!                                               │
//!                 validation::validate_knowledge_map
//!                                               │
//!                        MapBatch { maps, chunks_processed }
//!
//! Subtopic metadata ──► prompt::quiz_questions_prompt
//!                 ──► pipeline::generate_with_retry ──► raw question list
//! ```
//!
//! The chunker and prompt builder are pure functions, the
//! [`client::Generator`] trait isolates the transport boundary, and the
//! [`pipeline`] module owns every retry and drop decision.

pub mod chunking;
pub mod client;
pub mod config;
pub mod pipeline;
pub mod prompt;
pub mod schema;
pub mod validation;

pub use chunking::chunk_text;
pub use client::{GenerateError, Generator, OllamaClient, ProbeReport};
pub use config::{OllamaSettings, Settings};
pub use pipeline::{generate_map_batch, generate_with_retry, MapBatch};
pub use schema::{KnowledgeMap, QuizQuestion, Subtopic};
pub use validation::{validate_knowledge_map, validate_question_list, ValidationReport};
