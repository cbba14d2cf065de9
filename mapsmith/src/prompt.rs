//! Deterministic instruction templates for the generation backend.
//!
//! Rendering is pure string interpolation: identical inputs always produce
//! identical prompts. Each template spells out the exact output shape the
//! validator will later check, and repeats the non-empty `explanation`
//! requirement: omitting it is the dominant failure mode observed from the
//! backend, so the emphasis lives in the template itself.

/// Exact output shape for a knowledge map, stated unambiguously enough for
/// the structural validator to check conformance.
const KNOWLEDGE_MAP_SHAPE: &str = r#"{
  "topic": "Main topic title",
  "subtopics": [
    {
      "title": "Subtopic A",
      "description": "Short summary of this subtopic.",
      "key_concepts": ["concept 1", "concept 2", "concept 3"],
      "status": "unmastered",
      "quiz": [
        {
          "question": "What is ...?",
          "options": ["A", "B", "C", "D"],
          "answer": "B",
          "explanation": "B is correct because..."
        }
      ]
    }
  ]
}"#;

/// Exact output shape for a bare question list.
const QUESTION_LIST_SHAPE: &str = r#"[
  {
    "question": "What is the main purpose of X?",
    "options": ["A. Option A", "B. Option B", "C. Option C", "D. Option D"],
    "answer": "B. Option B",
    "explanation": "B is correct because it explains the main purpose clearly."
  }
]"#;

/// How many key concepts are surfaced in a supplementary-question prompt.
const KEY_CONCEPT_LIMIT: usize = 3;

/// Renders the knowledge-map generation prompt for one text chunk.
pub fn knowledge_map_prompt(chunk: &str) -> String {
    format!(
        "You are an educational AI assistant. Given the following educational \
         content, return ONLY a valid JSON object structured exactly as below. \
         Do not include any commentary or extra text — only valid JSON.\n\n\
         ### JSON Format:\n{KNOWLEDGE_MAP_SHAPE}\n\n\
         ### Your Task:\n\
         Generate a knowledge map based on the content below. Every quiz \
         question **must** include a non-empty `explanation`. Do not omit it. \
         Do not generate partial or invalid JSON.\n\n\
         ### Educational Content:\n{chunk}\n"
    )
}

/// Renders the supplementary quiz-question prompt for a subtopic.
///
/// `source_context`, when present, is the full uploaded document text; the
/// prompt instructs the backend to ground new questions in it without
/// repeating material the subtopic's existing quiz already covers.
pub fn quiz_questions_prompt(
    title: &str,
    description: &str,
    key_concepts: &[String],
    num_questions: usize,
    source_context: Option<&str>,
) -> String {
    let concepts = key_concepts
        .iter()
        .take(KEY_CONCEPT_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "Generate {num_questions} multiple choice quiz questions for: {title}\n\n\
         Subtopic summary: {description}\n\
         Key concepts: {concepts}\n\n\
         IMPORTANT: Every question MUST include a non-empty `explanation` \
         field. Do not omit it.\n\n\
         Return ONLY a valid JSON array like this:\n{QUESTION_LIST_SHAPE}\n\n\
         Make questions challenging but fair, and avoid repeating material \
         already covered by the subtopic's existing quiz. ALWAYS include an \
         explanation for each question.\n"
    );

    if let Some(context) = source_context {
        prompt.push_str("\n### Source Material:\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    prompt
}
