//! Splits raw document text into bounded-size generation units.
//!
//! Chunk boundaries follow blank-line paragraph breaks and are soft:
//! downstream consumers must not assume exact token-size conformance.

/// Characters-per-token heuristic applied to the token budget.
///
/// Not an exact token count; it only has to keep chunks comfortably inside
/// the backend's context window.
pub const CHARS_PER_TOKEN: usize = 4;

/// Splits `text` on blank-line paragraph boundaries and greedily packs
/// paragraphs into chunks of at most `token_budget * CHARS_PER_TOKEN`
/// characters, preserving paragraph order.
///
/// A single paragraph longer than the budget is still emitted whole; the
/// chunker never splits mid-paragraph. Empty input yields no chunks.
pub fn chunk_text(text: &str, token_budget: usize) -> Vec<String> {
    let limit = token_budget * CHARS_PER_TOKEN;
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        if current.len() + paragraph.len() >= limit {
            flush(&mut chunks, &mut current);
        }
        current.push_str(paragraph);
        current.push_str("\n\n");
    }
    flush(&mut chunks, &mut current);

    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    current.clear();
}
