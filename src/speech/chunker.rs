/// Largest number of characters sent to the speech service in one call.
pub const DEFAULT_CHUNK_BUDGET: usize = 8000;

/// A window of narration text, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechChunk {
    pub index: usize,
    pub text: String,
}

/// Split `text` into consecutive windows of at most `budget` characters.
///
/// Windows are cut on character (not byte) boundaries and concatenate back to
/// the input exactly. Text within the budget, including empty text, yields a
/// single chunk.
pub fn chunk_text(text: &str, budget: usize) -> Vec<SpeechChunk> {
    let budget = budget.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == budget {
            chunks.push(SpeechChunk {
                index: chunks.len(),
                text: std::mem::take(&mut current),
            });
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    chunks.push(SpeechChunk {
        index: chunks.len(),
        text: current,
    });

    chunks
}

/// First `budget` characters of `text`.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
