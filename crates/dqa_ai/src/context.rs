use crate::chunking::Chunk;

/// Rule between chunks in an assembled context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Join ranked chunks in ranking order. The result is both the prompt's grounding text and what
/// a user sees when inspecting an answer's context.
pub fn assemble_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk {
            index,
            text: text.to_string(),
        }
    }

    #[test]
    fn single_chunk_is_returned_verbatim() {
        assert_eq!(assemble_context(&[chunk(0, "only chunk text")]), "only chunk text");
    }

    #[test]
    fn chunks_keep_ranking_order_with_separators() {
        let ctx = assemble_context(&[chunk(2, "third"), chunk(0, "first")]);
        assert_eq!(ctx, "third\n\n---\n\nfirst");
    }
}
