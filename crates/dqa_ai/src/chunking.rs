use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;

/// Atomic unit of retrieval. `index` is the position within one chunking pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

pub fn chunk_text(text: &str) -> Vec<Chunk> {
    chunk_text_with_min(text, RetrievalConfig::default().min_chunk_chars)
}

/// Split on blank lines (lines holding only whitespace) and keep segments whose trimmed length
/// exceeds `min_chars` characters. Indices are assigned after filtering, so they are contiguous.
pub fn chunk_text_with_min(text: &str, min_chars: usize) -> Vec<Chunk> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut segments: Vec<String> = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            if !buf.is_empty() {
                segments.push(buf.join("\n"));
                buf.clear();
            }
            continue;
        }
        buf.push(line);
    }
    if !buf.is_empty() {
        segments.push(buf.join("\n"));
    }

    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| s.chars().count() > min_chars)
        .enumerate()
        .map(|(index, s)| Chunk {
            index,
            text: s.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn splits_on_blank_lines_and_keeps_inner_newlines() {
        let chunks = chunk_text("first paragraph line\nstill first\n\nsecond paragraph here");
        assert_eq!(
            texts(&chunks),
            vec!["first paragraph line\nstill first", "second paragraph here"]
        );
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn whitespace_only_lines_count_as_blank() {
        let chunks = chunk_text("alpha paragraph\n   \t \n\n\nbeta paragraph\r\n\r\ngamma paragraph");
        assert_eq!(
            texts(&chunks),
            vec!["alpha paragraph", "beta paragraph", "gamma paragraph"]
        );
    }

    #[test]
    fn drops_segments_of_ten_chars_or_fewer_and_reindexes() {
        // "0123456789" is exactly 10 characters and must be dropped.
        let chunks = chunk_text("short\n\n0123456789\n\n  01234567890  \n\nanother long one");
        assert_eq!(texts(&chunks), vec!["01234567890", "another long one"]);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn length_is_measured_in_characters() {
        // 11 characters, more bytes.
        let chunks = chunk_text("ééééééééééé");
        assert_eq!(chunks.len(), 1);
        assert!(chunk_text("éééééééééé").is_empty());
    }

    #[test]
    fn empty_or_trivial_input_yields_no_chunks() {
        assert!(chunk_text("").is_empty());
        assert!(chunk_text("\n\n  \n").is_empty());
        assert!(chunk_text("tiny\n\nbits").is_empty());
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "The sky is blue because of Rayleigh scattering.\n\nCats are mammals.";
        assert_eq!(chunk_text(text), chunk_text(text));
    }
}
