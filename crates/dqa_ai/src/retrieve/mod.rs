use dqa_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::chunking::Chunk;
use crate::config::RetrievalConfig;

mod tfidf;

/// Which stage of the fallback chain produced a ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankStrategy {
    /// TF-IDF scoring found at least one chunk with a positive score.
    Weighted,
    /// Some chunk contains a question keyword as a substring.
    Keyword,
    /// Nothing matched; leading chunks in document order.
    Default,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub chunk_index: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ranking {
    pub strategy: RankStrategy,
    pub chunks: Vec<Chunk>,
    /// Scores of the returned chunks, only for [`RankStrategy::Weighted`].
    pub scores: Vec<Score>,
}

pub fn rank(question: &str, chunks: &[Chunk]) -> Result<Ranking, AppError> {
    rank_with(question, chunks, &RetrievalConfig::default())
}

/// Rank `chunks` against `question`, degrading through weighted, keyword and default stages.
///
/// Only an empty chunk list is an error; "nothing relevant" is absorbed by the fallbacks.
pub fn rank_with(
    question: &str,
    chunks: &[Chunk],
    config: &RetrievalConfig,
) -> Result<Ranking, AppError> {
    if chunks.is_empty() {
        return Err(AppError::new(
            "RETRIEVAL_NO_CHUNKS",
            "No usable text could be derived from the documents",
        ));
    }

    let mut scores = score_chunks(question, chunks);
    if !scores.is_empty() {
        scores.truncate(config.top_k);
        let picked = scores
            .iter()
            .filter_map(|s| chunks.get(s.chunk_index).cloned())
            .collect::<Vec<_>>();
        tracing::debug!(strategy = "weighted", hits = picked.len(), "ranked chunks");
        return Ok(Ranking {
            strategy: RankStrategy::Weighted,
            chunks: picked,
            scores,
        });
    }

    let keyword_hits = keyword_matches(question, chunks, config.keyword_k);
    if !keyword_hits.is_empty() {
        tracing::debug!(strategy = "keyword", hits = keyword_hits.len(), "ranked chunks");
        return Ok(Ranking {
            strategy: RankStrategy::Keyword,
            chunks: keyword_hits,
            scores: Vec::new(),
        });
    }

    let leading = chunks.iter().take(config.fallback_k).cloned().collect::<Vec<_>>();
    tracing::debug!(strategy = "default", hits = leading.len(), "no chunk matched; using leading chunks");
    Ok(Ranking {
        strategy: RankStrategy::Default,
        chunks: leading,
        scores: Vec::new(),
    })
}

/// TF-IDF scores of every chunk with a positive score, highest first, ties by position.
///
/// The corpus is exactly `chunks`; `chunk_index` is the position in that slice.
pub fn score_chunks(question: &str, chunks: &[Chunk]) -> Vec<Score> {
    let corpus = tfidf::Corpus::new(chunks.iter().map(|c| c.text.as_str()));
    let terms = tfidf::tokenize(question);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scores = (0..corpus.len())
        .map(|i| Score {
            chunk_index: i,
            value: corpus.score(i, &terms),
        })
        .filter(|s| s.value > 0.0)
        .collect::<Vec<_>>();

    scores.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.chunk_index.cmp(&b.chunk_index))
    });
    scores
}

/// First `limit` chunks, in document order, containing any whitespace-separated question
/// keyword as a case-insensitive substring.
pub fn keyword_matches(question: &str, chunks: &[Chunk], limit: usize) -> Vec<Chunk> {
    let lowered = question.to_lowercase();
    let keywords = lowered.split_whitespace().collect::<Vec<_>>();
    if keywords.is_empty() {
        return Vec::new();
    }

    chunks
        .iter()
        .filter(|c| {
            let text = c.text.to_lowercase();
            keywords.iter().any(|k| text.contains(k))
        })
        .take(limit)
        .cloned()
        .collect()
}
