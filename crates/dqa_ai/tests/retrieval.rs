use dqa_ai::chunking::{chunk_text, Chunk};
use dqa_ai::retrieve::{keyword_matches, rank, score_chunks, RankStrategy};
use pretty_assertions::assert_eq;

const HANDBOOK: &str = "\
Employees accrue vacation at a rate of two days per month.

Vacation requests must be approved by a manager in advance.

Remote work is allowed up to three days per week.

Expense reports are due within thirty days of purchase.

The office closes at six in the evening on Fridays.";

fn indices(chunks: &[Chunk]) -> Vec<usize> {
    chunks.iter().map(|c| c.index).collect()
}

#[test]
fn never_returns_more_than_three_chunks() {
    let chunks = chunk_text(HANDBOOK);
    assert_eq!(chunks.len(), 5);
    for q in ["days", "vacation days per month", "", "zzz", "e", "office fridays evening"] {
        let r = rank(q, &chunks).expect("rank");
        assert!(r.chunks.len() <= 3, "question {q:?} returned {}", r.chunks.len());
    }
}

#[test]
fn weighted_result_is_used_verbatim_when_anything_scores() {
    let chunks = chunk_text(HANDBOOK);
    let r = rank("how many vacation days", &chunks).expect("rank");
    assert_eq!(r.strategy, RankStrategy::Weighted);

    let expected = score_chunks("how many vacation days", &chunks)
        .into_iter()
        .take(3)
        .map(|s| s.chunk_index)
        .collect::<Vec<_>>();
    assert_eq!(indices(&r.chunks), expected);
    // "vacation" and "days" both occur in chunk 0.
    assert_eq!(r.chunks[0].index, 0);
}

#[test]
fn keyword_stage_runs_only_when_weighted_is_empty() {
    let chunks = chunk_text(HANDBOOK);
    // "approv" is only a substring ("approved"), never a token.
    assert!(score_chunks("approv", &chunks).is_empty());
    let r = rank("approv", &chunks).expect("rank");
    assert_eq!(r.strategy, RankStrategy::Keyword);
    assert_eq!(indices(&r.chunks), vec![1]);
    assert_eq!(r.chunks, keyword_matches("approv", &chunks, 3));
}

#[test]
fn default_stage_returns_first_min_two_chunks() {
    let chunks = chunk_text(HANDBOOK);
    let r = rank("quantum chromodynamics", &chunks).expect("rank");
    assert_eq!(r.strategy, RankStrategy::Default);
    assert_eq!(indices(&r.chunks), vec![0, 1]);
}

#[test]
fn multi_document_content_keeps_document_order() {
    let combined = format!("{}\n\n{}", "Alpha document paragraph one.", HANDBOOK);
    let chunks = chunk_text(&combined);
    assert_eq!(chunks[0].text, "Alpha document paragraph one.");
    assert_eq!(indices(&chunks), (0..6).collect::<Vec<_>>());
}
