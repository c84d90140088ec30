use std::collections::BTreeMap;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "another", "any",
    "are", "as", "at", "b", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "c", "came", "can", "cannot", "come", "could", "d", "did", "do", "does",
    "doing", "during", "e", "each", "f", "few", "for", "from", "further", "g", "get", "got", "h",
    "had", "has", "have", "he", "her", "here", "him", "himself", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "itself", "j", "k", "l", "like", "m", "make", "many", "me",
    "might", "more", "most", "much", "must", "my", "myself", "n", "never", "now", "o", "of",
    "on", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "p", "q", "r",
    "s", "said", "same", "see", "should", "since", "so", "some", "still", "such", "t", "take",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "u", "under", "until", "up", "v", "very",
    "w", "was", "way", "we", "well", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "with", "would", "x", "y", "you", "your", "yours", "yourself", "z",
];

/// Lower-cased alphanumeric runs with stopwords removed.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Term statistics over exactly one set of chunks.
pub(crate) struct Corpus {
    term_counts: Vec<BTreeMap<String, u32>>,
    doc_freq: BTreeMap<String, u32>,
}

impl Corpus {
    pub(crate) fn new<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut term_counts = Vec::new();
        let mut doc_freq: BTreeMap<String, u32> = BTreeMap::new();
        for text in texts {
            let mut counts: BTreeMap<String, u32> = BTreeMap::new();
            for tok in tokenize(text) {
                *counts.entry(tok).or_insert(0) += 1;
            }
            for term in counts.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            term_counts.push(counts);
        }
        Self {
            term_counts,
            doc_freq,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.term_counts.len()
    }

    pub(crate) fn tf(&self, doc: usize, term: &str) -> u32 {
        self.term_counts
            .get(doc)
            .and_then(|c| c.get(term))
            .copied()
            .unwrap_or(0)
    }

    /// `1 + ln(N / (1 + df))`. Since `df <= N` this stays above `1 - ln 2`, so weights are
    /// never negative.
    pub(crate) fn idf(&self, term: &str) -> f64 {
        let n = self.len() as f64;
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f64;
        1.0 + (n / (1.0 + df)).ln()
    }

    pub(crate) fn tfidf(&self, doc: usize, term: &str) -> f64 {
        let tf = self.tf(doc, term);
        if tf == 0 {
            return 0.0;
        }
        tf as f64 * self.idf(term)
    }

    /// Sum of each query term's weight in `doc`. Repeated query terms count repeatedly.
    pub(crate) fn score(&self, doc: usize, query_terms: &[String]) -> f64 {
        query_terms.iter().map(|t| self.tfidf(doc, t)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_lowercases_splits_and_drops_stopwords() {
        assert_eq!(
            tokenize("Why is the Sky blue? Rayleigh-scattering!"),
            vec!["sky", "blue", "rayleigh", "scattering"]
        );
        assert!(tokenize("what is the of").is_empty());
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let corpus = Corpus::new(["apple banana", "apple cherry", "apple banana"]);
        assert!(corpus.idf("cherry") > corpus.idf("banana"));
        assert!(corpus.idf("banana") > corpus.idf("apple"));
        assert!(corpus.idf("apple") > 0.0);
    }

    #[test]
    fn score_sums_term_weights() {
        let corpus = Corpus::new(["sky sky blue", "cats mammals"]);
        let q = tokenize("sky blue");
        let expected = 2.0 * corpus.idf("sky") + corpus.idf("blue");
        assert!((corpus.score(0, &q) - expected).abs() < 1e-9);
        assert_eq!(corpus.score(1, &q), 0.0);
        assert_eq!(corpus.tf(5, "sky"), 0);
    }
}
