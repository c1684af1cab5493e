//! TF-IDF scoring of a free-text query against a persisted corpus index.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::index::CorpusIndex;
use crate::persist;
use crate::tokenizer::{TokenKind, Tokenizer};

/// One document's score for one query term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTerm {
    pub term: String,
    pub doc: String,
    pub tf: u32,
    pub idf: f64,
    pub tfidf: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Query term to ranked documents, best first.
pub type SearchResults = BTreeMap<String, Vec<ScoredTerm>>;

/// Loads the persisted index and scores `query` against it. A missing
/// artifact means an empty corpus and yields an empty result map; a corrupt
/// artifact is surfaced as an error.
pub fn search(index_path: &Path, query: &str) -> Result<SearchResults> {
    match persist::load_index(index_path)? {
        Some(index) => Ok(score_query(&index, query)),
        None => Ok(SearchResults::new()),
    }
}

/// Scores every word of `query` against the corpus.
///
/// Each occurrence of a query word runs its own scoring pass, and a repeated
/// word replaces the list stored for it by an earlier pass. Terms that occur
/// in no document are left out of the result entirely, as is any document
/// whose score is not strictly positive.
pub fn score_query(index: &CorpusIndex, query: &str) -> SearchResults {
    let mut results = SearchResults::new();
    let corpus_size = index.len();
    if corpus_size == 0 {
        return results;
    }

    for tok in Tokenizer::new(query) {
        if tok.kind != TokenKind::Word {
            continue;
        }
        let term = tok.text;

        let doc_frequency = index
            .values()
            .filter(|entry| entry.term_frequency_map.contains_key(&term))
            .count();
        if doc_frequency == 0 {
            continue;
        }

        // The +1 keeps the quotient defined when the term is in every
        // document; it also makes the IDF of such a term non-positive, which
        // the score filter below then drops.
        let idf = (corpus_size as f64 / (doc_frequency as f64 + 1.0)).log10();

        let mut scored: Vec<ScoredTerm> = Vec::new();
        for (doc_id, entry) in index {
            let tf = entry
                .term_frequency_map
                .get(&term)
                .copied()
                .unwrap_or(0);
            let tfidf = f64::from(tf) * idf;
            if tfidf > 0.0 {
                scored.push(ScoredTerm {
                    term: term.clone(),
                    doc: doc_id.clone(),
                    tf,
                    idf,
                    tfidf,
                    preview: entry.preview.clone(),
                });
            }
        }
        scored.sort_by(|a, b| {
            b.tfidf
                .partial_cmp(&a.tfidf)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.doc.cmp(&b.doc))
        });
        results.insert(term, scored);
    }
    results
}
