//! Per-document term-frequency accumulation.

use std::collections::BTreeMap;

use crate::tokenizer::{TokenKind, Tokenizer};

/// Occurrence count per normalized (uppercased) term for one document.
pub type TermFrequency = BTreeMap<String, u32>;

/// Tokenizes `text` to end of input and counts every word occurrence.
/// Illegal tokens contribute nothing; identical text always yields an
/// identical map.
pub fn term_frequencies(text: &str) -> TermFrequency {
    let mut tf = TermFrequency::new();
    for tok in Tokenizer::new(text) {
        if tok.kind == TokenKind::Word {
            *tf.entry(tok.text).or_insert(0) += 1;
        }
    }
    tf
}

/// The `n` highest-count terms, highest first, ties by term. Used for debug
/// logging while indexing.
pub fn top_terms(tf: &TermFrequency, n: usize) -> Vec<(&str, u32)> {
    let mut stats: Vec<(&str, u32)> = tf.iter().map(|(t, &c)| (t.as_str(), c)).collect();
    stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    stats.truncate(n);
    stats
}
